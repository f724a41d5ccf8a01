//! Random long-only portfolio weights
//!
//! Each draw takes one uniform `[0, 1)` value per asset and divides by their
//! sum, so components are non-negative and add up to one.

use rand::Rng;

use crate::error::TrialError;

/// Draws attempted for one trial before the random source is considered broken
pub const MAX_WEIGHT_REDRAWS: u32 = 16;

/// A usable weight vector plus the number of degenerate draws discarded first
#[derive(Debug, Clone, PartialEq)]
pub struct WeightDraw {
    pub weights: Vec<f64>,
    pub redraws: u32,
}

/// Scale raw non-negative values so they sum to one
pub fn normalize(mut raw: Vec<f64>) -> Result<Vec<f64>, TrialError> {
    let total: f64 = raw.iter().sum();
    if total == 0.0 {
        return Err(TrialError::DegenerateWeights);
    }
    for w in &mut raw {
        *w /= total;
    }
    Ok(raw)
}

/// One random weight vector of length `num_assets`
pub fn random_weights<R: Rng + ?Sized>(
    rng: &mut R,
    num_assets: usize,
) -> Result<Vec<f64>, TrialError> {
    let raw: Vec<f64> = (0..num_assets).map(|_| rng.random::<f64>()).collect();
    normalize(raw)
}

/// Draw weights, redrawing from the same stream when a draw is all zeros
pub fn draw_weights<R: Rng + ?Sized>(
    rng: &mut R,
    num_assets: usize,
) -> Result<WeightDraw, TrialError> {
    for redraws in 0..MAX_WEIGHT_REDRAWS {
        match random_weights(rng, num_assets) {
            Ok(weights) => return Ok(WeightDraw { weights, redraws }),
            Err(TrialError::DegenerateWeights) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(TrialError::DegenerateWeights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{RngCore, SeedableRng};

    /// Yields zero for the first `zeros` words, then a fixed non-zero word
    struct ZeroThenRng {
        zeros: usize,
    }

    impl RngCore for ZeroThenRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            if self.zeros > 0 {
                self.zeros -= 1;
                0
            } else {
                u64::MAX / 3
            }
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for b in dst {
                *b = self.next_u64() as u8;
            }
        }
    }

    #[test]
    fn test_weights_sum_to_one_and_non_negative() {
        let mut rng = SmallRng::seed_from_u64(42);
        for n in 1..12 {
            let w = random_weights(&mut rng, n).unwrap();
            assert_eq!(w.len(), n);
            assert!(w.iter().all(|x| *x >= 0.0));
            let sum: f64 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum {sum} for {n} assets");
        }
    }

    #[test]
    fn test_normalize_rejects_all_zero() {
        assert_eq!(
            normalize(vec![0.0, 0.0, 0.0]),
            Err(TrialError::DegenerateWeights)
        );
        assert_eq!(normalize(vec![1.0, 3.0]).unwrap(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_degenerate_draw_is_redrawn() {
        // Three assets: the first draw consumes three zero words
        let mut rng = ZeroThenRng { zeros: 3 };
        let draw = draw_weights(&mut rng, 3).unwrap();

        assert_eq!(draw.redraws, 1);
        let sum: f64 = draw.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_redraw_budget_exhausted() {
        let mut rng = ZeroThenRng { zeros: usize::MAX };
        assert_eq!(
            draw_weights(&mut rng, 2),
            Err(TrialError::DegenerateWeights)
        );
    }
}
