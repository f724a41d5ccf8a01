mod prices;
mod results;
mod statistics;

pub use prices::{PriceRow, PriceTable};
pub use results::{
    SamplingProgress, SamplingWarning, SimulationResultSet, SimulationSummary, TrialResult,
};
pub use statistics::{CovarianceMatrix, ReturnMatrix, ReturnStatistics, TRADING_DAYS_PER_YEAR};
