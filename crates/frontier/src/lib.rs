//! Command-line front end for the frontier sampling engine
//!
//! - Run configuration from YAML with command-line overrides
//! - Clean price-table CSV ingestion and multi-index download flattening
//! - Results CSV output and a terminal summary
//! - File logging with size-based rotation

// ============================================================================
// Modules
// ============================================================================

pub mod commands;
pub mod config;
pub mod data;
pub mod logging;
pub mod output;
pub mod util;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use commands::{render_report, run_preprocess, run_simulation};
pub use config::{Overrides, RunConfig};
pub use logging::init_logging;
