//! Hyperparameter sweep log extraction.
//!
//! A sweep log is a sequence of blocks separated by a dash run. Each block
//! describes one configuration (`epochs`, `batch_size`, `learning_rate`) and
//! its k-fold results (mean accuracy, variance). [`extract`] turns the log
//! into [`SweepRecord`]s and [`serialize`] / [`write_csv`] render them as CSV.

pub mod csv_out;
pub mod error;
pub mod extract;
pub mod record;

pub use csv_out::{serialize, write_csv};
pub use error::{ExtractError, ExtractResult};
pub use extract::{
    extract, parse_block, BlockOutcome, Extraction, Extractor, Pattern, SkippedBlock,
    DEFAULT_DELIMITER,
};
pub use record::{SweepRecord, CSV_HEADER};
