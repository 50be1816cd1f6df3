use serde::Serialize;

/// CSV column names, in field order of [`SweepRecord`].
pub const CSV_HEADER: [&str; 5] = ["epochs", "batch_size", "learning_rate", "mean_accuracy", "variance"];

/// One sweep configuration and its k-fold result.
///
/// Field order matches [`CSV_HEADER`]; the CSV writer relies on it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SweepRecord {
    pub epochs: u64,
    pub batch_size: u64,
    pub learning_rate: f64,
    pub mean_accuracy: f64,
    pub variance: f64,
}
