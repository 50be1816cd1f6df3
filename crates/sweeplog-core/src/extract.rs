//! Block splitting and per-block pattern extraction.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{ExtractError, ExtractResult};
use crate::record::SweepRecord;

/// Separator written by the sweep between two configurations.
pub const DEFAULT_DELIMITER: &str = "--------------------------";

// ASCII digits only; `str::parse` rejects other Unicode digits, so such a
// block is skipped instead of aborting the run.
static PARAMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"epochs:\s*([0-9]+),\s*batch_size:\s*([0-9]+),\s*learning_rate:\s*([0-9.]+)")
        .expect("invalid PARAMS_RE pattern")
});
static MEAN_ACCURACY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"mean accuracy over kfold:\s*([0-9.]+)").expect("invalid MEAN_ACCURACY_RE pattern")
});
static VARIANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Variance\s+over kfold:\s*([0-9.]+)").expect("invalid VARIANCE_RE pattern")
});

/// The three substrings a block must contain to produce a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Params,
    MeanAccuracy,
    Variance,
}

impl Pattern {
    pub const ALL: [Pattern; 3] = [Pattern::Params, Pattern::MeanAccuracy, Pattern::Variance];

    fn regex(self) -> &'static Regex {
        match self {
            Pattern::Params => &*PARAMS_RE,
            Pattern::MeanAccuracy => &*MEAN_ACCURACY_RE,
            Pattern::Variance => &*VARIANCE_RE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pattern::Params => "epochs/batch_size/learning_rate",
            Pattern::MeanAccuracy => "mean accuracy over kfold",
            Pattern::Variance => "Variance over kfold",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of matching a single block.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockOutcome {
    Record(SweepRecord),
    /// Block lacked these patterns and produced nothing.
    Skipped(Vec<Pattern>),
}

/// A dropped block, 0-based in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedBlock {
    pub index: usize,
    pub missing: Vec<Pattern>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<SweepRecord>,
    /// Number of blocks the input was split into.
    pub blocks: usize,
    pub skipped: Vec<SkippedBlock>,
}

/// Splits a sweep log on a delimiter and extracts one record per complete block.
#[derive(Clone, Debug)]
pub struct Extractor {
    delimiter: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_owned(),
        }
    }
}

impl Extractor {
    pub fn new(delimiter: impl Into<String>) -> ExtractResult<Self> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(ExtractError::EmptyDelimiter);
        }
        Ok(Self { delimiter })
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Blocks in input order. Input without the delimiter is a single block.
    pub fn blocks<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.split(self.delimiter.as_str())
    }

    pub fn extract(&self, text: &str) -> ExtractResult<Vec<SweepRecord>> {
        Ok(self.extract_with_report(text)?.records)
    }

    /// Like [`Extractor::extract`], also reporting which blocks were dropped.
    pub fn extract_with_report(&self, text: &str) -> ExtractResult<Extraction> {
        let mut extraction = Extraction::default();
        for (index, block) in self.blocks(text).enumerate() {
            extraction.blocks += 1;
            match parse_block(block)? {
                BlockOutcome::Record(record) => extraction.records.push(record),
                BlockOutcome::Skipped(missing) => {
                    log::trace!("block {index}: missing {missing:?}");
                    extraction.skipped.push(SkippedBlock { index, missing });
                }
            }
        }
        Ok(extraction)
    }
}

/// Extracts records using [`DEFAULT_DELIMITER`].
pub fn extract(text: &str) -> ExtractResult<Vec<SweepRecord>> {
    Extractor::default().extract(text)
}

/// Searches one block for all three patterns.
///
/// Every pattern is searched regardless of the others, so a skipped block
/// reports all of its missing patterns.
pub fn parse_block(block: &str) -> ExtractResult<BlockOutcome> {
    let params = PARAMS_RE.captures(block);
    let mean_accuracy = MEAN_ACCURACY_RE.captures(block);
    let variance = VARIANCE_RE.captures(block);

    let (Some(params), Some(mean_accuracy), Some(variance)) = (params, mean_accuracy, variance)
    else {
        let missing = Pattern::ALL
            .into_iter()
            .filter(|pattern| !pattern.regex().is_match(block))
            .collect();
        return Ok(BlockOutcome::Skipped(missing));
    };

    Ok(BlockOutcome::Record(SweepRecord {
        epochs: parse_capture_u64(&params, 1, "epochs")?,
        batch_size: parse_capture_u64(&params, 2, "batch_size")?,
        learning_rate: parse_capture_f64(&params, 3, "learning_rate")?,
        mean_accuracy: parse_capture_f64(&mean_accuracy, 1, "mean_accuracy")?,
        variance: parse_capture_f64(&variance, 1, "variance")?,
    }))
}

fn capture<'h>(caps: &Captures<'h>, idx: usize) -> &'h str {
    // every group in the three patterns is mandatory
    caps.get(idx).map_or("", |m| m.as_str())
}

fn parse_capture_u64(caps: &Captures<'_>, idx: usize, field: &'static str) -> ExtractResult<u64> {
    let raw = capture(caps, idx);
    raw.parse::<u64>().map_err(|source| ExtractError::InvalidInteger {
        field,
        raw: raw.to_owned(),
        source,
    })
}

fn parse_capture_f64(caps: &Captures<'_>, idx: usize, field: &'static str) -> ExtractResult<f64> {
    let raw = capture(caps, idx);
    raw.parse::<f64>().map_err(|source| ExtractError::InvalidFloat {
        field,
        raw: raw.to_owned(),
        source,
    })
}
