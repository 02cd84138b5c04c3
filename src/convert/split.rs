//! Train/test splitting of emitted records.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::export::{ExportMode, ExportOutput, Record, Schema};
use crate::report::ExportReport;

/// Default shuffle seed.
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Train/test split configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOptions {
    /// Share of records in the train split, strictly between 0 and 1
    pub train_fraction: f64,

    /// Shuffle seed
    pub seed: u64,

    /// Shuffle before splitting
    pub shuffle: bool,
}

impl SplitOptions {
    /// Split with the given train fraction, unshuffled.
    pub fn new(train_fraction: f64) -> Self {
        Self {
            train_fraction,
            seed: DEFAULT_SPLIT_SEED,
            shuffle: false,
        }
    }

    /// Set the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable shuffling.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.train_fraction > 0.0 && self.train_fraction < 1.0 {
            Ok(())
        } else {
            Err(Error::InvalidSplit(self.train_fraction))
        }
    }
}

/// Split records into `(train, test)` with `floor(n * fraction)` train
/// records.
///
/// # Errors
/// * `Error::InvalidSplit` if the fraction is not strictly between 0 and 1
pub fn split_records(
    mut records: Vec<Record>,
    options: &SplitOptions,
) -> Result<(Vec<Record>, Vec<Record>)> {
    options.validate()?;
    if options.shuffle {
        records.shuffle(&mut StdRng::seed_from_u64(options.seed));
    }
    let train_len = (records.len() as f64 * options.train_fraction).floor() as usize;
    let test = records.split_off(train_len);
    Ok((records, test))
}

/// An export divided into train and test records.
#[derive(Debug, Clone)]
pub struct SplitOutput {
    /// Mode that produced the records
    pub mode: ExportMode,

    /// Record schema
    pub schema: Schema,

    /// Train records
    pub train: Vec<Record>,

    /// Test records
    pub test: Vec<Record>,

    /// Tallies of the whole export
    pub report: ExportReport,
}

impl SplitOutput {
    /// Split a finished export.
    pub fn from_output(output: ExportOutput, options: &SplitOptions) -> Result<Self> {
        let (train, test) = split_records(output.records, options)?;
        log::info!("Split {} train / {} test records", train.len(), test.len());
        Ok(Self {
            mode: output.mode,
            schema: output.schema,
            train,
            test,
            report: output.report,
        })
    }

    /// The two splits as separate outputs, each carrying the run report.
    pub fn into_outputs(self) -> (ExportOutput, ExportOutput) {
        let train = ExportOutput {
            mode: self.mode,
            schema: self.schema.clone(),
            records: self.train,
            report: self.report.clone(),
        };
        let test = ExportOutput {
            mode: self.mode,
            schema: self.schema,
            records: self.test,
            report: self.report,
        };
        (train, test)
    }
}
