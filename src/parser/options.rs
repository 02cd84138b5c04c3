//! Parsing options and configuration.

use crate::detect::PAGE_DIR;
use crate::encoding::DecodeOptions;
use crate::report::DEFAULT_FAILURE_SAMPLE;

/// Options for walking an archive and parsing its PAGE documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Directory name that marks PAGE documents
    pub page_dir: String,

    /// Decoding chain for document bytes
    pub decode: DecodeOptions,

    /// Failure messages kept in the walk report
    pub failure_sample: usize,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory name that marks PAGE documents.
    pub fn with_page_dir(mut self, dir: impl Into<String>) -> Self {
        self.page_dir = dir.into();
        self
    }

    /// Set decoding options.
    pub fn with_decode(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    /// Set how many failure messages the walk report keeps.
    pub fn with_failure_sample(mut self, sample: usize) -> Self {
        self.failure_sample = sample;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            page_dir: PAGE_DIR.to_string(),
            decode: DecodeOptions::default(),
            failure_sample: DEFAULT_FAILURE_SAMPLE,
        }
    }
}
