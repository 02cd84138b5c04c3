//! Export configuration.

use crate::error::{Error, Result};
use crate::report::DEFAULT_FAILURE_SAMPLE;

/// Default number of lines per window.
pub const DEFAULT_WINDOW_SIZE: usize = 2;

/// Default padding around polygon crops, in pixels.
pub const DEFAULT_POLYGON_PADDING: u32 = 5;

/// Validated sliding-window parameters.
///
/// # Example
/// ```
/// use unpage::export::WindowConfig;
///
/// let config = WindowConfig::new(3, 1).unwrap();
/// assert_eq!(config.step(), 2);
/// assert!(WindowConfig::new(2, 2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    size: usize,
    overlap: usize,
}

impl WindowConfig {
    /// Validate and build a window configuration.
    ///
    /// # Errors
    /// * `Error::InvalidWindow` if `size` is zero or `overlap >= size`
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size < 1 {
            return Err(Error::InvalidWindow(format!(
                "window size must be at least 1, got {}",
                size
            )));
        }
        if overlap >= size {
            return Err(Error::InvalidWindow(format!(
                "overlap ({}) must be less than window size ({})",
                overlap, size
            )));
        }
        Ok(Self { size, overlap })
    }

    /// Lines per window.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Lines shared by consecutive windows.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between window starts; always at least 1.
    pub fn step(&self) -> usize {
        self.size - self.overlap
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
            overlap: 0,
        }
    }
}

/// Options shared by every exporter.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Window parameters (window mode only)
    pub window: WindowConfig,

    /// Pixels added around polygon crops before masking
    pub polygon_padding: u32,

    /// Failure messages kept in the export report
    pub failure_sample: usize,
}

impl ExportOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set window parameters.
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Set polygon padding.
    pub fn with_polygon_padding(mut self, padding: u32) -> Self {
        self.polygon_padding = padding;
        self
    }

    /// Set how many failure messages the report keeps.
    pub fn with_failure_sample(mut self, sample: usize) -> Self {
        self.failure_sample = sample;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            polygon_padding: DEFAULT_POLYGON_PADDING,
            failure_sample: DEFAULT_FAILURE_SAMPLE,
        }
    }
}
