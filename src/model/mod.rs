//! Document model for parsed PAGE transcriptions.
//!
//! A page owns its regions and each region owns its lines, both stored in
//! reading order. The model is built once by the parser and never mutated
//! afterwards; exporters only read it.

mod line;
mod page;
mod region;

pub use line::TextLine;
pub use page::PageData;
pub use region::{TextRegion, DEFAULT_REGION_TYPE};
