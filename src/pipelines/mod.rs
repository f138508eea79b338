//! Pipelines.
//!
//! Vocabulary extraction runs in two passes, each one being a [pipeline::Pipeline]:
//!
//! 1. [Segmentation] turns a raw corpus into an intermediate file, one cleaned segment per line.
//! 2. [VocabBuilder] tokenizes the intermediate file and stores each distinct token once.
#[allow(clippy::module_inception)]
pub mod pipeline;
mod segmentation;
mod vocab;

pub use pipeline::Pipeline;
pub use segmentation::{Segmentation, SegmentationReport};
pub use vocab::{VocabBuilder, VocabReport};
