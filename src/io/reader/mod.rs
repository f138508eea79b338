/*! Reading facilities

- [LineSource] yields decoded lines from any [std::io::BufRead], usually a [MappedFile].
- [Segmenter] turns lines into sentence-like segments.
!*/
mod lines;
mod segmenter;

pub use lines::{LineSource, MappedFile};
pub use segmenter::{SegmentBatches, Segmenter};
