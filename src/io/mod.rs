/*!
# IO utilities

Sequential reading of large text files and append-only writing of intermediate files.

Reading goes through a memory map so that the OS pages the source in and out,
and nothing ever holds the whole file in process memory.
!*/
pub mod reader;
pub mod writer;

pub use reader::{LineSource, MappedFile, Segmenter};
pub use writer::IntermediateSink;
