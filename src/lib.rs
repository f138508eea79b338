//! # Vocabulist
//!
//! Builds deduplicated vocabularies out of very large raw text corpora.
//!
//! Extraction is done in two passes, both streaming, with bounded memory:
//!
//! 1. [pipelines::Segmentation] splits a raw corpus into sentence-like segments, cleans them
//!    for a target [script::Script] and appends them to an intermediate file.
//! 2. [pipelines::VocabBuilder] tokenizes the intermediate file and stores each distinct token once
//!    in a persistent, ordered [store::DedupStore].
//!
//! The store can then be dumped, measured, backed up, cleaned or rebuilt from a dump.
pub mod batch;
pub mod cleaning;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod pipelines;
pub mod processing;
pub mod script;
pub mod store;
pub mod tokenizers;
