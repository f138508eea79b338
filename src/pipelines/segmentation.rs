/*! Segmentation pass

Reads a raw corpus, splits it into segments, cleans them and appends them to the intermediate file.

Segments are handed to the sink in batches of [Config::batch_size]; the last batch may be smaller.
!*/
use std::path::PathBuf;

use log::{debug, info};

use crate::{
    cleaning::{Cleaner, Passthrough, ScriptCleaner},
    config::Config,
    error::Error,
    io::{IntermediateSink, Segmenter},
};

use super::Pipeline;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentationReport {
    /// segments read from the source
    pub segments: u64,
    /// number of sink flushes
    pub batches: u64,
    /// segments written to the intermediate file
    pub written: u64,
}

pub struct Segmentation {
    src: PathBuf,
    dst: PathBuf,
    config: Config,
    clean: bool,
}

impl Segmentation {
    pub fn new(src: PathBuf, dst: PathBuf, config: Config) -> Self {
        Self {
            src,
            dst,
            config,
            clean: true,
        }
    }

    /// Writes segments as they are, without script cleaning.
    pub fn without_cleaning(mut self) -> Self {
        self.clean = false;
        self
    }

    fn cleaner(&self) -> Box<dyn Cleaner> {
        if self.clean {
            Box::new(ScriptCleaner::new(self.config.script))
        } else {
            Box::new(Passthrough)
        }
    }
}

impl Pipeline<SegmentationReport> for Segmentation {
    fn run(&self) -> Result<SegmentationReport, Error> {
        self.config.validate()?;
        let delimiters = self.config.delimiters();
        info!(
            "segmenting {:?} into {:?} (delimiters: {:?})",
            self.src, self.dst, delimiters
        );

        let segmenter = Segmenter::open(&self.src, &delimiters)?;
        let mut sink = IntermediateSink::open(&self.dst, self.cleaner())?;
        let mut report = SegmentationReport::default();

        for batch in segmenter.batches(self.config.batch_size) {
            let batch = batch?;
            report.segments += batch.len() as u64;
            sink.flush(&batch)?;
            debug!("batch {} flushed", sink.flushes());
        }

        report.batches = sink.flushes();
        report.written = sink.written();
        info!(
            "{} segments read, {} written to {:?} ({} empty after cleaning)",
            report.segments,
            report.written,
            self.dst,
            sink.skipped()
        );
        sink.close()?;
        Ok(report)
    }
}
