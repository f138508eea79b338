//! Append-only writer for the intermediate file.
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{cleaning::Cleaner, error::Error};

/// Cleans segments and appends them, one per line, to the intermediate file.
///
/// The file is opened once in append mode and kept open until the sink is dropped or closed.
/// Every call to [IntermediateSink::flush] ends with a flush of the underlying buffer,
/// so that written segments are visible to readers once it returns.
///
/// Segments that are empty after cleaning are skipped.
pub struct IntermediateSink {
    path: PathBuf,
    writer: BufWriter<File>,
    cleaner: Box<dyn Cleaner>,
    written: u64,
    skipped: u64,
    flushes: u64,
}

impl IntermediateSink {
    pub fn open(path: &Path, cleaner: Box<dyn Cleaner>) -> Result<Self, Error> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);

        info!("opening intermediate file {:?}", path);
        let f = options.open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(f),
            cleaner,
            written: 0,
            skipped: 0,
            flushes: 0,
        })
    }

    /// Cleans and appends a batch of segments, keeping their order.
    pub fn flush(&mut self, segments: &[String]) -> Result<(), Error> {
        let mut written = 0;
        for segment in segments {
            let cleaned = self.cleaner.clean(segment);
            if cleaned.is_empty() {
                self.skipped += 1;
                continue;
            }

            self.writer
                .write_all(cleaned.as_bytes())
                .and_then(|_| self.writer.write_all(b"\n"))
                .map_err(|e| Error::io(&self.path, e))?;
            written += 1;
        }
        self.writer.flush().map_err(|e| Error::io(&self.path, e))?;

        self.written += written;
        self.flushes += 1;
        debug!(
            "added {} segments to {:?} ({} skipped so far)",
            written, self.path, self.skipped
        );
        Ok(())
    }

    /// Number of segments written.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Number of segments that were empty after cleaning.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Number of [IntermediateSink::flush] calls.
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and releases the file handle.
    pub fn close(mut self) -> Result<(), Error> {
        self.writer.flush().map_err(|e| Error::io(&self.path, e))?;
        info!(
            "closed {:?}: {} segments written, {} skipped",
            self.path, self.written, self.skipped
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::{Passthrough, ScriptCleaner};
    use crate::script::Script;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn appends_across_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("int.txt");

        let mut sink = IntermediateSink::open(&path, Box::new(Passthrough)).unwrap();
        sink.flush(&["a".to_string(), "b".to_string()]).unwrap();
        // visible before close
        assert_eq!(read(&path), "a\nb\n");
        sink.flush(&["c".to_string()]).unwrap();
        assert_eq!(sink.flushes(), 2);
        sink.close().unwrap();

        // reopening appends too
        let mut sink = IntermediateSink::open(&path, Box::new(Passthrough)).unwrap();
        sink.flush(&["d".to_string()]).unwrap();
        sink.close().unwrap();

        assert_eq!(read(&path), "a\nb\nc\nd\n");
    }

    #[test]
    fn cleans_and_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("int.txt");

        let cleaner = ScriptCleaner::new(Script::Devanagari);
        let mut sink = IntermediateSink::open(&path, Box::new(cleaner)).unwrap();
        sink.flush(&[
            "यह 12 वाक्य, है".to_string(),
            "only latin".to_string(),
            "दूसरा".to_string(),
        ])
        .unwrap();

        assert_eq!(sink.written(), 2);
        assert_eq!(sink.skipped(), 1);
        sink.close().unwrap();
        assert_eq!(read(&path), "यह वाक्य है\nदूसरा\n");
    }
}
