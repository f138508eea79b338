//! Memory mapped line reading.
use std::{
    fs::File,
    io::{BufRead, Cursor},
    path::{Path, PathBuf},
};

use log::debug;
use memmap2::Mmap;

use crate::error::Error;

/// Read-only map of a whole file.
///
/// Empty files are not mapped (zero-length maps are rejected on some platforms).
#[derive(Debug)]
pub struct MappedFile {
    map: Option<Mmap>,
}

impl MappedFile {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let f = File::open(path).map_err(|e| Error::io(path, e))?;
        let len = f.metadata().map_err(|e| Error::io(path, e))?.len();
        if len == 0 {
            return Ok(Self { map: None });
        }

        // the file must not be truncated while mapped: we are the only user of our inputs.
        let map = unsafe { Mmap::map(&f) }.map_err(|e| Error::io(path, e))?;
        debug!("mapped {:?} ({} bytes)", path, len);
        Ok(Self { map: Some(map) })
    }

    pub fn len(&self) -> usize {
        self.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AsRef<[u8]> for MappedFile {
    fn as_ref(&self) -> &[u8] {
        match &self.map {
            Some(m) => &m[..],
            None => &[],
        }
    }
}

/// Forward-only iterator over the lines of a source.
///
/// Lines are split on `\n`, have their trailing `\r\n`/`\n` removed and are decoded as UTF-8.
/// A malformed line yields an [Error::Decode] and ends the iteration.
#[derive(Debug)]
pub struct LineSource<R> {
    path: PathBuf,
    reader: R,
    buf: Vec<u8>,
    line: usize,
    done: bool,
}

impl LineSource<Cursor<MappedFile>> {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let map = MappedFile::open(path)?;
        Ok(Self::new(path, Cursor::new(map)))
    }
}

impl<R: BufRead> LineSource<R> {
    /// `path` is only used for error reporting.
    pub fn new(path: &Path, reader: R) -> Self {
        Self {
            path: path.to_path_buf(),
            reader,
            buf: Vec::new(),
            line: 0,
            done: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line += 1;
                let mut end = self.buf.len();
                if self.buf[..end].ends_with(b"\n") {
                    end -= 1;
                }
                if self.buf[..end].ends_with(b"\r") {
                    end -= 1;
                }
                match std::str::from_utf8(&self.buf[..end]) {
                    Ok(s) => Some(Ok(s.to_string())),
                    Err(e) => {
                        self.done = true;
                        Some(Err(Error::Decode {
                            path: self.path.clone(),
                            line: self.line,
                            source: e,
                        }))
                    }
                }
            }
            Err(e) => {
                self.done = true;
                Some(Err(Error::io(&self.path, e)))
            }
        }
    }
}
