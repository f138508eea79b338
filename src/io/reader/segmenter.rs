/*! Sentence segmentation

A [Segmenter] reads a source line by line and yields segments, that is runs of text ended by a delimiter.

Text that is not followed by a delimiter on its line is carried over to the next line(s),
so a segment can span several raw lines. Parts coming from different lines are joined with a single space.
Any text left when the source is exhausted forms a last segment.

Example with `।` as delimiter:
```text
यह एक वाक्य है। यह
दूसरा है।
```
yields `यह एक वाक्य है` and `यह दूसरा है`.
!*/
use std::{
    collections::VecDeque,
    io::{BufRead, Cursor},
    path::Path,
};

use crate::{batch::Batches, error::Error};

use super::{LineSource, MappedFile};

/// Batches of segments, see [Segmenter::batches].
pub type SegmentBatches<R> = Batches<Segmenter<R>, String>;

#[derive(Debug)]
pub struct Segmenter<R> {
    lines: LineSource<R>,
    delimiters: Vec<char>,
    // trimmed, non-empty parts of the segment in progress
    parts: Vec<String>,
    ready: VecDeque<String>,
    done: bool,
}

impl Segmenter<Cursor<MappedFile>> {
    /// Maps the file at `path` and segments it.
    pub fn open(path: &Path, delimiters: &[char]) -> Result<Self, Error> {
        Ok(Self::new(LineSource::open(path)?, delimiters))
    }
}

impl<R: BufRead> Segmenter<R> {
    pub fn new(lines: LineSource<R>, delimiters: &[char]) -> Self {
        Self {
            lines,
            delimiters: delimiters.to_vec(),
            parts: Vec::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }

    /// Yields segments grouped by `size`.
    pub fn batches(self, size: usize) -> SegmentBatches<R> {
        Batches::new(self, size)
    }

    pub fn path(&self) -> &Path {
        self.lines.path()
    }

    fn process_line(&mut self, line: &str) {
        let mut current = String::new();
        for c in line.chars() {
            if self.delimiters.contains(&c) {
                self.close_part(&mut current);
                self.close_segment();
            } else {
                current.push(c);
            }
        }

        // keep the open part for the next line
        self.close_part(&mut current);
    }

    fn close_part(&mut self, current: &mut String) {
        let part = current.trim();
        if !part.is_empty() {
            self.parts.push(part.to_string());
        }
        current.clear();
    }

    fn close_segment(&mut self) {
        if !self.parts.is_empty() {
            self.ready.push_back(self.parts.join(" "));
            self.parts.clear();
        }
    }
}

impl<R: BufRead> Iterator for Segmenter<R> {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(segment) = self.ready.pop_front() {
                return Some(Ok(segment));
            }
            if self.done {
                return None;
            }

            match self.lines.next() {
                Some(Ok(line)) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        self.process_line(line);
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    self.parts.clear();
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    self.close_segment();
                }
            }
        }
    }
}
