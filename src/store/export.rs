/*! Store import/export

Dumps to text/CSV, word length reports, recovery from dumps and script cleanup.

Text dumps are appended to, and always start with a `Words` header line.
Recovery skips every header line, so that a dump can be loaded back into an empty store.
!*/
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, info};

use super::{DedupStore, DUMP_HEADER};
use crate::{
    batch::Batch,
    error::{Error, Outcome},
    io::LineSource,
    script::Script,
};

fn open_append(path: &Path) -> Result<File, Error> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| Error::io(path, e))
}

impl DedupStore {
    /// Appends the store content to a text file, one entry per line (`key` or `key,value`).
    ///
    /// Returns the number of written entries.
    pub fn dump_to_text(&self, path: &Path, keys_only: bool) -> Result<Outcome<u64>, Error> {
        let mut w = BufWriter::new(open_append(path)?);
        writeln!(w, "{}", DUMP_HEADER).map_err(|e| Error::io(path, e))?;

        let outcome = self.fold(0u64, |count, key, value| {
            let res = if keys_only {
                w.write_all(key).and_then(|_| w.write_all(b"\n"))
            } else {
                w.write_all(key)
                    .and_then(|_| w.write_all(b","))
                    .and_then(|_| w.write_all(value))
                    .and_then(|_| w.write_all(b"\n"))
            };
            res.map_err(|e| Error::io(path, e))?;
            *count += 1;
            Ok(())
        })?;
        w.flush().map_err(|e| Error::io(path, e))?;

        info!(
            "dumped {} entries of {:?} to {:?}",
            outcome.value(),
            self.path(),
            path
        );
        Ok(outcome)
    }

    /// Writes keys to a CSV file with a single `Words` column. The file is truncated.
    pub fn dump_to_csv(&self, path: &Path) -> Result<Outcome<u64>, Error> {
        let mut w = csv::Writer::from_path(path).map_err(|e| Error::csv(path, e))?;
        w.write_record([DUMP_HEADER])
            .map_err(|e| Error::csv(path, e))?;

        let outcome = self.fold(0u64, |count, key, _| {
            w.write_record([key]).map_err(|e| Error::csv(path, e))?;
            *count += 1;
            Ok(())
        })?;
        w.flush().map_err(|e| Error::io(path, e))?;

        info!(
            "dumped {} entries of {:?} to CSV file {:?}",
            outcome.value(),
            self.path(),
            path
        );
        Ok(outcome)
    }

    /// Appends a `Word,lengths` CSV report, with the length in chars of each single-word key.
    ///
    /// Keys containing a space are logged and skipped. Returns the number of written rows.
    pub fn word_lengths(&self, path: &Path) -> Result<Outcome<u64>, Error> {
        let mut w = csv::Writer::from_writer(open_append(path)?);
        w.write_record(["Word", "lengths"])
            .map_err(|e| Error::csv(path, e))?;

        let outcome = self.fold(0u64, |count, key, _| {
            let word = String::from_utf8_lossy(key);
            if word.split(' ').count() > 1 {
                info!("Word length is greater than one for this word: {}", word);
                return Ok(());
            }
            let length = word.chars().count().to_string();
            w.write_record([&*word, length.as_str()])
                .map_err(|e| Error::csv(path, e))?;
            *count += 1;
            Ok(())
        })?;
        w.flush().map_err(|e| Error::io(path, e))?;

        info!("word lengths of {:?} written to {:?}", self.path(), path);
        Ok(outcome)
    }

    /// Logs every entry.
    pub fn show(&self) -> Result<Outcome<u64>, Error> {
        info!("contents of store at {:?}", self.path());
        self.fold(0u64, |count, key, value| {
            info!(
                "{} - {}",
                String::from_utf8_lossy(key),
                String::from_utf8_lossy(value)
            );
            *count += 1;
            Ok(())
        })
    }

    /// Loads a text file (one token per line) into the store, with key = value = trimmed line.
    ///
    /// Empty lines and `Words` header lines are skipped, so a file holding several appended dumps
    /// can be loaded back.
    /// Returns the number of put entries. Loading the same file twice leaves the store unchanged.
    pub fn recover_from_text(&self, path: &Path) -> Result<u64, Error> {
        let mut batch = Batch::new(self.options().batch_size);
        let mut count = 0u64;

        for line in LineSource::open(path)? {
            let line = line?;
            let word = line.trim();
            if word.is_empty() || word == DUMP_HEADER {
                continue;
            }
            if let Some(full) = batch.push(word.to_string()) {
                count += self.add_batch(full.iter().map(|w| (w, w)))? as u64;
            }
        }
        let rest = batch.take();
        count += self.add_batch(rest.iter().map(|w| (w, w)))? as u64;

        info!(
            "recovered {} entries into {:?} from {:?}",
            count,
            self.path(),
            path
        );
        Ok(count)
    }

    /// Loads the first column of a CSV file into the store, with key = value = trimmed field.
    ///
    /// Empty fields and `Words` header rows are skipped.
    pub fn recover_from_csv(&self, path: &Path) -> Result<u64, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::csv(path, e))?;
        let mut batch = Batch::new(self.options().batch_size);
        let mut count = 0u64;

        for record in reader.records() {
            let record = record.map_err(|e| Error::csv(path, e))?;
            let word = match record.get(0) {
                Some(w) => w.trim(),
                None => continue,
            };
            if word.is_empty() || word == DUMP_HEADER {
                continue;
            }
            if let Some(full) = batch.push(word.to_string()) {
                count += self.add_batch(full.iter().map(|w| (w, w)))? as u64;
            }
        }
        let rest = batch.take();
        count += self.add_batch(rest.iter().map(|w| (w, w)))? as u64;

        info!(
            "recovered {} entries into {:?} from CSV file {:?}",
            count,
            self.path(),
            path
        );
        Ok(count)
    }

    /// Looks for keys holding characters outside of `script` (whitespace aside),
    /// removing them if `remove` is set.
    ///
    /// Returns the number of such keys.
    pub fn purge_foreign(&self, script: Script, remove: bool) -> Result<Outcome<u64>, Error> {
        info!("checking for non-{} words in {:?}", script, self.path());
        let mut pending = Batch::new(self.options().batch_size);

        let outcome = self.fold(0u64, |found, key, _| {
            if script.covers(&String::from_utf8_lossy(key)) {
                return Ok(());
            }
            *found += 1;
            if remove {
                if let Some(full) = pending.push(key.to_vec()) {
                    self.delete_batch(full)?;
                }
            }
            Ok(())
        })?;
        if remove {
            let removed = self.delete_batch(pending.take())?;
            debug!("removed last {} foreign words", removed);
        }

        match outcome.value() {
            0 => info!("no non-{} words found in {:?}", script, self.path()),
            n => info!("{} non-{} words found", n, script),
        }
        Ok(outcome)
    }
}
