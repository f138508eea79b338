//! Paged, lazy iteration over a [DedupStore].
use std::{collections::VecDeque, ops::Bound, path::Path};

use log::error;
use redb::ReadableTable;

use super::{DedupStore, TOKENS};
use crate::error::{Error, Outcome};

type Entry = (Vec<u8>, Vec<u8>);

/// Ordered source of entries, read one page at a time.
pub trait PageSource {
    fn path(&self) -> &Path;

    /// Returns at most `size` entries with keys strictly greater than `after`
    /// (from the first key if `None`), in key order.
    fn page(&self, after: Option<&[u8]>, size: usize) -> Result<Vec<Entry>, Error>;
}

impl PageSource for DedupStore {
    fn path(&self) -> &Path {
        DedupStore::path(self)
    }

    fn page(&self, after: Option<&[u8]>, size: usize) -> Result<Vec<Entry>, Error> {
        let path = DedupStore::path(self);
        let txn = self.db()?.begin_read().map_err(|e| Error::store(path, e))?;
        let table = txn.open_table(TOKENS).map_err(|e| Error::store(path, e))?;

        let lower = match after {
            Some(k) => Bound::Excluded(k),
            None => Bound::Unbounded,
        };
        let range = table
            .range::<&[u8]>((lower, Bound::Unbounded))
            .map_err(|e| Error::store(path, e))?;

        let mut entries = Vec::with_capacity(size);
        for item in range.take(size) {
            let (k, v) = item.map_err(|e| Error::store(path, e))?;
            entries.push((k.value().to_vec(), v.value().to_vec()));
        }
        Ok(entries)
    }
}

/// Iterator over the entries of a store, in key order.
///
/// Holds at most one page of entries in memory. Each page is read in a short-lived read transaction,
/// and the next one resumes right after the last key seen.
///
/// An error ends the iteration, after the entries that were already fetched.
pub struct Scan<'s, S = DedupStore> {
    source: &'s S,
    page: VecDeque<Entry>,
    page_size: usize,
    last: Option<Vec<u8>>,
    exhausted: bool,
    error: Option<Error>,
}

impl<'s, S: PageSource> Scan<'s, S> {
    /// Starts a scan. Failing to read the first page is an error.
    pub(crate) fn new(source: &'s S, page_size: usize) -> Result<Self, Error> {
        let page_size = page_size.max(1);
        let mut scan = Self {
            source,
            page: VecDeque::with_capacity(page_size),
            page_size,
            last: None,
            exhausted: false,
            error: None,
        };
        scan.refill()?;
        Ok(scan)
    }

    fn refill(&mut self) -> Result<(), Error> {
        let entries = self.source.page(self.last.as_deref(), self.page_size)?;
        if entries.len() < self.page_size {
            self.exhausted = true;
        }
        if let Some((k, _)) = entries.last() {
            self.last = Some(k.clone());
        }
        self.page.extend(entries);
        Ok(())
    }
}

impl<'s, S: PageSource> Iterator for Scan<'s, S> {
    type Item = Result<Entry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.page.is_empty() && !self.exhausted && self.error.is_none() {
            if let Err(e) = self.refill() {
                self.exhausted = true;
                self.error = Some(e);
            }
        }

        match self.page.pop_front() {
            Some(entry) => Some(Ok(entry)),
            None => self.error.take().map(Err),
        }
    }
}

/// Folds over the entries of a scan of `path`.
///
/// Errors from `f` are fatal. Scan errors are logged and give a partial outcome.
pub(crate) fn fold_entries<I, T, F>(
    entries: I,
    path: &Path,
    init: T,
    mut f: F,
) -> Result<Outcome<T>, Error>
where
    I: Iterator<Item = Result<Entry, Error>>,
    F: FnMut(&mut T, &[u8], &[u8]) -> Result<(), Error>,
{
    let mut acc = init;
    for entry in entries {
        match entry {
            Ok((key, value)) => f(&mut acc, &key, &value)?,
            Err(e) => {
                error!("scan of {:?} interrupted: {}", path, e);
                return Ok(Outcome::Partial {
                    value: acc,
                    error: e,
                });
            }
        }
    }
    Ok(Outcome::Complete(acc))
}

impl DedupStore {
    /// Folds over every entry.
    ///
    /// Errors from `f` are fatal. Store errors raised once the scan has started are logged
    /// and give a partial outcome.
    pub(crate) fn fold<T, F>(&self, init: T, f: F) -> Result<Outcome<T>, Error>
    where
        F: FnMut(&mut T, &[u8], &[u8]) -> Result<(), Error>,
    {
        fold_entries(self.scan_all()?, self.path(), init, f)
    }
}
