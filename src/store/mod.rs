/*! Deduplicating token store

[DedupStore] is an ordered, persistent key-value store backed by [redb](https://docs.rs/redb).
Keys and values are opaque byte strings, kept in byte-lexicographic order.
For vocabulary tokens, key and value are both the token bytes.

The store lives in a directory (created if absent) holding a single database file.

## Concurrency

A store has a single writer. The usual insertion pattern ([DedupStore::exists] then [DedupStore::add_batch])
is a check-then-act sequence that is only correct with one writer.
redb locks the database file, so a second process opening the same store fails at [DedupStore::open].

## Errors

Operations that cannot make progress return an [Error].
Reporting scans (size, dumps, ...) return an [crate::error::Outcome], which is `Partial` if the scan
was interrupted by a store error after it started.
!*/
mod export;
mod scan;

use std::path::{Path, PathBuf};

use log::{info, warn};
use redb::{Database, ReadableTable, TableDefinition};

use crate::{batch::Batch, config::StoreOptions, error::Error, error::Outcome};
pub use scan::Scan;

pub(crate) const TOKENS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tokens");
const DB_FILE: &str = "vocab.redb";

/// Header of text and CSV dumps.
pub const DUMP_HEADER: &str = "Words";

/// Total byte size (`sum(len(key) + len(value))`) and number of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSize {
    pub bytes: u64,
    pub entries: u64,
}

pub struct DedupStore {
    path: PathBuf,
    db: Option<Database>,
    options: StoreOptions,
}

impl DedupStore {
    /// Opens the store at `path`, creating it if absent.
    pub fn open(path: &Path) -> Result<Self, Error> {
        Self::open_with(path, StoreOptions::default())
    }

    pub fn open_with(path: &Path, options: StoreOptions) -> Result<Self, Error> {
        std::fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
        let db = Database::create(path.join(DB_FILE)).map_err(|e| Error::store(path, e))?;

        // create the table so that readers never see it missing
        let txn = db.begin_write().map_err(|e| Error::store(path, e))?;
        txn.open_table(TOKENS).map_err(|e| Error::store(path, e))?;
        txn.commit().map_err(|e| Error::store(path, e))?;

        info!("opened store at {:?}", path);
        Ok(Self {
            path: path.to_path_buf(),
            db: Some(db),
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn is_closed(&self) -> bool {
        self.db.is_none()
    }

    pub(crate) fn db(&self) -> Result<&Database, Error> {
        self.db
            .as_ref()
            .ok_or_else(|| Error::StoreClosed(self.path.clone()))
    }

    /// Returns `true` if `key` is present.
    pub fn exists(&self, key: &[u8]) -> Result<bool, Error> {
        let txn = self
            .db()?
            .begin_read()
            .map_err(|e| Error::store_key(&self.path, key, e))?;
        let table = txn
            .open_table(TOKENS)
            .map_err(|e| Error::store_key(&self.path, key, e))?;
        let found = table
            .get(key)
            .map_err(|e| Error::store_key(&self.path, key, e))?
            .is_some();
        Ok(found)
    }

    /// Inserts (or overwrites) a single entry.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        self.add_batch([(key, value)]).map(|_| ())
    }

    /// Inserts all pairs in a single write transaction.
    ///
    /// Either every pair is committed, or none is. Existing keys are overwritten.
    /// Returns the number of inserted pairs.
    pub fn add_batch<I, K, V>(&self, pairs: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let db = self.db()?;
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_none() {
            return Ok(0);
        }

        let txn = db.begin_write().map_err(|e| Error::store(&self.path, e))?;
        let mut count = 0;
        {
            let mut table = txn
                .open_table(TOKENS)
                .map_err(|e| Error::store(&self.path, e))?;
            for (key, value) in pairs {
                let key = key.as_ref();
                table
                    .insert(key, value.as_ref())
                    .map_err(|e| Error::store_key(&self.path, key, e))?;
                count += 1;
            }
        }
        // an uncommitted transaction is rolled back on drop
        txn.commit().map_err(|e| Error::store(&self.path, e))?;
        Ok(count)
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub fn delete(&self, key: &[u8]) -> Result<bool, Error> {
        self.delete_batch([key]).map(|removed| removed == 1)
    }

    /// Removes keys in a single write transaction, returning the number of removed entries.
    pub fn delete_batch<I, K>(&self, keys: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let db = self.db()?;
        let txn = db.begin_write().map_err(|e| Error::store(&self.path, e))?;
        let mut removed = 0;
        {
            let mut table = txn
                .open_table(TOKENS)
                .map_err(|e| Error::store(&self.path, e))?;
            for key in keys {
                let key = key.as_ref();
                if table
                    .remove(key)
                    .map_err(|e| Error::store_key(&self.path, key, e))?
                    .is_some()
                {
                    removed += 1;
                }
            }
        }
        txn.commit().map_err(|e| Error::store(&self.path, e))?;
        Ok(removed)
    }

    /// Lazily iterates over every entry in key order.
    ///
    /// Entries are fetched `scan_page` at a time, each page in its own read transaction.
    /// Calling it again starts a new scan from the first key.
    pub fn scan_all(&self) -> Result<Scan<'_>, Error> {
        Scan::new(self, self.options.scan_page)
    }

    /// Computes the total size of keys and values, and the number of entries, with a full scan.
    pub fn size(&self) -> Result<Outcome<StoreSize>, Error> {
        self.fold(StoreSize::default(), |size, key, value| {
            size.entries += 1;
            size.bytes += (key.len() + value.len()) as u64;
            Ok(())
        })
    }

    /// Copies every entry into a new store at `dst`, `batch_size` entries at a time.
    ///
    /// Unlike reporting scans, an interrupted copy is an error.
    pub fn backup(&self, dst: &Path) -> Result<u64, Error> {
        let mut backup = DedupStore::open_with(dst, self.options.clone())?;
        let mut batch = Batch::new(self.options.batch_size);
        let mut copied = 0u64;

        for entry in self.scan_all()? {
            if let Some(full) = batch.push(entry?) {
                copied += backup.add_batch(full)? as u64;
            }
        }
        copied += backup.add_batch(batch.take())? as u64;
        backup.close();

        info!(
            "backup of {:?} created at {:?} ({} entries)",
            self.path, dst, copied
        );
        Ok(copied)
    }

    /// Releases the database. Calling it on a closed store does nothing.
    pub fn close(&mut self) {
        if let Some(db) = self.db.take() {
            drop(db);
            info!("closed store at {:?}", self.path);
        }
    }

    /// Irreversibly deletes the store at `path`.
    ///
    /// Only the database file is removed, then the directory if nothing else is left in it.
    /// A missing `path` is a no-op, while an existing directory that does not hold a store is an error
    /// and is left untouched.
    ///
    /// The store must have been closed beforehand. See [DedupStore::close_and_destroy].
    pub fn destroy(path: &Path) -> Result<(), Error> {
        if !path.exists() {
            return Ok(());
        }
        let db_file = path.join(DB_FILE);
        if !db_file.is_file() {
            return Err(Error::Custom(format!(
                "{:?} is not a store (no {} file), refusing to delete it",
                path, DB_FILE
            )));
        }
        std::fs::remove_file(&db_file).map_err(|e| Error::io(&db_file, e))?;

        let is_empty = std::fs::read_dir(path)
            .map_err(|e| Error::io(path, e))?
            .next()
            .is_none();
        if is_empty {
            std::fs::remove_dir(path).map_err(|e| Error::io(path, e))?;
        } else {
            warn!("{:?} holds other files and is kept", path);
        }
        warn!("destroyed store at {:?}", path);
        Ok(())
    }

    pub fn close_and_destroy(mut self) -> Result<(), Error> {
        self.close();
        Self::destroy(&self.path)
    }
}

impl std::fmt::Debug for DedupStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupStore")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .field("options", &self.options)
            .finish()
    }
}
