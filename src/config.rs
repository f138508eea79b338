//! Run configuration.
//!
//! A [Config] is built once (from defaults, a JSON file and/or command line flags)
//! and handed to every component that needs it.
use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use crate::{error::Error, script::Script, tokenizers::TokenizerKind};

pub const DEFAULT_BATCH_SIZE: usize = 100_000;
pub const DEFAULT_LOG_WINDOW: usize = 100_000;
pub const DEFAULT_SCAN_PAGE: usize = 10_000;

/// Store tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Number of entries fetched per read transaction when scanning.
    pub scan_page: usize,
    /// Size of internal write batches (backup, recovery, purge).
    pub batch_size: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            scan_page: DEFAULT_SCAN_PAGE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub script: Script,
    pub tokenizer: TokenizerKind,
    pub batch_size: usize,
    pub log_window: usize,
    pub delimiters: Option<Vec<char>>,
    pub unique: bool,
    pub store: StoreOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script: Script::default(),
            tokenizer: TokenizerKind::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            log_window: DEFAULT_LOG_WINDOW,
            delimiters: None,
            unique: true,
            store: StoreOptions::default(),
        }
    }
}

impl Config {
    /// Loads a JSON configuration file. Missing fields take their default values.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let f = File::open(path).map_err(|e| Error::io(path, e))?;
        let config: Config = serde_json::from_reader(BufReader::new(f))?;
        config.validate()?;
        Ok(config)
    }

    pub fn for_script(script: Script) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be > 0".to_string()));
        }
        if self.store.scan_page == 0 || self.store.batch_size == 0 {
            return Err(Error::Config(
                "store scan_page and batch_size must be > 0".to_string(),
            ));
        }
        if matches!(&self.delimiters, Some(d) if d.is_empty()) {
            return Err(Error::Config("delimiter set is empty".to_string()));
        }
        Ok(())
    }

    /// Sentence delimiters, falling back on the script defaults.
    pub fn delimiters(&self) -> Vec<char> {
        match &self.delimiters {
            Some(d) => d.clone(),
            None => self.script.delimiters().to_vec(),
        }
    }

    /// Store options with the write batch size aligned on [Config::batch_size].
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            batch_size: self.batch_size,
            ..self.store.clone()
        }
    }
}
