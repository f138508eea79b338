/*! Vocabulary building pass

[VocabBuilder] reads the intermediate file back, tokenizes each segment and stores every distinct token once,
with key = value = token.

A run goes through three phases:

1. `INIT`: the intermediate file and the store are opened.
2. `STREAMING`: tokens that are not in the store yet are buffered, and the buffer is written
   to the store each time it holds `batch_size` tokens.
3. `FINALIZE`: the remaining buffered tokens are written, the vocabulary is dumped to a text file,
   measured and the store is closed.

If streaming fails, finalization still dumps and closes the store so that the vocabulary built so far
is kept. Tokens buffered at the moment of the failure are lost.
Errors are tagged with the [Phase] they happened in.
!*/
use std::{collections::HashSet, io::BufRead, path::PathBuf};

use log::{debug, error, info, warn};

use crate::{
    batch::Batch,
    config::Config,
    error::{Error, Phase},
    io::LineSource,
    store::DedupStore,
    tokenizers::Tokenizer,
};

use super::Pipeline;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VocabReport {
    /// non-empty segments read
    pub segments: u64,
    /// raw tokens seen, before filtering
    pub total_tokens: u64,
    /// entries in the store at the end of the run
    pub unique_entries: u64,
    /// `sum(len(key) + len(value))` over the store
    pub store_bytes: u64,
    /// set if the final dump or size scan was interrupted
    pub partial: bool,
}

/// Streaming state.
struct Pending {
    batch: Batch<String>,
    // tokens in `batch`, so that a token is buffered once
    keys: HashSet<String>,
    segments: u64,
    total_tokens: u64,
    window_tokens: u64,
}

impl Pending {
    fn new(batch_size: usize) -> Self {
        Self {
            batch: Batch::new(batch_size),
            keys: HashSet::new(),
            segments: 0,
            total_tokens: 0,
            window_tokens: 0,
        }
    }

    /// Empties the buffer, returning the pending tokens.
    fn drain(&mut self) -> Vec<String> {
        self.keys.clear();
        self.batch.take()
    }
}

pub struct VocabBuilder {
    src: PathBuf,
    store_path: PathBuf,
    dump_path: PathBuf,
    config: Config,
    tokenizer: Box<dyn Tokenizer>,
}

impl VocabBuilder {
    /// `src` is the intermediate file, `dump_path` the text file the vocabulary is appended to.
    ///
    /// The tokenizer is picked from the configuration.
    pub fn new(src: PathBuf, store_path: PathBuf, dump_path: PathBuf, config: Config) -> Self {
        let tokenizer = config.tokenizer.build(config.script);
        Self::with_tokenizer(src, store_path, dump_path, config, tokenizer)
    }

    pub fn with_tokenizer(
        src: PathBuf,
        store_path: PathBuf,
        dump_path: PathBuf,
        config: Config,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Self {
        Self {
            src,
            store_path,
            dump_path,
            config,
            tokenizer,
        }
    }

    fn init(&self) -> Result<(LineSource<impl BufRead>, DedupStore), Error> {
        self.config.validate()?;
        let lines = LineSource::open(&self.src)?;
        let store = DedupStore::open_with(&self.store_path, self.config.store_options())?;
        info!(
            "building vocabulary of {:?} into {:?} (tokenizer: {}, batch size: {})",
            self.src,
            self.store_path,
            self.tokenizer.name(),
            self.config.batch_size
        );
        Ok((lines, store))
    }

    fn stream<R: BufRead>(
        &self,
        lines: LineSource<R>,
        store: &DedupStore,
        state: &mut Pending,
    ) -> Result<(), Error> {
        let log_window = self.config.log_window.max(1) as u64;

        for line in lines {
            let line = line?;
            let segment = line.trim();
            if segment.is_empty() {
                continue;
            }

            let tokenization = self.tokenizer.tokenize(segment, self.config.unique);
            state.segments += 1;
            state.total_tokens += tokenization.total as u64;
            state.window_tokens += tokenization.total as u64;

            for token in tokenization.tokens {
                if state.keys.contains(&token) || store.exists(token.as_bytes())? {
                    continue;
                }
                state.keys.insert(token.clone());
                if let Some(full) = state.batch.push(token) {
                    state.keys.clear();
                    let added = store.add_batch(full.iter().map(|t| (t, t)))?;
                    debug!("added {} tokens to {:?}", added, store.path());
                }
            }

            if state.segments % log_window == 0 {
                info!(
                    "{} segments processed, {} tokens in the last {} segments",
                    state.segments, state.window_tokens, log_window
                );
                state.window_tokens = 0;
            }
        }
        Ok(())
    }

    /// Writes `pending`, dumps and measures the store. The store is closed in any case.
    fn finalize(
        &self,
        store: &mut DedupStore,
        pending: Vec<String>,
        state: &Pending,
    ) -> Result<VocabReport, Error> {
        let res = self.dump_and_measure(store, pending, state);
        store.close();
        res
    }

    fn dump_and_measure(
        &self,
        store: &DedupStore,
        pending: Vec<String>,
        state: &Pending,
    ) -> Result<VocabReport, Error> {
        let added = store.add_batch(pending.iter().map(|t| (t, t)))?;
        debug!("added last {} tokens to {:?}", added, store.path());

        let dumped = store.dump_to_text(&self.dump_path, true)?;
        let size = store.size()?;
        let partial = !dumped.is_complete() || !size.is_complete();
        let size = size.into_value();

        info!(
            "{} segments, {} tokens, {} unique entries ({} bytes)",
            state.segments, state.total_tokens, size.entries, size.bytes
        );
        Ok(VocabReport {
            segments: state.segments,
            total_tokens: state.total_tokens,
            unique_entries: size.entries,
            store_bytes: size.bytes,
            partial,
        })
    }
}

impl Pipeline<VocabReport> for VocabBuilder {
    fn run(&self) -> Result<VocabReport, Error> {
        let (lines, mut store) = self.init().map_err(|e| e.in_phase(Phase::Init))?;
        let mut state = Pending::new(self.config.batch_size);

        match self.stream(lines, &store, &mut state) {
            Ok(()) => {
                let pending = state.drain();
                self.finalize(&mut store, pending, &state)
                    .map_err(|e| e.in_phase(Phase::Finalize))
            }
            Err(e) => {
                let e = e.in_phase(Phase::Streaming);
                error!("{}", e);

                let lost = state.drain();
                if !lost.is_empty() {
                    warn!("{} buffered tokens are lost", lost.len());
                }
                if let Err(fe) = self.finalize(&mut store, Vec::new(), &state) {
                    error!("{}", fe.in_phase(Phase::Finalize));
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;
    use crate::{config::StoreOptions, tokenizers::TokenizerKind};

    fn config(batch_size: usize) -> Config {
        Config {
            batch_size,
            tokenizer: TokenizerKind::Whitespace,
            store: StoreOptions {
                scan_page: 2,
                batch_size,
            },
            ..Config::default()
        }
    }

    fn keys(path: &Path) -> Vec<String> {
        let store = DedupStore::open(path).unwrap();
        store
            .scan_all()
            .unwrap()
            .map(|e| String::from_utf8(e.unwrap().0).unwrap())
            .collect()
    }

    #[test]
    fn builds_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("segments.txt");
        let db = dir.path().join("db");
        let dump = dir.path().join("vocab.txt");
        fs::write(&src, "यह एक वाक्य है\n\nयह दूसरा वाक्य है\nएक hello\n").unwrap();

        let report = VocabBuilder::new(src, db.clone(), dump.clone(), config(2))
            .run()
            .unwrap();

        assert_eq!(report.segments, 3);
        assert_eq!(report.total_tokens, 10);
        assert_eq!(report.unique_entries, 5);
        assert!(!report.partial);

        let mut expected = vec!["यह", "एक", "वाक्य", "है", "दूसरा"];
        expected.sort();
        assert_eq!(keys(&db), expected);

        let dumped = fs::read_to_string(&dump).unwrap();
        let mut lines = dumped.lines();
        assert_eq!(lines.next(), Some("Words"));
        assert_eq!(lines.collect::<Vec<_>>(), expected);
    }

    #[test]
    fn second_run_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("segments.txt");
        let db = dir.path().join("db");
        fs::write(&src, "दिन रात\nरात दिन\n").unwrap();

        let first = VocabBuilder::new(src.clone(), db.clone(), dir.path().join("a.txt"), config(10))
            .run()
            .unwrap();
        let second = VocabBuilder::new(src, db.clone(), dir.path().join("b.txt"), config(10))
            .run()
            .unwrap();

        assert_eq!(first.unique_entries, 2);
        assert_eq!(second.unique_entries, 2);
        assert_eq!(second.store_bytes, first.store_bytes);
    }

    #[test]
    fn missing_input_is_init_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = VocabBuilder::new(
            dir.path().join("nope.txt"),
            dir.path().join("db"),
            dir.path().join("vocab.txt"),
            config(10),
        )
        .run()
        .unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Init));
    }

    #[test]
    fn streaming_error_keeps_flushed_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("segments.txt");
        let db = dir.path().join("db");
        let dump = dir.path().join("vocab.txt");

        let mut data = "दिन\nरात\nसुबह\n".as_bytes().to_vec();
        data.extend_from_slice(b"\xff\xfe\n");
        data.extend_from_slice("शाम\n".as_bytes());
        fs::write(&src, data).unwrap();

        let err = VocabBuilder::new(src, db.clone(), dump.clone(), config(2))
            .run()
            .unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Streaming));
        assert!(matches!(
            err,
            Error::Phase { ref source, .. } if matches!(**source, Error::Decode { line: 4, .. })
        ));

        // the first full batch was written, the buffered third token is lost
        let mut expected = vec!["दिन", "रात"];
        expected.sort();
        assert_eq!(keys(&db), expected);
        assert!(fs::read_to_string(&dump).unwrap().starts_with("Words\n"));
    }
}
