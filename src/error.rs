//! Error enum
//!
//! Fatal conditions are returned as [Error]. Reporting scans over the store
//! return an [Outcome], which can hold a partial result alongside the error that stopped the scan.
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;

/// Stage of a vocabulary run in which an error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Streaming,
    Finalize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "INIT",
            Phase::Streaming => "STREAMING",
            Phase::Finalize => "FINALIZE",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum Error {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode {
        path: PathBuf,
        line: usize,
        source: Utf8Error,
    },
    Store {
        path: PathBuf,
        key: Option<String>,
        source: redb::Error,
    },
    StoreClosed(PathBuf),
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
    Serde(serde_json::Error),
    Config(String),
    Custom(String),
    Phase {
        phase: Phase,
        source: Box<Error>,
    },
}

impl Error {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn store(path: &Path, source: impl Into<redb::Error>) -> Self {
        Error::Store {
            path: path.to_path_buf(),
            key: None,
            source: source.into(),
        }
    }

    /// Store error tied to a specific key. The key is rendered lossily since keys are raw bytes.
    pub fn store_key(path: &Path, key: &[u8], source: impl Into<redb::Error>) -> Self {
        Error::Store {
            path: path.to_path_buf(),
            key: Some(String::from_utf8_lossy(key).into_owned()),
            source: source.into(),
        }
    }

    pub fn csv(path: &Path, source: csv::Error) -> Self {
        Error::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wraps `self` into a [Error::Phase], unless it already carries one.
    pub fn in_phase(self, phase: Phase) -> Self {
        match self {
            e @ Error::Phase { .. } => e,
            e => Error::Phase {
                phase,
                source: Box::new(e),
            },
        }
    }

    /// Returns the phase in which the error occurred, if known.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Error::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "io error on {:?}: {}", path, source),
            Error::Decode { path, line, source } => {
                write!(f, "invalid utf-8 in {:?} at line {}: {}", path, line, source)
            }
            Error::Store {
                path,
                key: Some(key),
                source,
            } => write!(f, "store error on {:?} (key {:?}): {}", path, key, source),
            Error::Store {
                path,
                key: None,
                source,
            } => write!(f, "store error on {:?}: {}", path, source),
            Error::StoreClosed(path) => write!(f, "store {:?} is closed", path),
            Error::Csv { path, source } => write!(f, "csv error on {:?}: {}", path, source),
            Error::Serde(e) => write!(f, "config parsing error: {}", e),
            Error::Config(msg) => write!(f, "invalid configuration: {}", msg),
            Error::Custom(msg) => f.write_str(msg),
            Error::Phase { phase, source } => write!(f, "[{}] {}", phase, source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Decode { source, .. } => Some(source),
            Error::Store { source, .. } => Some(source),
            Error::Csv { source, .. } => Some(source),
            Error::Serde(e) => Some(e),
            Error::Phase { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

/// Result of a scan-based reporting operation.
///
/// `Partial` holds whatever was accumulated before a store error interrupted the scan.
#[derive(Debug)]
pub enum Outcome<T> {
    Complete(T),
    Partial { value: T, error: Error },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Complete(v) => v,
            Outcome::Partial { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Complete(v) => v,
            Outcome::Partial { value, .. } => value,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete(_))
    }
}
