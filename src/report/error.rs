use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Record(#[from] crate::io::Error),

    #[error("line {line_number}: {kind} key '{key}' is not tabulated")]
    UnknownKey {
        line_number: usize,
        kind: &'static str,
        key: String,
    },

    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid tabulation settings: {details}")]
    InvalidSettings { details: String },
}

impl Error {
    pub fn unknown_key(line_number: usize, kind: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            line_number,
            kind,
            key: key.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        Self::Write {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn invalid_settings(details: impl Into<String>) -> Self {
        Self::InvalidSettings {
            details: details.into(),
        }
    }

    /// 1-based line of the offending record, when the failure is tied to one.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Record(crate::io::Error::MalformedRecord { line_number, .. })
            | Self::UnknownKey { line_number, .. } => Some(*line_number),
            _ => None,
        }
    }
}
