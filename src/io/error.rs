use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "malformed {format} record in {path_desc}: {details} (line {line_number})",
        path_desc = PathDisplay(path)
    )]
    MalformedRecord {
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: String,
    },

    #[error(
        "invalid JSON envelope in {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Envelope {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    pub fn malformed(
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            format,
            path,
            line_number,
            details: details.into(),
        }
    }

    pub fn envelope(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        Self::Envelope { path, source }
    }

    /// Attaches a file path to errors raised while reading from an anonymous stream.
    pub fn with_path(self, file: &Path) -> Self {
        let file = Some(file.to_path_buf());
        match self {
            Self::Io { path: None, source } => Self::Io { path: file, source },
            Self::MalformedRecord {
                format,
                path: None,
                line_number,
                details,
            } => Self::MalformedRecord {
                format,
                path: file,
                line_number,
                details,
            },
            Self::Envelope { path: None, source } => Self::Envelope { path: file, source },
            other => other,
        }
    }
}

struct PathDisplay<'a>(&'a Option<PathBuf>);

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "stream source"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_message_names_line_and_path() {
        let err = Error::malformed("HB2", Some(PathBuf::from("a.hb2")), 12, "missing acceptor");
        assert_eq!(
            err.to_string(),
            "malformed HB2 record in file 'a.hb2': missing acceptor (line 12)"
        );
    }

    #[test]
    fn with_path_fills_missing_path_only() {
        let err = Error::malformed("PDB", None, 3, "bad x").with_path(Path::new("s.h"));
        assert!(err.to_string().contains("file 's.h'"));

        let err = Error::malformed("PDB", Some(PathBuf::from("orig.h")), 3, "bad x")
            .with_path(Path::new("other.h"));
        assert!(err.to_string().contains("file 'orig.h'"));
    }

    #[test]
    fn stream_errors_display_stream_source() {
        let err = Error::from_io(std::io::Error::other("boom"), None);
        assert_eq!(err.to_string(), "I/O error for stream source: boom");
    }
}
