use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can go wrong while resolving, downloading or unpacking
/// an atlas.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),

    #[error("{url} answered with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("unknown archive format: {}", path.display())]
    UnsupportedArchive { path: PathBuf },

    #[error("failed to extract {}: {message}", path.display())]
    Extract { path: PathBuf, message: String },

    #[error("{} is missing after fetching {url}", path.display())]
    MissingFile { path: PathBuf, url: String },

    #[error("dataset '{dataset}' declares {expected} files but the fetcher returned {actual} paths")]
    PathCountMismatch {
        dataset: String,
        expected: usize,
        actual: usize,
    },

    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),
}

impl FetchError {
    /// Attach `path` to an I/O error.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        FetchError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn extract(path: impl AsRef<Path>, message: impl ToString) -> Self {
        FetchError::Extract {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;
