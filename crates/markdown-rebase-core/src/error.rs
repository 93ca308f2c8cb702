use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    NotFound = 1,
    Usage = 2,
}

#[derive(Debug, Error)]
pub enum RebaseError {
    #[error("invalid repository format '{repo}': expected 'owner/name'")]
    InvalidRepositoryFormat { repo: String },

    #[error("no base URL available: pass --base-url, --repo with --release, or set BASE_URL")]
    MissingBaseUrl,

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    InvalidEncoding { path: PathBuf },
}

impl RebaseError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidRepositoryFormat { .. }
            | Self::MissingBaseUrl
            | Self::InvalidBaseUrl { .. } => ExitCode::Usage,
            Self::PathNotFound { .. } | Self::Io { .. } | Self::InvalidEncoding { .. } => {
                ExitCode::NotFound
            }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RebaseResult<T> = Result<T, RebaseError>;
