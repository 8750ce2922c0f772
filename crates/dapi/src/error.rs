use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /// Upstream answered, but not with a success status.
    #[error("Error calling \"{path}\": {status}{}", detail(.message))]
    Api {
        path: String,
        status: String,
        message: Option<String>,
        raw: Option<Value>,
    },

    #[error("Error in API request for \"{path}\": {source}")]
    Transport {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("{0}")]
    Manifest(String),

    #[error("No membership id was provided and no user profile is loaded")]
    MissingMembership,

    #[error("No player found for \"{0}\"")]
    UserNotFound(String),

    #[error("Search for \"{username}\" matched {count} players")]
    AmbiguousUser { username: String, count: usize },

    #[error("Existing user profile in place at \"{}\"", .0.display())]
    Conflict(PathBuf),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Error running database query: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Invalid JSON in manifest row {id}: {source}")]
    ManifestRow {
        id: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("Hash {0} does not fit in 32 bits")]
    InvalidHash(i64),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

impl Error {
    pub(crate) fn transport(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Transport {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Check if this error means the requested thing does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) | Error::UserNotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Raw upstream response attached to an API error, if any
    pub fn raw_response(&self) -> Option<&Value> {
        match self {
            Error::Api { raw, .. } => raw.as_ref(),
            _ => None,
        }
    }
}
