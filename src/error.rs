use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefrainError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("leaderboard database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown song: {0}")]
    UnknownSong(String),
    #[error("invalid catalog entry {entry}: {message}")]
    InvalidCatalog { entry: String, message: String },
}

impl RefrainError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn invalid_catalog(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            entry: entry.into(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = RefrainError> = std::result::Result<T, E>;
