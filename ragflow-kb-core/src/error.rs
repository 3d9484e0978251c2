//! Error types shared by every stage of a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for knowledge-base operations
pub type KbResult<T> = Result<T, KbError>;

/// Everything that can end a run. None of these are retried.
#[derive(Error, Debug)]
pub enum KbError {
    /// Missing or invalid api_url/api_key, or an unusable config file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure, non-success HTTP status, or a body we could not read
    #[error("API error: {0}")]
    Api(String),

    /// No knowledge base matched the requested name
    #[error("Knowledge base not found: {0}")]
    NotFound(String),

    /// Output destination could not be written
    #[error("I/O error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendering the records failed
    #[error("Format error: {0}")]
    Format(String),
}

impl From<serde_json::Error> for KbError {
    fn from(err: serde_json::Error) -> Self {
        KbError::Format(err.to_string())
    }
}

impl From<csv::Error> for KbError {
    fn from(err: csv::Error) -> Self {
        KbError::Format(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_distinguishing_prefixes() {
        let io = KbError::Io {
            path: PathBuf::from("/nope/out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing dir"),
        };
        assert!(io.to_string().starts_with("I/O error writing /nope/out.csv"));
        assert!(KbError::Config("x".into()).to_string().starts_with("Configuration error"));
        assert!(KbError::Api("x".into()).to_string().starts_with("API error"));
        assert!(KbError::NotFound("x".into()).to_string().starts_with("Knowledge base not found"));
        assert!(KbError::Format("x".into()).to_string().starts_with("Format error"));
    }
}
