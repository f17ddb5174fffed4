//! Error types for feed generation.
//!
//! Only fetch, render and write problems are errors. Missing fields on a
//! work record are handled by fallbacks in the assembler and never surface
//! here.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Invalid topic table or query bounds, detected before any fetch.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport error, timeout, non-2xx status or undecodable body.
    #[error("failed to fetch topic {topic_id}: {message}")]
    FetchFailed { topic_id: String, message: String },

    /// The feed document could not be turned into XML.
    #[error("failed to render feed {key}: {message}")]
    Render { key: String, message: String },

    /// The rendered feed could not be written to disk.
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FeedError>;

impl FeedError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn fetch_failed(topic_id: impl Into<String>, msg: impl std::fmt::Display) -> Self {
        Self::FetchFailed {
            topic_id: topic_id.into(),
            message: msg.to_string(),
        }
    }

    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}
