//! Error types for unjargon-core.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::dom::NodeId;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a jargon dictionary.
///
/// Loading through [`Dictionary::load`](crate::dictionary::Dictionary::load)
/// never surfaces these; they are logged and the built-in fallback is used.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The dictionary file could not be read.
    #[error("failed to read dictionary {path}: {source}")]
    Read {
        /// Path that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The dictionary document is not valid JSON of the expected shape.
    #[error("malformed dictionary: {0}")]
    Parse(#[from] serde_json::Error),

    /// The dictionary document contains no entries.
    #[error("dictionary has no entries")]
    Empty,
}

/// Result type alias using [`DictionaryError`].
pub type DictionaryResult<T> = Result<T, DictionaryError>;

/// Errors that can occur while inserting a marker into the document tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RewriteError {
    /// The target node is not an element.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    /// The requested range does not hold the expected text.
    #[error("text {text:?} not found at offset {offset}")]
    TextNotFound {
        /// The text that was expected at the offset.
        text: String,
        /// Byte offset into the element's text content.
        offset: usize,
    },

    /// The range is already wrapped by a marker.
    #[error("text {0:?} is already inside a marker")]
    AlreadyMarked(String),

    /// The range spans inline markup in an element that already holds
    /// markers, so the content-replacing fallback would destroy them.
    #[error("text {0:?} spans inline markup next to existing markers")]
    CrossesMarkup(String),
}

/// Result type alias using [`RewriteError`].
pub type RewriteResult<T> = Result<T, RewriteError>;

/// Errors that can occur while importing or exporting HTML.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HtmlError {
    /// The document exceeds the configured size limit.
    #[error("input too large: {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// Size of the input in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Writing the document back out failed.
    #[error("failed to serialize document: {0}")]
    Serialize(String),
}

/// Result type alias using [`HtmlError`].
pub type HtmlResult<T> = Result<T, HtmlError>;

/// Error returned by a [`StatsSink`](crate::events::StatsSink) when a
/// notification cannot be delivered.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeliveryError {
    /// Nobody is listening on the receiving side.
    #[error("no listener for {0}")]
    NoListener(&'static str),

    /// The receiving side went away mid-delivery.
    #[error("channel closed: {0}")]
    Closed(String),
}
