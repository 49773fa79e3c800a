//! topicdeck Core - Delimited topic conversion, identity, and the topic catalog
//!
//! This crate turns a comma- or tab-separated sheet of topics into
//! [`TopicRecord`]s and offers a small catalog for browsing the result.
//!
//! # Modules
//!
//! - [`config`] - Fixed input/output locations for a conversion run
//! - [`delimiter`] - Header-based delimiter detection
//! - [`identity`] - Content-derived topic ids
//! - [`convert`] - The delimited-text to topic-record conversion
//! - [`catalog`] - Loading, querying, and picking topics
//! - [`progress`] - Saved done state and user-added topics

#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod catalog;
pub mod config;
pub mod convert;
pub mod delimiter;
pub mod identity;
pub mod progress;

pub use catalog::*;
pub use config::*;
pub use convert::*;
pub use delimiter::*;
pub use identity::*;
pub use progress::*;
pub use topicdeck_protocol::TopicRecord;

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for topicdeck
#[derive(Error, Debug)]
pub enum TopicError {
    /// The delimited input file does not exist
    #[error("Missing {}", path.display())]
    MissingInput {
        /// Expected input location
        path: PathBuf,
    },

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode or decode failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Neither a JSON nor a delimited topic file was found
    #[error("Neither topics.json nor topics.csv found in {}", dir.display())]
    NoTopicSource {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// A new topic was submitted without a title
    #[error("Please enter a topic title")]
    EmptyTitle,

    /// A new topic was submitted without a category
    #[error("Please choose or enter a category")]
    EmptyCategory,

    /// A topic with the same title and category already exists
    #[error("Topic {id} already exists in this category")]
    DuplicateTopic {
        /// Id shared by the existing and the rejected topic
        id: String,
    },
}

/// Result type alias using [`TopicError`]
pub type Result<T> = std::result::Result<T, TopicError>;
