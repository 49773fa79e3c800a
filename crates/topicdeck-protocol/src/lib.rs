//! topicdeck Protocol - Shared types for the topicdeck workspace
//!
//! This crate holds the one data model every other crate exchanges: the
//! [`TopicRecord`] produced by the converter and consumed by the catalog.
//!
//! # Example
//!
//! ```rust
//! use topicdeck_protocol::models::TopicRecord;
//!
//! let topic = TopicRecord::new("t6e9e487c5c", "Alpha", "Name");
//! assert!(!topic.done);
//! assert!(topic.completed_at.is_none());
//! ```

#![warn(missing_docs)]

/// Protocol models module
pub mod models;

pub use models::*;
