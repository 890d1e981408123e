//! Common types and utilities shared across Verity crates.
//!
//! This crate defines the shared error type, observability helpers, and a few
//! small text utilities used throughout the Verity workspace. It is kept
//! dependency-minimal so every crate can depend on it without pulling in the
//! browser or HTTP stacks.
//!
//! # Overview
//!
//! - [`VerityError`] and [`Result`]: Shared error handling
//! - [`defaults`]: Stock values shared by configuration and library defaults
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`text`]: Character-bounded truncation helpers
//!
//! # Examples
//!
//! ```rust
//! use verity_common::text::truncate_chars;
//!
//! assert_eq!(truncate_chars("héllo world", 5), "héllo");
//! ```
pub mod defaults;
pub mod observability;
pub mod text;

/// Error types used across the Verity system.
#[derive(thiserror::Error, Debug)]
pub enum VerityError {
    /// The inbound request carried neither `text` nor `url`.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenient alias for results that use [`VerityError`].
pub type Result<T> = std::result::Result<T, VerityError>;
