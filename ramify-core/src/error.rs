//! Error types for ramify.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RamifyError`] - Top-level error type for all ramify operations
//! - [`PatternError`] - Malformed path templates, raised while building routes
//! - [`MethodError`] - Unknown method names at registration time
//! - [`DecodeError`] - Percent-decoding failures while resolving static paths
//!
//! Failing to find a route is not an error; dispatch reports it as a
//! first-class negative result instead.

use std::string::FromUtf8Error;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all ramify operations.
#[derive(Error, Debug)]
pub enum RamifyError {
    /// A path template could not be compiled.
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// A method name is not part of the supported set.
    #[error("method error: {0}")]
    Method(#[from] MethodError),

    /// A path could not be percent-decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised while compiling or concatenating path patterns.
///
/// These surface to whoever is configuring routes; they never occur while
/// matching.
#[derive(Error, Debug)]
pub enum PatternError {
    /// The expression generated for a template was rejected by the regex engine.
    #[error("invalid path template `{template}`")]
    Compile {
        /// The template (or concatenated template) that failed.
        template: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// The template that failed to compile.
    pub fn template(&self) -> &str {
        match self {
            PatternError::Compile { template, .. } => template,
        }
    }
}

/// Errors raised when a method name cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MethodError {
    /// The method is not in the supported enumeration.
    #[error("unsupported method: {0}")]
    Unsupported(String),
}

/// Errors raised while percent-decoding a request path.
///
/// Static-path resolution recovers from these locally by keeping the raw
/// text, so they are only observable through the decoding helpers.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The decoded bytes were not valid UTF-8.
    #[error("`{text}` does not decode to valid UTF-8")]
    InvalidUtf8 {
        /// The raw text that failed to decode.
        text: String,
        /// The underlying conversion error.
        #[source]
        source: FromUtf8Error,
    },
}

// Convenience conversions
impl From<BoxError> for RamifyError {
    fn from(err: BoxError) -> Self {
        RamifyError::Custom(err)
    }
}
