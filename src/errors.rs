// piiredact/src/errors.rs
//! errors.rs - Custom error types for the piiredact library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `piiredact` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedactError {
    #[error("Failed to compile detector '{0}': {1}")]
    DetectorCompilationError(String, regex::Error),

    #[error("Detector '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}

/// Errors raised by the external semantic similarity capability.
///
/// These never cross the `analyze` boundary: the engine absorbs them and
/// degrades to an empty flag list (the capability is advisory).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SemanticError {
    #[error("Semantic scorer is unavailable: {0}")]
    Unavailable(String),

    #[error("Semantic scorer returned an empty embedding for non-empty input")]
    EmptyEmbedding,

    #[error("Semantic scorer failed: {0}")]
    ScorerFailure(String),
}
