//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! Most runtime failures in the orchestration core are deliberately *not*
//! errors: an unknown clip, a missing bone or a rejected re-entrant
//! transition degrades to a logged no-op so the character never freezes.
//! [`EngineError`] covers the places where a caller can meaningfully
//! react: configuration parsing and contextual-action handlers reporting
//! failure to their orchestration boundary.

use thiserror::Error;

/// The main error type for the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// The requested animation clip is not registered in the clip table.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),

    /// No bone is assigned to the requested semantic role.
    #[error("No bone assigned for role: {0}")]
    BoneNotFound(&'static str),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Behavior configuration failed to parse.
    #[error("Config parse error: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// A configuration value is outside its valid range.
    #[error("Invalid config value for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    // ========================================================================
    // Orchestration Errors
    // ========================================================================
    /// A contextual or scheduled action handler failed. Caught and logged
    /// at the scheduler/selector boundary, never propagated further.
    #[error("Action handler failed: {0}")]
    HandlerFailed(String),
}

/// Alias for `Result<T, EngineError>`.
pub type Result<T> = std::result::Result<T, EngineError>;
