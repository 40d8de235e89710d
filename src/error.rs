// src/error.rs

//! Error types for font resolution.
//!
//! Nothing else in the engine surfaces errors: parsing recovers internally,
//! measurement failures degrade to zero sizes and the per-frame
//! `update`/`render` surface is infallible.

use thiserror::Error;

/// Error type for font loading operations.
#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("No font path registered for '{name}' on this platform")]
    NotFound { name: String },

    #[error("Failed to load font '{path}': {message}")]
    LoadFailed { path: String, message: String },
}
