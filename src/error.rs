//! Custom error types for the crate.
//!
//! This module defines the primary error type, `ProbeError`. Using the
//! `thiserror` crate, it provides a centralized and consistent way to handle
//! the kinds of failures a probe can report:
//!
//! - **`Inactive`**: a value was sent to a probe whose ingestion channel does
//!   not exist. Sending into a never-activated or deactivated probe is a
//!   programming error and fails fast rather than silently dropping data.
//! - **`ChannelClosed`**: a send raced a concurrent teardown and the channel
//!   disconnected under it. Defined behavior rather than a panic.
//! - **`InvalidConfig`**: a semantic configuration error caught during
//!   validation, such as a zero buffer capacity.
//! - **`Spawn`**: the background consumer thread could not be started.
//! - **`Render`**: the rendering collaborator failed. Rendering is cosmetic
//!   to the probe's contract, so this is always recoverable.

use thiserror::Error;

use crate::render::RenderError;

/// Errors reported by probe operations.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe has no live ingestion channel.
    #[error("probe is not active; no ingestion channel exists")]
    Inactive,

    /// The ingestion channel disconnected while a send was in flight.
    #[error("ingestion channel closed during send")]
    ChannelClosed,

    /// Construction parameters failed validation.
    #[error("invalid probe configuration: {message}")]
    InvalidConfig {
        /// Human-readable description of the rejected parameter.
        message: String,
    },

    /// The background consumer thread could not be spawned.
    #[error("failed to spawn consumer thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The rendering collaborator reported a failure.
    #[error("signal rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl ProbeError {
    /// Shorthand for an [`InvalidConfig`](ProbeError::InvalidConfig) error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ProbeError::InvalidConfig {
            message: message.into(),
        }
    }
}
