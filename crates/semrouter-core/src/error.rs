// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the semrouter decision layer.

use thiserror::Error;

/// The primary error type used across semrouter components.
///
/// None of these variants fail a request: the orchestrator converts every
/// classification error into a fallback decision. Only [`RouterError::InvalidAddress`]
/// and [`RouterError::Config`] are surfaced at initialization.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Configuration errors (invalid values, unusable combinations).
    #[error("configuration error: {0}")]
    Config(String),

    /// The classifier service address cannot be used.
    #[error("invalid classifier service address `{host}:{port}`")]
    InvalidAddress { host: String, port: u16 },

    /// Transport-level failure talking to a remote service.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote side answered with an error status.
    #[error("remote error ({code}): {message}")]
    Remote { code: String, message: String },

    /// Operation exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Operation was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// Telemetry delivery failed.
    #[error("telemetry error: {message}")]
    Telemetry {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RouterError {
    /// Short stable label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::Config(_) => "config",
            RouterError::InvalidAddress { .. } => "invalid_address",
            RouterError::Transport { .. } => "transport",
            RouterError::Remote { .. } => "remote",
            RouterError::Timeout { .. } => "timeout",
            RouterError::Cancelled => "cancelled",
            RouterError::Telemetry { .. } => "telemetry",
            RouterError::Internal(_) => "internal",
        }
    }
}
