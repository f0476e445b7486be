//! Preview error taxonomy.
//!
//! | Variant                   | Visible to user | Retried                 |
//! |---------------------------|-----------------|-------------------------|
//! | `LoadTimeout`             | when exhausted  | yes, bounded            |
//! | `EmbeddingRefused`        | immediately     | no                      |
//! | `CrossOriginAccessDenied` | never           | falls back to messages  |
//! | `MalformedMessage`        | never           | dropped                 |

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by the preview engine.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("preview surface did not become ready after {attempts} attempt(s)")]
    LoadTimeout { attempts: u32 },

    #[error("preview surface refused to be embedded: {reason}")]
    EmbeddingRefused { reason: String },

    #[error("preview surface internals are not accessible from this origin")]
    CrossOriginAccessDenied,

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PreviewError {
    /// Whether this condition should ever be surfaced to the user.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::LoadTimeout { .. } | Self::EmbeddingRefused { .. })
    }
}

/// Errors raised by a concrete transport while posting a message.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,

    #[error("websocket error")]
    WebSocket(#[from] tungstenite::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}
