//! Observable preview state.

use std::fmt;

/// Lifecycle of the preview surface.
///
/// ```text
/// Initial ──► Loading ──► Loaded
///               │  ▲
///     timeout   │  │ backoff elapsed (bounded)
///               ▼  │
///             (retry) ──► Error     (retries exhausted, terminal)
///
/// any ──► Blocked                   (embedding refused, terminal)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoadingState {
    #[default]
    Initial,
    Loading,
    Loaded,
    Error,
    Blocked,
}

impl LoadingState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Error => "error",
            Self::Blocked => "blocked",
        }
    }

    /// `Error` and `Blocked` only leave through an explicit retry.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Error | Self::Blocked)
    }
}

impl fmt::Display for LoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user can do about a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Reload the preview from scratch.
    Retry,
    /// Open the preview address outside the embedding context.
    OpenExternally { url: String },
}

/// A user-visible failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub action: RecoveryAction,
}

/// Snapshot published to status subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewStatus {
    pub state: LoadingState,
    pub retry_count: u32,
    pub failure: Option<Failure>,
}
