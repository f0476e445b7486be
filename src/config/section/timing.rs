//! `[timing]` section configuration.
//!
//! Controls every timer the preview controller starts.
//!
//! # Example
//!
//! ```toml
//! [timing]
//! load_timeout_ms = 10000   # How long a navigation may take before it counts as failed
//! max_retries = 3           # Automatic reloads before the preview gives up
//! backoff_base_ms = 1000    # Delay before the first automatic reload
//! backoff_max_ms = 8000     # Upper bound for the growing reload delay
//! debounce_ms = 300         # Quiet period that coalesces bursts of edits
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Timer settings for the preview lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Load timeout per navigation attempt.
    pub load_timeout_ms: u64,

    /// Automatic retries after the first attempt times out.
    pub max_retries: u32,

    /// Backoff before retry `n` is `backoff_base_ms * 2^(n-1)`.
    pub backoff_base_ms: u64,

    /// Cap for the backoff delay.
    pub backoff_max_ms: u64,

    /// Debounce window for settings pushes.
    pub debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: 10_000,
            max_retries: 3,
            backoff_base_ms: 1_000,
            backoff_max_ms: 8_000,
            debounce_ms: 300,
        }
    }
}

/// Hard ceiling for `max_retries`; the retry loop must stay bounded.
pub const RETRY_CEILING: u32 = 10;

impl TimingConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Copy safe to drive timers with, for configs that skipped `validate`:
    /// retries capped at [`RETRY_CEILING`], a zero load timeout replaced by
    /// the default.
    pub fn sanitized(&self) -> Self {
        let mut timing = self.clone();
        timing.max_retries = timing.max_retries.min(RETRY_CEILING);
        if timing.load_timeout_ms == 0 {
            timing.load_timeout_ms = Self::default().load_timeout_ms;
        }
        timing
    }

    /// Backoff delay before automatic retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let delay = self.backoff_base_ms.saturating_mul(1u64 << shift);
        Duration::from_millis(delay.min(self.backoff_max_ms))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.load_timeout_ms == 0 {
            diag.error_with_hint(
                FieldPath::new("timing.load_timeout_ms"),
                "must be greater than zero",
                "a few seconds (e.g. 10000) suits most preview pages",
            );
        }
        if self.max_retries > RETRY_CEILING {
            diag.error(
                FieldPath::new("timing.max_retries"),
                format!("must be at most {RETRY_CEILING}"),
            );
        }
        if self.backoff_base_ms > self.backoff_max_ms {
            diag.error(
                FieldPath::new("timing.backoff_base_ms"),
                "must not exceed `timing.backoff_max_ms`",
            );
        }
        if self.debounce_ms >= self.load_timeout_ms && self.load_timeout_ms > 0 {
            diag.warn(
                FieldPath::new("timing.debounce_ms"),
                "debounce window is longer than the load timeout",
            );
        }
    }
}
