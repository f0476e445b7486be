//! Preview engine configuration (`preview.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [timing], [channel], [surface]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # PreviewConfig (this file)
//! ```
//!
//! Every section is `#[serde(default)]`, so an empty file is a valid
//! configuration.

pub mod section;
pub mod types;

pub use section::{
    ChannelConfig, DEFAULT_STYLE_ELEMENT_ID, RETRY_CEILING, SurfaceConfig, TimingConfig,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use std::{fs, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::channel::OriginPolicy;
use crate::log;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `preview.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Timers: load timeout, retries, backoff, debounce
    #[serde(default)]
    pub timing: TimingConfig,

    /// Message channel origin policy
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Preview surface address and bootstrap settings
    #[serde(default)]
    pub surface: SurfaceConfig,
}

impl PreviewConfig {
    /// Parse and validate configuration from a TOML string, warning about
    /// unknown fields.
    pub fn from_str(content: &str) -> Result<Self> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, None);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path and validate it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, Some(path));
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: Option<&Path>) {
        let display_path = path
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".into());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Validate every section, returning all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.timing.validate(&mut diag);
        self.channel.validate(&mut diag);
        self.surface.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Effective target origin: explicit `[channel]` value, else the origin
    /// of `[surface] base_url`.
    pub fn target_origin(&self) -> Option<String> {
        if let Some(origin) = &self.channel.target_origin {
            return Some(origin.trim_end_matches('/').to_string());
        }
        self.surface
            .base()
            .map(|url| url.origin())
            .filter(url::Origin::is_tuple)
            .map(|origin| origin.ascii_serialization())
    }

    /// Origin policy for the message channel.
    pub fn origin_policy(&self) -> OriginPolicy {
        match self.target_origin() {
            Some(origin) if origin == "*" => OriginPolicy::Any,
            Some(origin) => OriginPolicy::Exact(origin),
            None if self.channel.allow_any_origin => OriginPolicy::Any,
            None => OriginPolicy::RequireConfigured,
        }
    }
}

/// Parse a config snippet for section tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PreviewConfig {
    let (parsed, ignored) = PreviewConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
