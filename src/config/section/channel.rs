//! `[channel]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [channel]
//! target_origin = "https://preview.example.com"   # Only accept/deliver to this origin
//! allow_any_origin = false                        # Opt in to wildcard acceptance
//! ```
//!
//! When `target_origin` is unset it is derived from `[surface] base_url`.
//! With neither set, incoming messages are rejected unless
//! `allow_any_origin = true`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ConfigDiagnostics, FieldPath};

/// Message channel settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Origin of the preview surface (scheme://host[:port]).
    pub target_origin: Option<String>,

    /// Accept messages from any origin when no target origin is known.
    pub allow_any_origin: bool,
}

impl ChannelConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(origin) = &self.target_origin
            && origin != "*"
        {
            match Url::parse(origin) {
                Ok(url) if url.origin().is_tuple() => {
                    if url.path() != "/" || url.query().is_some() {
                        diag.warn(
                            FieldPath::new("channel.target_origin"),
                            "path and query are ignored, only the origin is compared",
                        );
                    }
                }
                _ => diag.error_with_hint(
                    FieldPath::new("channel.target_origin"),
                    format!("`{origin}` is not a valid origin"),
                    "use scheme://host[:port], e.g. https://preview.example.com",
                ),
            }
        }
        if self.allow_any_origin {
            diag.warn(
                FieldPath::new("channel.allow_any_origin"),
                "messages from any origin will be accepted",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_channel_defaults() {
        let config = test_parse_config("");
        assert!(config.channel.target_origin.is_none());
        assert!(!config.channel.allow_any_origin);
    }

    #[test]
    fn test_invalid_origin_is_reported() {
        let channel = ChannelConfig {
            target_origin: Some("not an origin".into()),
            allow_any_origin: false,
        };
        let mut diag = ConfigDiagnostics::new();
        channel.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_wildcard_is_a_warning() {
        let channel = ChannelConfig {
            target_origin: None,
            allow_any_origin: true,
        };
        let mut diag = ConfigDiagnostics::new();
        channel.validate(&mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }
}
