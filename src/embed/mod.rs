//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `preview` - Surface bootstrap script (`bootstrap.js`)
//!
//! # Usage
//!
//! ```ignore
//! use embed::preview::{BOOTSTRAP_JS, BootstrapVars};
//!
//! let vars = BootstrapVars::from_config(&config, "https://admin.example.com");
//! let js = BOOTSTRAP_JS.render(&vars);
//! ```

mod template;

pub use preview::{BOOTSTRAP_JS, BootstrapVars};
pub use template::{Template, TemplateVars};

pub mod preview {
    use super::{Template, TemplateVars};
    use crate::config::PreviewConfig;

    /// Variables for bootstrap.js.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BootstrapVars {
        /// Id of the injected `<style>` element.
        pub style_element_id: String,
        /// Host origin the surface posts to and accepts messages from.
        pub target_origin: String,
        /// Location polling interval.
        pub poll_interval_ms: u64,
    }

    impl BootstrapVars {
        /// Bootstrap settings for a surface embedded by `host_origin`.
        pub fn from_config(config: &PreviewConfig, host_origin: &str) -> Self {
            Self {
                style_element_id: config.surface.style_element_id.clone(),
                target_origin: host_origin.trim_end_matches('/').to_string(),
                poll_interval_ms: config.surface.poll_interval_ms,
            }
        }
    }

    /// JSON string literal, safe to splice into a script.
    fn js_string(value: &str) -> String {
        serde_json::to_string(value).unwrap_or_else(|_| "\"\"".into())
    }

    impl TemplateVars for BootstrapVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__THEMESYNC_STYLE_ID__", &js_string(&self.style_element_id))
                .replace("__THEMESYNC_TARGET_ORIGIN__", &js_string(&self.target_origin))
                .replace("__THEMESYNC_POLL_MS__", &self.poll_interval_ms.to_string())
        }

        fn hash_input(&self) -> String {
            format!(
                "{}{}{}",
                self.style_element_id, self.target_origin, self.poll_interval_ms
            )
        }
    }

    /// Surface bootstrap: style element, message handling, ready and
    /// navigation reporting.
    pub const BOOTSTRAP_JS: Template<BootstrapVars> =
        Template::new("bootstrap", include_str!("preview/bootstrap.js"));
}

#[cfg(test)]
mod tests {
    use super::preview::{BOOTSTRAP_JS, BootstrapVars};
    use crate::channel::MessageKind;
    use crate::config::{DEFAULT_STYLE_ELEMENT_ID, PreviewConfig};
    use crate::settings::DEVICE_CLASS_PREFIX;

    fn vars() -> BootstrapVars {
        BootstrapVars::from_config(&PreviewConfig::default(), "https://admin.example.com/")
    }

    #[test]
    fn test_bootstrap_renders_all_placeholders() {
        let js = BOOTSTRAP_JS.render(&vars());
        assert!(!js.contains("__THEMESYNC_"));
        assert!(js.contains(&format!("var STYLE_ID = \"{DEFAULT_STYLE_ELEMENT_ID}\";")));
        assert!(js.contains("var TARGET_ORIGIN = \"https://admin.example.com\";"));
        assert!(js.contains("var POLL_MS = 500;"));
    }

    #[test]
    fn test_bootstrap_speaks_the_protocol() {
        let js = BOOTSTRAP_JS.content();
        for kind in [
            MessageKind::SettingChange,
            MessageKind::DeviceChange,
            MessageKind::ViewportChange,
            MessageKind::SelectiveRefresh,
            MessageKind::PreviewReady,
            MessageKind::Navigate,
        ] {
            assert!(js.contains(&format!("\"{kind}\"")), "bootstrap.js lacks {kind}");
        }
        assert!(js.contains(&format!("\"{DEVICE_CLASS_PREFIX}\"")));
    }

    #[test]
    fn test_script_values_are_escaped() {
        let mut vars = vars();
        vars.style_element_id = "a\"b".into();
        let js = BOOTSTRAP_JS.render(&vars);
        assert!(js.contains(r#"var STYLE_ID = "a\"b";"#));
    }

    #[test]
    fn test_file_name_tracks_variables() {
        let a = BOOTSTRAP_JS.file_name(&vars(), "js");
        let mut other = vars();
        other.poll_interval_ms = 250;
        let b = BOOTSTRAP_JS.file_name(&other, "js");

        assert!(a.starts_with("bootstrap-") && a.ends_with(".js"));
        assert_ne!(a, b);
        assert_eq!(a, BOOTSTRAP_JS.file_name(&vars(), "js"));
    }
}
