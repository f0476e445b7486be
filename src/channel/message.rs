//! Preview message protocol.
//!
//! Every message travels as a JSON envelope `{ "type": ..., "payload": ... }`.
//!
//! # Message Types
//!
//! | type                | payload                  | direction        |
//! |---------------------|--------------------------|------------------|
//! | `setting-change`    | `{ settings, css }`      | host → surface   |
//! | `device-change`     | `{ device }`             | host → surface   |
//! | `viewport-change`   | `{ viewport }`           | host → surface   |
//! | `save`              | `{}`                     | host → surface   |
//! | `reset`             | `{}`                     | host → surface   |
//! | `preview-ready`     | none                     | surface → host   |
//! | `navigate`          | `{ url }`                | surface → host   |
//! | `selective-refresh` | `{ changes, settings }`  | host → surface   |
//! | `embedding-refused` | `{ reason }`             | surface → host   |
//!
//! Receivers ignore types they do not know; that is not an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PreviewError;
use crate::settings::{Device, SettingChange, SettingsTree};

/// Version of the message vocabulary above.
pub const PROTOCOL_VERSION: u32 = 2;

// ============================================================================
// MessageKind
// ============================================================================

/// Closed set of message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    SettingChange,
    DeviceChange,
    ViewportChange,
    Save,
    Reset,
    PreviewReady,
    Navigate,
    SelectiveRefresh,
    EmbeddingRefused,
}

impl MessageKind {
    pub const ALL: [MessageKind; 9] = [
        Self::SettingChange,
        Self::DeviceChange,
        Self::ViewportChange,
        Self::Save,
        Self::Reset,
        Self::PreviewReady,
        Self::Navigate,
        Self::SelectiveRefresh,
        Self::EmbeddingRefused,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SettingChange => "setting-change",
            Self::DeviceChange => "device-change",
            Self::ViewportChange => "viewport-change",
            Self::Save => "save",
            Self::Reset => "reset",
            Self::PreviewReady => "preview-ready",
            Self::Navigate => "navigate",
            Self::SelectiveRefresh => "selective-refresh",
            Self::EmbeddingRefused => "embedding-refused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Whether the surface (rather than the host) sends this type.
    pub const fn from_surface(self) -> bool {
        matches!(self, Self::PreviewReady | Self::Navigate | Self::EmbeddingRefused)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingChangePayload {
    pub settings: SettingsTree,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceChangePayload {
    pub device: Device,
}

/// Emulated viewport as shown in the host's preview container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportChangePayload {
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatePayload {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectiveRefreshPayload {
    pub changes: Vec<SettingChange>,
    pub settings: SettingsTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRefusedPayload {
    #[serde(default)]
    pub reason: String,
}

// ============================================================================
// Message
// ============================================================================

/// A decoded message whose payload matched its type.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SettingChange(SettingChangePayload),
    DeviceChange(DeviceChangePayload),
    ViewportChange(ViewportChangePayload),
    Save,
    Reset,
    PreviewReady,
    Navigate(NavigatePayload),
    SelectiveRefresh(SelectiveRefreshPayload),
    EmbeddingRefused(EmbeddingRefusedPayload),
}

impl Message {
    pub fn setting_change(settings: SettingsTree, css: impl Into<String>) -> Self {
        Self::SettingChange(SettingChangePayload {
            settings,
            css: css.into(),
        })
    }

    pub fn device_change(device: Device) -> Self {
        Self::DeviceChange(DeviceChangePayload { device })
    }

    pub fn viewport_change(viewport: Viewport) -> Self {
        Self::ViewportChange(ViewportChangePayload { viewport })
    }

    pub fn navigate(url: impl Into<String>) -> Self {
        Self::Navigate(NavigatePayload { url: url.into() })
    }

    pub fn selective_refresh(changes: Vec<SettingChange>, settings: SettingsTree) -> Self {
        Self::SelectiveRefresh(SelectiveRefreshPayload { changes, settings })
    }

    pub fn embedding_refused(reason: impl Into<String>) -> Self {
        Self::EmbeddingRefused(EmbeddingRefusedPayload {
            reason: reason.into(),
        })
    }

    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::SettingChange(_) => MessageKind::SettingChange,
            Self::DeviceChange(_) => MessageKind::DeviceChange,
            Self::ViewportChange(_) => MessageKind::ViewportChange,
            Self::Save => MessageKind::Save,
            Self::Reset => MessageKind::Reset,
            Self::PreviewReady => MessageKind::PreviewReady,
            Self::Navigate(_) => MessageKind::Navigate,
            Self::SelectiveRefresh(_) => MessageKind::SelectiveRefresh,
            Self::EmbeddingRefused(_) => MessageKind::EmbeddingRefused,
        }
    }

    /// Decode `payload` according to `kind`.
    pub fn decode(kind: MessageKind, payload: Value) -> Result<Self, PreviewError> {
        fn typed<T: serde::de::DeserializeOwned>(kind: MessageKind, payload: Value) -> Result<T, PreviewError> {
            serde_json::from_value(payload)
                .map_err(|err| PreviewError::MalformedMessage(format!("{kind}: {err}")))
        }

        Ok(match kind {
            MessageKind::SettingChange => Self::SettingChange(typed(kind, payload)?),
            MessageKind::DeviceChange => Self::DeviceChange(typed(kind, payload)?),
            MessageKind::ViewportChange => Self::ViewportChange(typed(kind, payload)?),
            MessageKind::Save => Self::Save,
            MessageKind::Reset => Self::Reset,
            MessageKind::PreviewReady => Self::PreviewReady,
            MessageKind::Navigate => Self::Navigate(typed(kind, payload)?),
            MessageKind::SelectiveRefresh => Self::SelectiveRefresh(typed(kind, payload)?),
            MessageKind::EmbeddingRefused => Self::EmbeddingRefused(typed(kind, payload)?),
        })
    }

    pub fn to_envelope(&self) -> Envelope {
        let payload = match self {
            Self::SettingChange(p) => serde_json::to_value(p),
            Self::DeviceChange(p) => serde_json::to_value(p),
            Self::ViewportChange(p) => serde_json::to_value(p),
            Self::Save | Self::Reset => Ok(Value::Object(Map::new())),
            Self::PreviewReady => Ok(Value::Null),
            Self::Navigate(p) => serde_json::to_value(p),
            Self::SelectiveRefresh(p) => serde_json::to_value(p),
            Self::EmbeddingRefused(p) => serde_json::to_value(p),
        };
        Envelope {
            kind: self.kind().as_str().to_string(),
            // Payload structs only hold JSON-representable data.
            payload: payload.unwrap_or(Value::Null),
        }
    }

    /// Serialize to envelope JSON.
    pub fn to_json(&self) -> String {
        self.to_envelope().to_json()
    }

    /// Parse envelope JSON.
    ///
    /// `Ok(None)` means a well-formed envelope of a type this side does not
    /// know, which receivers ignore.
    pub fn from_json(raw: &str) -> Result<Option<Self>, PreviewError> {
        let envelope = Envelope::from_json(raw)?;
        match MessageKind::parse(&envelope.kind) {
            Some(kind) => Self::decode(kind, envelope.payload).map(Some),
            None => Ok(None),
        }
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Wire form of a message. `kind` stays a string so unknown types survive
/// parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Envelope {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!(r#"{{"type":"{}"}}"#, self.kind))
    }

    pub fn from_json(raw: &str) -> Result<Self, PreviewError> {
        serde_json::from_str(raw).map_err(|err| PreviewError::MalformedMessage(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::parse("setting_change"), None);
        assert!(MessageKind::Navigate.from_surface());
        assert!(!MessageKind::Save.from_surface());
    }

    #[test]
    fn test_envelope_shape() {
        let json = Message::device_change(Device::Tablet).to_json();
        assert_eq!(json, r#"{"type":"device-change","payload":{"device":"tablet"}}"#);

        assert_eq!(Message::PreviewReady.to_json(), r#"{"type":"preview-ready"}"#);
        assert_eq!(Message::Save.to_json(), r#"{"type":"save","payload":{}}"#);
    }

    #[test]
    fn test_setting_change_carries_tree_and_css() {
        let tree = SettingsTree::new(json!({ "colors": { "primaryColor": "#112233" } }));
        let json = Message::setting_change(tree.clone(), "body{}").to_json();
        assert!(json.contains(r##""settings":{"colors":{"primaryColor":"#112233"}}"##));

        let parsed = Message::from_json(&json).unwrap().unwrap();
        assert_eq!(parsed, Message::setting_change(tree, "body{}"));
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        assert_eq!(Message::from_json(r#"{"type":"telemetry","payload":1}"#).unwrap(), None);
    }

    #[test]
    fn test_payload_shape_is_checked() {
        let err = Message::from_json(r#"{"type":"navigate","payload":{"href":"/"}}"#).unwrap_err();
        assert!(matches!(err, PreviewError::MalformedMessage(_)));

        let err = Message::from_json(r#"{"type":"device-change","payload":{"device":"watch"}}"#).unwrap_err();
        assert!(matches!(err, PreviewError::MalformedMessage(_)));

        assert!(Message::from_json("not json").is_err());
        assert!(Message::from_json(r#"{"payload":{}}"#).is_err());
    }

    #[test]
    fn test_ready_without_payload() {
        assert_eq!(
            Message::from_json(r#"{"type":"preview-ready"}"#).unwrap(),
            Some(Message::PreviewReady)
        );
    }
}
