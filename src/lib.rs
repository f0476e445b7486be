//! themesync - live preview synchronization for visual theme customizers.
//!
//! A host-side settings tree is compiled to a stylesheet and pushed into a
//! sandboxed preview surface, which reports back when it is ready, when it
//! navigates, and when it refuses to be embedded.
//!
//! # Module Structure
//!
//! | Module       | Purpose                                                   |
//! |--------------|-----------------------------------------------------------|
//! | `settings`   | `SettingsTree`, responsive values, `SettingsStore`        |
//! | `compiler`   | Settings tree to stylesheet text                          |
//! | `channel`    | Typed message envelopes, origin policy, subscriptions     |
//! | `transport`  | In-process and WebSocket transports for the channel       |
//! | `surface`    | Preview surface abstraction and the in-surface agent      |
//! | `controller` | Load lifecycle, retries, debounced pushes, async actor    |
//! | `embed`      | Bootstrap script injected into the preview document       |
//! | `config`     | `preview.toml` loading and validation                     |
//!
//! # Example
//!
//! ```ignore
//! let config = PreviewConfig::from_path(Path::new("preview.toml"))?;
//! let channel = Arc::new(MessageChannel::new(config.origin_policy()));
//! let controller = PreviewController::new(&config, channel, Box::new(RemoteSurface::loader()));
//! let (actor, handle) = PreviewActor::new(controller);
//! tokio::spawn(actor.run());
//! handle.send(PreviewCommand::Navigate).await;
//! ```

pub mod channel;
pub mod compiler;
pub mod config;
pub mod controller;
pub mod embed;
pub mod error;
pub mod logger;
pub mod settings;
pub mod surface;
pub mod transport;
pub mod utils;

pub use channel::{Message, MessageChannel, MessageKind, OriginPolicy, Subscription};
pub use compiler::compile;
pub use config::PreviewConfig;
pub use controller::{
    LoadingState, PreviewActor, PreviewCommand, PreviewController, PreviewHandle, PreviewStatus,
};
pub use error::{PreviewError, TransportError};
pub use settings::{Device, Responsive, SettingChange, SettingsStore, SettingsTree};
pub use surface::{LocalSurface, PreviewSurface, RemoteSurface, SurfaceAgent, SurfaceLoader};
pub use transport::Transport;
