//! Configuration section definitions.
//!
//! | Module    | TOML Section | Purpose                                   |
//! |-----------|--------------|-------------------------------------------|
//! | `channel` | `[channel]`  | Origin policy for the message channel     |
//! | `surface` | `[surface]`  | Preview address, style element id, polling |
//! | `timing`  | `[timing]`   | Load timeout, retries, backoff, debounce  |

mod channel;
mod surface;
mod timing;

pub use channel::ChannelConfig;
pub use surface::{DEFAULT_STYLE_ELEMENT_ID, SurfaceConfig};
pub use timing::{RETRY_CEILING, TimingConfig};
