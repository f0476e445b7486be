//! Optional per-feature blocks.
//!
//! | Section       | Module        | Emitted when                                   |
//! |---------------|---------------|------------------------------------------------|
//! | `header`      | `header`      | `primary.background` and `primary.height` set  |
//! | `footer`      | `footer`      | `widgets` or `bottomBar` enabled               |
//! | `container`   | `container`   | `layout` and `width` set                       |
//! | `sidebar`     | `sidebar`     | `layout` and `width` set, layout not `no-sidebar` |
//! | `blog`        | `blog`        | `archive.layout` and `archive.styling` set     |
//! | `buttons`     | `buttons`     | `primary.backgroundColor` and `textColor` set  |
//! | `breadcrumbs` | `breadcrumbs` | `enabled: true` and `linkColor` set            |
//! | `scrollToTop` | `scroll_top`  | `enabled: true` and `displayType` set          |
//!
//! Each block first deserializes its section into a typed struct. A missing
//! section or a missing required field fails that step, and the block
//! contributes nothing: no partial output.

mod blog;
mod breadcrumbs;
mod buttons;
mod container;
mod footer;
mod header;
mod scroll_top;
mod sidebar;

use serde::de::DeserializeOwned;

use super::writer::Stylesheet;
use crate::settings::SettingsTree;

type Emitter = fn(&SettingsTree) -> Option<Stylesheet>;

/// Fixed emission order, keyed by section name.
pub(super) const FEATURES: [(&str, Emitter); 8] = [
    ("header", header::emit),
    ("footer", footer::emit),
    ("container", container::emit),
    ("sidebar", sidebar::emit),
    ("blog", blog::emit),
    ("buttons", buttons::emit),
    ("breadcrumbs", breadcrumbs::emit),
    ("scrollToTop", scroll_top::emit),
];

/// Append every feature block whose section is complete.
pub fn emit(tree: &SettingsTree, sheet: &mut Stylesheet) {
    for (_, emitter) in FEATURES {
        if let Some(block) = emitter(tree) {
            sheet.append(block);
        }
    }
}

/// Typed view of a top-level section.
fn section<T: DeserializeOwned>(tree: &SettingsTree, name: &str) -> Option<T> {
    tree.value_at(&[name])
}
