//! Settings tree to stylesheet compilation.
//!
//! # Emission Order
//!
//! ```text
//! compile(tree)
//!     │
//!     ├── 1. :root tokens        (colors, typography, container + sidebar)
//!     ├── 2. base selectors      (body, h1-h6, a, a:hover; desktop values)
//!     ├── 3. breakpoint overrides (992px, then 576px; changed properties only)
//!     ├── 4. feature blocks      (header … scrollToTop; each all-or-nothing)
//!     └── 5. customCSS           (verbatim)
//! ```
//!
//! Compilation never fails: absent or mis-shaped settings fall back to the
//! values in [`defaults`], and an incomplete feature section is left out.
//! The same tree always produces byte-identical output.

mod base;
pub mod defaults;
mod features;
mod tokens;
mod values;
mod writer;

pub use values::{MOBILE_MAX_WIDTH, TABLET_MAX_WIDTH};
pub use writer::{Media, Rule, Stylesheet};

use crate::settings::SettingsTree;

/// Compile `tree` into stylesheet text.
pub fn compile(tree: &SettingsTree) -> String {
    let mut sheet = Stylesheet::new();

    sheet.rule(&tokens::root(tree));
    base::emit(tree, &mut sheet);
    features::emit(tree, &mut sheet);

    if let Some(custom) = tree.str_at(&["customCSS"]).filter(|css| !css.trim().is_empty()) {
        sheet.raw(custom);
    }

    sheet.finish()
}

/// Section names of the optional feature blocks, in emission order.
pub fn feature_sections() -> impl Iterator<Item = &'static str> {
    features::FEATURES.iter().map(|(name, _)| *name)
}
