//! `init` - emit the default configuration skeleton.

use customizer_core::{codec, edit};

/// The skeleton as pretty-printed JSON, the same shape the editor scaffolds
/// on first open.
#[must_use]
pub fn skeleton_json() -> String {
    codec::to_json_pretty(&edit::default_structure())
}
