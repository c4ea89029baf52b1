//! Source items: the asset records layers point at.

use serde::{Deserialize, Serialize};

use super::ids::ItemId;

/// An asset record in the project graph.
///
/// Any number of layer instances may reference a source item; its lifetime
/// is independent of every composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItem {
    /// Stable identity
    pub id: ItemId,
    /// Display name shown in the project panel
    pub name: String,
    /// Locked items refuse renames
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
}

impl SourceItem {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            locked: false,
        }
    }
}
