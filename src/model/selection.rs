//! Ambient selection state read at invocation time.

use serde::{Deserialize, Serialize};

use super::ids::{ItemId, LayerRef};
use crate::sync::Direction;

/// What the user has selected when a sync is triggered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected layers of the active composition, in selection order
    #[serde(default)]
    pub layers: Vec<LayerRef>,
    /// Selected project panel items, in selection order
    #[serde(default)]
    pub items: Vec<ItemId>,
}

impl Selection {
    pub fn layers(layers: Vec<LayerRef>) -> Self {
        Self {
            layers,
            items: Vec::new(),
        }
    }

    pub fn items(items: Vec<ItemId>) -> Self {
        Self {
            layers: Vec::new(),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.items.is_empty()
    }

    /// Propagation direction implied by the selection.
    ///
    /// Selected layers take precedence over selected items; `None` means
    /// nothing is selected.
    pub fn direction(&self) -> Option<Direction> {
        if !self.layers.is_empty() {
            Some(Direction::LayerToSource)
        } else if !self.items.is_empty() {
            Some(Direction::SourceToLayer)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompId;

    #[test]
    fn test_layers_take_precedence() {
        let selection = Selection {
            layers: vec![LayerRef::new(CompId(1), 1)],
            items: vec![ItemId(2)],
        };
        assert_eq!(selection.direction(), Some(Direction::LayerToSource));
    }

    #[test]
    fn test_items_only() {
        let selection = Selection::items(vec![ItemId(2)]);
        assert_eq!(selection.direction(), Some(Direction::SourceToLayer));
    }

    #[test]
    fn test_empty_selection() {
        assert!(Selection::default().is_empty());
        assert_eq!(Selection::default().direction(), None);
    }
}
