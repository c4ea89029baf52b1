//! Compositions and the layer instances they contain.

use serde::{Deserialize, Serialize};

use super::ids::{CompId, ItemId};

/// A positioned reference to a source item inside a composition.
///
/// Text, shape and camera layers have no backing asset, so `source` is
/// optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInstance {
    /// Display name in the timeline
    pub name: String,
    /// Referenced source item, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ItemId>,
    /// Locked layers refuse renames
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
}

impl LayerInstance {
    /// Create a layer backed by a source item
    pub fn sourced(name: impl Into<String>, source: ItemId) -> Self {
        Self {
            name: name.into(),
            source: Some(source),
            locked: false,
        }
    }

    /// Create a generated layer with no source item
    pub fn generated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
            locked: false,
        }
    }
}

/// A named, ordered container of layer instances.
///
/// Layers are addressed by 1-based index, matching how hosts number the
/// timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// Stable identity
    pub id: CompId,
    /// Display name
    pub name: String,
    /// Ordered layer stack, top first
    #[serde(default)]
    pub layers: Vec<LayerInstance>,
}

impl Composition {
    pub fn new(id: CompId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            layers: Vec::new(),
        }
    }

    /// Append a layer, returning its 1-based index
    pub fn push_layer(&mut self, layer: LayerInstance) -> usize {
        self.layers.push(layer);
        self.layers.len()
    }

    /// Number of layers in the composition
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Get a layer by its 1-based index
    pub fn layer(&self, index: usize) -> Option<&LayerInstance> {
        index.checked_sub(1).and_then(|i| self.layers.get(i))
    }

    /// Get a layer by its 1-based index (mutable)
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut LayerInstance> {
        index.checked_sub(1).and_then(|i| self.layers.get_mut(i))
    }

    /// Iterate layers in timeline order together with their 1-based index
    pub fn indexed_layers(&self) -> impl Iterator<Item = (usize, &LayerInstance)> {
        self.layers.iter().enumerate().map(|(i, layer)| (i + 1, layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_one_based() {
        let mut comp = Composition::new(CompId(1), "Main");
        assert_eq!(comp.push_layer(LayerInstance::generated("Title")), 1);
        assert_eq!(comp.push_layer(LayerInstance::sourced("Logo", ItemId(2))), 2);

        assert!(comp.layer(0).is_none());
        assert_eq!(comp.layer(1).unwrap().name, "Title");
        assert_eq!(comp.layer(2).unwrap().source, Some(ItemId(2)));
        assert!(comp.layer(3).is_none());
    }

    #[test]
    fn test_indexed_layers_order() {
        let mut comp = Composition::new(CompId(1), "Main");
        comp.push_layer(LayerInstance::generated("A"));
        comp.push_layer(LayerInstance::generated("B"));

        let indexed: Vec<_> = comp
            .indexed_layers()
            .map(|(i, l)| (i, l.name.as_str()))
            .collect();
        assert_eq!(indexed, vec![(1, "A"), (2, "B")]);
    }

    #[test]
    fn test_generated_layer_omits_source_in_json() {
        let json = serde_json::to_value(LayerInstance::generated("Camera 1")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Camera 1" }));
    }
}
