//! Composition discovery
//!
//! Finds every composition holding at least one layer that references one
//! of the target source items.

use std::collections::HashSet;

use log::{debug, info};

use crate::model::{CompId, ItemId, LayerRef, ProjectHost};

/// A layer found to reference a target item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredLayer {
    pub layer: LayerRef,
    pub source: ItemId,
}

/// A composition and its referencing layers, in layer order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredComposition {
    pub id: CompId,
    pub name: String,
    pub layers: Vec<DiscoveredLayer>,
}

/// Compositions referencing the target items, in project order.
///
/// Built fresh per invocation and dropped once the renames are done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryResult {
    compositions: Vec<DiscoveredComposition>,
}

impl DiscoveryResult {
    pub fn is_empty(&self) -> bool {
        self.compositions.is_empty()
    }

    /// Number of compositions
    pub fn len(&self) -> usize {
        self.compositions.len()
    }

    /// Total referencing layers across all compositions
    pub fn layer_count(&self) -> usize {
        self.compositions.iter().map(|c| c.layers.len()).sum()
    }

    pub fn get(&self, id: CompId) -> Option<&DiscoveredComposition> {
        self.compositions.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiscoveredComposition> {
        self.compositions.iter()
    }

    pub fn ids(&self) -> Vec<CompId> {
        self.compositions.iter().map(|c| c.id).collect()
    }

    /// Keep only the compositions accepted by `keep`, preserving order and
    /// each entry's layer list.
    pub fn retain_compositions<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&DiscoveredComposition) -> bool,
    {
        self.compositions.retain(|c| keep(c));
        self
    }
}

impl<'a> IntoIterator for &'a DiscoveryResult {
    type Item = &'a DiscoveredComposition;
    type IntoIter = std::slice::Iter<'a, DiscoveredComposition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Scan every composition for layers referencing `targets`.
///
/// Returns `None` when no composition references any target.
pub fn discover<H>(host: &H, targets: &[ItemId]) -> Option<DiscoveryResult>
where
    H: ProjectHost + ?Sized,
{
    let targets: HashSet<ItemId> = targets.iter().copied().collect();
    let mut result = DiscoveryResult::default();

    for comp in host.compositions() {
        let layers: Vec<DiscoveredLayer> = comp
            .indexed_layers()
            .filter_map(|(index, layer)| {
                let source = layer.source.filter(|s| targets.contains(s))?;
                Some(DiscoveredLayer {
                    layer: LayerRef::new(comp.id, index),
                    source,
                })
            })
            .collect();

        if !layers.is_empty() {
            debug!("Composition '{}': {} referencing layer(s)", comp.name, layers.len());
            result.compositions.push(DiscoveredComposition {
                id: comp.id,
                name: comp.name.clone(),
                layers,
            });
        }
    }

    if result.is_empty() {
        info!("No composition references the {} selected item(s)", targets.len());
        return None;
    }
    info!(
        "Found {} referencing layer(s) in {} composition(s)",
        result.layer_count(),
        result.len()
    );
    Some(result)
}
