//! Interactive composition picker.

use dialoguer::{theme::ColorfulTheme, MultiSelect};
use log::warn;

use crate::sync::{DiscoveredComposition, DiscoveryResult, ScopeDecision, ScopeSelector};

/// Checkbox list of discovered compositions, all checked by default.
///
/// Escape cancels the push; so does confirming with nothing checked.
pub struct DialogSelector {
    theme: ColorfulTheme,
}

impl Default for DialogSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogSelector {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

fn label(comp: &DiscoveredComposition) -> String {
    match comp.layers.len() {
        1 => format!("{} (1 layer)", comp.name),
        n => format!("{} ({} layers)", comp.name, n),
    }
}

impl ScopeSelector for DialogSelector {
    fn select(&mut self, discovered: DiscoveryResult) -> ScopeDecision {
        let labels: Vec<String> = discovered.iter().map(label).collect();
        let defaults = vec![true; labels.len()];

        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt("Select comps to update layers (Space to toggle, Enter to push names)")
            .items(&labels)
            .defaults(&defaults)
            .interact_opt();

        match picked {
            Ok(Some(indices)) => {
                let ids = discovered.ids();
                let keep: Vec<_> = indices.iter().filter_map(|&i| ids.get(i)).collect();
                ScopeDecision::Confirmed(
                    discovered.retain_compositions(|comp| keep.contains(&&comp.id)),
                )
                .normalize()
            }
            Ok(None) => ScopeDecision::Aborted,
            Err(e) => {
                warn!("Composition picker failed: {}", e);
                ScopeDecision::Aborted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompId, ItemId, LayerRef};
    use crate::sync::DiscoveredLayer;

    #[test]
    fn test_label_pluralizes() {
        let layer = DiscoveredLayer {
            layer: LayerRef::new(CompId(2), 1),
            source: ItemId(1),
        };
        let mut comp = DiscoveredComposition {
            id: CompId(2),
            name: "Main".to_string(),
            layers: vec![layer],
        };
        assert_eq!(label(&comp), "Main (1 layer)");
        comp.layers.push(layer);
        assert_eq!(label(&comp), "Main (2 layers)");
    }
}
