//! Source → Layer propagation
//!
//! Renames every confirmed referencing layer after its source item.
//! Repeated placements of one item within a composition are numbered:
//! "Logo.png", "Logo.png 2", "Logo.png 3". Numbering restarts in each
//! composition.

use std::collections::HashMap;

use log::{debug, info, warn};

use super::discovery::DiscoveryResult;
use super::oplog::{OperationLog, RenameRecord, SkipReason};
use crate::model::{ItemId, ProjectHost};

/// Undo group label for a Source → Layer batch.
pub const UNDO_LABEL: &str = "Push Project Item Name To Layers";

/// Name for the `occurrence`-th placement of an item in one composition.
pub fn occurrence_name(base: &str, occurrence: usize, separator: &str) -> String {
    if occurrence <= 1 {
        base.to_string()
    } else {
        format!("{}{}{}", base, separator, occurrence)
    }
}

/// Push item names onto the layers in `scope`.
///
/// Compositions and layers are visited in the order discovery recorded
/// them. A rejected rename still consumes its occurrence number so the
/// remaining layers keep their positional suffix.
pub fn push_item_names<H>(host: &mut H, scope: &DiscoveryResult, separator: &str) -> OperationLog
where
    H: ProjectHost + ?Sized,
{
    let mut log = OperationLog::new();

    info!(
        "Pushing item names to {} layer(s) in {} composition(s)",
        scope.layer_count(),
        scope.len()
    );
    host.begin_undo_group(UNDO_LABEL);

    for comp in scope {
        let mut occurrences: HashMap<ItemId, usize> = HashMap::new();

        for found in &comp.layers {
            let display_name = |host: &H| {
                host.layer(found.layer)
                    .map(|layer| layer.name.clone())
                    .unwrap_or_else(|| found.layer.to_string())
            };

            let Some(item) = host.item(found.source) else {
                warn!("Item {} disappeared before its layers were renamed", found.source);
                log.skip(display_name(&*host), SkipReason::MissingSource);
                continue;
            };

            let counter = occurrences.entry(found.source).or_insert(1);
            let new_name = occurrence_name(&item.name, *counter, separator);
            *counter += 1;

            match host.rename_layer(found.layer, &new_name) {
                Ok(old_name) => {
                    debug!(
                        "Comp '{}' layer {}: '{}' -> '{}'",
                        comp.name, found.layer.index, old_name, new_name
                    );
                    log.success(RenameRecord::layer(
                        comp.name.clone(),
                        found.layer.index,
                        old_name,
                        new_name,
                    ));
                }
                Err(e) => {
                    warn!("{}", e);
                    log.skip(
                        display_name(&*host),
                        SkipReason::RenameRejected {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }
    }

    host.end_undo_group();
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompId, LayerInstance, LayerRef};
    use crate::state::ProjectGraph;
    use crate::sync::discover;
    use pretty_assertions::assert_eq;

    mod occurrence_name_cases {
        use super::super::occurrence_name;
        use test_case::test_case;

        #[test_case("Logo.png", 1, " " => "Logo.png")]
        #[test_case("Logo.png", 2, " " => "Logo.png 2")]
        #[test_case("Logo.png", 3, "_" => "Logo.png_3")]
        fn test_occurrence_name(base: &str, occurrence: usize, separator: &str) -> String {
            occurrence_name(base, occurrence, separator)
        }
    }

    fn names(graph: &ProjectGraph, comp: CompId) -> Vec<String> {
        graph
            .composition(comp)
            .unwrap()
            .layers
            .iter()
            .map(|l| l.name.clone())
            .collect()
    }

    #[test]
    fn test_three_placements_are_numbered() {
        let mut graph = ProjectGraph::new("Test");
        let logo = graph.add_item("Logo.png").unwrap();
        let comp = graph.add_composition("Main").unwrap();
        for name in ["x", "y", "z"] {
            graph.add_layer(comp, LayerInstance::sourced(name, logo)).unwrap();
        }

        let scope = discover(&graph, &[logo]).unwrap();
        let log = push_item_names(&mut graph, &scope, " ");

        assert_eq!(names(&graph, comp), vec!["Logo.png", "Logo.png 2", "Logo.png 3"]);
        assert_eq!(log.success_count(), 3);
        assert_eq!(log.successes[1], RenameRecord::layer("Main", 2, "y", "Logo.png 2"));
        assert!(log.skipped.is_empty());
    }

    #[test]
    fn test_counters_are_per_item_and_per_composition() {
        let mut graph = ProjectGraph::new("Test");
        let a = graph.add_item("A").unwrap();
        let b = graph.add_item("B").unwrap();
        let c1 = graph.add_composition("One").unwrap();
        let c2 = graph.add_composition("Two").unwrap();
        graph.add_layer(c1, LayerInstance::sourced("1", a)).unwrap();
        graph.add_layer(c1, LayerInstance::sourced("2", b)).unwrap();
        graph.add_layer(c1, LayerInstance::sourced("3", a)).unwrap();
        graph.add_layer(c1, LayerInstance::generated("Text")).unwrap();
        graph.add_layer(c2, LayerInstance::sourced("4", a)).unwrap();

        let scope = discover(&graph, &[a, b]).unwrap();
        push_item_names(&mut graph, &scope, " ");

        assert_eq!(names(&graph, c1), vec!["A", "B", "A 2", "Text"]);
        assert_eq!(names(&graph, c2), vec!["A"]);
    }

    #[test]
    fn test_locked_layer_keeps_its_number() {
        let mut graph = ProjectGraph::new("Test");
        let logo = graph.add_item("Logo").unwrap();
        let comp = graph.add_composition("Main").unwrap();
        for name in ["x", "y", "z"] {
            graph.add_layer(comp, LayerInstance::sourced(name, logo)).unwrap();
        }
        graph.layer_mut(LayerRef::new(comp, 2)).unwrap().locked = true;

        let scope = discover(&graph, &[logo]).unwrap();
        let log = push_item_names(&mut graph, &scope, " ");

        assert_eq!(names(&graph, comp), vec!["Logo", "y", "Logo 3"]);
        assert_eq!(log.success_count(), 2);
        assert_eq!(log.skipped.len(), 1);
        assert_eq!(log.skipped[0].name, "y");
    }

    #[test]
    fn test_dangling_source_is_skipped() {
        let mut graph = ProjectGraph::new("Test");
        let logo = graph.add_item("Logo").unwrap();
        let comp = graph.add_composition("Main").unwrap();
        graph.add_layer(comp, LayerInstance::sourced("x", logo)).unwrap();
        graph
            .composition_mut(comp)
            .unwrap()
            .layers
            .push(LayerInstance::sourced("Ghost", ItemId(99)));

        let scope = discover(&graph, &[logo, ItemId(99)]).unwrap();
        let log = push_item_names(&mut graph, &scope, " ");

        assert_eq!(names(&graph, comp), vec!["Logo", "Ghost"]);
        assert_eq!(log.success_count(), 1);
        assert_eq!(log.skipped.len(), 1);
        assert_eq!(log.skipped[0].name, "Ghost");
        assert_eq!(log.skipped[0].reason, SkipReason::MissingSource);
    }
}
