//! CLI Command Implementations
//!
//! Each command loads the project, does one thing, and saves it back when
//! something changed.

use std::path::Path;

use log::info;

use super::prompt::DialogSelector;
use super::SelectionArgs;
use crate::config::{ConflictPolicy, SyncConfig};
use crate::error::Result;
use crate::model::{LayerInstance, ProjectHost, Selection};
use crate::state::{Project, ProjectGraph};
use crate::sync::{run, ExcludeCompositions, Outcome};

/// Resolve selection flags against the project graph.
pub fn resolve_selection(graph: &ProjectGraph, args: &SelectionArgs) -> Result<Selection> {
    let layers = args
        .layers
        .iter()
        .map(|layer| graph.find_layer(layer))
        .collect::<Result<Vec<_>>>()?;
    let items = args
        .items
        .iter()
        .map(|item| graph.find_item(item))
        .collect::<Result<Vec<_>>>()?;
    Ok(Selection { layers, items })
}

/// Create a new project directory.
pub fn init(path: &Path, name: Option<&str>) -> Result<()> {
    let name = name.map(str::to_string).unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled Project".to_string())
    });
    info!("Creating project '{}' at {}", name, path.display());

    Project::create(path, &name)?;
    println!("Project created: {}", path.display());
    Ok(())
}

/// Add a source item.
pub fn add_item(path: &Path, name: &str) -> Result<()> {
    let mut project = Project::load(path)?;
    let id = project.graph.add_item(name)?;
    project.save()?;

    println!("Added item {}: {}", id, name);
    Ok(())
}

/// Add an empty composition.
pub fn add_comp(path: &Path, name: &str) -> Result<()> {
    let mut project = Project::load(path)?;
    let id = project.graph.add_composition(name)?;
    project.save()?;

    println!("Added composition {}: {}", id, name);
    Ok(())
}

/// Append a layer to a composition.
pub fn add_layer(path: &Path, comp: &str, name: &str, source: Option<&str>) -> Result<()> {
    let mut project = Project::load(path)?;
    let comp = project.graph.find_composition(comp)?;
    let layer = match source {
        Some(source) => LayerInstance::sourced(name, project.graph.find_item(source)?),
        None => LayerInstance::generated(name),
    };
    let layer_ref = project.graph.add_layer(comp, layer)?;
    project.save()?;

    println!("Added layer {}: {}", layer_ref, name);
    Ok(())
}

/// Persist the selection used by `sync` when it gets no selection flags.
pub fn select(path: &Path, args: &SelectionArgs) -> Result<()> {
    let mut project = Project::load(path)?;
    project.graph.selection = resolve_selection(&project.graph, args)?;
    project.save()?;

    println!(
        "Selected {} layer(s) and {} item(s)",
        project.graph.selection.layers.len(),
        project.graph.selection.items.len()
    );
    Ok(())
}

/// Run one sync invocation and print its outcome.
pub fn sync(
    path: &Path,
    args: &SelectionArgs,
    exclude: &[String],
    interactive: bool,
    policy: Option<ConflictPolicy>,
    json: bool,
) -> Result<Outcome> {
    let mut config = SyncConfig::load(path)?;
    if let Some(policy) = policy {
        config.conflict_policy = policy;
    }

    let mut project = Project::load(path)?;
    project
        .history_mut()
        .set_max_undo_levels(config.max_undo_levels);

    let selection = if args.is_empty() {
        project.graph.selection.clone()
    } else {
        resolve_selection(&project.graph, args)?
    };
    info!(
        "Sync in {}: {} layer(s), {} item(s) selected",
        path.display(),
        selection.layers.len(),
        selection.items.len()
    );

    let outcome = if interactive {
        run(&mut project, &selection, &mut DialogSelector::new(), &config)
    } else {
        let mut selector = ExcludeCompositions::new(exclude.iter().cloned());
        run(&mut project, &selection, &mut selector, &config)
    };

    if outcome.changed() {
        project.save()?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", outcome);
    }
    Ok(outcome)
}

/// Undo the last sync.
pub fn undo(path: &Path) -> Result<()> {
    let mut project = Project::load(path)?;
    let action = project.undo()?;
    project.save()?;

    println!("Undone: {}", action.label);
    Ok(())
}

/// Redo the last undone sync.
pub fn redo(path: &Path) -> Result<()> {
    let mut project = Project::load(path)?;
    let action = project.redo()?;
    project.save()?;

    println!("Redone: {}", action.label);
    Ok(())
}

/// Show sync history.
pub fn show_history(path: &Path) -> Result<()> {
    let project = Project::load(path)?;
    let history = project.history();

    if history.get_history().is_empty() {
        println!("No actions in history.");
        return Ok(());
    }

    println!("Action History:");
    println!("{:-<60}", "");

    for action in history.get_history() {
        let marker = if history.is_undoable(&action.id) {
            "  * "
        } else {
            "    "
        };
        println!(
            "{}{} ({}, {} renamed) [{}]",
            marker,
            action.label,
            action.timestamp.format("%Y-%m-%d %H:%M:%S"),
            action.state_after.len(),
            &action.checksum_after[..12.min(action.checksum_after.len())]
        );
    }

    println!("{:-<60}", "");
    println!(
        "Undo stack: {} | Redo stack: {}",
        history.undo_count(),
        history.redo_count()
    );
    Ok(())
}

/// Print current project state.
pub fn print_state(path: &Path) -> Result<()> {
    let project = Project::load(path)?;
    println!("{}", serde_json::to_string_pretty(&project.graph)?);

    println!("\n--- Compositions ---");
    for comp in project.compositions() {
        println!("{} [{}]", comp.name, comp.id);
        for (index, layer) in comp.indexed_layers() {
            let source = layer
                .source
                .and_then(|id| project.item(id))
                .map(|item| format!(" <- {} [{}]", item.name, item.id))
                .unwrap_or_default();
            println!("  {:>3}. {}{}", index, layer.name, source);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;

    #[test]
    fn test_resolve_selection() {
        let mut graph = ProjectGraph::new("Test");
        let logo = graph.add_item("Logo.png").unwrap();
        let main = graph.add_composition("Main").unwrap();
        let layer = graph
            .add_layer(main, LayerInstance::sourced("Logo.png", logo))
            .unwrap();

        let args = SelectionArgs {
            layers: vec!["Main:1".to_string()],
            items: vec!["Logo.png".to_string()],
        };
        let selection = resolve_selection(&graph, &args).unwrap();
        assert_eq!(selection.layers, vec![layer]);
        assert_eq!(selection.items, vec![logo]);

        let bad = SelectionArgs {
            layers: vec![],
            items: vec!["Missing".to_string()],
        };
        assert!(matches!(
            resolve_selection(&graph, &bad),
            Err(SyncError::UnknownItem { .. })
        ));
    }
}
