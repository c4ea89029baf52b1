//! Undo/Redo System
//!
//! Each undo group closed on a `Project` becomes one `UndoAction` holding the
//! names the batch changed, before and after. Undo and redo check only those
//! names, so adding items or changing the selection between steps keeps the
//! history usable; a touched name edited outside the history blocks them.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Result, SyncError};
use crate::model::{ItemId, LayerRef};
use crate::state::project::ProjectGraph;

/// Default maximum number of undo levels to keep.
pub const DEFAULT_MAX_UNDO_LEVELS: usize = 50;

/// File name for the undo stack persistence.
const UNDO_STACK_FILE: &str = "undo_stack.json";

/// File name for the redo stack persistence.
const REDO_STACK_FILE: &str = "redo_stack.json";

/// File name for the action log persistence.
const ACTION_LOG_FILE: &str = "action_log.json";

/// Item and layer names keyed by entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSnapshot {
    #[serde(default)]
    pub items: Vec<(ItemId, String)>,
    #[serde(default)]
    pub layers: Vec<(LayerRef, String)>,
}

impl NameSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len() + self.layers.len()
    }

    /// Entries renamed between `self` and `later`, as `(before, after)`.
    ///
    /// Entities missing from `self` were created in between and are left out.
    pub fn changes_to(&self, later: &NameSnapshot) -> (NameSnapshot, NameSnapshot) {
        let items: HashMap<ItemId, &str> = self
            .items
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        let layers: HashMap<LayerRef, &str> = self
            .layers
            .iter()
            .map(|(layer, name)| (*layer, name.as_str()))
            .collect();

        let mut before = NameSnapshot::default();
        let mut after = NameSnapshot::default();
        for (id, name) in &later.items {
            if let Some(old) = items.get(id).filter(|old| **old != name.as_str()) {
                before.items.push((*id, old.to_string()));
                after.items.push((*id, name.clone()));
            }
        }
        for (layer, name) in &later.layers {
            if let Some(old) = layers.get(layer).filter(|old| **old != name.as_str()) {
                before.layers.push((*layer, old.to_string()));
                after.layers.push((*layer, name.clone()));
            }
        }
        (before, after)
    }
}

/// SHA-256 of a name snapshot, hex encoded.
pub fn snapshot_checksum(names: &NameSnapshot) -> String {
    let mut hasher = Sha256::new();
    for (id, name) in &names.items {
        hasher.update(format!("item {} {}:{}\n", id, name.len(), name));
    }
    for (layer, name) in &names.layers {
        hasher.update(format!("layer {} {}:{}\n", layer, name.len(), name));
    }
    format!("{:x}", hasher.finalize())
}

/// A single undoable batch: the names it changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoAction {
    /// Unique identifier for this action.
    pub id: String,

    /// Undo group label, e.g. "Rename Project Items".
    pub label: String,

    /// When the batch was recorded.
    pub timestamp: DateTime<Utc>,

    /// Touched names before the batch.
    pub state_before: NameSnapshot,

    /// Touched names after the batch.
    pub state_after: NameSnapshot,

    pub checksum_before: String,

    pub checksum_after: String,
}

impl UndoAction {
    /// Create a new undo action with a generated UUID.
    pub fn new(label: impl Into<String>, state_before: NameSnapshot, state_after: NameSnapshot) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            timestamp: Utc::now(),
            checksum_before: snapshot_checksum(&state_before),
            checksum_after: snapshot_checksum(&state_after),
            state_before,
            state_after,
        }
    }
}

/// Fails unless the graph still holds `expected` for every touched entity.
fn ensure_unchanged(
    graph: &ProjectGraph,
    expected: &NameSnapshot,
    checksum: &str,
    label: &str,
) -> Result<()> {
    let current = graph.names_of(expected).map(|names| snapshot_checksum(&names));
    if current.as_deref() != Some(checksum) {
        return Err(SyncError::HistoryDiverged {
            label: label.to_string(),
        });
    }
    Ok(())
}

/// Manages undo/redo operations for a project.
///
/// The undo manager maintains:
/// - An undo stack of recent batches (limited by max_undo_levels)
/// - A redo stack of undone batches
/// - A complete action log for history viewing
#[derive(Debug, Clone)]
pub struct UndoManager {
    undo_stack: Vec<UndoAction>,
    redo_stack: Vec<UndoAction>,
    max_undo_levels: usize,
    action_log: Vec<UndoAction>,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_LEVELS)
    }
}

impl UndoManager {
    /// Create a new undo manager with the specified maximum undo levels.
    pub fn new(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_levels: max_levels,
            action_log: Vec::new(),
        }
    }

    /// Load undo manager state from the history directory.
    ///
    /// Missing files load as empty stacks.
    pub fn load(history_dir: &Path) -> Result<Self> {
        Ok(Self {
            undo_stack: read_actions(&history_dir.join(UNDO_STACK_FILE))?,
            redo_stack: read_actions(&history_dir.join(REDO_STACK_FILE))?,
            max_undo_levels: DEFAULT_MAX_UNDO_LEVELS,
            action_log: read_actions(&history_dir.join(ACTION_LOG_FILE))?,
        })
    }

    /// Save undo manager state to the history directory.
    pub fn save(&self, history_dir: &Path) -> Result<()> {
        if !history_dir.exists() {
            fs::create_dir_all(history_dir).map_err(|e| SyncError::DirectoryCreateError {
                path: history_dir.to_path_buf(),
                source: e,
            })?;
        }

        write_actions(&history_dir.join(UNDO_STACK_FILE), &self.undo_stack)?;
        write_actions(&history_dir.join(REDO_STACK_FILE), &self.redo_stack)?;
        write_actions(&history_dir.join(ACTION_LOG_FILE), &self.action_log)?;

        Ok(())
    }

    /// Push a new action onto the undo stack.
    ///
    /// This clears the redo stack and trims the undo stack if it exceeds
    /// max_undo_levels.
    pub fn push(&mut self, action: UndoAction) {
        self.redo_stack.clear();
        self.action_log.push(action.clone());
        self.undo_stack.push(action);
        self.trim_history();
    }

    /// Undo the last action, restoring the names it changed.
    pub fn undo(&mut self, graph: &mut ProjectGraph) -> Result<UndoAction> {
        let action = self.undo_stack.last().ok_or(SyncError::NothingToUndo)?;
        ensure_unchanged(graph, &action.state_after, &action.checksum_after, &action.label)?;
        graph.restore_names(&action.state_before);

        let action = self.undo_stack.pop().ok_or(SyncError::NothingToUndo)?;
        self.redo_stack.push(action.clone());
        Ok(action)
    }

    /// Redo the last undone action, reapplying the names it set.
    pub fn redo(&mut self, graph: &mut ProjectGraph) -> Result<UndoAction> {
        let action = self.redo_stack.last().ok_or(SyncError::NothingToRedo)?;
        ensure_unchanged(graph, &action.state_before, &action.checksum_before, &action.label)?;
        graph.restore_names(&action.state_after);

        let action = self.redo_stack.pop().ok_or(SyncError::NothingToRedo)?;
        self.undo_stack.push(action.clone());
        Ok(action)
    }

    /// Get the complete action history log.
    pub fn get_history(&self) -> &[UndoAction] {
        &self.action_log
    }

    /// Get the number of actions that can be undone.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of actions that can be redone.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether an action is currently undoable (on the undo stack).
    pub fn is_undoable(&self, action_id: &str) -> bool {
        self.undo_stack.iter().any(|a| a.id == action_id)
    }

    fn trim_history(&mut self) {
        if self.undo_stack.len() > self.max_undo_levels {
            let excess = self.undo_stack.len() - self.max_undo_levels;
            self.undo_stack.drain(..excess);
        }
    }

    /// Get the maximum number of undo levels.
    pub fn max_undo_levels(&self) -> usize {
        self.max_undo_levels
    }

    /// Set the maximum number of undo levels.
    ///
    /// If the new limit is lower than the current stack size, the stack will be trimmed.
    pub fn set_max_undo_levels(&mut self, max_levels: usize) {
        self.max_undo_levels = max_levels;
        self.trim_history();
    }

    /// Get the most recent action that can be undone (if any).
    pub fn peek_undo(&self) -> Option<&UndoAction> {
        self.undo_stack.last()
    }
}

fn read_actions(path: &Path) -> Result<Vec<UndoAction>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path).map_err(|e| SyncError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn write_actions(path: &Path, actions: &[UndoAction]) -> Result<()> {
    let content = serde_json::to_string_pretty(actions)?;
    fs::write(path, content).map_err(|e| SyncError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectHost;
    use tempfile::TempDir;

    fn graph_with_item(name: &str) -> (ProjectGraph, crate::model::ItemId) {
        let mut graph = ProjectGraph::new("Test");
        let id = graph.add_item(name).unwrap();
        (graph, id)
    }

    fn record_rename(
        manager: &mut UndoManager,
        graph: &mut ProjectGraph,
        id: crate::model::ItemId,
        name: &str,
    ) {
        let before = graph.names();
        graph.rename_item(id, name).unwrap();
        let (before, after) = before.changes_to(&graph.names());
        manager.push(UndoAction::new("Rename Project Items", before, after));
    }

    #[test]
    fn test_new_undo_manager() {
        let manager = UndoManager::new(10);
        assert_eq!(manager.max_undo_levels(), 10);
        assert_eq!(manager.undo_count(), 0);
        assert_eq!(manager.redo_count(), 0);
        assert!(manager.peek_undo().is_none());
    }

    #[test]
    fn test_undo_redo_restores_graph() {
        let (mut graph, id) = graph_with_item("Logo.png");
        let mut manager = UndoManager::default();
        record_rename(&mut manager, &mut graph, id, "Logo");

        let undone = manager.undo(&mut graph).unwrap();
        assert_eq!(undone.label, "Rename Project Items");
        assert_eq!(graph.item(id).unwrap().name, "Logo.png");
        assert_eq!(manager.redo_count(), 1);

        manager.redo(&mut graph).unwrap();
        assert_eq!(graph.item(id).unwrap().name, "Logo");
        assert_eq!(manager.undo_count(), 1);
    }

    #[test]
    fn test_undo_refuses_diverged_graph() {
        let (mut graph, id) = graph_with_item("Logo.png");
        let mut manager = UndoManager::default();
        record_rename(&mut manager, &mut graph, id, "Logo");

        graph.rename_item(id, "Edited by hand").unwrap();

        let err = manager.undo(&mut graph).unwrap_err();
        assert_eq!(err.error_code(), "HISTORY_DIVERGED");
        assert_eq!(graph.item(id).unwrap().name, "Edited by hand");
        assert_eq!(manager.undo_count(), 1);
    }

    #[test]
    fn test_undo_ignores_untouched_changes() {
        let (mut graph, id) = graph_with_item("Logo.png");
        let other = graph.add_item("Music.wav").unwrap();
        let mut manager = UndoManager::default();
        record_rename(&mut manager, &mut graph, id, "Logo");

        graph.add_item("Voice.wav").unwrap();
        graph.rename_item(other, "Score.wav").unwrap();

        manager.undo(&mut graph).unwrap();
        assert_eq!(graph.item(id).unwrap().name, "Logo.png");
        assert_eq!(graph.item(other).unwrap().name, "Score.wav");
        assert_eq!(graph.items.len(), 3);
    }

    #[test]
    fn test_undo_refuses_deleted_entity() {
        let (mut graph, id) = graph_with_item("Logo.png");
        let mut manager = UndoManager::default();
        record_rename(&mut manager, &mut graph, id, "Logo");

        graph.items.clear();
        assert!(matches!(
            manager.undo(&mut graph),
            Err(SyncError::HistoryDiverged { .. })
        ));
    }

    #[test]
    fn test_changes_to_keeps_only_renamed() {
        let (mut graph, id) = graph_with_item("a");
        graph.add_item("b").unwrap();
        let before = graph.names();
        graph.rename_item(id, "c").unwrap();
        graph.add_item("d").unwrap();

        let (old, new) = before.changes_to(&graph.names());
        assert_eq!(old.items, vec![(id, "a".to_string())]);
        assert_eq!(new.items, vec![(id, "c".to_string())]);
        assert!(old.layers.is_empty());
    }

    #[test]
    fn test_nothing_to_undo() {
        let (mut graph, _) = graph_with_item("Logo.png");
        let mut manager = UndoManager::default();
        assert!(matches!(
            manager.undo(&mut graph),
            Err(SyncError::NothingToUndo)
        ));
        assert!(matches!(
            manager.redo(&mut graph),
            Err(SyncError::NothingToRedo)
        ));
    }

    #[test]
    fn test_trim_history() {
        let (mut graph, id) = graph_with_item("a");
        let mut manager = UndoManager::new(3);

        for i in 0..5 {
            record_rename(&mut manager, &mut graph, id, &format!("name {}", i));
        }

        assert_eq!(manager.undo_count(), 3);
        assert_eq!(manager.get_history().len(), 5);
        assert!(!manager.is_undoable(&manager.get_history()[0].id));
        assert!(manager.is_undoable(&manager.get_history()[4].id));
    }

    #[test]
    fn test_push_clears_redo_stack() {
        let (mut graph, id) = graph_with_item("a");
        let mut manager = UndoManager::default();
        record_rename(&mut manager, &mut graph, id, "b");
        manager.undo(&mut graph).unwrap();
        assert_eq!(manager.redo_count(), 1);

        record_rename(&mut manager, &mut graph, id, "c");
        assert_eq!(manager.redo_count(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let history_dir = temp_dir.path().join("history");

        let (mut graph, id) = graph_with_item("a");
        let mut manager = UndoManager::new(10);
        record_rename(&mut manager, &mut graph, id, "b");
        manager.save(&history_dir).unwrap();

        let loaded = UndoManager::load(&history_dir).unwrap();
        assert_eq!(loaded.undo_count(), 1);
        assert_eq!(loaded.get_history().len(), 1);
        assert_eq!(
            loaded.peek_undo().unwrap().checksum_after,
            manager.peek_undo().unwrap().checksum_after
        );
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = UndoManager::load(&temp_dir.path().join("history")).unwrap();
        assert_eq!(loaded.undo_count(), 0);
    }
}
