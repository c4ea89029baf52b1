//! Project State
//!
//! `ProjectGraph` is the serializable project: source items, compositions
//! and the persisted selection. `Project` ties a graph to its directory on
//! disk and records undo groups into the history.
//!
//! ```text
//! project_dir/
//!   project.json     # ProjectGraph
//!   namesync.json    # optional SyncConfig
//!   history/
//!     undo_stack.json
//!     redo_stack.json
//!     action_log.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::model::{
    CompId, Composition, ItemId, LayerInstance, LayerRef, ProjectHost, Selection, SourceItem,
};
use crate::state::undo::{NameSnapshot, UndoAction, UndoManager};

/// Project directory structure constants.
pub const PROJECT_FILE: &str = "project.json";
pub const HISTORY_DIR: &str = "history";

/// The project graph: every source item and composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectGraph {
    /// Project display name.
    pub name: String,

    /// Next id to hand out; shared by items and compositions.
    #[serde(default)]
    next_id: u32,

    #[serde(default)]
    pub items: Vec<SourceItem>,

    #[serde(default)]
    pub compositions: Vec<Composition>,

    /// Ambient selection read when a sync is triggered.
    #[serde(default)]
    pub selection: Selection,
}

impl ProjectGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: 1,
            ..Default::default()
        }
    }

    fn allocate_id(&mut self) -> Result<u32> {
        let highest = self
            .items
            .iter()
            .map(|item| item.id.0)
            .chain(self.compositions.iter().map(|comp| comp.id.0))
            .max()
            .unwrap_or(0);
        let id = highest
            .checked_add(1)
            .map(|next| self.next_id.max(next))
            .ok_or(SyncError::IdsExhausted)?;
        // Once u32::MAX is taken, `highest` has no successor.
        self.next_id = id.saturating_add(1);
        Ok(id)
    }

    /// Add a source item, returning its id
    pub fn add_item(&mut self, name: impl Into<String>) -> Result<ItemId> {
        let id = ItemId(self.allocate_id()?);
        self.items.push(SourceItem::new(id, name));
        Ok(id)
    }

    /// Add an empty composition, returning its id
    pub fn add_composition(&mut self, name: impl Into<String>) -> Result<CompId> {
        let id = CompId(self.allocate_id()?);
        self.compositions.push(Composition::new(id, name));
        Ok(id)
    }

    /// Append a layer to a composition
    pub fn add_layer(&mut self, comp: CompId, layer: LayerInstance) -> Result<LayerRef> {
        if let Some(source) = layer.source {
            if self.item(source).is_none() {
                return Err(SyncError::UnknownItem {
                    reference: source.to_string(),
                });
            }
        }
        let composition = self
            .composition_mut(comp)
            .ok_or_else(|| SyncError::UnknownComposition {
                reference: comp.to_string(),
            })?;
        let index = composition.push_layer(layer);
        Ok(LayerRef::new(comp, index))
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut SourceItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn composition_mut(&mut self, id: CompId) -> Option<&mut Composition> {
        self.compositions.iter_mut().find(|comp| comp.id == id)
    }

    pub fn layer_mut(&mut self, layer: LayerRef) -> Option<&mut LayerInstance> {
        self.composition_mut(layer.comp)
            .and_then(|comp| comp.layer_mut(layer.index))
    }

    /// Current name of every item and layer, in project order.
    pub fn names(&self) -> NameSnapshot {
        NameSnapshot {
            items: self
                .items
                .iter()
                .map(|item| (item.id, item.name.clone()))
                .collect(),
            layers: self
                .compositions
                .iter()
                .flat_map(|comp| {
                    comp.indexed_layers()
                        .map(move |(index, layer)| (LayerRef::new(comp.id, index), layer.name.clone()))
                })
                .collect(),
        }
    }

    /// Current names of the entities listed in `keys`, or `None` if any of
    /// them no longer exists.
    pub fn names_of(&self, keys: &NameSnapshot) -> Option<NameSnapshot> {
        let items = keys
            .items
            .iter()
            .map(|(id, _)| self.item(*id).map(|item| (*id, item.name.clone())))
            .collect::<Option<Vec<_>>>()?;
        let layers = keys
            .layers
            .iter()
            .map(|(layer, _)| self.layer(*layer).map(|found| (*layer, found.name.clone())))
            .collect::<Option<Vec<_>>>()?;
        Some(NameSnapshot { items, layers })
    }

    /// Write recorded names back, bypassing locks. Missing entities are
    /// ignored.
    pub fn restore_names(&mut self, names: &NameSnapshot) {
        for (id, name) in &names.items {
            if let Some(item) = self.item_mut(*id) {
                item.name = name.clone();
            }
        }
        for (layer, name) in &names.layers {
            if let Some(instance) = self.layer_mut(*layer) {
                instance.name = name.clone();
            }
        }
    }

    /// Resolve a source item from a numeric id or an exact, unique name
    pub fn find_item(&self, reference: &str) -> Result<ItemId> {
        if let Ok(raw) = reference.parse::<u32>() {
            if let Some(item) = self.item(ItemId(raw)) {
                return Ok(item.id);
            }
        }
        let matches: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.name == reference)
            .map(|item| item.id)
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(SyncError::UnknownItem {
                reference: reference.to_string(),
            }),
            _ => Err(SyncError::AmbiguousName {
                name: reference.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Resolve a composition from a numeric id or an exact, unique name
    pub fn find_composition(&self, reference: &str) -> Result<CompId> {
        if let Ok(raw) = reference.parse::<u32>() {
            if let Some(comp) = self.composition(CompId(raw)) {
                return Ok(comp.id);
            }
        }
        let matches: Vec<CompId> = self
            .compositions
            .iter()
            .filter(|comp| comp.name == reference)
            .map(|comp| comp.id)
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(SyncError::UnknownComposition {
                reference: reference.to_string(),
            }),
            _ => Err(SyncError::AmbiguousName {
                name: reference.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Resolve a `COMP:INDEX` layer address
    ///
    /// The composition part may itself contain colons; the index follows the
    /// last one.
    pub fn find_layer(&self, reference: &str) -> Result<LayerRef> {
        let invalid = || SyncError::InvalidLayerRef {
            input: reference.to_string(),
        };
        let (comp, index) = reference.rsplit_once(':').ok_or_else(invalid)?;
        let index: usize = index.trim().parse().map_err(|_| invalid())?;
        let layer = LayerRef::new(self.find_composition(comp)?, index);
        if self.layer(layer).is_none() {
            return Err(SyncError::UnknownLayer {
                reference: reference.to_string(),
            });
        }
        Ok(layer)
    }
}

fn check_rename(name: &str, locked: bool, new_name: &str) -> Result<()> {
    if locked {
        return Err(SyncError::RenameRejected {
            name: name.to_string(),
            reason: "locked".to_string(),
        });
    }
    if new_name.trim().is_empty() {
        return Err(SyncError::RenameRejected {
            name: name.to_string(),
            reason: "empty name".to_string(),
        });
    }
    Ok(())
}

/// A bare graph has no undo facility; renames apply immediately.
impl ProjectHost for ProjectGraph {
    fn compositions(&self) -> Box<dyn Iterator<Item = &Composition> + '_> {
        Box::new(self.compositions.iter())
    }

    fn composition(&self, id: CompId) -> Option<&Composition> {
        self.compositions.iter().find(|comp| comp.id == id)
    }

    fn item(&self, id: ItemId) -> Option<&SourceItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn rename_item(&mut self, id: ItemId, name: &str) -> Result<String> {
        let item = self.item_mut(id).ok_or_else(|| SyncError::UnknownItem {
            reference: id.to_string(),
        })?;
        check_rename(&item.name, item.locked, name)?;
        Ok(std::mem::replace(&mut item.name, name.to_string()))
    }

    fn rename_layer(&mut self, layer: LayerRef, name: &str) -> Result<String> {
        let instance = self.layer_mut(layer).ok_or_else(|| SyncError::UnknownLayer {
            reference: layer.to_string(),
        })?;
        check_rename(&instance.name, instance.locked, name)?;
        Ok(std::mem::replace(&mut instance.name, name.to_string()))
    }
}

/// Undo group being recorded.
#[derive(Debug)]
struct OpenGroup {
    label: String,
    depth: usize,
    before: NameSnapshot,
}

/// A project directory: graph plus undo history.
#[derive(Debug)]
pub struct Project {
    pub graph: ProjectGraph,

    /// Path to the project directory.
    pub project_path: PathBuf,

    history: UndoManager,

    open_group: Option<OpenGroup>,
}

impl Project {
    /// Wrap an in-memory graph; nothing is written until `save`.
    pub fn new(path: &Path, graph: ProjectGraph) -> Self {
        Self {
            graph,
            project_path: path.to_path_buf(),
            history: UndoManager::default(),
            open_group: None,
        }
    }

    /// Create a new, empty project at the given path.
    pub fn create(path: &Path, name: &str) -> Result<Self> {
        if Self::project_file_path(path).exists() {
            return Err(SyncError::ProjectAlreadyExists {
                path: path.to_path_buf(),
            });
        }

        fs::create_dir_all(path).map_err(|e| SyncError::DirectoryCreateError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let project = Self::new(path, ProjectGraph::new(name));
        project.save()?;
        Ok(project)
    }

    /// Load an existing project and its undo history from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let project_file = Self::project_file_path(path);

        if !project_file.exists() {
            return Err(SyncError::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(&project_file).map_err(|e| SyncError::FileReadError {
            path: project_file.clone(),
            source: e,
        })?;
        let graph: ProjectGraph = serde_json::from_str(&content)?;

        let mut project = Self::new(path, graph);
        project.history = UndoManager::load(&project.history_dir())?;
        Ok(project)
    }

    /// Save the graph and undo history to disk.
    pub fn save(&self) -> Result<()> {
        let project_file = Self::project_file_path(&self.project_path);

        let content = serde_json::to_string_pretty(&self.graph)?;
        fs::write(&project_file, content).map_err(|e| SyncError::FileWriteError {
            path: project_file,
            source: e,
        })?;

        self.history.save(&self.history_dir())
    }

    /// Get the path to the project.json file.
    pub fn project_file_path(base: &Path) -> PathBuf {
        base.join(PROJECT_FILE)
    }

    /// Get the path to the history directory.
    pub fn history_dir(&self) -> PathBuf {
        self.project_path.join(HISTORY_DIR)
    }

    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut UndoManager {
        &mut self.history
    }

    /// Undo the most recent batch.
    pub fn undo(&mut self) -> Result<UndoAction> {
        self.history.undo(&mut self.graph)
    }

    /// Redo the most recently undone batch.
    pub fn redo(&mut self) -> Result<UndoAction> {
        self.history.redo(&mut self.graph)
    }
}

impl ProjectHost for Project {
    fn compositions(&self) -> Box<dyn Iterator<Item = &Composition> + '_> {
        self.graph.compositions()
    }

    fn composition(&self, id: CompId) -> Option<&Composition> {
        self.graph.composition(id)
    }

    fn item(&self, id: ItemId) -> Option<&SourceItem> {
        self.graph.item(id)
    }

    fn rename_item(&mut self, id: ItemId, name: &str) -> Result<String> {
        self.graph.rename_item(id, name)
    }

    fn rename_layer(&mut self, layer: LayerRef, name: &str) -> Result<String> {
        self.graph.rename_layer(layer, name)
    }

    fn begin_undo_group(&mut self, label: &str) {
        if let Some(group) = self.open_group.as_mut() {
            group.depth += 1;
            return;
        }
        self.open_group = Some(OpenGroup {
            label: label.to_string(),
            depth: 1,
            before: self.graph.names(),
        });
    }

    fn end_undo_group(&mut self) {
        let Some(group) = self.open_group.as_mut() else {
            warn!("end_undo_group called without an open group");
            return;
        };
        if group.depth > 1 {
            group.depth -= 1;
            return;
        }
        let Some(group) = self.open_group.take() else {
            return;
        };

        // Unchanged batches leave no undo step behind.
        let (before, after) = group.before.changes_to(&self.graph.names());
        if before.is_empty() {
            debug!("Undo group '{}' made no changes", group.label);
            return;
        }
        debug!("Undo group '{}' renamed {} entities", group.label, before.len());
        self.history.push(UndoAction::new(group.label, before, after));
    }
}
