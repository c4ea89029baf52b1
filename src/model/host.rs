//! Host trait definition
//!
//! The sync engine never owns the project graph. It reads and renames
//! entities through a host, which also decides whether a rename is allowed
//! and how a batch of renames is recorded for undo.

use super::composition::{Composition, LayerInstance};
use super::ids::{CompId, ItemId, LayerRef};
use super::item::SourceItem;
use crate::error::Result;

/// Access to a project graph of source items and compositions.
pub trait ProjectHost {
    /// Iterate every composition in project order
    fn compositions(&self) -> Box<dyn Iterator<Item = &Composition> + '_>;

    /// Look up a composition by id
    fn composition(&self, id: CompId) -> Option<&Composition>;

    /// Look up a source item by id
    fn item(&self, id: ItemId) -> Option<&SourceItem>;

    /// Look up a layer instance by its address
    fn layer(&self, layer: LayerRef) -> Option<&LayerInstance> {
        self.composition(layer.comp)
            .and_then(|comp| comp.layer(layer.index))
    }

    /// Rename a source item
    ///
    /// Returns the previous name. The host may reject the rename, in which
    /// case nothing changes.
    fn rename_item(&mut self, id: ItemId, name: &str) -> Result<String>;

    /// Rename a layer instance
    ///
    /// Returns the previous name. The host may reject the rename, in which
    /// case nothing changes.
    fn rename_layer(&mut self, layer: LayerRef, name: &str) -> Result<String>;

    /// Open an undo group
    ///
    /// Every rename until the matching `end_undo_group` is recorded as a
    /// single undoable step. Hosts without an undo facility keep the default.
    fn begin_undo_group(&mut self, _label: &str) {}

    /// Close the undo group opened by `begin_undo_group`
    fn end_undo_group(&mut self) {}
}
