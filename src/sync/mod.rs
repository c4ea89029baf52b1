//! Name synchronization engine
//!
//! Two propagation directions share one pipeline:
//! - Layer → Source: selected layer names become their items' names
//! - Source → Layer: selected item names flow to every referencing layer,
//!   through discovery and user-confirmed scoping
//!
//! Each batch is one undo group and ends in a single summary.

mod discovery;
mod engine;
mod layer_to_source;
mod oplog;
mod report;
mod scope;
mod source_to_layer;

pub use discovery::{discover, DiscoveredComposition, DiscoveredLayer, DiscoveryResult};
pub use engine::{run, Outcome};
pub use layer_to_source::push_layer_names;
pub use oplog::{OperationLog, RenameRecord, SkipReason, SkipRecord};
pub use report::{Direction, Summary};
pub use scope::{ConfirmAll, ExcludeCompositions, FnSelector, ScopeDecision, ScopeSelector};
pub use source_to_layer::{occurrence_name, push_item_names};
