//! Reference Model
//!
//! Read-mostly view of the project graph:
//! - Source items (assets)
//! - Compositions holding ordered layer instances
//! - The ambient selection
//! - The `ProjectHost` trait the sync engine talks to

mod composition;
mod host;
mod ids;
mod item;
mod selection;

pub use composition::{Composition, LayerInstance};
pub use host::ProjectHost;
pub use ids::{CompId, ItemId, LayerRef};
pub use item::SourceItem;
pub use selection::Selection;
