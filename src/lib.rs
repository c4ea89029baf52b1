//! Namesync - Source Item and Layer Name Synchronization
//!
//! Keeps two naming domains in step: source items (assets in the project
//! panel) and the layer instances that reference them inside compositions.
//!
//! # Architecture
//!
//! - `model`: ids, items, compositions, layers and the `ProjectHost` trait
//! - `state`: the on-disk project graph and its undo history
//! - `sync`: discovery, scope selection, both propagation directions and
//!   reporting
//! - `cli`: the command-line host
//!
//! ```
//! use namesync::model::{LayerInstance, Selection};
//! use namesync::state::ProjectGraph;
//! use namesync::sync::{run, ConfirmAll};
//! use namesync::SyncConfig;
//!
//! let mut graph = ProjectGraph::new("Promo");
//! let logo = graph.add_item("Logo.png").unwrap();
//! let main = graph.add_composition("Main").unwrap();
//! graph.add_layer(main, LayerInstance::sourced("x", logo)).unwrap();
//! graph.add_layer(main, LayerInstance::sourced("y", logo)).unwrap();
//!
//! let outcome = run(
//!     &mut graph,
//!     &Selection::items(vec![logo]),
//!     &mut ConfirmAll,
//!     &SyncConfig::default(),
//! );
//! assert_eq!(outcome.summary().unwrap().success_count, 2);
//! assert_eq!(graph.compositions[0].layers[1].name, "Logo.png 2");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod state;
pub mod sync;

pub use config::{ConflictPolicy, SyncConfig};
pub use error::{Result, SyncError};
