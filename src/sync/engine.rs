//! Invocation entry point
//!
//! One call to `run` is one user-triggered sync: the selection picks the
//! direction, the matching propagator runs inside a single undo group, and
//! exactly one outcome comes back. Nothing here returns an error; every
//! per-entity failure is already a skip in the summary.

use std::fmt;

use log::info;
use serde::Serialize;

use super::discovery::discover;
use super::layer_to_source::push_layer_names;
use super::report::{Direction, Summary};
use super::scope::{ScopeDecision, ScopeSelector};
use super::source_to_layer::push_item_names;
use crate::config::SyncConfig;
use crate::model::{ProjectHost, Selection};

const NO_SELECTION_MESSAGE: &str =
    "Please select one or more layers in a composition or one or more source items.";
const NOTHING_FOUND_MESSAGE: &str =
    "No layers linked to the selected source items were found in any composition.";
const ABORTED_MESSAGE: &str = "Sync cancelled; no layers were renamed.";

/// Terminal result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Neither layers nor items were selected
    NoSelection,
    /// No composition references the selected items
    NothingFound,
    /// The user cancelled or deselected every composition
    Aborted,
    /// A propagation batch ran
    Completed(Summary),
}

impl Outcome {
    /// Whether any name in the project changed
    pub fn changed(&self) -> bool {
        match self {
            Outcome::Completed(summary) => summary.log.changed_anything(),
            _ => false,
        }
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Outcome::Completed(summary) => Some(summary),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoSelection => writeln!(f, "{}", NO_SELECTION_MESSAGE),
            Outcome::NothingFound => writeln!(f, "{}", NOTHING_FOUND_MESSAGE),
            Outcome::Aborted => writeln!(f, "{}", ABORTED_MESSAGE),
            Outcome::Completed(summary) => write!(f, "{}", summary),
        }
    }
}

/// Run one sync invocation against `host`.
///
/// Selected layers win over selected items. The selector is consulted only
/// for Source → Layer pushes.
pub fn run<H, S>(
    host: &mut H,
    selection: &Selection,
    selector: &mut S,
    config: &SyncConfig,
) -> Outcome
where
    H: ProjectHost + ?Sized,
    S: ScopeSelector + ?Sized,
{
    match selection.direction() {
        None => {
            info!("Nothing selected");
            Outcome::NoSelection
        }
        Some(Direction::LayerToSource) => {
            let log = push_layer_names(host, &selection.layers, config.conflict_policy);
            Outcome::Completed(Summary::new(Direction::LayerToSource, log))
        }
        Some(Direction::SourceToLayer) => {
            let Some(discovered) = discover(&*host, &selection.items) else {
                return Outcome::NothingFound;
            };
            match selector.select(discovered).normalize() {
                ScopeDecision::Aborted => {
                    info!("Scope selection aborted");
                    Outcome::Aborted
                }
                ScopeDecision::Confirmed(scope) => {
                    let log = push_item_names(host, &scope, &config.suffix_separator);
                    Outcome::Completed(Summary::new(Direction::SourceToLayer, log))
                }
            }
        }
    }
}
