//! Scope selection
//!
//! Before any layer is renamed the user confirms which discovered
//! compositions to touch. Selectors are synchronous: `select` returns only
//! once a final decision exists.

use log::info;

use super::discovery::{DiscoveredComposition, DiscoveryResult};
use crate::model::CompId;

/// Outcome of presenting discovered compositions to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeDecision {
    /// Rename layers in these compositions only
    Confirmed(DiscoveryResult),
    /// Perform no renames
    Aborted,
}

impl ScopeDecision {
    /// Collapse an empty confirmation into an abort.
    pub fn normalize(self) -> Self {
        match self {
            ScopeDecision::Confirmed(scope) if scope.is_empty() => ScopeDecision::Aborted,
            other => other,
        }
    }
}

/// Chooses which discovered compositions a Source → Layer push may touch.
///
/// Every composition starts out selected; implementations may deselect any
/// of them or abort.
pub trait ScopeSelector {
    fn select(&mut self, discovered: DiscoveryResult) -> ScopeDecision;
}

/// Confirms every discovered composition.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmAll;

impl ScopeSelector for ConfirmAll {
    fn select(&mut self, discovered: DiscoveryResult) -> ScopeDecision {
        ScopeDecision::Confirmed(discovered)
    }
}

/// Deselects compositions by exact name or numeric id.
#[derive(Debug, Clone, Default)]
pub struct ExcludeCompositions {
    excluded: Vec<String>,
}

impl ExcludeCompositions {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    fn is_excluded(&self, comp: &DiscoveredComposition) -> bool {
        let id = comp.id.to_string();
        self.excluded
            .iter()
            .any(|entry| *entry == comp.name || *entry == id)
    }
}

impl ScopeSelector for ExcludeCompositions {
    fn select(&mut self, discovered: DiscoveryResult) -> ScopeDecision {
        let kept = discovered.retain_compositions(|comp| {
            let excluded = self.is_excluded(comp);
            if excluded {
                info!("Excluding composition '{}'", comp.name);
            }
            !excluded
        });
        ScopeDecision::Confirmed(kept).normalize()
    }
}

/// Adapts a callback into a selector.
///
/// The callback receives the discovered compositions and returns the ids to
/// keep, or `None` to abort.
pub struct FnSelector<F>(pub F);

impl<F> ScopeSelector for FnSelector<F>
where
    F: FnMut(&DiscoveryResult) -> Option<Vec<CompId>>,
{
    fn select(&mut self, discovered: DiscoveryResult) -> ScopeDecision {
        match (self.0)(&discovered) {
            Some(keep) => {
                ScopeDecision::Confirmed(discovered.retain_compositions(|c| keep.contains(&c.id)))
                    .normalize()
            }
            None => ScopeDecision::Aborted,
        }
    }
}
