//! Operation log for one sync invocation.

use std::fmt;

use serde::Serialize;

pub const NO_SOURCE: &str = "no source";
pub const MISSING_SOURCE: &str = "missing source item";
pub const MISSING_LAYER: &str = "missing layer";
pub const CONFLICT: &str = "conflicting names";
pub const RENAME_REJECTED: &str = "rename rejected";

/// Skip categories in display order.
pub const SKIP_CATEGORIES: &[&str] = &[
    NO_SOURCE,
    MISSING_SOURCE,
    MISSING_LAYER,
    CONFLICT,
    RENAME_REJECTED,
];

/// Why an entity was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The layer has no source item (text, shape, camera...)
    NoSource,
    /// The layer points at a source item that no longer exists
    MissingSource,
    /// The selected layer address no longer resolves
    MissingLayer,
    /// An earlier layer in the batch already named the same item
    Conflict { kept: String },
    /// The host refused the rename
    RenameRejected { reason: String },
}

impl SkipReason {
    /// Heading used when grouping skips in a summary
    pub fn category(&self) -> &'static str {
        match self {
            SkipReason::NoSource => NO_SOURCE,
            SkipReason::MissingSource => MISSING_SOURCE,
            SkipReason::MissingLayer => MISSING_LAYER,
            SkipReason::Conflict { .. } => CONFLICT,
            SkipReason::RenameRejected { .. } => RENAME_REJECTED,
        }
    }

    /// Extra per-entity detail, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            SkipReason::Conflict { kept } => Some(format!("kept '{}'", kept)),
            SkipReason::RenameRejected { reason } => Some(reason.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{}: {}", self.category(), detail),
            None => write!(f, "{}", self.category()),
        }
    }
}

/// A completed rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    pub old_name: String,
    pub new_name: String,
    /// Owning composition name (layer renames only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,
    /// 1-based layer index (layer renames only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_index: Option<usize>,
}

impl RenameRecord {
    pub fn item(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            composition: None,
            layer_index: None,
        }
    }

    pub fn layer(
        composition: impl Into<String>,
        layer_index: usize,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            composition: Some(composition.into()),
            layer_index: Some(layer_index),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.old_name == self.new_name
    }
}

/// An entity left untouched, named as the user sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipRecord {
    pub name: String,
    pub reason: SkipReason,
}

/// Ordered successes and skips of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationLog {
    pub successes: Vec<RenameRecord>,
    pub skipped: Vec<SkipRecord>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, record: RenameRecord) {
        self.successes.push(record);
    }

    pub fn skip(&mut self, name: impl Into<String>, reason: SkipReason) {
        self.skipped.push(SkipRecord {
            name: name.into(),
            reason,
        });
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }

    /// Whether any rename actually changed a name
    pub fn changed_anything(&self) -> bool {
        self.successes.iter().any(|record| !record.is_noop())
    }

    /// Names skipped for a given category, in log order
    pub fn skipped_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a SkipRecord> {
        self.skipped
            .iter()
            .filter(move |skip| skip.reason.category() == category)
    }
}
