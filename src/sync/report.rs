//! Batch reporting
//!
//! Turns an operation log into the single message shown at the end of an
//! invocation.

use std::fmt;

use serde::Serialize;

use super::oplog::{OperationLog, SKIP_CATEGORIES};

/// Which way names were propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Layer names pushed onto source items
    LayerToSource,
    /// Source item names pushed onto layers
    SourceToLayer,
}

impl Direction {
    /// What the successes count, as shown to the user
    pub fn target_noun(&self) -> &'static str {
        match self {
            Direction::LayerToSource => "project items",
            Direction::SourceToLayer => "layer items",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::LayerToSource => write!(f, "layer -> source"),
            Direction::SourceToLayer => write!(f, "source -> layer"),
        }
    }
}

/// Outcome summary of one propagation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub direction: Direction,
    pub success_count: usize,
    pub skip_count: usize,
    #[serde(flatten)]
    pub log: OperationLog,
}

impl Summary {
    pub fn new(direction: Direction, log: OperationLog) -> Self {
        Self {
            direction,
            success_count: log.success_count(),
            skip_count: log.skip_count(),
            log,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Successfully updated {} {}",
            self.success_count,
            self.direction.target_noun()
        )?;
        for record in &self.log.successes {
            match (&record.composition, record.layer_index) {
                (Some(comp), Some(index)) => {
                    writeln!(f, "  Comp: {} | Layer {}: {}", comp, index, record.new_name)?
                }
                _ => writeln!(f, "  {} --> {}", record.old_name, record.new_name)?,
            }
        }

        for &category in SKIP_CATEGORIES {
            let mut skips = self.log.skipped_in(category).peekable();
            if skips.peek().is_none() {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "Skipped ({}):", category)?;
            for skip in skips {
                match skip.reason.detail() {
                    Some(detail) => writeln!(f, "  x {} ({})", skip.name, detail)?,
                    None => writeln!(f, "  x {}", skip.name)?,
                }
            }
        }
        Ok(())
    }
}
