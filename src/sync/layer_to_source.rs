//! Layer → Source propagation
//!
//! Copies each selected layer's name onto the source item it references.
//! Layers themselves are never renamed.

use std::collections::HashMap;

use log::{debug, info, warn};

use super::oplog::{OperationLog, RenameRecord, SkipReason};
use crate::config::ConflictPolicy;
use crate::model::{ItemId, LayerRef, ProjectHost};

/// Undo group label for a Layer → Source batch.
pub const UNDO_LABEL: &str = "Rename Project Items";

/// Push layer names onto their source items, in selection order.
///
/// The batch runs inside one undo group. Layers without a source, dangling
/// references and host-rejected renames are logged as skips and the batch
/// carries on.
pub fn push_layer_names<H>(host: &mut H, layers: &[LayerRef], policy: ConflictPolicy) -> OperationLog
where
    H: ProjectHost + ?Sized,
{
    let mut log = OperationLog::new();
    // Name each item received first in this batch
    let mut claimed: HashMap<ItemId, String> = HashMap::new();

    info!("Pushing {} layer name(s) to source items", layers.len());
    host.begin_undo_group(UNDO_LABEL);

    for &layer_ref in layers {
        let Some(layer) = host.layer(layer_ref) else {
            warn!("Selected layer {} no longer exists", layer_ref);
            log.skip(layer_ref.to_string(), SkipReason::MissingLayer);
            continue;
        };
        let layer_name = layer.name.clone();

        let Some(source) = layer.source else {
            log.skip(layer_name, SkipReason::NoSource);
            continue;
        };
        if host.item(source).is_none() {
            warn!("Layer '{}' references missing item {}", layer_name, source);
            log.skip(layer_name, SkipReason::MissingSource);
            continue;
        }

        if policy == ConflictPolicy::FirstWins {
            if let Some(kept) = claimed.get(&source) {
                if *kept != layer_name {
                    debug!("Item {} already named '{}' in this batch", source, kept);
                    log.skip(layer_name, SkipReason::Conflict { kept: kept.clone() });
                    continue;
                }
            }
        }

        match host.rename_item(source, &layer_name) {
            Ok(old_name) => {
                debug!("Item {}: '{}' -> '{}'", source, old_name, layer_name);
                claimed.entry(source).or_insert_with(|| layer_name.clone());
                log.success(RenameRecord::item(old_name, layer_name));
            }
            Err(e) => {
                warn!("{}", e);
                log.skip(
                    layer_name,
                    SkipReason::RenameRejected {
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    host.end_undo_group();
    log
}
