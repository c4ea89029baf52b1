//! Error handling for namesync
//!
//! Per-entity rename failures never surface here; they are folded into the
//! operation log as skips. These errors cover the host and CLI layers.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for namesync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for namesync operations
#[derive(Error, Debug)]
pub enum SyncError {
    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Project Errors
    #[error("Project already exists: {path}")]
    ProjectAlreadyExists { path: PathBuf },

    #[error("Project not found: {path}")]
    ProjectNotFound { path: PathBuf },

    // Graph lookup Errors
    #[error("Unknown source item: {reference}")]
    UnknownItem { reference: String },

    #[error("Unknown composition: {reference}")]
    UnknownComposition { reference: String },

    #[error("Layer {reference} does not exist")]
    UnknownLayer { reference: String },

    #[error("Name '{name}' matches {count} entries; use an id instead")]
    AmbiguousName { name: String, count: usize },

    #[error("Invalid layer reference '{input}': expected COMP:INDEX")]
    InvalidLayerRef { input: String },

    #[error("No ids left to allocate")]
    IdsExhausted,

    // Rename Errors
    #[error("Rename of '{name}' rejected: {reason}")]
    RenameRejected { name: String, reason: String },

    // Undo/Redo Errors
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Project changed since '{label}' was recorded")]
    HistoryDiverged { label: String },

    // Serialization Errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::FileReadError { .. } => "FILE_READ_ERROR",
            SyncError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            SyncError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            SyncError::ProjectAlreadyExists { .. } => "PROJECT_ALREADY_EXISTS",
            SyncError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            SyncError::UnknownItem { .. } => "UNKNOWN_ITEM",
            SyncError::UnknownComposition { .. } => "UNKNOWN_COMPOSITION",
            SyncError::UnknownLayer { .. } => "UNKNOWN_LAYER",
            SyncError::AmbiguousName { .. } => "AMBIGUOUS_NAME",
            SyncError::InvalidLayerRef { .. } => "INVALID_LAYER_REF",
            SyncError::IdsExhausted => "IDS_EXHAUSTED",
            SyncError::RenameRejected { .. } => "RENAME_REJECTED",
            SyncError::NothingToUndo => "NOTHING_TO_UNDO",
            SyncError::NothingToRedo => "NOTHING_TO_REDO",
            SyncError::HistoryDiverged { .. } => "HISTORY_DIVERGED",
            SyncError::Json(_) => "JSON_ERROR",
            SyncError::Io(_) => "IO_ERROR",
        }
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            SyncError::ProjectNotFound { .. } => {
                Some("Create the project first with 'namesync init <path>'.")
            }
            SyncError::AmbiguousName { .. } => {
                Some("Run 'namesync print-state <path>' to look up the id.")
            }
            SyncError::InvalidLayerRef { .. } => {
                Some("Layers are addressed as COMP:INDEX, e.g. 'Main:2' or '4:1'.")
            }
            SyncError::RenameRejected { .. } => Some("Unlock the entity and run the sync again."),
            SyncError::NothingToUndo => Some("There are no actions to undo."),
            SyncError::NothingToRedo => Some("There are no undone actions to redo."),
            SyncError::HistoryDiverged { .. } => {
                Some("The project file was edited by hand; undo history no longer applies.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SyncError::UnknownItem {
            reference: "Logo.png".to_string(),
        };
        assert_eq!(err.error_code(), "UNKNOWN_ITEM");
        assert_eq!(err.to_string(), "Unknown source item: Logo.png");
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = SyncError::RenameRejected {
            name: "BG".to_string(),
            reason: "locked".to_string(),
        };
        assert!(err.recovery_suggestion().is_some());
        assert!(SyncError::Io(std::io::Error::other("x"))
            .recovery_suggestion()
            .is_none());
    }
}
