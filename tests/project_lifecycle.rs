//! Project Lifecycle Tests
//!
//! On-disk projects driven through the CLI command functions: build a
//! graph, sync, and walk the undo history.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use namesync::cli::{commands, SelectionArgs};
use namesync::model::{LayerRef, ProjectHost};
use namesync::state::Project;
use namesync::sync::Outcome;
use namesync::SyncError;

fn build_project(dir: &Path) {
    commands::init(dir, Some("Promo")).unwrap();
    commands::add_item(dir, "Logo.png").unwrap();
    commands::add_comp(dir, "Main").unwrap();
    commands::add_comp(dir, "Endcard").unwrap();
    commands::add_layer(dir, "Main", "logo a", Some("Logo.png")).unwrap();
    commands::add_layer(dir, "Main", "Title", None).unwrap();
    commands::add_layer(dir, "Main", "logo b", Some("Logo.png")).unwrap();
    commands::add_layer(dir, "Endcard", "logo c", Some("1")).unwrap();
}

fn items(names: &[&str]) -> SelectionArgs {
    SelectionArgs {
        layers: Vec::new(),
        items: names.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_sync_persists_and_undoes_as_one_step() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("promo");
    build_project(&dir);

    let outcome = commands::sync(
        &dir,
        &items(&["Logo.png"]),
        &["Endcard".to_string()],
        false,
        None,
        false,
    )
    .unwrap();
    assert!(outcome.changed());

    let project = Project::load(&dir).unwrap();
    let main = project.graph.find_composition("Main").unwrap();
    let endcard = project.graph.find_composition("Endcard").unwrap();
    assert_eq!(project.layer(LayerRef::new(main, 1)).unwrap().name, "Logo.png");
    assert_eq!(project.layer(LayerRef::new(main, 2)).unwrap().name, "Title");
    assert_eq!(project.layer(LayerRef::new(main, 3)).unwrap().name, "Logo.png 2");
    assert_eq!(project.layer(LayerRef::new(endcard, 1)).unwrap().name, "logo c");
    assert_eq!(project.history().undo_count(), 1);

    commands::undo(&dir).unwrap();
    let project = Project::load(&dir).unwrap();
    assert_eq!(project.layer(LayerRef::new(main, 1)).unwrap().name, "logo a");
    assert_eq!(project.layer(LayerRef::new(main, 3)).unwrap().name, "logo b");

    commands::redo(&dir).unwrap();
    let project = Project::load(&dir).unwrap();
    assert_eq!(project.layer(LayerRef::new(main, 3)).unwrap().name, "Logo.png 2");
}

#[test]
fn test_persisted_selection_drives_sync() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("promo");
    build_project(&dir);

    let layers = SelectionArgs {
        layers: vec!["Main:3".to_string()],
        items: Vec::new(),
    };
    commands::select(&dir, &layers).unwrap();

    let outcome =
        commands::sync(&dir, &SelectionArgs::default(), &[], false, None, true).unwrap();
    assert_eq!(outcome.summary().unwrap().success_count, 1);

    let project = Project::load(&dir).unwrap();
    let logo = project.graph.find_item("logo b").unwrap();
    assert_eq!(project.item(logo).unwrap().name, "logo b");
}

#[test]
fn test_no_selection_saves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("promo");
    build_project(&dir);
    let before = fs::read_to_string(dir.join("project.json")).unwrap();

    let outcome =
        commands::sync(&dir, &SelectionArgs::default(), &[], false, None, false).unwrap();
    assert_eq!(outcome, Outcome::NoSelection);
    assert_eq!(fs::read_to_string(dir.join("project.json")).unwrap(), before);
    assert!(matches!(commands::undo(&dir), Err(SyncError::NothingToUndo)));
}

#[test]
fn test_config_file_sets_separator() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("promo");
    build_project(&dir);
    fs::write(dir.join("namesync.json"), r#"{ "suffix_separator": " #" }"#).unwrap();

    commands::sync(&dir, &items(&["1"]), &[], false, None, false).unwrap();

    let project = Project::load(&dir).unwrap();
    let main = project.graph.find_composition("Main").unwrap();
    assert_eq!(project.layer(LayerRef::new(main, 3)).unwrap().name, "Logo.png #2");
}

#[test]
fn test_select_and_add_keep_undo_available() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("promo");
    build_project(&dir);
    commands::sync(&dir, &items(&["Logo.png"]), &[], false, None, false).unwrap();

    let layer = SelectionArgs {
        layers: vec!["Main:1".to_string()],
        items: Vec::new(),
    };
    commands::select(&dir, &layer).unwrap();
    commands::add_item(&dir, "Music.wav").unwrap();
    commands::undo(&dir).unwrap();

    let project = Project::load(&dir).unwrap();
    let main = project.graph.find_composition("Main").unwrap();
    assert_eq!(project.layer(LayerRef::new(main, 1)).unwrap().name, "logo a");
    assert_eq!(project.graph.selection.layers, vec![LayerRef::new(main, 1)]);
    assert!(project.graph.find_item("Music.wav").is_ok());
}

#[test]
fn test_hand_edit_blocks_undo() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("promo");
    build_project(&dir);
    commands::sync(&dir, &items(&["Logo.png"]), &[], false, None, false).unwrap();

    let project_file = dir.join("project.json");
    let content = fs::read_to_string(&project_file).unwrap();
    assert!(content.contains("\"Logo.png 2\""));
    fs::write(&project_file, content.replace("\"Logo.png 2\"", "\"Edited\"")).unwrap();

    assert!(matches!(
        commands::undo(&dir),
        Err(SyncError::HistoryDiverged { .. })
    ));
    let project = Project::load(&dir).unwrap();
    let main = project.graph.find_composition("Main").unwrap();
    assert_eq!(project.layer(LayerRef::new(main, 3)).unwrap().name, "Edited");
}

#[test]
fn test_unknown_references_are_errors() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("promo");
    build_project(&dir);

    assert!(matches!(
        commands::add_layer(&dir, "Nope", "x", None),
        Err(SyncError::UnknownComposition { .. })
    ));
    let bad_layer = SelectionArgs {
        layers: vec!["Main:9".to_string()],
        items: Vec::new(),
    };
    assert!(matches!(
        commands::sync(&dir, &bad_layer, &[], false, None, false),
        Err(SyncError::UnknownLayer { .. })
    ));
    assert!(matches!(
        commands::init(&dir, None),
        Err(SyncError::ProjectAlreadyExists { .. })
    ));
}
