//! Integration tests for the editor façade
//!
//! Open, edit, save and reopen a scene file on disk.

use std::path::Path;

use void_scene::*;
use void_scene_editor::*;

fn preferences(dir: &Path) -> EditorPreferences {
    EditorPreferences {
        scene_file: dir.join("entities.json"),
        ..Default::default()
    }
}

#[test]
fn test_open_missing_scene_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let state = EditorState::open(preferences(dir.path()), NullFields);

    assert!(state.scene.is_empty());
    assert!(!state.is_modified());
    assert_eq!(state.status_message, "Loaded 0 entities");
}

#[test]
fn test_edits_survive_shutdown_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = preferences(dir.path());

    let mut state = EditorState::open(prefs.clone(), NullFields);
    let id = state.add_shape(ShapeKind::Cube, SpawnParams::new()).unwrap();
    state.select(Some(id)).unwrap();
    state.commit(Attribute::Name("Crate".into())).unwrap();
    state.commit(Attribute::Color([0, 128, 255, 255])).unwrap();
    state.drag_by(Vec3::new(0.0, 2.0, 0.0)).unwrap();
    assert!(state.is_modified());

    state.shutdown().unwrap();
    assert!(!state.is_modified());

    let reopened = EditorState::open(prefs, NullFields);
    assert_eq!(reopened.scene.len(), 1);
    let crate_id = reopened.scene.find_by_name("Crate").unwrap();
    let entity = reopened.scene.get(crate_id).unwrap();
    assert_eq!(entity.color(), [0, 128, 255, 255]);
    assert_eq!(entity.position(), Vec3::new(0.0, 2.0, 0.0));
    assert!(reopened.session().history().is_empty());
}

#[test]
fn test_shutdown_respects_save_on_exit() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = EditorPreferences {
        save_on_exit: false,
        ..preferences(dir.path())
    };

    let mut state = EditorState::open(prefs.clone(), NullFields);
    state.add_shape(ShapeKind::Sphere, SpawnParams::new()).unwrap();
    state.shutdown().unwrap();

    assert!(!prefs.scene_file.exists());
}

#[test]
fn test_undo_back_to_save_point_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = EditorState::open(preferences(dir.path()), NullFields);
    let id = state.add_shape(ShapeKind::Cube, SpawnParams::new()).unwrap();
    state.select(Some(id)).unwrap();
    state.save().unwrap();
    assert!(!state.is_modified());

    state.commit(Attribute::Position(Vec3::new(1.0, 1.0, 1.0))).unwrap();
    assert!(state.is_modified());

    assert!(state.undo());
    assert!(!state.is_modified());
}

#[test]
fn test_reopen_skips_missing_mesh() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = preferences(dir.path());
    let mesh = dir.path().join("car.stl");
    std::fs::write(&mesh, b"solid car\nendsolid car\n").unwrap();

    let mut state = EditorState::open(prefs.clone(), NullFields);
    state.add_shape(ShapeKind::Cube, SpawnParams::new()).unwrap();
    state
        .add_shape(ShapeKind::ImportedMesh, SpawnParams::new().with_source(&mesh))
        .unwrap();
    state.add_shape(ShapeKind::Sphere, SpawnParams::new()).unwrap();
    state.save().unwrap();

    std::fs::remove_file(&mesh).unwrap();

    let reopened = EditorState::open(prefs, NullFields);
    assert_eq!(reopened.scene.len(), 2);
    assert!(reopened.scene.find_by_name("STL2").is_none());
}

#[test]
fn test_ids_not_reused_across_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = EditorState::open(preferences(dir.path()), NullFields);
    let first = state.add_shape(ShapeKind::Cube, SpawnParams::new()).unwrap();
    state.save().unwrap();

    state.reload();
    let reloaded = state.scene.ids();
    assert_eq!(reloaded.len(), 1);
    assert!(reloaded[0] > first);
}

#[test]
fn test_deleted_entity_history_is_inert() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = EditorState::open(preferences(dir.path()), NullFields);
    let id = state.add_shape(ShapeKind::Cube, SpawnParams::new()).unwrap();
    state.select(Some(id)).unwrap();
    state.commit(Attribute::Name("Doomed".into())).unwrap();

    assert!(state.delete_selected().is_some());
    assert!(state.undo());
    assert_eq!(state.status_message, "Undo: Rename");
    assert_eq!(state.session().history().cursor(), None);
    assert!(state.scene.is_empty());
}

#[test]
fn test_shell_session_against_disk() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = preferences(dir.path());
    let mut state = EditorState::open(prefs.clone(), FieldBuffer::default());

    for line in ["add cube", "select Cube1", "set color 255 0 0", "set name Red", "save"] {
        assert!(matches!(Shell::run_line(&mut state, line), ShellReply::Output(_)));
    }

    let reopened = EditorState::open(prefs, NullFields);
    let id = reopened.scene.find_by_name("Red").unwrap();
    assert_eq!(reopened.scene.get(id).unwrap().color(), [255, 0, 0, 255]);
}
