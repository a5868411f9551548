//! Integration tests for scene save/load
//!
//! Covers the tolerant load policy: missing files, corrupt files, and
//! records whose mesh asset has disappeared.

use std::fs;
use std::path::Path;

use void_scene::*;

fn write_mesh(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"solid car\nendsolid car\n").unwrap();
    path
}

#[test]
fn test_save_then_load_preserves_scene() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = write_mesh(dir.path(), "car.stl");
    let scene_file = dir.path().join("entities.json");

    let mut store = SceneStore::default();
    let cube = store.add(ShapeKind::Cube, SpawnParams::new()).unwrap();
    store.add(ShapeKind::Sphere, SpawnParams::new()).unwrap();
    store
        .add(ShapeKind::ImportedMesh, SpawnParams::new().with_source(&mesh))
        .unwrap();

    store
        .get_mut(cube)
        .unwrap()
        .apply_partial(
            &AttributeDelta::new()
                .with(Attribute::Color([255, 0, 0, 255]))
                .with(Attribute::Orientation(Quat::from_xyzw(0.6, 0.0, 0.0, 0.8))),
        )
        .unwrap();

    let saved: Vec<EntitySnapshot> = store.iter().map(SceneEntity::snapshot).collect();
    store.save_all(&scene_file).unwrap();

    let mut reloaded = SceneStore::default();
    let ids = reloaded.load_all(&scene_file);
    assert_eq!(ids.len(), 3);

    let loaded: Vec<EntitySnapshot> = reloaded.iter().map(SceneEntity::snapshot).collect();
    assert_eq!(loaded, saved);
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SceneStore::default();
    store.add(ShapeKind::Cube, SpawnParams::new()).unwrap();

    let ids = store.load_all(&dir.path().join("entities.json"));
    assert!(ids.is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_load_malformed_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let scene_file = dir.path().join("entities.json");
    fs::write(&scene_file, "{ this is not json").unwrap();

    let mut store = SceneStore::default();
    assert!(store.load_all(&scene_file).is_empty());

    fs::write(&scene_file, r#"{"name": "not a list"}"#).unwrap();
    assert!(store.load_all(&scene_file).is_empty());
}

#[test]
fn test_load_skips_entity_with_missing_asset() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = write_mesh(dir.path(), "car.stl");
    let scene_file = dir.path().join("entities.json");

    let contents = serde_json::json!([
        {
            "name": "Cube1",
            "color": [178, 178, 178, 255],
            "position": [0.0, 0.0, 0.0],
            "orientation": [1.0, 0.0, 0.0, 0.0],
            "shape": "Cube",
            "dimensions": [1.0, 1.0, 1.0]
        },
        {
            "name": "STL2",
            "color": [178, 178, 178, 255],
            "position": [3.0, 0.0, 0.0],
            "orientation": [1.0, 0.0, 0.0, 0.0],
            "shape": "STL",
            "dimensions": [1.0, 1.0, 1.0],
            "source": dir.path().join("gone.stl")
        },
        {
            "name": "STL3",
            "color": [178, 178, 178, 255],
            "position": [6.0, 0.0, 0.0],
            "orientation": [1.0, 0.0, 0.0, 0.0],
            "shape": "STL",
            "dimensions": [1.0, 1.0, 1.0],
            "source": mesh
        }
    ]);
    fs::write(&scene_file, contents.to_string()).unwrap();

    let mut store = SceneStore::default();
    let ids = store.load_all(&scene_file);

    assert_eq!(ids.len(), 2);
    assert_eq!(store.len(), 2);
    assert!(store.find_by_name("STL2").is_none());
    assert!(store.find_by_name("STL3").is_some());
}

#[test]
fn test_load_skips_invalid_record_but_keeps_rest() {
    let dir = tempfile::tempdir().unwrap();
    let scene_file = dir.path().join("entities.json");

    let contents = serde_json::json!([
        { "name": "Broken", "shape": "Cube" },
        {
            "name": "Sphere2",
            "color": [0, 255, 0, 255],
            "position": [3.0, 0.0, 0.0],
            "orientation": [1.0, 0.0, 0.0, 0.0],
            "shape": "Sphere",
            "dimensions": [0.5]
        }
    ]);
    fs::write(&scene_file, contents.to_string()).unwrap();

    let mut store = SceneStore::default();
    let ids = store.load_all(&scene_file);
    assert_eq!(ids.len(), 1);

    let sphere = store.get(ids[0]).unwrap();
    assert_eq!(sphere.name(), "Sphere2");
    assert_eq!(sphere.snapshot().dimensions, Dimensions::Sphere { radius: 0.5 });
}

#[test]
fn test_relative_mesh_source_resolved_from_scene_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("stl")).unwrap();
    let mesh = write_mesh(&dir.path().join("stl"), "car.stl");
    let scene_file = dir.path().join("entities.json");

    let contents = serde_json::json!([{
        "name": "STL1",
        "color": [178, 178, 178, 255],
        "position": [0.0, 0.0, 0.0],
        "orientation": [1.0, 0.0, 0.0, 0.0],
        "shape": "STL",
        "dimensions": [100.0, 100.0, 100.0],
        "source": "stl/car.stl"
    }]);
    fs::write(&scene_file, contents.to_string()).unwrap();

    let mut store = SceneStore::default();
    let ids = store.load_all(&scene_file);
    assert_eq!(ids.len(), 1);

    let entity = store.get(ids[0]).unwrap();
    assert!(entity.shape().source().unwrap().is_absolute());
    assert!(entity.shape().source().unwrap().ends_with("stl/car.stl"));
    assert_eq!(entity.shape().source().unwrap().file_name(), mesh.file_name());
}

#[test]
fn test_save_overwrites_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let scene_file = dir.path().join("entities.json");

    let mut store = SceneStore::default();
    store.add(ShapeKind::Cube, SpawnParams::new()).unwrap();
    store.add(ShapeKind::Cube, SpawnParams::new()).unwrap();
    store.save_all(&scene_file).unwrap();

    let first = store.ids()[0];
    store.remove(first);
    store.save_all(&scene_file).unwrap();

    let mut reloaded = SceneStore::default();
    assert_eq!(reloaded.load_all(&scene_file).len(), 1);
}
