use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tumble_ngin::resources::{mesh::Model, texture::Texture};
use tumble_ngin::{Asset, AssetCache};

thread_local! {
    static LOAD_COUNT: Cell<usize> = const { Cell::new(0) };
}

/// Minimal asset that counts how often its load routine runs.
struct TextAsset {
    contents: String,
}

impl Asset for TextAsset {
    fn load(path: &Path) -> anyhow::Result<Self> {
        LOAD_COUNT.with(|count| count.set(count.get() + 1));
        Ok(Self {
            contents: std::fs::read_to_string(path)?,
        })
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tumble-ngin-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn repeated_open_returns_the_same_handle_and_loads_once() {
    let root = scratch_dir("dedup");
    std::fs::write(root.join("a.txt"), "alpha").unwrap();

    let mut cache = AssetCache::<TextAsset>::new(&root);
    let loads_before = LOAD_COUNT.with(Cell::get);

    let first = cache.open("a.txt");
    let second = cache.open("a.txt");

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(first.contents, "alpha");
    assert_eq!(LOAD_COUNT.with(Cell::get) - loads_before, 1);
}

#[test]
fn missing_file_substitutes_placeholder_without_caching_the_name() {
    let root = scratch_dir("placeholder");
    std::fs::write(root.join("fallback.txt"), "fallback").unwrap();

    let mut cache = AssetCache::<TextAsset>::with_placeholder(&root, "fallback.txt");

    let substituted = cache.open("missing.txt");
    assert_eq!(substituted.contents, "fallback");
    assert!(Rc::ptr_eq(&substituted, &cache.open("")));
    // The failed name must not be cached: once the file appears, a retry
    // loads the real thing.
    assert!(!cache.contains("missing.txt"));

    std::fs::write(root.join("missing.txt"), "present now").unwrap();
    let retried = cache.open("missing.txt");
    assert_eq!(retried.contents, "present now");
    assert!(cache.contains("missing.txt"));
}

#[test]
fn empty_name_returns_the_placeholder() {
    let root = scratch_dir("empty-name");
    std::fs::write(root.join("fallback.txt"), "fallback").unwrap();

    let mut cache = AssetCache::<TextAsset>::with_placeholder(&root, "fallback.txt");
    assert!(cache.has_placeholder());
    assert_eq!(cache.open("").contents, "fallback");
}

#[test]
#[should_panic]
fn missing_file_without_placeholder_is_fatal() {
    let root = scratch_dir("fatal");
    let mut cache = AssetCache::<TextAsset>::new(&root);
    let _ = cache.open("nothing-here.txt");
}

#[test]
#[should_panic]
fn missing_placeholder_is_always_fatal() {
    let root = scratch_dir("fatal-placeholder");
    let _ = AssetCache::<TextAsset>::with_placeholder(&root, "nothing-here.txt");
}

#[test]
fn cube_model_fixture_loads_with_expected_vertex_count() {
    let mut cache = AssetCache::<Model>::new("tests/fixtures");
    let model = cache.open("cube.obj");
    // 12 triangles, single shared index buffer.
    assert_eq!(model.vertex_count(), 36);
    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.meshes[0].positions.len(), model.meshes[0].normals.len());
}

#[test]
fn placeholder_texture_fixture_decodes_to_rgba() {
    let mut cache = AssetCache::<Texture>::new("tests/fixtures");
    let texture = cache.open("placeholder.png");
    assert_eq!(texture.width, 1);
    assert_eq!(texture.height, 1);
    assert_eq!(texture.pixels.len(), 4);
}
