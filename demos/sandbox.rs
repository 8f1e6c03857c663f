//! Loads the fixture map, shoves the stack, steps the world for a few
//! seconds and prints where everything ended up. Stands in for a real
//! render loop, which is the job of whatever implements `RenderBackend`.

use std::path::Path;

use cgmath::Vector3;
use tumble_ngin::resources::{mesh::Model, texture::Texture};
use tumble_ngin::{AssetCache, Map, Scene};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let map = Map::load(Path::new("tests/fixtures/playground.json"))?;
    let mut models = AssetCache::<Model>::new("tests/fixtures");
    let mut textures =
        AssetCache::<Texture>::with_placeholder("tests/fixtures", "placeholder.png");
    let mut scene = Scene::from_map(&map, &mut models, &mut textures);

    // A push from roughly where a camera would sit, looking down -Z.
    if let Some(index) = scene.push_at(Vector3::new(0.0, 6.0, 10.0), Vector3::new(0.0, 0.0, -1.0)) {
        println!("pushed \"{}\"", scene.objects()[index].name());
    }

    // Three seconds at 60 fps.
    for _ in 0..180 {
        scene.update(1.0 / 60.0);
    }

    for object in scene.objects() {
        let position = object.position();
        println!(
            "{:<12} at ({:7.2}, {:7.2}, {:7.2})",
            object.name(),
            position.x,
            position.y,
            position.z
        );
    }
    Ok(())
}
