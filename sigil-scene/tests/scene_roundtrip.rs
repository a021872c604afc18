use sigil_scene::scene::{load_scene, save_scene};
use sigil_scene::{Color, DrawableObject, Scene};

#[test]
fn scene_roundtrip() {
    let mut scene = Scene::certificate_template();

    scene.add(DrawableObject::rect(100.0, 100.0, 150.0, 100.0, Color::rgb(0x3b, 0x82, 0xf6)));
    scene.add(DrawableObject::regular_polygon(300.0, 300.0, 60.0, 5, Color::GOLD).unwrap());
    scene.add(DrawableObject::star(500.0, 300.0, 5, 50.0, 25.0, Color::GOLD).unwrap());

    let path = std::path::Path::new("target/test_scene.sigil.json");
    save_scene(path, &scene).unwrap();
    let loaded = load_scene(path).unwrap();

    assert_eq!(loaded, scene);
    assert_eq!(loaded.snapshot().unwrap(), scene.snapshot().unwrap());
}
