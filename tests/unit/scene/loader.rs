use super::*;

#[test]
fn missing_file_fails_once_then_ends() {
    let events: Vec<LoadEvent> = ModelLoader::open("target/does-not-exist/model.gltf").collect();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], LoadEvent::Started));
    assert!(matches!(&events[1], LoadEvent::Failed(StudioError::Load(_))));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[test]
fn load_model_surfaces_the_error() {
    let err = load_model("target/does-not-exist/model.glb").unwrap_err();
    assert!(err.to_string().starts_with("load error:"));
}

#[test]
fn rgb_textures_become_opaque_rgba() {
    let data = gltf::image::Data {
        pixels: vec![255, 0, 0, 0, 255, 0],
        format: gltf::image::Format::R8G8B8,
        width: 2,
        height: 1,
    };
    let buf = image_to_buffer(&data).unwrap();
    assert_eq!(buf.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(buf.pixel(1, 0), [0, 255, 0, 255]);
}

#[test]
fn mismatched_texture_size_is_a_decode_error() {
    let data = gltf::image::Data {
        pixels: vec![1, 2, 3, 4],
        format: gltf::image::Format::R8G8B8A8,
        width: 2,
        height: 2,
    };
    assert!(matches!(image_to_buffer(&data), Err(StudioError::Decode(_))));
}
