use super::*;

#[test]
fn defaults() {
    let o = StudioOpts::default();
    assert_eq!(o.texture_size, 4096);
    assert_eq!(o.preview_size, 1024);
    assert_eq!(o.fit, FitMode::FitHeight);
    assert_eq!(o.capture, CaptureOpts::default());
    assert!((o.capture_distance_factor - 1.07).abs() < 1e-6);
    o.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let o = StudioOpts::from_reader(
        r#"{ "texture_size": 512, "fit": "contain", "capture": { "width": 320 } }"#.as_bytes(),
    )
    .unwrap();
    assert_eq!(o.texture_size, 512);
    assert_eq!(o.fit, FitMode::Contain);
    assert_eq!(o.capture.width, 320);
    assert_eq!(o.capture.height, 1200);
    assert_eq!(o.effective_preview_size(), 512);
}

#[test]
fn invalid_json_is_rejected() {
    let err = StudioOpts::from_reader(r#"{ "texture_sz": 1 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, StudioError::Serde(_)));

    let err = StudioOpts::from_reader(r#"{ "preview_size": 0 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));
}

#[test]
fn json_file_round_trip() {
    let dir = std::path::Path::new("target").join("unit-opts");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("studio.json");
    let opts = StudioOpts {
        preview_size: 256,
        ..StudioOpts::default()
    };
    std::fs::write(&path, serde_json::to_vec_pretty(&opts).unwrap()).unwrap();
    assert_eq!(StudioOpts::from_json_path(&path).unwrap(), opts);

    assert!(StudioOpts::from_json_path(dir.join("missing.json")).is_err());
}
