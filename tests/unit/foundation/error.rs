use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StudioError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StudioError::decode("x").to_string().contains("decode error:"));
    assert!(StudioError::load("x").to_string().contains("load error:"));
    assert!(StudioError::render("x").to_string().contains("render error:"));
    assert!(
        StudioError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StudioError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
