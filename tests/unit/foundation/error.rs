use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RetroError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RetroError::geometry("x")
            .to_string()
            .contains("geometry error:")
    );
    assert!(
        RetroError::channel_shape("x")
            .to_string()
            .contains("channel shape error:")
    );
    assert!(RetroError::config("x").to_string().contains("config error:"));
    assert!(RetroError::media("x").to_string().contains("media error:"));
    assert!(
        RetroError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RetroError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
