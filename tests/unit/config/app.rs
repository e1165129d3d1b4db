use super::*;
use crate::style::spec::ColorMode;

#[test]
fn empty_object_gives_defaults() {
    let cfg = AppConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.fps, 12);
    assert_eq!(cfg.edge_threshold, [100.0, 200.0]);
    assert_eq!(cfg.distortion_strength, 20);
    assert_eq!(cfg.registry().unwrap(), StyleRegistry::builtin());
}

#[test]
fn full_style_config_file_parses() {
    let json = r#"{
        "fps": 24,
        "edge_threshold": [50, 150],
        "distortion_strength": 10,
        "output_dir": "out",
        "processed_dir": "proc",
        "final_video_dir": "videos",
        "sub_directory": "clip",
        "default_style": "noir",
        "styles": {
            "noir": {
                "pixel_size": 6,
                "contrast": 2.0,
                "noise_level": 0.1,
                "dithering": true,
                "color_mode": "monochrome",
                "description": "Dark"
            },
            "sepia": {
                "pixel_size": 2,
                "color_mode": "sepia"
            }
        }
    }"#;
    let cfg = AppConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.fps, 24);
    assert_eq!(cfg.final_video_dir, PathBuf::from("videos"));
    assert_eq!(cfg.edge_params(), EdgeParams::new([50.0, 150.0], 10));

    let registry = cfg.registry().unwrap();
    assert_eq!(registry.default_style(), "noir");
    assert_eq!(registry.all_names(), vec!["noir", "sepia"]);
    let sepia = registry.lookup("sepia").unwrap();
    assert_eq!(sepia.color_mode, Some(ColorMode::Other("sepia".to_string())));
    assert_eq!(sepia.contrast, 1.0);
    assert_eq!(registry.describe("sepia"), "No description available");
}

#[test]
fn invalid_values_are_config_errors() {
    for json in [
        r#"{"fps": 0}"#,
        r#"{"default_style": "missing"}"#,
        r#"{"distortion_strength": -1}"#,
        r#"{"edge_threshold": [-1, 10]}"#,
        r#"{"styles": {"faith": {"pixel_size": 0}}}"#,
    ] {
        let err = AppConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, RetroError::Config(_)), "{json}: {err}");
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = AppConfig::from_json_str("{ fps: ").unwrap_err();
    assert!(matches!(err, RetroError::Serde(_)));
}

#[test]
fn load_reports_missing_file() {
    let path = std::env::temp_dir().join(format!(
        "retroframe_missing_config_{}.json",
        std::process::id()
    ));
    let err = AppConfig::load(&path).unwrap_err();
    assert!(matches!(err, RetroError::Config(_)));
}

#[test]
fn json_round_trip_through_file() {
    let path = std::env::temp_dir().join(format!(
        "retroframe_config_{}_{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let cfg = AppConfig {
        fps: 30,
        ..AppConfig::default()
    };
    std::fs::write(&path, cfg.to_json_string().unwrap()).unwrap();
    assert_eq!(AppConfig::load(&path).unwrap(), cfg);
}
