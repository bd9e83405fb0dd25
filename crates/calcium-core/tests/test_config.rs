use calcium_core::detection::DetectionConfig;
use calcium_core::error::CalciumError;
use calcium_core::measure::InfluxBounds;
use calcium_core::pipeline::{parse_threshold_list, AnalysisConfig, ConfigWarning, PipelineStage};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_analysis_config_defaults() {
    let config = AnalysisConfig::default();
    assert_eq!(config.thresholds, vec![80]);
    assert_eq!(config.radius, 3);
    assert_eq!(config.high, 200);
    assert_eq!(config.low, -100);
    assert_eq!(config.border_margin, 30);
    assert_eq!(config.bounds(), InfluxBounds::default());
    assert!(config.validate().unwrap().is_empty());
}

#[test]
fn test_detection_config_from_analysis_config() {
    let config = AnalysisConfig {
        border_margin: 12,
        ..Default::default()
    };
    assert_eq!(
        config.detection(120),
        DetectionConfig {
            threshold: 120,
            border_margin: 12
        }
    );
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn test_partial_toml_fills_defaults() {
    let config: AnalysisConfig = toml::from_str("thresholds = [60, 90]\nlow = -50\n").unwrap();
    assert_eq!(config.thresholds, vec![60, 90]);
    assert_eq!(config.low, -50);
    assert_eq!(config.high, 200);
    assert_eq!(config.radius, 3);
}

#[test]
fn test_toml_roundtrip() {
    let config = AnalysisConfig {
        thresholds: vec![40, 80, 120],
        radius: 4,
        high: 180,
        low: -80,
        border_margin: 20,
    };
    let text = toml::to_string_pretty(&config).unwrap();
    let back: AnalysisConfig = toml::from_str(&text).unwrap();
    assert_eq!(back, config);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_rejects_unusable_settings() {
    let empty = AnalysisConfig {
        thresholds: vec![],
        ..Default::default()
    };
    assert!(matches!(empty.validate(), Err(CalciumError::InvalidConfig(_))));

    let zero = AnalysisConfig {
        thresholds: vec![80, 0],
        ..Default::default()
    };
    assert!(zero.validate().is_err());

    let inverted = AnalysisConfig {
        high: -100,
        low: -100,
        ..Default::default()
    };
    assert!(inverted.validate().is_err());
}

#[test]
fn test_validate_flags_questionable_settings() {
    let config = AnalysisConfig {
        thresholds: vec![10, 80, 80, 250, 30, 40, 50],
        radius: 12,
        ..Default::default()
    };
    let warnings = config.validate().unwrap();
    assert!(warnings.contains(&ConfigWarning::ThresholdOutOfRange(10)));
    assert!(warnings.contains(&ConfigWarning::ThresholdOutOfRange(250)));
    assert!(warnings.contains(&ConfigWarning::DuplicateThreshold(80)));
    assert!(warnings.contains(&ConfigWarning::TooManyThresholds { given: 6, kept: 5 }));
    assert!(warnings.contains(&ConfigWarning::LargeRadius(12)));
    assert_eq!(config.active_thresholds(), vec![10, 80, 250, 30, 40]);
}

#[test]
fn test_warning_display() {
    assert_eq!(
        ConfigWarning::ThresholdOutOfRange(300).to_string(),
        "300 might be too small or too large for thresholding"
    );
    assert_eq!(
        ConfigWarning::LargeRadius(10).to_string(),
        "radius 10 might be too large"
    );
}

// ---------------------------------------------------------------------------
// Threshold list parsing
// ---------------------------------------------------------------------------

#[test]
fn test_parse_threshold_list() {
    assert_eq!(parse_threshold_list("80"), vec![80]);
    assert_eq!(parse_threshold_list("60/80/100"), vec![60, 80, 100]);
    assert_eq!(parse_threshold_list("60, 80,100"), vec![60, 80, 100]);
    assert_eq!(parse_threshold_list("60/abc/80/60"), vec![60, 80]);
    assert_eq!(parse_threshold_list("1/2/3/4/5/6/7"), vec![1, 2, 3, 4, 5]);
    assert_eq!(parse_threshold_list("0/-5"), vec![80]);
    assert_eq!(parse_threshold_list(""), vec![80]);
}

#[test]
fn test_stage_display() {
    assert_eq!(PipelineStage::Registration.to_string(), "Registering fields");
    assert_eq!(
        PipelineStage::Analysis { threshold: 80 }.to_string(),
        "Analysing at threshold 80"
    );
}
