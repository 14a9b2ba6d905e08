use std::fs;
use std::num::NonZeroU64;

use librawlat::configuration::{ConverterConfig, ConverterConfigBuilder};
use librawlat::{ConfigError, LatencyArithmetic};
use log::LevelFilter;
use tempfile::tempdir;

#[test]
fn config_ser_deser_returns_identical() {
    let cfg = ConverterConfigBuilder::default()
        .with_ticks_per_unit(NonZeroU64::new(3000).unwrap())
        .with_arithmetic(LatencyArithmetic::Signed)
        .with_log_level(LevelFilter::Info)
        .build();
    let stringified = toml::to_string(&cfg).unwrap();
    let ret: ConverterConfig = toml::from_str(&stringified).unwrap();
    assert_eq!(ret, cfg);
}

#[test]
fn config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rawlat.toml");
    fs::write(
        &path,
        "ticks_per_unit = 2400\noutput_suffix = \".lat\"\narithmetic = \"Signed\"\n",
    )
    .unwrap();
    let cfg = ConverterConfig::try_from_config_path(&path).unwrap();
    assert_eq!(cfg.ticks_per_unit.get(), 2400);
    assert_eq!(cfg.output_suffix, ".lat");
    assert_eq!(cfg.arithmetic, LatencyArithmetic::Signed);
    assert_eq!(cfg.log_level, LevelFilter::Warn);
}

#[test]
fn empty_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rawlat.toml");
    fs::write(&path, "").unwrap();
    let cfg = ConverterConfig::try_from_config_path(&path).unwrap();
    assert_eq!(cfg, ConverterConfig::default());
}

#[test]
fn missing_config_file() {
    let dir = tempdir().unwrap();
    let result = ConverterConfig::try_from_config_path(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn malformed_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rawlat.toml");
    fs::write(&path, "ticks_per_unit = \"many\"").unwrap();
    let result = ConverterConfig::try_from_config_path(&path);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn suffix_is_validated_when_loading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rawlat.toml");
    fs::write(&path, "output_suffix = \"\"").unwrap();
    let result = ConverterConfig::try_from_config_path(&path);
    assert!(matches!(result, Err(ConfigError::EmptySuffix)));
}
