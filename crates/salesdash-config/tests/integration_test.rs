//! Integration tests for salesdash-config crate.

use salesdash_config::{Config, ConfigCache, ConfigLoader, ConfigValidator, OutputFormat};
use std::io::Write;

#[test]
fn test_default_config_validation() {
    let mut config = Config::default();
    assert!(ConfigValidator::validate(&config).is_ok());

    config.data.source = "   ".to_string();
    assert!(ConfigValidator::validate(&config).is_err());
}

#[test]
fn test_config_cache() {
    let config = Config::default();
    let cache = ConfigCache::new(config.clone());

    let cached_config = cache.get();
    assert_eq!(cached_config.layout.width, config.layout.width);

    let mut new_config = config;
    new_config.layout.width = 1280;
    cache.update(new_config.clone());
    assert_eq!(cache.get().layout.width, 1280);

    let held = cache.get();
    new_config.layout.width = 640;
    cache.update(new_config);
    assert_eq!(cache.get().layout.width, 640);
    assert_eq!(held.layout.width, 1280, "earlier readers keep their snapshot");
}

#[test]
fn test_round_trip_through_yaml_file() {
    let mut config = Config::default();
    config.output.format = OutputFormat::Svg;
    config.scatter.jitter_seed = Some(7);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_yaml::to_string(&config).unwrap()).unwrap();

    let loaded = ConfigLoader::new(file.path()).load_with(|_| None).unwrap();
    assert_eq!(loaded, config);
}
