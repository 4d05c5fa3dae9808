use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn default_config() {
    let config = Config::default();
    assert_eq!(config.server.name, "agentlink-korea");
    assert_eq!(config.server.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(config.server.instructions, None);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn config_validation() {
    let config = Config::default();

    let mut invalid_config = config.clone();
    invalid_config.server.name = "   ".to_string();
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidServerName(_))
    ));

    let mut invalid_config = config.clone();
    invalid_config.server.version = String::new();
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidVersion(_))
    ));

    let mut invalid_config = config.clone();
    invalid_config.logging.level = "agentlink_mcp=loud".to_string();
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidLogLevel(_))
    ));

    let mut valid_config = config;
    valid_config.logging.level = "agentlink_mcp=debug,warn".to_string();
    assert!(valid_config.validate().is_ok());
}

#[test]
fn toml_serialization() {
    let mut config = Config::default();
    config.server.instructions = Some("Korean public data tools".to_string());

    let toml_str = toml::to_string(&config).expect("should serialize toml correctly");
    let parsed_config: Config = toml::from_str(&toml_str).expect("should parse toml correctly");
    assert_eq!(config, parsed_config);
}

#[test]
fn partial_toml_uses_defaults() {
    let parsed: Config = toml::from_str(
        r#"
            [logging]
            level = "debug"
        "#,
    )
    .expect("should parse partial toml");

    assert_eq!(parsed.server, ServerConfig::default());
    assert_eq!(parsed.logging.level, "debug");
}

#[test]
fn invalid_toml_handling() {
    let invalid_toml = r#"
        [server
        name = "agentlink-korea"
    "#;

    let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);
    assert!(result.is_err());
}

#[test]
fn load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");

    let config = Config::load(temp_dir.path()).expect("missing file should load defaults");
    assert_eq!(config.server, ServerConfig::default());
    assert_eq!(config.get_base_dir(), temp_dir.path());
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config_dir = temp_dir.path().join(".agentlink");

    let mut config = Config::with_base_dir(&config_dir);
    config.server.name = "agentlink-test".to_string();
    config.server.version = "9.9.9".to_string();
    config.logging.level = "warn".to_string();

    config.save().expect("should save config");
    assert!(config.config_file_path().exists());

    let loaded = Config::load(&config_dir).expect("should load saved config");
    assert_eq!(loaded, config);
}

#[test]
fn save_rejects_invalid_config() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");

    let mut config = Config::with_base_dir(temp_dir.path());
    config.server.name = String::new();

    assert!(config.save().is_err());
    assert!(!config.config_file_path().exists());
}

#[test]
fn load_rejects_empty_server_name() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    fs::write(
        temp_dir.path().join("config.toml"),
        "[server]\nname = \"\"\n",
    )
    .expect("should write config file");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
fn config_dir_resolution_order() {
    let cli = Some(PathBuf::from("/tmp/from-cli"));
    let env = Some(OsString::from("/tmp/from-env"));

    assert_eq!(
        resolve_config_dir(cli.clone(), env.clone()).expect("cli dir"),
        PathBuf::from("/tmp/from-cli")
    );
    assert_eq!(
        resolve_config_dir(None, env).expect("env dir"),
        PathBuf::from("/tmp/from-env")
    );
    assert_eq!(
        resolve_config_dir(Some(PathBuf::new()), Some(OsString::new())).ok(),
        default_config_dir().ok()
    );
}

#[test]
fn default_config_dir_is_under_home() {
    if let Ok(dir) = default_config_dir() {
        assert!(dir.ends_with(".agentlink"));
    }
}
