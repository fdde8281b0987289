use std::time::Duration;
use std::{env, fs};

use grantstore_cli::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    // Create a temporary TOML configuration file
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("grantstore.toml");

    let toml_content = r#"
[storage]
token_lifetime = "12h"
max_chain_depth = 4
atomic_token_writes = true

[redis]
url = "redis://cache.internal:6380/1"
pool_size = 4

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses, unspecified keys keep their defaults
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.storage.token_lifetime, Duration::from_secs(12 * 3600));
    assert_eq!(cfg.storage.max_chain_depth, 4);
    assert!(cfg.storage.atomic_token_writes);
    assert_eq!(cfg.redis.url, "redis://cache.internal:6380/1");
    assert_eq!(cfg.redis.pool_size, 4);
    assert_eq!(cfg.redis.timeout_ms, 5000);
    assert_eq!(cfg.logging.level, "debug");

    // 2) Env override should win over file
    unsafe {
        env::set_var("GRANTSTORE__STORAGE__MAX_CHAIN_DEPTH", "9");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.storage.max_chain_depth, 9);
    // cleanup env var
    unsafe {
        env::remove_var("GRANTSTORE__STORAGE__MAX_CHAIN_DEPTH");
    }

    // 3) Missing file falls back to defaults
    let missing = dir.path().join("absent.toml");
    let cfg_default = load_config(missing.to_str()).expect("defaults");
    assert_eq!(cfg_default.storage.max_chain_depth, 16);
    assert_eq!(cfg_default.storage.token_lifetime, Duration::from_secs(7 * 24 * 3600));

    // 4) Sub-second token lifetime should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[storage]
token_lifetime = "500ms"
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(format!("{err:#}").contains("token_lifetime must be at least 1s"));
}
