//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error
//! handling. We test observable outcomes, not implementation details of TOML
//! parsing.

use std::io::Write;
use suggestd::config::{ConfigError, ServiceConfig};
use tempfile::NamedTempFile;

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[service]
id = "suggestd"
description = "Task suggestion service"

[server]
port = 9090
bind_address = "127.0.0.1"

[matcher]
failure_rate = 0.2
max_attempts = 4
backoff_base_ms = 250
"#
    )
    .unwrap();

    let config = ServiceConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.service.id, "suggestd");
    assert_eq!(config.service.description, "Task suggestion service");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.bind_address, "127.0.0.1");
    assert_eq!(config.matcher.failure_rate, 0.2);
    assert_eq!(config.matcher.max_attempts, 4);
    assert_eq!(config.matcher.backoff_base_ms, 250);
}

#[test]
fn test_minimal_config_applies_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[service]
id = "minimal"
description = "Minimal service"
"#
    )
    .unwrap();

    let config = ServiceConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.bind_address, "0.0.0.0");
    assert_eq!(config.matcher.failure_rate, 0.1);
    assert_eq!(config.matcher.max_attempts, 3);
    assert_eq!(config.matcher.backoff_base_ms, 100);
}

#[test]
fn test_missing_file_is_a_read_error() {
    let result = ServiceConfig::load_from_file(std::path::Path::new("/nonexistent/suggestd.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "this is not valid toml [[[").unwrap();

    let result = ServiceConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_missing_service_section_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[server]
port = 8080
"#
    )
    .unwrap();

    let result = ServiceConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_invalid_service_id_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[service]
id = "bad id with spaces!"
description = "Broken"
"#
    )
    .unwrap();

    let result = ServiceConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidServiceId(_))));
}

#[test]
fn test_failure_rate_of_one_is_rejected() {
    // 1.0 would make every attempt fail; the valid range is [0.0, 1.0)
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[service]
id = "suggestd"
description = "Task suggestion service"

[matcher]
failure_rate = 1.0
"#
    )
    .unwrap();

    let result = ServiceConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_zero_max_attempts_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[service]
id = "suggestd"
description = "Task suggestion service"

[matcher]
max_attempts = 0
"#
    )
    .unwrap();

    let result = ServiceConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}
