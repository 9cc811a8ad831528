use plcgw_config::{ConfigError, ServiceConfig};
use std::io::Write;
use std::time::Duration;

const SAMPLE: &str = r#"{
    "read_interval_seconds": 2,
    "plcs": [
        { "id": 1, "name": "extrusora-1", "host": "192.168.0.10", "port": 5000 },
        { "id": 2, "name": "extrusora-2", "host": "192.168.0.11", "port": 5000, "enabled": false }
    ],
    "databases": {
        "local": { "enabled": true, "connection_string": "postgres://plcgw@localhost/plcgw" },
        "cloud": { "enabled": false }
    }
}"#;

#[test]
fn defaults_fill_missing_intervals() {
    let config = ServiceConfig::from_json_str(SAMPLE).expect("config");
    assert_eq!(config.read_interval(), Duration::from_secs(2));
    assert_eq!(config.reconnect_interval(), Duration::from_secs(10));
    assert_eq!(config.read_timeout(), Duration::from_secs(5));
    assert_eq!(config.max_retries, 3);

    let enabled: Vec<_> = config.enabled_plcs().map(|plc| plc.id).collect();
    assert_eq!(enabled, vec![1]);
    assert!(config.databases.local.enabled);
    assert!(!config.databases.cloud.enabled);
}

#[test]
fn rejects_zero_interval() {
    let json = SAMPLE.replace("\"read_interval_seconds\": 2", "\"read_interval_seconds\": 0");
    let err = ServiceConfig::from_json_str(&json).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(key, _) if key == "read_interval_seconds"));
}

#[test]
fn rejects_empty_plc_list() {
    let err = ServiceConfig::from_json_str(r#"{ "plcs": [] }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(key) if key == "plcs"));
}

#[test]
fn rejects_all_plcs_disabled() {
    let json = r#"{ "plcs": [ { "id": 1, "name": "a", "host": "h", "port": 1, "enabled": false } ] }"#;
    assert!(matches!(
        ServiceConfig::from_json_str(json),
        Err(ConfigError::Invalid(_, _))
    ));
}

#[test]
fn rejects_duplicate_ids() {
    let json = r#"{ "plcs": [
        { "id": 1, "name": "a", "host": "h1", "port": 1 },
        { "id": 1, "name": "b", "host": "h2", "port": 1 }
    ] }"#;
    let err = ServiceConfig::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("duplicate PLC id 1"));
}

#[test]
fn enabled_database_needs_connection_string() {
    let json = SAMPLE.replace("\"cloud\": { \"enabled\": false }", "\"cloud\": { \"enabled\": true }");
    let err = ServiceConfig::from_json_str(&json).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(key) if key == "databases.cloud.connection_string"));
}

#[test]
fn port_is_required() {
    let json = r#"{ "plcs": [ { "id": 1, "name": "a", "host": "h" } ] }"#;
    assert!(matches!(
        ServiceConfig::from_json_str(json),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let err = ServiceConfig::from_path("does/not/exist.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn load_config_from_env() {
    let path = std::env::temp_dir().join(format!("plcgw-config-{}.json", std::process::id()));
    std::fs::File::create(&path)
        .and_then(|mut file| file.write_all(SAMPLE.as_bytes()))
        .expect("write sample");

    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("PLCGW_CONFIG_PATH", &path);
        std::env::set_var("PLCGW_MAX_RETRIES", "5");
        std::env::set_var("PLCGW_CLOUD_DATABASE_URL", "postgres://cloud/plcgw");
    }

    let config = ServiceConfig::from_env().expect("config");
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.read_interval_seconds, 2);
    assert_eq!(config.databases.cloud.connection_string, "postgres://cloud/plcgw");
    let _ = std::fs::remove_file(&path);
}
