use mediaserve::config::{Config, ConfigError, DEFAULT_MAX_CONNECTIONS, DEFAULT_SERVER_NAME};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

#[test]
fn test_config_from_json_properties() {
    let cfg = Config::from_json_str(
        r#"{ "ip": "127.0.0.1", "port": 8080, "mediaDir": "/srv/media" }"#,
    )
    .unwrap();

    assert_eq!(cfg.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.media_dir, PathBuf::from("/srv/media"));
    assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
    assert_eq!(cfg.server_name, DEFAULT_SERVER_NAME);
    assert!(cfg.template.is_none());
    assert_eq!(cfg.listen_addr().to_string(), "127.0.0.1:8080");
}

#[test]
fn test_config_optional_fields() {
    let cfg = Config::from_json_str(
        r#"{
            "ip": "0.0.0.0",
            "port": 5000,
            "mediaDir": "media",
            "template": "template.txt",
            "maxConnections": 4,
            "serverName": "mediaserve"
        }"#,
    )
    .unwrap();

    assert_eq!(cfg.template, Some(PathBuf::from("template.txt")));
    assert_eq!(cfg.max_connections, 4);
    assert_eq!(cfg.server_name, "mediaserve");
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml_str("ip: \"::1\"\nport: 9000\nmediaDir: /data\n").unwrap();

    assert!(cfg.ip.is_loopback());
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.media_dir, PathBuf::from("/data"));
}

#[test]
fn test_config_missing_fields_are_named() {
    let missing_ip = Config::from_json_str(r#"{ "port": 1, "mediaDir": "m" }"#);
    assert!(matches!(missing_ip, Err(ConfigError::Missing("ip"))));

    let missing_port = Config::from_json_str(r#"{ "ip": "127.0.0.1", "mediaDir": "m" }"#);
    assert!(matches!(missing_port, Err(ConfigError::Missing("port"))));

    let null_dir = Config::from_json_str(r#"{ "ip": "127.0.0.1", "port": 1, "mediaDir": null }"#);
    assert!(matches!(null_dir, Err(ConfigError::Missing("mediaDir"))));
}

#[test]
fn test_config_invalid_values() {
    let bad_ip = Config::from_json_str(r#"{ "ip": "not-an-ip", "port": 1, "mediaDir": "m" }"#);
    assert!(matches!(bad_ip, Err(ConfigError::InvalidIp(_))));

    let bad_port = Config::from_json_str(r#"{ "ip": "127.0.0.1", "port": 70000, "mediaDir": "m" }"#);
    assert!(matches!(bad_port, Err(ConfigError::Json(_))));

    let zero = Config::from_json_str(
        r#"{ "ip": "127.0.0.1", "port": 1, "mediaDir": "m", "maxConnections": 0 }"#,
    );
    assert!(matches!(zero, Err(ConfigError::NoConnections)));
}

#[test]
fn test_config_from_file_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let json = dir.path().join("properties.json");
    std::fs::write(&json, r#"{ "ip": "127.0.0.1", "port": 8000, "mediaDir": "m" }"#).unwrap();
    assert_eq!(Config::from_file(&json).unwrap().port, 8000);

    let yaml = dir.path().join("properties.yml");
    std::fs::write(&yaml, "ip: 127.0.0.1\nport: 8001\nmediaDir: m\n").unwrap();
    assert_eq!(Config::from_file(&yaml).unwrap().port, 8001);
}

#[test]
fn test_config_missing_file() {
    let result = Config::from_file("/definitely/not/here/properties.json");
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_config_new_defaults() {
    let cfg = Config::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, "/m");

    assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
    assert_eq!(cfg.server_name, DEFAULT_SERVER_NAME);

    let cfg2 = cfg.clone();
    assert_eq!(cfg.listen_addr(), cfg2.listen_addr());
}
