use std::path::PathBuf;
use std::time::Duration;

use etcd_tls_registry::config::{Config, ConfigError, tls_from_vars};

const CONFIG: &str = r#"
refresh_interval_secs = 10

[registry]
uri = "etcd-tls://10.0.0.1:2379/services"

[tls]
cert = "/etc/etcd/client.pem"
key = "/etc/etcd/client-key.pem"
ca_cert = "/etc/etcd/ca.pem"

[[services]]
name = "web"
id = "1"
ip = "10.0.0.5"
port = 8080
ttl = 30

[[services]]
name = "worker"
id = "w-1"
ip = "10.0.0.6"
port = 9000
"#;

#[test]
fn test_parse_config() {
    let config = Config::from_toml_str(CONFIG).expect("Failed to parse config");

    assert_eq!(config.refresh_interval(), Duration::from_secs(10));
    assert_eq!(config.request_timeout(), Duration::from_secs(5));
    assert_eq!(config.connect_timeout(), Duration::from_secs(2));

    let uri = config.registry_uri().unwrap();
    assert_eq!(uri.scheme(), "etcd-tls");
    assert_eq!(uri.path(), "/services");

    assert_eq!(config.services.len(), 2);
    assert_eq!(config.services[0].ttl, 30);
    assert_eq!(config.services[1].ttl, 0);

    let tls = config.tls_config().unwrap();
    assert_eq!(tls.cert, PathBuf::from("/etc/etcd/client.pem"));
    assert_eq!(tls.key, PathBuf::from("/etc/etcd/client-key.pem"));
    assert_eq!(tls.ca_cert, PathBuf::from("/etc/etcd/ca.pem"));
}

#[test]
fn test_invalid_uri() {
    let config = Config::from_toml_str("[registry]\nuri = \"not a uri\"\n").unwrap();

    assert!(matches!(
        config.registry_uri(),
        Err(ConfigError::InvalidUri { .. })
    ));
}

#[test]
fn test_tls_from_environment_variables() {
    let vars = vec![
        ("ETCD_TLSPEM".to_string(), "/certs/client.pem".to_string()),
        ("ETCD_TLSKEY".to_string(), "/certs/client-key.pem".to_string()),
        ("ETCD_CACERT".to_string(), "/certs/ca.pem".to_string()),
        ("PATH".to_string(), "/usr/bin".to_string()),
    ];

    let tls = tls_from_vars(vars).expect("Failed to read TLS environment");

    assert_eq!(tls.cert, PathBuf::from("/certs/client.pem"));
    assert_eq!(tls.key, PathBuf::from("/certs/client-key.pem"));
    assert_eq!(tls.ca_cert, PathBuf::from("/certs/ca.pem"));
}

#[test]
fn test_missing_tls_variable() {
    let vars = vec![("ETCD_TLSPEM".to_string(), "/certs/client.pem".to_string())];

    assert!(matches!(tls_from_vars(vars), Err(ConfigError::Env(_))));
}
