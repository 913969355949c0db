use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::services::client::TlsConfig;
use crate::services::registry::ServiceRecord;

/// 配置加载错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid TLS environment: {0}")]
    Env(#[from] envy::Error),
    #[error("Invalid registry URI {uri}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub registry: RegistryConfig,
    /// 未配置时从 ETCD_TLSPEM / ETCD_TLSKEY / ETCD_CACERT 读取
    #[serde(default)]
    pub tls: Option<TlsConfig>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// 例如 etcd-tls://10.0.0.1:2379/services
    pub uri: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_refresh_interval() -> u64 {
    15
}

fn default_request_timeout() -> u64 {
    5
}

fn default_connect_timeout() -> u64 {
    2
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&config_str)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(config_str)?;
        Ok(config)
    }

    pub fn registry_uri(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.registry.uri).map_err(|source| ConfigError::InvalidUri {
            uri: self.registry.uri.clone(),
            source,
        })
    }

    /// 配置文件中的 TLS 优先，其次是环境变量
    pub fn tls_config(&self) -> Result<TlsConfig, ConfigError> {
        match &self.tls {
            Some(tls) => Ok(tls.clone()),
            None => tls_from_env(),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.registry.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.registry.connect_timeout_secs)
    }
}

/// 从进程环境读取 TLS 材料路径，.env 文件由启动入口加载
pub fn tls_from_env() -> Result<TlsConfig, ConfigError> {
    tls_from_vars(std::env::vars())
}

pub fn tls_from_vars<I>(vars: I) -> Result<TlsConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    Ok(envy::prefixed("ETCD_").from_iter(vars)?)
}
