use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use percent_encoding::percent_decode_str;
use url::Url;

use super::adapter::EtcdAdapter;
use super::error::AdapterError;
use super::types::RegistryAdapter;
use crate::services::client::{DEFAULT_ENDPOINT, EtcdClient, EtcdClientConfig, TlsConfig};

/// etcd-tls 适配器对应的 URI scheme
pub const ETCD_TLS_SCHEME: &str = "etcd-tls";

/// 根据连接 URI 创建注册适配器
pub trait AdapterFactory: Send + Sync {
    fn create(&self, uri: &Url) -> Result<Box<dyn RegistryAdapter>, AdapterError>;
}

/// 创建使用客户端证书访问 etcd 的适配器
///
/// TLS 材料来自工厂自身的配置，与每个连接的 URI 无关。
#[derive(Debug, Clone)]
pub struct EtcdTlsFactory {
    tls: TlsConfig,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl EtcdTlsFactory {
    pub fn new(tls: TlsConfig) -> Self {
        let defaults = EtcdClientConfig::default();
        Self {
            tls,
            request_timeout: defaults.request_timeout,
            connect_timeout: defaults.connect_timeout,
        }
    }

    pub fn with_timeouts(mut self, request_timeout: Duration, connect_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    /// 创建具体类型的适配器，不会发起网络请求
    pub fn create_adapter(&self, uri: &Url) -> Result<EtcdAdapter<EtcdClient>, AdapterError> {
        let config = EtcdClientConfig {
            endpoints: endpoints_for(uri),
            tls: Some(self.tls.clone()),
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
        };

        let client = EtcdClient::new(config).map_err(|e| {
            tracing::error!(uri = %uri, error = %e, "etcd: failed to create TLS client");
            AdapterError::Connect(e)
        })?;

        Ok(EtcdAdapter::new(client, key_prefix(uri)))
    }
}

impl AdapterFactory for EtcdTlsFactory {
    fn create(&self, uri: &Url) -> Result<Box<dyn RegistryAdapter>, AdapterError> {
        Ok(Box::new(self.create_adapter(uri)?))
    }
}

/// URI 中的主机部分决定集群地址，未指定时使用本机默认端口
pub fn endpoints_for(uri: &Url) -> Vec<String> {
    let endpoint = match uri.host_str().filter(|host| !host.is_empty()) {
        Some(host) => match uri.port() {
            Some(port) => format!("https://{host}:{port}"),
            None => format!("https://{host}"),
        },
        None => DEFAULT_ENDPOINT.to_string(),
    };
    vec![endpoint]
}

/// URI 路径解码后作为键前缀，`etcd-tls://h:p` 的前缀为空
pub fn key_prefix(uri: &Url) -> String {
    percent_decode_str(uri.path())
        .decode_utf8_lossy()
        .into_owned()
}

// 适配器工厂表（scheme -> 工厂）
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    factories: Arc<DashMap<String, Arc<dyn AdapterFactory>>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册内置的 etcd-tls 工厂
    pub fn with_defaults(tls: TlsConfig) -> Self {
        let registry = Self::new();
        registry.register(ETCD_TLS_SCHEME, Arc::new(EtcdTlsFactory::new(tls)));
        registry
    }

    /// 注册工厂，同名 scheme 会被替换并返回旧的工厂
    pub fn register(
        &self,
        scheme: impl Into<String>,
        factory: Arc<dyn AdapterFactory>,
    ) -> Option<Arc<dyn AdapterFactory>> {
        let scheme = scheme.into();
        tracing::debug!(scheme = %scheme, "Registering registry adapter factory");
        self.factories.insert(scheme, factory)
    }

    pub fn lookup(&self, scheme: &str) -> Option<Arc<dyn AdapterFactory>> {
        self.factories.get(scheme).map(|entry| entry.value().clone())
    }

    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.factories.iter().map(|e| e.key().clone()).collect();
        schemes.sort();
        schemes
    }

    /// 按 URI 的 scheme 选择工厂并创建适配器
    pub fn create(&self, uri: &Url) -> Result<Box<dyn RegistryAdapter>, AdapterError> {
        let factory = self
            .lookup(uri.scheme())
            .ok_or_else(|| AdapterError::UnsupportedScheme(uri.scheme().to_string()))?;
        factory.create(uri)
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
