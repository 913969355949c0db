use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// etcd 默认客户端端口
pub const DEFAULT_ENDPOINT: &str = "https://127.0.0.1:2379";

/// TLS 证书材料（客户端证书、客户端私钥、CA 证书的文件路径）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// 客户端证书 (ETCD_TLSPEM)
    #[serde(rename = "tlspem", alias = "cert")]
    pub cert: PathBuf,
    /// 客户端私钥 (ETCD_TLSKEY)
    #[serde(rename = "tlskey", alias = "key")]
    pub key: PathBuf,
    /// CA 证书 (ETCD_CACERT)
    #[serde(rename = "cacert", alias = "ca_cert")]
    pub ca_cert: PathBuf,
}

/// etcd 客户端配置
#[derive(Debug, Clone)]
pub struct EtcdClientConfig {
    /// 集群成员地址
    pub endpoints: Vec<String>,
    /// TLS 材料，为空时使用系统默认根证书且不提供客户端证书
    pub tls: Option<TlsConfig>,
    /// 单次请求超时时间
    pub request_timeout: Duration,
    /// 连接超时时间
    pub connect_timeout: Duration,
}

impl Default for EtcdClientConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![DEFAULT_ENDPOINT.to_string()],
            tls: None,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }
}
