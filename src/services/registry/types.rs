use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AdapterError;

// 一个正在运行的服务实例
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// 逻辑服务名，同名实例归为一组
    pub name: String,
    /// 实例 ID，在同一服务内唯一
    pub id: String,
    pub ip: String,
    pub port: u16,
    /// 过期时间（秒），0 表示永不过期
    #[serde(default)]
    pub ttl: u64,
}

impl ServiceRecord {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        ip: impl Into<String>,
        port: u16,
        ttl: u64,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            ip: ip.into(),
            port,
            ttl,
        }
    }

    /// host:port 形式的地址，IPv6 地址会加上方括号
    pub fn address(&self) -> String {
        if self.ip.contains(':') {
            format!("[{}]:{}", self.ip, self.port)
        } else {
            format!("{}:{}", self.ip, self.port)
        }
    }
}

/// 服务注册后端接口，由外部的服务发现框架按服务生命周期调用
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// 连通性检查
    async fn ping(&self) -> Result<(), AdapterError>;

    /// 发布服务，重复调用会覆盖原有记录
    async fn register(&self, service: &ServiceRecord) -> Result<(), AdapterError>;

    async fn deregister(&self, service: &ServiceRecord) -> Result<(), AdapterError>;

    /// 心跳，防止记录过期
    async fn refresh(&self, service: &ServiceRecord) -> Result<(), AdapterError>;

    /// 列出已注册的服务
    async fn services(&self) -> Result<Vec<ServiceRecord>, AdapterError>;
}
