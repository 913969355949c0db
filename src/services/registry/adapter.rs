use async_trait::async_trait;
use http::Method;

use super::error::AdapterError;
use super::types::{RegistryAdapter, ServiceRecord};
use crate::services::client::{EtcdClient, RawRequest, StoreClient};

/// 将服务记录发布到 etcd 的注册适配器
///
/// 每个服务实例对应键 `{path}/{name}/{id}`，值为 `ip:port`，过期时间为服务的 TTL。
/// 除了客户端句柄和键前缀之外不保存任何状态。
#[derive(Debug)]
pub struct EtcdAdapter<C = EtcdClient> {
    client: C,
    path: String,
}

impl<C: StoreClient> EtcdAdapter<C> {
    pub fn new(client: C, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 服务在 etcd 中的键，注册和注销必须使用同一个键
    pub fn service_key(&self, service: &ServiceRecord) -> String {
        service_key(&self.path, service)
    }

    // 同步失败不影响后续操作，继续使用当前已知的成员列表
    async fn sync_cluster(&self) {
        if !self.client.sync_cluster().await {
            tracing::warn!("etcd: sync cluster was unsuccessful");
        }
    }
}

pub fn service_key(prefix: &str, service: &ServiceRecord) -> String {
    format!("{}/{}/{}", prefix, service.name, service.id)
}

#[async_trait]
impl<C: StoreClient> RegistryAdapter for EtcdAdapter<C> {
    async fn ping(&self) -> Result<(), AdapterError> {
        self.sync_cluster().await;

        let request = RawRequest::new(Method::GET, "version", None, None);
        self.client
            .send_request(request)
            .await
            .map_err(AdapterError::Connect)?;
        Ok(())
    }

    async fn register(&self, service: &ServiceRecord) -> Result<(), AdapterError> {
        self.sync_cluster().await;

        let key = self.service_key(service);
        let addr = service.address();

        match self.client.set(&key, &addr, service.ttl).await {
            Ok(_) => {
                tracing::debug!(
                    key = %key,
                    address = %addr,
                    ttl = service.ttl,
                    "etcd: registered service"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "etcd: failed to register service");
                Err(AdapterError::Write(e))
            }
        }
    }

    async fn deregister(&self, service: &ServiceRecord) -> Result<(), AdapterError> {
        self.sync_cluster().await;

        let key = self.service_key(service);

        match self.client.delete(&key, false).await {
            Ok(_) => {
                tracing::debug!(key = %key, "etcd: deregistered service");
                Ok(())
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "etcd: failed to deregister service");
                Err(AdapterError::Delete(e))
            }
        }
    }

    async fn refresh(&self, service: &ServiceRecord) -> Result<(), AdapterError> {
        self.register(service).await
    }

    async fn services(&self) -> Result<Vec<ServiceRecord>, AdapterError> {
        Ok(Vec::new())
    }
}
