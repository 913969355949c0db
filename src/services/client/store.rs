use async_trait::async_trait;

use super::error::StoreError;
use super::types::{EtcdResponse, RawRequest, RawResponse};

/// 键值协调存储客户端接口
///
/// 注册适配器只通过这个接口访问存储，实现必须可以在多个任务间共享。
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// 刷新集群成员列表，失败时返回 false 并保留原有成员列表
    async fn sync_cluster(&self) -> bool;

    /// 写入键值，`ttl` 为 0 表示永不过期
    async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<EtcdResponse, StoreError>;

    /// 删除键
    async fn delete(&self, key: &str, recursive: bool) -> Result<EtcdResponse, StoreError>;

    /// 发送原始请求
    async fn send_request(&self, request: RawRequest) -> Result<RawResponse, StoreError>;
}
