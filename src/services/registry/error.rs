use crate::services::client::StoreError;

/// 注册适配器错误类型
///
/// 存储客户端返回的错误原样保存在对应的变体中，不做转换。
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("etcd connection failed: {0}")]
    Connect(#[source] StoreError),
    #[error("failed to register service: {0}")]
    Write(#[source] StoreError),
    #[error("failed to deregister service: {0}")]
    Delete(#[source] StoreError),
    #[error("No adapter registered for scheme: {0}")]
    UnsupportedScheme(String),
}

impl AdapterError {
    /// 底层存储客户端错误
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            AdapterError::Connect(e) | AdapterError::Write(e) | AdapterError::Delete(e) => Some(e),
            AdapterError::UnsupportedScheme(_) => None,
        }
    }

    pub fn into_store_error(self) -> Option<StoreError> {
        match self {
            AdapterError::Connect(e) | AdapterError::Write(e) | AdapterError::Delete(e) => Some(e),
            AdapterError::UnsupportedScheme(_) => None,
        }
    }
}
