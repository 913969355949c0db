use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};

// 原始请求，路径相对于集群成员地址（例如 "version"）
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: Method,
    pub relative_path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl RawRequest {
    pub fn new(
        method: Method,
        relative_path: impl Into<String>,
        params: Option<Vec<(String, String)>>,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            method,
            relative_path: relative_path.into(),
            params: params.unwrap_or_default(),
            body,
        }
    }
}

// 原始响应
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// v2 keys API 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtcdResponse {
    pub action: String,
    pub node: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_node: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub dir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(default)]
    pub modified_index: u64,
    #[serde(default)]
    pub created_index: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
}

// etcd 错误响应体
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    pub error_code: u32,
    pub message: String,
    #[serde(default)]
    pub cause: String,
    #[serde(default)]
    pub index: u64,
}

// GET /v2/members 响应
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MemberList {
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Member {
    #[serde(default, rename = "clientURLs")]
    pub client_urls: Vec<String>,
}
