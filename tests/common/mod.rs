#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use etcd_tls_registry::services::client::{
    EtcdResponse, Node, RawRequest, RawResponse, StoreClient, StoreError, TlsConfig,
};
use http::{HeaderMap, StatusCode};

// 记录的存储调用
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Set { key: String, value: String, ttl: u64 },
    Delete { key: String, recursive: bool },
    Raw { method: String, path: String },
}

/// 内存中的存储，模拟 etcd 的 set/delete 语义
pub struct MemoryStore {
    pub entries: Mutex<HashMap<String, (String, u64)>>,
    pub calls: Mutex<Vec<Call>>,
    pub sync_ok: AtomicBool,
    pub sync_calls: AtomicUsize,
    // 设置后 set 返回该错误码
    pub fail_set: Mutex<Option<u32>>,
    pub fail_raw: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            sync_ok: AtomicBool::new(true),
            sync_calls: AtomicUsize::new(0),
            fail_set: Mutex::new(None),
            fail_raw: AtomicBool::new(false),
        }
    }
}

impl MemoryStore {
    pub fn get(&self, key: &str) -> Option<(String, u64)> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn sync_cluster(&self) -> bool {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        self.sync_ok.load(Ordering::SeqCst)
    }

    async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<EtcdResponse, StoreError> {
        self.calls.lock().unwrap().push(Call::Set {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        });

        if let Some(code) = *self.fail_set.lock().unwrap() {
            return Err(StoreError::Etcd {
                code,
                message: "Raft Internal Error".to_string(),
                cause: key.to_string(),
                index: 7,
            });
        }

        let prev = self
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));

        Ok(EtcdResponse {
            action: "set".to_string(),
            node: Node {
                key: key.to_string(),
                value: Some(value.to_string()),
                ttl: (ttl > 0).then_some(ttl as i64),
                ..Default::default()
            },
            prev_node: prev.map(|(value, _)| Node {
                key: key.to_string(),
                value: Some(value),
                ..Default::default()
            }),
        })
    }

    async fn delete(&self, key: &str, recursive: bool) -> Result<EtcdResponse, StoreError> {
        self.calls.lock().unwrap().push(Call::Delete {
            key: key.to_string(),
            recursive,
        });

        match self.entries.lock().unwrap().remove(key) {
            Some(_) => Ok(EtcdResponse {
                action: "delete".to_string(),
                node: Node {
                    key: key.to_string(),
                    ..Default::default()
                },
                prev_node: None,
            }),
            None => Err(StoreError::Etcd {
                code: 100,
                message: "Key not found".to_string(),
                cause: key.to_string(),
                index: 3,
            }),
        }
    }

    async fn send_request(&self, request: RawRequest) -> Result<RawResponse, StoreError> {
        self.calls.lock().unwrap().push(Call::Raw {
            method: request.method.to_string(),
            path: request.relative_path.clone(),
        });

        if self.fail_raw.load(Ordering::SeqCst) {
            return Err(StoreError::NoEndpoints);
        }

        Ok(RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(br#"{"etcdserver":"2.3.8","etcdcluster":"2.3.0"}"#),
        })
    }
}

/// 生成自签名的客户端证书、私钥和 CA，目录在 TempDir 释放时删除
pub fn tls_fixture() -> (tempfile::TempDir, TlsConfig) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .expect("Failed to generate certificate");

    let tls = TlsConfig {
        cert: dir.path().join("client.pem"),
        key: dir.path().join("client-key.pem"),
        ca_cert: dir.path().join("ca.pem"),
    };
    std::fs::write(&tls.cert, certified.cert.pem()).expect("Failed to write cert");
    std::fs::write(&tls.key, certified.signing_key.serialize_pem()).expect("Failed to write key");
    std::fs::write(&tls.ca_cert, certified.cert.pem()).expect("Failed to write CA");

    (dir, tls)
}
