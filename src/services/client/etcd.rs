use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use reqwest::{Certificate, Client, Identity, RequestBuilder};
use tokio::sync::RwLock;
use url::Url;

use super::config::{EtcdClientConfig, TlsConfig};
use super::error::StoreError;
use super::store::StoreClient;
use super::types::{EtcdResponse, ErrorBody, MemberList, RawRequest, RawResponse};

/// etcd v2 HTTP API 客户端
#[derive(Debug)]
pub struct EtcdClient {
    http: Client,
    // 当前已知的集群成员，sync_cluster 会整体替换
    endpoints: RwLock<Vec<String>>,
}

impl EtcdClient {
    /// 根据配置创建客户端，不会发起任何网络请求
    pub fn new(config: EtcdClientConfig) -> Result<Self, StoreError> {
        let endpoints = normalize_endpoints(&config.endpoints)?;
        let http = Self::build_http(&config)?;

        Ok(Self {
            http,
            endpoints: RwLock::new(endpoints),
        })
    }

    /// 便捷的创建方法，使用客户端证书和 CA 证书
    pub fn new_tls(
        endpoints: Vec<String>,
        cert: impl AsRef<Path>,
        key: impl AsRef<Path>,
        ca_cert: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let config = EtcdClientConfig {
            endpoints,
            tls: Some(TlsConfig {
                cert: cert.as_ref().to_path_buf(),
                key: key.as_ref().to_path_buf(),
                ca_cert: ca_cert.as_ref().to_path_buf(),
            }),
            ..Default::default()
        };
        Self::new(config)
    }

    /// 当前使用的集群成员地址
    pub async fn endpoints(&self) -> Vec<String> {
        self.endpoints.read().await.clone()
    }

    fn build_http(config: &EtcdClientConfig) -> Result<Client, StoreError> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(tls) = &config.tls {
            // rustls 需要证书和私钥位于同一个 PEM 缓冲区
            let mut identity_pem = read_pem(&tls.cert)?;
            identity_pem.push(b'\n');
            identity_pem.extend_from_slice(&read_pem(&tls.key)?);
            let identity =
                Identity::from_pem(&identity_pem).map_err(|e| StoreError::Tls(e.to_string()))?;

            let ca = Certificate::from_pem(&read_pem(&tls.ca_cert)?)
                .map_err(|e| StoreError::Tls(e.to_string()))?;

            builder = builder.identity(identity).add_root_certificate(ca);
        }

        builder.build().map_err(|e| StoreError::Tls(e.to_string()))
    }

    // 依次尝试每个集群成员，地址无效或传输层错误时切换到下一个成员
    async fn execute<F>(&self, build: F) -> Result<reqwest::Response, StoreError>
    where
        F: Fn(&str) -> Result<RequestBuilder, StoreError>,
    {
        let endpoints = self.endpoints().await;
        let mut last_error = StoreError::NoEndpoints;

        for endpoint in &endpoints {
            let request = match build(endpoint.as_str()) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Skipping invalid cluster member");
                    last_error = e;
                    continue;
                }
            };

            match request.send().await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        error = %e,
                        "etcd request failed, trying next cluster member"
                    );
                    last_error = StoreError::Transport(e);
                }
            }
        }

        Err(last_error)
    }

    async fn fetch_members(&self, endpoint: &str) -> Result<Vec<String>, StoreError> {
        let url = join_relative(endpoint, "v2/members")?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let list: MemberList = serde_json::from_slice(&body)?;
        let mut urls: Vec<String> = Vec::new();
        for url in list.members.into_iter().flat_map(|m| m.client_urls) {
            // 只接受 http/https 地址，其他成员地址会被丢弃
            let url = match normalize_endpoint(&url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unusable etcd member URL");
                    continue;
                }
            };
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        Ok(urls)
    }
}

#[async_trait]
impl StoreClient for EtcdClient {
    async fn sync_cluster(&self) -> bool {
        let endpoints = self.endpoints().await;

        for endpoint in &endpoints {
            match self.fetch_members(endpoint).await {
                Ok(members) if !members.is_empty() => {
                    tracing::debug!(
                        endpoint = %endpoint,
                        members = ?members,
                        "Synchronized etcd cluster members"
                    );
                    *self.endpoints.write().await = members;
                    return true;
                }
                Ok(_) => {
                    tracing::debug!(endpoint = %endpoint, "etcd member list is empty");
                }
                Err(e) => {
                    tracing::debug!(endpoint = %endpoint, error = %e, "Failed to fetch etcd members");
                }
            }
        }

        false
    }

    async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<EtcdResponse, StoreError> {
        let mut form = vec![("value", value.to_string())];
        if ttl > 0 {
            form.push(("ttl", ttl.to_string()));
        }

        let response = self
            .execute(|endpoint| Ok(self.http.put(key_url(endpoint, key)?).form(&form)))
            .await?;
        decode(response).await
    }

    async fn delete(&self, key: &str, recursive: bool) -> Result<EtcdResponse, StoreError> {
        let recursive = if recursive { "true" } else { "false" };

        let response = self
            .execute(|endpoint| {
                Ok(self
                    .http
                    .delete(key_url(endpoint, key)?)
                    .query(&[("recursive", recursive)]))
            })
            .await?;
        decode(response).await
    }

    async fn send_request(&self, request: RawRequest) -> Result<RawResponse, StoreError> {
        let response = self
            .execute(|endpoint| {
                let url = join_relative(endpoint, &request.relative_path)?;
                let mut builder = self.http.request(request.method.clone(), url);
                if !request.params.is_empty() {
                    builder = builder.query(&request.params);
                }
                if let Some(body) = &request.body {
                    builder = builder.body(body.clone());
                }
                Ok(builder)
            })
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

async fn decode(response: reqwest::Response) -> Result<EtcdResponse, StoreError> {
    let status = response.status();
    let body: Bytes = response.bytes().await?;
    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }
    Ok(serde_json::from_slice(&body)?)
}

fn error_from_body(status: StatusCode, body: &[u8]) -> StoreError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(err) => StoreError::Etcd {
            code: err.error_code,
            message: err.message,
            cause: err.cause,
            index: err.index,
        },
        Err(_) => StoreError::Status {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        },
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, StoreError> {
    std::fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize_endpoints(endpoints: &[String]) -> Result<Vec<String>, StoreError> {
    if endpoints.is_empty() {
        return Err(StoreError::NoEndpoints);
    }

    endpoints.iter().map(|endpoint| normalize_endpoint(endpoint)).collect()
}

fn normalize_endpoint(endpoint: &str) -> Result<String, StoreError> {
    let url = parse_endpoint(endpoint)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse_endpoint(endpoint: &str) -> Result<Url, StoreError> {
    let url = Url::parse(endpoint).map_err(|e| StoreError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(StoreError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

// {endpoint}/{relative_path}
fn join_relative(endpoint: &str, relative_path: &str) -> Result<Url, StoreError> {
    let mut url = parse_endpoint(endpoint)?;
    append_segments(&mut url, relative_path.split('/'))?;
    Ok(url)
}

// {endpoint}/v2/keys{key}，空路径段会被忽略
fn key_url(endpoint: &str, key: &str) -> Result<Url, StoreError> {
    let mut url = parse_endpoint(endpoint)?;
    append_segments(&mut url, ["v2", "keys"].into_iter().chain(key.split('/')))?;
    Ok(url)
}

fn append_segments<'a>(
    url: &mut Url,
    segments: impl Iterator<Item = &'a str>,
) -> Result<(), StoreError> {
    let endpoint = url.to_string();
    let mut path = url
        .path_segments_mut()
        .map_err(|_| StoreError::InvalidEndpoint {
            endpoint,
            reason: "endpoint cannot be a base URL".to_string(),
        })?;
    path.pop_if_empty();
    path.extend(segments.filter(|segment| !segment.is_empty()));
    Ok(())
}
