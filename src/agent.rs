use std::future::Future;
use std::sync::Arc;

use tokio::time::{Duration, Instant, interval_at};

use crate::config::Config;
use crate::services::registry::{
    AdapterRegistry, ETCD_TLS_SCHEME, EtcdTlsFactory, RegistryAdapter, ServiceRecord,
};

/// 根据配置创建适配器并维持配置中的服务注册，直到收到 Ctrl-C
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let uri = config.registry_uri()?;
    let tls = config.tls_config()?;

    let registry = AdapterRegistry::new();
    registry.register(
        ETCD_TLS_SCHEME,
        Arc::new(
            EtcdTlsFactory::new(tls).with_timeouts(config.request_timeout(), config.connect_timeout()),
        ),
    );

    let adapter = registry.create(&uri)?;
    adapter.ping().await?;
    tracing::info!(uri = %uri, "Connected to etcd");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
    };

    run(
        adapter.as_ref(),
        &config.services,
        config.refresh_interval(),
        shutdown,
    )
    .await;

    Ok(())
}

/// 注册所有服务，按间隔刷新，`shutdown` 完成后注销
pub async fn run<F>(
    adapter: &dyn RegistryAdapter,
    services: &[ServiceRecord],
    refresh_interval: Duration,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    for service in services {
        match adapter.register(service).await {
            Ok(()) => tracing::info!(
                service_name = %service.name,
                service_id = %service.id,
                address = %service.address(),
                "Registered service"
            ),
            // 下一次刷新会重试
            Err(e) => tracing::warn!(service_id = %service.id, error = %e, "Initial registration failed"),
        }
    }

    let mut ticker = interval_at(Instant::now() + refresh_interval, refresh_interval);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for service in services {
                    if let Err(e) = adapter.refresh(service).await {
                        tracing::warn!(service_id = %service.id, error = %e, "Refresh failed");
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }

    for service in services {
        match adapter.deregister(service).await {
            Ok(()) => tracing::info!(service_id = %service.id, "Deregistered service"),
            Err(e) => tracing::warn!(service_id = %service.id, error = %e, "Deregistration failed"),
        }
    }
}
