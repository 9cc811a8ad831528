//! PLC 数据采集网关：轮询 PLC 并写入 local / cloud 数据库。
//!
//! 退出码：0 正常停机，1 配置文件不存在，2 配置错误，99 其他启动错误。

mod wiring;

use domain::{DomainEvent, EventKind, EventSink, Notifier};
use plcgw_config::{ConfigError, ServiceConfig};
use plcgw_polling::{PollingConfig, PollingError, PollingOrchestrator};
use plcgw_protocol::RegisterMap;
use plcgw_storage::StorageError;
use plcgw_telemetry::{TelemetryMetrics, TracingEventSink, TracingNotifier, init_tracing};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid database configuration: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Polling(#[from] PollingError),
}

impl AppError {
    fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Config(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ExitCode::from(1)
            }
            AppError::Config(_) | AppError::Storage(_) => ExitCode::from(2),
            AppError::Polling(_) => ExitCode::from(99),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "service terminated");
            err.exit_code()
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = ServiceConfig::from_env()?;
    let events: Arc<dyn EventSink> = Arc::new(TracingEventSink);
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let metrics = Arc::new(TelemetryMetrics::new());

    let registers = Arc::new(RegisterMap::production());
    for (address, fields) in registers.duplicate_addresses() {
        warn!(address, ?fields, "register address shared by several fields");
    }

    let gateway = wiring::build_gateway(
        &config,
        Arc::clone(&events),
        Arc::clone(&notifier),
        Arc::clone(&metrics),
    )?;
    if gateway.destination_names().is_empty() {
        notifier.warn("no database destination enabled, readings will not be persisted");
    }
    for status in gateway.verify_all().await {
        info!(destination = %status.destination, available = status.available, "destination checked");
    }

    let connections = wiring::build_connections(&config, registers, Arc::clone(&events));
    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let orchestrator = PollingOrchestrator::new(
        PollingConfig {
            read_interval: config.read_interval(),
            reconnect_interval: config.reconnect_interval(),
            max_retries: config.max_retries,
        },
        connections,
        Arc::new(gateway),
        Arc::clone(&notifier),
        Arc::clone(&metrics),
        cancel,
    );

    events.record(DomainEvent::new(
        EventKind::ServiceStarted,
        format!("service started with {} PLC(s)", config.enabled_plcs().count()),
    ));
    let result = orchestrator.run().await;

    let snapshot = orchestrator.metrics();
    info!(
        passes = snapshot.passes,
        readings_ok = snapshot.readings_ok,
        readings_failed = snapshot.readings_failed,
        reconnect_attempts = snapshot.reconnect_attempts,
        "polling summary"
    );
    events.record(DomainEvent::new(EventKind::ServiceStopped, "service stopped"));
    result.map_err(AppError::from)
}

/// Ctrl-C 或 SIGTERM 触发取消。
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
    cancel.cancel();
}
