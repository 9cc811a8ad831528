//! 按配置组装目的地、持久化网关与 PLC 连接。

use domain::{EventSink, Notifier};
use plcgw_config::ServiceConfig;
use plcgw_pipeline::PersistenceGateway;
use plcgw_protocol::{ConnectionConfig, PlcConnection, PlcEndpoint, RegisterMap};
use plcgw_storage::{PgReadingStore, StorageError};
use plcgw_telemetry::TelemetryMetrics;
use std::sync::Arc;

/// 只加入启用的目的地；连接池惰性建立，不在这里访问数据库。
pub fn build_gateway(
    config: &ServiceConfig,
    events: Arc<dyn EventSink>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<TelemetryMetrics>,
) -> Result<PersistenceGateway, StorageError> {
    let mut builder = PersistenceGateway::builder()
        .events(events)
        .notifier(notifier)
        .metrics(metrics);

    let destinations = [
        ("local", &config.databases.local),
        ("cloud", &config.databases.cloud),
    ];
    for (name, database) in destinations {
        if !database.enabled {
            continue;
        }
        let store = PgReadingStore::connect_lazy(&database.connection_string)?;
        builder = builder.destination(name, Arc::new(store));
    }
    Ok(builder.build())
}

/// 为每个启用的 PLC 建立一个（尚未连接的）连接。
pub fn build_connections(
    config: &ServiceConfig,
    registers: Arc<RegisterMap>,
    events: Arc<dyn EventSink>,
) -> Vec<PlcConnection> {
    config
        .enabled_plcs()
        .map(|plc| {
            PlcConnection::new(
                PlcEndpoint::new(plc.id, plc.name.clone(), plc.host.clone(), plc.port),
                Arc::clone(&registers),
                ConnectionConfig::new(config.read_timeout()),
                Arc::clone(&events),
            )
        })
        .collect()
}
