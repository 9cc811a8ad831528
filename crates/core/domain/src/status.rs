/// 单连接状态机的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// 连接状态快照（供编排器与外部上报读取）。
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionStatus {
    pub plc_id: u32,
    pub name: String,
    pub state: ConnectionState,
    pub connected: bool,
    pub last_read_at_ms: Option<i64>,
    pub last_connected_at_ms: Option<i64>,
    pub reconnect_attempts: u32,
    pub status_message: String,
}

impl ConnectionStatus {
    pub fn new(plc_id: u32, name: impl Into<String>) -> Self {
        Self {
            plc_id,
            name: name.into(),
            state: ConnectionState::Disconnected,
            connected: false,
            last_read_at_ms: None,
            last_connected_at_ms: None,
            reconnect_attempts: 0,
            status_message: "initializing".to_string(),
        }
    }

    /// 唯一的状态写入入口，保证 `connected` 与 `state` 一致。
    pub fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
        self.connected = state == ConnectionState::Connected;
    }
}
