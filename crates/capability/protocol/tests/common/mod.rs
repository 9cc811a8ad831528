//! 测试用的 PLC 模拟服务端。
//!
//! 按请求帧中的地址返回预置 word，可注入静默、短响应与主动断开。

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default)]
pub struct MockPlcConfig {
    /// 地址 → 响应 word
    pub registers: HashMap<u32, Vec<u16>>,
    /// 收到请求后不回复的地址
    pub silent: HashSet<u32>,
    /// 只回 10 字节的地址
    pub short: HashSet<u32>,
    /// 每个连接处理 N 个请求后关闭
    pub close_after: Option<usize>,
}

impl MockPlcConfig {
    pub fn with_float(mut self, address: u32, value: f32) -> Self {
        let bits = value.to_bits();
        self.registers
            .insert(address, vec![(bits & 0xFFFF) as u16, (bits >> 16) as u16]);
        self
    }

    pub fn with_words(mut self, address: u32, words: Vec<u16>) -> Self {
        self.registers.insert(address, words);
        self
    }

    pub fn with_text(self, address: u32, text: &str) -> Self {
        let words = text
            .as_bytes()
            .chunks(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
            .collect();
        self.with_words(address, words)
    }

    pub fn silent_at(mut self, address: u32) -> Self {
        self.silent.insert(address);
        self
    }

    pub fn short_at(mut self, address: u32) -> Self {
        self.short.insert(address);
        self
    }

    pub fn close_after(mut self, requests: usize) -> Self {
        self.close_after = Some(requests);
        self
    }
}

pub struct MockPlc {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    accepted: Arc<AtomicUsize>,
    selectors: Arc<Mutex<Vec<(u32, [u8; 2])>>>,
    handle: JoinHandle<()>,
}

impl MockPlc {
    pub async fn start(config: MockPlcConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));
        let accepted = Arc::new(AtomicUsize::new(0));
        let selectors = Arc::new(Mutex::new(Vec::new()));
        let config = Arc::new(config);

        let handle = {
            let requests = Arc::clone(&requests);
            let accepted = Arc::clone(&accepted);
            let selectors = Arc::clone(&selectors);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    accepted.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(serve(
                        stream,
                        Arc::clone(&config),
                        Arc::clone(&requests),
                        Arc::clone(&selectors),
                    ));
                }
            })
        };

        Self {
            addr,
            requests,
            accepted,
            selectors,
            handle,
        }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// 收到的每个请求的 `(地址, 内存区选择字节)`。
    pub fn selectors(&self) -> Vec<(u32, [u8; 2])> {
        self.selectors.lock().unwrap().clone()
    }
}

impl Drop for MockPlc {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    config: Arc<MockPlcConfig>,
    requests: Arc<AtomicUsize>,
    selectors: Arc<Mutex<Vec<(u32, [u8; 2])>>>,
) {
    let mut frame = [0u8; 38];
    let mut served = 0usize;
    loop {
        if stream.read_exact(&mut frame).await.is_err() {
            return;
        }
        requests.fetch_add(1, Ordering::SeqCst);

        let address = u32::from_le_bytes([frame[30], frame[31], frame[32], 0]);
        let count = usize::from(u16::from_le_bytes([frame[34], frame[35]]));
        selectors.lock().unwrap().push((address, [frame[28], frame[29]]));

        if config.silent.contains(&address) {
            continue;
        }

        let response = if config.short.contains(&address) {
            vec![0u8; 10]
        } else {
            let mut bytes = vec![0u8; 33];
            let words = config.registers.get(&address);
            for i in 0..count {
                let word = words.and_then(|w| w.get(i)).copied().unwrap_or(0);
                bytes.extend_from_slice(&word.to_le_bytes());
            }
            bytes
        };

        if stream.write_all(&response).await.is_err() {
            return;
        }

        served += 1;
        if config.close_after.is_some_and(|limit| served >= limit) {
            return;
        }
    }
}

/// 返回一个当前没有监听者的本地端口。
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// backlog 已满、不再完成握手的监听端口。
pub struct StalledListener {
    _listener: tokio::net::TcpListener,
    _fillers: Vec<TcpStream>,
    port: u16,
}

impl StalledListener {
    pub async fn start() -> Self {
        let socket = tokio::net::TcpSocket::new_v4().unwrap();
        socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let listener = socket.listen(1).unwrap();
        let addr = listener.local_addr().unwrap();

        // 不 accept，连接填满队列后新的 SYN 被丢弃
        let mut fillers = Vec::new();
        for _ in 0..8 {
            match tokio::time::timeout(
                std::time::Duration::from_millis(100),
                TcpStream::connect(addr),
            )
            .await
            {
                Ok(Ok(stream)) => fillers.push(stream),
                _ => break,
            }
        }

        Self {
            _listener: listener,
            _fillers: fillers,
            port: addr.port(),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
