//! 轮询测试用的 PLC 模拟服务端：固定 word 响应，可选每连接处理 N 个请求后断开。

#![allow(dead_code)]

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct MockPlc {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockPlc {
    pub async fn start(word: u16, close_after: Option<usize>) -> Self {
        Self::start_on(0, word, close_after).await
    }

    pub async fn start_on(port: u16, word: u16, close_after: Option<usize>) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, word, close_after));
            }
        });
        Self { addr, handle }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl Drop for MockPlc {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(mut stream: TcpStream, word: u16, close_after: Option<usize>) {
    let mut frame = [0u8; 38];
    let mut served = 0usize;
    while stream.read_exact(&mut frame).await.is_ok() {
        let count = usize::from(u16::from_le_bytes([frame[34], frame[35]]));
        let mut response = vec![0u8; 33];
        for _ in 0..count {
            response.extend_from_slice(&word.to_le_bytes());
        }
        if stream.write_all(&response).await.is_err() {
            return;
        }
        served += 1;
        if close_after.is_some_and(|limit| served >= limit) {
            return;
        }
    }
}

/// 返回一个当前没有监听者的本地端口。
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
