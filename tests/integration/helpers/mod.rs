// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;

/// 本地测试服务器，记录每个路由被请求的次数
pub struct TestServer {
    pub base_url: String,
    pub hits: Arc<ServerHits>,
}

#[derive(Default)]
pub struct ServerHits {
    pub health: AtomicUsize,
    pub unavailable: AtomicUsize,
    pub flaky: AtomicUsize,
}

impl ServerHits {
    pub fn health(&self) -> usize {
        self.health.load(Ordering::SeqCst)
    }

    pub fn unavailable(&self) -> usize {
        self.unavailable.load(Ordering::SeqCst)
    }

    pub fn flaky(&self) -> usize {
        self.flaky.load(Ordering::SeqCst)
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// 启动 HTTP 测试服务器
///
/// - `/health`：200，响应体 `status: ok`
/// - `/unavailable`：503，响应体同样包含 `status: ok`
/// - `/flaky`：第一次请求 500，之后 200
pub async fn start_http_server() -> TestServer {
    let hits = Arc::new(ServerHits::default());

    let app = Router::new()
        .route(
            "/health",
            get(|State(hits): State<Arc<ServerHits>>| async move {
                hits.health.fetch_add(1, Ordering::SeqCst);
                "status: ok"
            }),
        )
        .route(
            "/unavailable",
            get(|State(hits): State<Arc<ServerHits>>| async move {
                hits.unavailable.fetch_add(1, Ordering::SeqCst);
                (StatusCode::SERVICE_UNAVAILABLE, "status: ok")
            }),
        )
        .route(
            "/flaky",
            get(|State(hits): State<Arc<ServerHits>>| async move {
                if hits.flaky.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::INTERNAL_SERVER_ERROR, "warming up")
                } else {
                    (StatusCode::OK, "status: ok")
                }
            }),
        )
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        hits,
    }
}

/// 启动只接受连接的 TCP 服务器，返回地址和已接受的连接数
pub async fn start_tcp_listener() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(socket);
        }
    });

    (addr, accepted)
}

/// 获取一个当前无人监听的本地端口
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
