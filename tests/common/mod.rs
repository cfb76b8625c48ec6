//! Local HTTP server for exercising the downloader against real sockets.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct TestServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    /// Starts the server on an ephemeral port in a background thread.
    pub fn start() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test server");
        listener.set_nonblocking(true).expect("set nonblocking");
        let addr = listener.local_addr().expect("local addr");

        let hits = Arc::new(AtomicUsize::new(0));
        let app = router(hits.clone());

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("serve");
            });
        });

        Self { addr, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Number of requests the server has received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/gone", addr)
}

fn router(hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/hello", get(|| async { "hello" }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "not found") }))
        .route("/created", get(|| async { (StatusCode::CREATED, "created") }))
        .route("/json", get(|| async { json_body(r#"{"a":1}"#) }))
        .route("/json-trailing", get(|| async { json_body(r#"{"a":1} trailing"#) }))
        .route("/wrong-shape", get(|| async { json_body(r#"{"a":"one"}"#) }))
        .route("/not-json", get(|| async { "not-json" }))
        .route("/truncated", get(truncated))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        )
        .layer(middleware::from_fn_with_state(hits, count_requests))
}

async fn count_requests(State(hits): State<Arc<AtomicUsize>>, request: Request, next: Next) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

fn json_body(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

/// Sends part of a chunked body, then aborts the connection.
async fn truncated() -> Body {
    let chunks: Vec<(u64, Result<Bytes, std::io::Error>)> = vec![
        (0, Ok(Bytes::from_static(b"partial"))),
        (100, Err(std::io::Error::other("connection dropped"))),
    ];

    Body::from_stream(futures::stream::iter(chunks).then(|(delay_ms, chunk)| async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        chunk
    }))
}
