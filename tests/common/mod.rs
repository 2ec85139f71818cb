#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, Request, header},
    response::IntoResponse,
    routing::post,
};
use face_relay::{AppState, app::build_router, config::RelayConfig};

pub const BOUNDARY: &str = "face-relay-test-boundary-7MA4YWxkTrZu0gW";

/// 测试用 multipart 分片
pub struct TestPart<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub bytes: &'a [u8],
}

impl<'a> TestPart<'a> {
    pub fn file(file_name: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            name: "file",
            file_name: Some(file_name),
            content_type: Some("image/jpeg"),
            bytes,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: None,
            bytes: value.as_bytes(),
        }
    }
}

pub fn multipart_body(parts: &[TestPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{file_name}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(ct) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(parts: &[TestPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload-face")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("build upload request")
}

/// 不含 CR/LF 组合的确定性二进制内容
pub fn sample_bytes(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed) | 0x80)
        .collect()
}

pub fn relay_config(downstream_url: &str) -> RelayConfig {
    RelayConfig {
        downstream_url: downstream_url.to_string(),
        ..RelayConfig::default()
    }
}

pub fn relay_app(downstream_url: &str) -> Router {
    relay_app_with(relay_config(downstream_url))
}

pub fn relay_app_with(cfg: RelayConfig) -> Router {
    let state = AppState::new(&cfg).expect("build app state");
    build_router(state, &cfg)
}

/// 假识别服务收到的分片
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// 假识别服务收到的请求
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: Option<String>,
    pub parts: Vec<ReceivedPart>,
}

#[derive(Clone, Default)]
pub struct EchoDownstream {
    pub url: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl EchoDownstream {
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().expect("lock").clone()
    }
}

async fn echo_first_part(
    State(store): State<Arc<Mutex<Vec<ReceivedRequest>>>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_owned);
        let file_name = field.file_name().map(str::to_owned);
        let part_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.unwrap_or_default();
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type: part_type,
            bytes,
        });
    }

    let echo = parts.first().map(|p| p.bytes.clone()).unwrap_or_default();
    store.lock().expect("lock").push(ReceivedRequest {
        content_type,
        parts,
    });

    ([(header::CONTENT_TYPE, "application/octet-stream")], echo)
}

/// 启动一个进程内假识别服务：记录收到的 multipart，并把第一个分片原样回显。
pub async fn start_echo_downstream() -> EchoDownstream {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/recognize-face", post(echo_first_part))
        .layer(DefaultBodyLimit::disable())
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind downstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    EchoDownstream {
        url: format!("http://{addr}/recognize-face"),
        received,
    }
}

/// 返回一个当前无人监听的地址（连接会被拒绝）
pub fn refused_downstream_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/recognize-face")
}
