use super::dns_server_mock::answer_for;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use doh_gateway_domain::message::{decode_wire, encode_wire};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone)]
struct MockDohState {
    status: StatusCode,
    requests: Arc<AtomicUsize>,
    content_types: Arc<std::sync::Mutex<Vec<String>>>,
}

/// Plain-HTTP DoH endpoint at `/dns-query`. Replies with `status`; a 200
/// carries an A answer.
pub struct MockDohServer {
    addr: SocketAddr,
    state: MockDohState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDohServer {
    pub async fn start(status: StatusCode) -> Self {
        let state = MockDohState {
            status,
            requests: Arc::new(AtomicUsize::new(0)),
            content_types: Arc::new(std::sync::Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/dns-query", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/dns-query", self.addr)
    }

    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn content_types(&self) -> Vec<String> {
        self.state.content_types.lock().unwrap().clone()
    }
}

impl Drop for MockDohServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(
    State(state): State<MockDohState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if let Some(ct) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        state.content_types.lock().unwrap().push(ct.to_string());
    }

    if state.status != StatusCode::OK {
        return (state.status, Vec::new()).into_response();
    }

    let Ok(query) = decode_wire(&body) else {
        return (StatusCode::BAD_REQUEST, Vec::new()).into_response();
    };
    let mut response = answer_for(&query);
    // DoH servers are free to zero the id.
    response.set_id(0);
    (
        [(header::CONTENT_TYPE, "application/dns-message")],
        encode_wire(&response).unwrap(),
    )
        .into_response()
}
