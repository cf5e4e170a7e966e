use crate::error::FinviewError;
use crate::orchestrator::ScanOrchestrator;
use crate::resolver;
use crate::view::DashboardView;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn, Level};

pub struct AppState {
    pub orchestrator: ScanOrchestrator,
}

impl AppState {
    pub fn new(orchestrator: ScanOrchestrator) -> Self {
        Self { orchestrator }
    }
}

impl IntoResponse for FinviewError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ScanInProgress => StatusCode::CONFLICT,
            Self::BackendUnavailable(_) | Self::FallbackProvider { .. } => StatusCode::BAD_GATEWAY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/scan", post(scan))
        .route("/api/dashboard", get(dashboard))
        .route("/ws", get(ws_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "finview",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn status(State(s): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let backend = match s.orchestrator.backend_health().await {
        Ok(h) => serde_json::json!({ "healthy": h.status == "ok", "status": h.status, "time": h.time }),
        Err(e) => serde_json::json!({ "healthy": false, "error": e.to_string() }),
    };

    Json(serde_json::json!({
        "scanning": s.orchestrator.is_scanning(),
        "cyclesCompleted": s.orchestrator.cycles_completed().await,
        "seenSignals": s.orchestrator.seen_count().await,
        "supportedSymbols": resolver::supported_symbols(),
        "backend": backend
    }))
}

async fn scan(State(s): State<Arc<AppState>>) -> Response {
    match s.orchestrator.scan().await {
        Ok(report) => Json(report).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn dashboard(State(s): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(s.orchestrator.view().await)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn send_snapshot(sender: &mut SplitSink<WebSocket, Message>, view: &DashboardView) -> bool {
    let frame = serde_json::json!({ "type": "snapshot", "data": view });
    let bytes = match rmp_serde::to_vec(&frame) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("[WS] Failed to encode snapshot: {}", e);
            return true;
        }
    };
    sender.send(Message::Binary(bytes)).await.is_ok()
}

/// A rejected re-entrant scan is expected and only logged at debug.
fn log_scan_failure(e: &FinviewError) -> Level {
    match e {
        FinviewError::ScanInProgress => {
            debug!("[WS] Scan request ignored, a scan is already running");
            Level::DEBUG
        }
        _ => {
            warn!("[WS] Scan request failed: {}", e);
            Level::WARN
        }
    }
}

fn handle_client_frame(state: &Arc<AppState>, data: &[u8]) {
    let Ok(m) = rmp_serde::from_slice::<serde_json::Value>(data) else {
        debug!("[WS] Ignoring undecodable frame ({} bytes)", data.len());
        return;
    };
    match m.get("type").and_then(|v| v.as_str()) {
        Some("scan") => {
            let state = Arc::clone(state);
            tokio::spawn(async move {
                if let Err(e) = state.orchestrator.scan().await {
                    log_scan_failure(&e);
                }
            });
        }
        Some("heartbeat") => {}
        other => debug!("[WS] Unknown message type: {:?}", other),
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut updates = state.orchestrator.subscribe();
    info!("[WS] Dashboard client connected");

    if !send_snapshot(&mut sender, &state.orchestrator.view().await).await {
        return;
    }

    loop {
        tokio::select! {
            msg = receiver.next() => match msg {
                Some(Ok(Message::Binary(data))) => handle_client_frame(&state, &data),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    warn!("[WS] WebSocket error: {}", e);
                    break;
                }
                Some(Ok(_)) => {}
            },
            update = updates.recv() => match update {
                Ok(view) => {
                    if !send_snapshot(&mut sender, &view).await {
                        break;
                    }
                }
                // the next published view carries the full state
                Err(RecvError::Lagged(skipped)) => debug!("[WS] Client lagged by {} update(s)", skipped),
                Err(RecvError::Closed) => break,
            },
        }
    }
    info!("[WS] Dashboard client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_scan_is_quiet_but_backend_failure_warns() {
        assert_eq!(log_scan_failure(&FinviewError::ScanInProgress), Level::DEBUG);
        assert_eq!(
            log_scan_failure(&FinviewError::BackendUnavailable("connection refused".into())),
            Level::WARN
        );
    }
}
