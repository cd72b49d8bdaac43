//! HTTP server for the capture API and health checks

use crate::capture::service::{run_capture, CaptureError, CaptureOptions, SignatureResult};
use crate::device::NetTablet;
use crate::render::{ButtonLabels, TransferInformation};
use crate::web::shared::SharedState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use uuid::Uuid;

/// Run the HTTP server
pub async fn run_http_server(state: Arc<SharedState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/signature", post(signature_handler))
        .with_state(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)?;

    Ok(())
}

/// Capture request body; everything is optional
#[derive(Debug, Default, Deserialize)]
pub struct SignatureRequest {
    /// Transaction summary rendered above the signature area
    #[serde(default)]
    pub transfer_information: Option<TransferInformation>,
}

/// Health check handler
async fn health_handler(State(state): State<Arc<SharedState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.uptime().as_secs_f64(),
        "capture_active": state.capture_active(),
        "captures_completed": state.captures_completed.load(Ordering::Relaxed),
        "captures_canceled": state.captures_canceled.load(Ordering::Relaxed),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Capture handler: connects to the tablet, runs one session, and
/// returns the signature as base64 PNG or a cancellation indicator.
async fn signature_handler(
    State(state): State<Arc<SharedState>>,
    body: Option<Json<SignatureRequest>>,
) -> (StatusCode, Json<Value>) {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let session_id = Uuid::new_v4();

    // One session per tablet; a second caller gets busy, not a queue
    let Ok(_permit) = state.device_permit.try_lock() else {
        warn!("[{}] Capture rejected, device busy", session_id);
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "a capture session is already active" })),
        );
    };

    let config = &state.config;
    let timeout = Duration::from_secs(config.device.connect_timeout_secs);
    let mut tablet = match NetTablet::connect(&config.device.addr, timeout).await {
        Ok(tablet) => tablet,
        Err(e) => {
            warn!("[{}] Tablet not reachable: {}", session_id, e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": format!("signature pad not connected: {}", e) })),
            );
        }
    };

    let options = CaptureOptions {
        settle_delay: Duration::from_millis(config.device.settle_delay_ms),
        pen_data_option_mode: config.device.pen_data_option_mode,
    };
    let labels = ButtonLabels::from_ui_config(&config.ui);

    info!("[{}] Capture session starting", session_id);
    state.capture_active.store(true, Ordering::Relaxed);
    let result = run_capture(
        &mut tablet,
        &options,
        &labels,
        &state.font,
        request.transfer_information.as_ref(),
    )
    .await;
    state.capture_active.store(false, Ordering::Relaxed);

    match result {
        Ok(SignatureResult::Completed { png }) => {
            state.captures_completed.fetch_add(1, Ordering::Relaxed);
            info!("[{}] Capture completed ({} byte image)", session_id, png.len());
            let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
            (
                StatusCode::OK,
                Json(json!({ "status": "completed", "image": encoded })),
            )
        }
        Ok(SignatureResult::Canceled) => {
            state.captures_canceled.fetch_add(1, Ordering::Relaxed);
            info!("[{}] Capture canceled by signer", session_id);
            (StatusCode::OK, Json(json!({ "status": "canceled" })))
        }
        Err(CaptureError::Precondition(msg)) => {
            warn!("[{}] Capture precondition failed: {}", session_id, msg);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": msg })),
            )
        }
        Err(e) => {
            error!("[{}] Capture failed: {}", session_id, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "signature capture failed" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::render::LabelFont;

    fn state() -> Arc<SharedState> {
        Arc::new(SharedState::new(Config::default(), LabelFont::none()))
    }

    #[tokio::test]
    async fn health_reports_idle() {
        let state = state();
        let Json(body) = health_handler(State(state)).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["capture_active"], false);
    }

    #[tokio::test]
    async fn concurrent_capture_is_rejected_as_busy() {
        let state = state();
        let _held = state.device_permit.lock().await;

        let (status, Json(body)) = signature_handler(State(state.clone()), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("already active"));
    }

    #[tokio::test]
    async fn unreachable_pad_is_a_validation_error() {
        let mut config = Config::default();
        // Nothing listens here
        config.device.addr = "127.0.0.1:1".to_string();
        config.device.connect_timeout_secs = 1;
        let state = Arc::new(SharedState::new(config, LabelFont::none()));

        let (status, Json(body)) = signature_handler(State(state), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("not connected"));
    }
}
