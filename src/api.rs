use std::sync::Arc;

use anyhow::{Error, Result};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    models::{
        audit::DeliveryAudit,
        event::NotificationEvent,
        health::{HealthCheckResponse, HealthStatus},
        receipt::DeliveryReceipt,
        response::ApiResponse,
    },
    utils::{EventOutcome, EventProcessor, reconcile_receipt},
};

pub struct AppState {
    pub processor: EventProcessor,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/events/listen", post(listen))
        .route("/events/confirm", post(confirm))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(state: Arc<AppState>, port: u16) -> Result<(), Error> {
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Notification service started");

    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct Processed {
    sent: usize,
}

async fn listen(
    State(state): State<Arc<AppState>>,
    Json(event): Json<NotificationEvent>,
) -> impl IntoResponse {
    match state.processor.handle_event(&event).await {
        EventOutcome::Processed { message, sent } => (
            StatusCode::ACCEPTED,
            Json(ApiResponse::success(Processed { sent }, message)),
        ),
        EventOutcome::Aborted(message) => (
            StatusCode::PARTIAL_CONTENT,
            Json(ApiResponse::error(message, "Notifying aborted".to_string())),
        ),
        EventOutcome::Failed(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(message, "Notifying failed".to_string())),
        ),
        EventOutcome::NotImplemented(message) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(ApiResponse::error(message, "Event is not supported".to_string())),
        ),
    }
}

async fn confirm(Json(receipt): Json<DeliveryReceipt>) -> impl IntoResponse {
    match reconcile_receipt(&receipt) {
        Ok(audit) => (
            StatusCode::OK,
            Json(ApiResponse::<DeliveryAudit>::success(
                audit,
                "Delivery receipt processed".to_string(),
            )),
        ),
        Err(e) => {
            warn!(receipt = %receipt.id, error = %e, "Delivery receipt rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    e.to_string(),
                    "Delivery receipt rejected".to_string(),
                )),
            )
        }
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = HealthCheckResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
        workflow_version: state.processor.resolver().version().to_string(),
    };

    (StatusCode::OK, Json(health))
}
