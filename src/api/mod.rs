// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::any::Any;

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{ApiError, ErrorBody},
    explorer::ExplorerTransaction,
    relay::{IntegerInput, RelayRequest, RelayResult},
    state::AppState,
};

pub mod balance;
pub mod broadcast;
pub mod health;
pub mod history;
pub mod relay;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/relay", post(relay::relay_transaction))
        .route("/broadcast", post(broadcast::broadcast_transaction))
        .route("/balance", get(balance::get_balance))
        .route("/history", get(history::get_history))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(CorsLayer::permissive()),
        )
}

fn make_request_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %details, "Request handler panicked");
    ApiError::internal("Internal server error", details).into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        relay::relay_transaction,
        broadcast::broadcast_transaction,
        balance::get_balance,
        history::get_history,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RelayRequest,
            RelayResult,
            IntegerInput,
            ErrorBody,
            ExplorerTransaction,
            broadcast::BroadcastRequest,
            broadcast::BroadcastResponse,
            balance::BalanceResponse,
            history::HistoryResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Relay", description = "Gasless transaction relaying"),
        (name = "Accounts", description = "Balance and history lookups"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
