// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Raw transaction pass-through.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::NodeError,
    error::{ApiError, ErrorBody, ErrorKind},
    relay::request::parse_hex,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    /// EIP-2718 encoded signed transaction (hex)
    pub raw_transaction: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    pub tx_hash: String,
}

/// Submit an already-signed transaction to the node unchanged.
#[utoipa::path(
    post,
    path = "/broadcast",
    tag = "Relay",
    request_body = BroadcastRequest,
    responses(
        (status = 200, description = "Transaction submitted", body = BroadcastResponse),
        (status = 400, description = "Missing or malformed transaction", body = ErrorBody),
        (status = 502, description = "Node rejected the transaction", body = ErrorBody),
        (status = 503, description = "Node unavailable", body = ErrorBody)
    )
)]
pub async fn broadcast_transaction(
    State(state): State<AppState>,
    payload: Result<Json<BroadcastRequest>, JsonRejection>,
) -> Result<Json<BroadcastResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::malformed(rejection.body_text()))?;

    let raw = request
        .raw_transaction
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| ApiError::missing_parameter("Missing rawTransaction"))?;
    let raw = parse_hex("rawTransaction", &raw).map_err(ApiError::from)?;
    if raw.is_empty() {
        return Err(ApiError::missing_parameter("Missing rawTransaction"));
    }

    let tx_hash = state.node.broadcast_raw(raw).await.map_err(|e| match e {
        NodeError::Rpc { message, .. } => {
            ApiError::new(ErrorKind::BroadcastFailed, "Failed to broadcast transaction")
                .with_details(message)
        }
        NodeError::Unavailable(message) | NodeError::InvalidRpcUrl(message) => {
            ApiError::new(ErrorKind::NodeUnavailable, "Node unavailable").with_details(message)
        }
        NodeError::Signing(message) => ApiError::internal("Failed to broadcast transaction", message),
    })?;

    tracing::info!(tx_hash = %tx_hash, "Broadcast raw transaction");
    Ok(Json(BroadcastResponse {
        tx_hash: format!("{tx_hash:#x}"),
    }))
}
