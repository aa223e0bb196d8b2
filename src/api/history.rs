// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction history endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{ApiError, ErrorBody, ErrorKind},
    explorer::{ExplorerError, ExplorerTransaction},
    relay::request::parse_address,
    state::AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Account address
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Transactions newest first; empty when the account has none
    pub transactions: Vec<ExplorerTransaction>,
}

/// Get the transaction history of an address from the block explorer.
#[utoipa::path(
    get,
    path = "/history",
    tag = "Accounts",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History retrieved successfully", body = HistoryResponse),
        (status = 400, description = "Missing or malformed parameter", body = ErrorBody),
        (status = 500, description = "Failed to fetch transaction history", body = ErrorBody)
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let address = query
        .address
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ApiError::missing_parameter("Missing address parameter"))?;
    let address = parse_address("address", &address).map_err(ApiError::from)?;

    let transactions = state.explorer.fetch_history(address).await.map_err(|e| {
        tracing::warn!(error = %e, address = %address, "History lookup failed");
        let kind = match e {
            ExplorerError::Unavailable(_) => ErrorKind::ExplorerUnavailable,
            ExplorerError::Api(_) | ExplorerError::InvalidResponse(_) => ErrorKind::Internal,
        };
        ApiError::upstream(kind, "Failed to fetch transaction history", e.to_string())
    })?;

    Ok(Json(HistoryResponse { transactions }))
}
