// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance query endpoint.

use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    blockchain::{NodeError, TokenType},
    error::{ApiError, ErrorBody, ErrorKind},
    relay::{read_balance, request::parse_address, BalanceError},
    state::AppState,
};

/// Query parameters for balance request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    /// Account address
    pub address: Option<String>,
    /// `eth` (default), `erc20` or `erc721`
    pub token_type: Option<String>,
}

/// Balance response.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Queried address, as given
    pub address: String,
    /// Ether with six decimals for `eth`; integer units or token count otherwise
    pub balance: String,
}

/// Get the balance of an address.
#[utoipa::path(
    get,
    path = "/balance",
    tag = "Accounts",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balance retrieved successfully", body = BalanceResponse),
        (status = 400, description = "Missing or malformed parameter", body = ErrorBody),
        (status = 500, description = "Failed to fetch balance", body = ErrorBody)
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let address = query
        .address
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ApiError::missing_parameter("Missing address parameter"))?;
    let holder = parse_address("address", &address).map_err(ApiError::from)?;
    let token_type = TokenType::from_str(query.token_type.as_deref().unwrap_or_default())
        .map_err(ApiError::malformed)?;

    let balance = read_balance(state.node.as_ref(), &state.tokens, holder, token_type)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, address = %holder, "Balance lookup failed");
            match &e {
                BalanceError::NotConfigured(_) => ApiError::new(ErrorKind::BuildFailed, e.to_string()),
                BalanceError::Node(node) => {
                    let kind = match node {
                        NodeError::Rpc { .. } => ErrorKind::NodeRpcError,
                        _ => ErrorKind::NodeUnavailable,
                    };
                    ApiError::upstream(kind, "Failed to fetch balance", node.to_string())
                }
            }
        })?;

    Ok(Json(BalanceResponse { address, balance }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::TokenContracts;
    use crate::test_support::{MockExplorer, MockNode};
    use alloy::primitives::U256;
    use axum::http::StatusCode;
    use std::sync::Arc;

    const ADDRESS: &str = "0x00000000000000000000000000000000000000aA";

    fn state(node: MockNode) -> AppState {
        AppState::new(
            Arc::new(node),
            Arc::new(MockExplorer::with_transactions(Vec::new())),
            TokenContracts::default(),
        )
    }

    fn query(address: Option<&str>, token_type: Option<&str>) -> Query<BalanceQuery> {
        Query(BalanceQuery {
            address: address.map(str::to_string),
            token_type: token_type.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn zero_balance_is_formatted() {
        let Json(response) = get_balance(State(state(MockNode::new())), query(Some(ADDRESS), None))
            .await
            .unwrap();
        assert_eq!(response.balance, "0.000000");
        assert_eq!(response.address, ADDRESS);
    }

    #[tokio::test]
    async fn native_balance_rounds_to_six_decimals() {
        let node = MockNode::new().with_native_balance(U256::from(1_234_567_890_000_000_000u64));
        let Json(response) = get_balance(State(state(node)), query(Some(ADDRESS), Some("eth")))
            .await
            .unwrap();
        assert_eq!(response.balance, "1.234568");
    }

    #[tokio::test]
    async fn missing_address_is_bad_request() {
        let err = get_balance(State(state(MockNode::new())), query(None, None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing address parameter");
    }

    #[tokio::test]
    async fn malformed_address_is_bad_request() {
        let err = get_balance(State(state(MockNode::new())), query(Some("0x12"), None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.kind, ErrorKind::MalformedInput);
    }

    #[tokio::test]
    async fn node_failure_is_internal_error_with_details() {
        let node = MockNode::new().with_balance_error(NodeError::Unavailable("timed out".into()));
        let err = get_balance(State(state(node)), query(Some(ADDRESS), None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to fetch balance");
        assert!(err.details.unwrap().contains("timed out"));
    }
}
