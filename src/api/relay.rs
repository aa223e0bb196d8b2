// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gasless relay endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    error::{ApiError, ErrorBody},
    relay::{RelayRequest, RelayResult},
    state::AppState,
};

/// Relay a client-signed transfer, paying gas from the relayer account.
///
/// The client signs `keccak256(from ‖ to ‖ value ‖ nonce ‖ data)` as a
/// personal message. If the recovered signer equals `from`, the relayer
/// sends the matching transfer and returns its hash.
#[utoipa::path(
    post,
    path = "/relay",
    tag = "Relay",
    request_body = RelayRequest,
    responses(
        (status = 200, description = "Transaction broadcast", body = RelayResult),
        (status = 400, description = "Missing or malformed input, or invalid signature", body = ErrorBody),
        (status = 401, description = "Signature does not match sender", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
        (status = 502, description = "Node rejected the transaction", body = ErrorBody),
        (status = 503, description = "Node unavailable", body = ErrorBody)
    )
)]
pub async fn relay_transaction(
    State(state): State<AppState>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::malformed(rejection.body_text()))?;

    let result = state.relay.relay(request).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::TokenContracts;
    use crate::error::ErrorKind;
    use crate::test_support::{signed_request, MockExplorer, MockNode};
    use alloy::primitives::address;
    use alloy::signers::local::PrivateKeySigner;
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn state(node: Arc<MockNode>) -> AppState {
        AppState::new(
            node,
            Arc::new(MockExplorer::with_transactions(Vec::new())),
            TokenContracts::default(),
        )
    }

    #[tokio::test]
    async fn relays_signed_request() {
        let node = Arc::new(MockNode::new());
        let signer = PrivateKeySigner::random();
        let request = signed_request(
            &signer,
            address!("000000000000000000000000000000000000beef"),
            1,
            0,
            None,
            None,
        );

        let Json(result) = relay_transaction(State(state(node.clone())), Ok(Json(request)))
            .await
            .unwrap();
        assert!(result.tx_hash.starts_with("0x"));
        assert_eq!(node.broadcasts(), 1);
    }

    #[tokio::test]
    async fn empty_body_is_missing_parameter() {
        let node = Arc::new(MockNode::new());
        let err = relay_transaction(State(state(node.clone())), Ok(Json(RelayRequest::default())))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.kind, ErrorKind::MissingParameter);
        assert_eq!(node.network_calls(), 0);
    }
}
