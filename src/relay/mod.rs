// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Relay Orchestration
//!
//! Drives one relay request through its stages:
//!
//! ```text
//! Received -> Validated -> SignatureChecked -> Built -> Broadcast -> BalanceFetched -> Responded
//! ```
//!
//! Any stage before `Broadcast` may fail, and no transaction is sent in that
//! case. A failed balance read after a successful broadcast does not fail
//! the request: the response carries the hash with a `null` balance.

pub mod balance;
pub mod error;
pub mod request;

use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::TxHash;
use serde::Serialize;
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::blockchain::{
    build_erc20_transfer, build_erc721_transfer, build_native_transfer, encode_intent,
    recover_signer, to_signable_digest, verify, BuildError, NodeClient, NodeError,
    TokenContracts, TokenType, UnsignedTx,
};

pub use balance::{read_balance, BalanceError};
pub use error::RelayError;
pub use request::{IntegerInput, RelayIntent, RelayRequest};

/// Progress of a relay request, recorded in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStage {
    Received,
    Validated,
    SignatureChecked,
    Built,
    Broadcast,
    BalanceFetched,
    Responded,
}

/// Successful relay response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelayResult {
    /// e.g. "ETH transaction relayed successfully!"
    pub message: String,
    /// Hash of the relayer-signed transaction
    pub tx_hash: String,
    /// Sender balance after broadcast, `null` if it could not be read
    pub balance: Option<String>,
}

pub struct RelayService {
    node: Arc<dyn NodeClient>,
    tokens: TokenContracts,
}

impl RelayService {
    pub fn new(node: Arc<dyn NodeClient>, tokens: TokenContracts) -> Self {
        Self { node, tokens }
    }

    /// Verify a signed intent and broadcast the matching transaction.
    pub async fn relay(&self, request: RelayRequest) -> Result<RelayResult, RelayError> {
        let span = tracing::info_span!("relay", relay_id = %Uuid::new_v4());
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: RelayRequest) -> Result<RelayResult, RelayError> {
        trace_stage(RelayStage::Received);
        let intent = request.validate().inspect_err(|e| {
            tracing::info!(error = %e, "Rejected relay request");
        })?;
        trace_stage(RelayStage::Validated);

        check_signature(&intent)?;
        trace_stage(RelayStage::SignatureChecked);

        let token_type = TokenType::from_str(intent.token_type.as_deref().unwrap_or_default())
            .map_err(|_| {
                BuildError::UnsupportedTokenType(intent.token_type.clone().unwrap_or_default())
            })?;
        let tx = self.build(&intent, token_type).await?;
        trace_stage(RelayStage::Built);

        let tx_hash = self.broadcast(tx).await?;
        trace_stage(RelayStage::Broadcast);
        tracing::info!(
            tx_hash = %tx_hash,
            from = %intent.from,
            to = %intent.to,
            token_type = %token_type,
            "Relayed transaction"
        );

        let balance = match read_balance(self.node.as_ref(), &self.tokens, intent.from, token_type)
            .await
        {
            Ok(balance) => Some(balance),
            Err(e) => {
                tracing::warn!(error = %e, tx_hash = %tx_hash, "Failed to read balance after broadcast");
                None
            }
        };
        trace_stage(RelayStage::BalanceFetched);

        let result = RelayResult {
            message: format!("{} transaction relayed successfully!", token_type.label()),
            tx_hash: format!("{tx_hash:#x}"),
            balance,
        };
        trace_stage(RelayStage::Responded);
        Ok(result)
    }

    async fn build(
        &self,
        intent: &RelayIntent,
        token_type: TokenType,
    ) -> Result<UnsignedTx, RelayError> {
        // Resolve the contract before touching the node
        let token = match token_type.standard() {
            None => None,
            Some(standard) => Some(self.tokens.contract_for(standard).ok_or(
                BuildError::TokenNotConfigured(token_type.label()),
            )?),
        };

        let relayer = self.node.relayer_address();
        let nonce = self.node.get_nonce(relayer, true).await?;
        let gas_price = self.node.get_gas_price().await?;
        let chain_id = self.node.get_chain_id().await?;

        let tx = match (token_type, token) {
            (TokenType::Erc20, Some(token)) => {
                build_erc20_transfer(token, intent.to, intent.value, nonce, gas_price, chain_id)?
            }
            (TokenType::Erc721, Some(token)) => build_erc721_transfer(
                token,
                intent.from,
                intent.to,
                intent.value,
                nonce,
                gas_price,
                chain_id,
            )?,
            _ => build_native_transfer(
                intent.to,
                &intent.value.to_string(),
                nonce,
                gas_price,
                chain_id,
                intent.data.clone(),
            )?,
        };

        tracing::debug!(nonce, gas_price, chain_id, "Built relay transaction");
        Ok(tx)
    }

    async fn broadcast(&self, tx: UnsignedTx) -> Result<TxHash, RelayError> {
        self.node.sign_and_broadcast(tx).await.map_err(|e| match e {
            NodeError::Rpc { code, message } => {
                tracing::warn!(code, message = %message, "Node rejected relay transaction");
                RelayError::BroadcastFailed(message)
            }
            NodeError::Unavailable(message) => {
                tracing::warn!(error = %message, "Broadcast outcome unknown");
                RelayError::NodeUnavailable(message)
            }
            other => RelayError::from(other),
        })
    }
}

/// Recover the intent signer and require it to be the claimed sender.
pub fn check_signature(intent: &RelayIntent) -> Result<(), RelayError> {
    let digest = encode_intent(
        &intent.from,
        &intent.to,
        intent.value,
        intent.nonce,
        &intent.data,
    );
    let recovered = recover_signer(&to_signable_digest(&digest), &intent.signature)?;

    if !verify(&intent.claimed_from, &recovered) {
        tracing::info!(claimed = %intent.from, recovered = %recovered, "Signature from another account");
        return Err(RelayError::Unauthorized);
    }
    Ok(())
}

fn trace_stage(stage: RelayStage) {
    tracing::debug!(stage = ?stage, "Relay stage");
}
