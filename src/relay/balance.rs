// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use alloy::primitives::Address;

use crate::blockchain::{format_ether_fixed, NodeClient, NodeError, TokenContracts, TokenType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error("No contract address is configured for {0} balances")]
    NotConfigured(TokenType),

    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Read `holder`'s balance as a display string.
///
/// Native balances are ether with six decimals. ERC-20 balances are the raw
/// smallest-unit integer and ERC-721 balances are the token count.
pub async fn read_balance(
    node: &dyn NodeClient,
    tokens: &TokenContracts,
    holder: Address,
    token_type: TokenType,
) -> Result<String, BalanceError> {
    match token_type.standard() {
        None => {
            let wei = node.get_native_balance(holder).await?;
            Ok(format_ether_fixed(wei))
        }
        Some(standard) => {
            let token = tokens
                .contract_for(standard)
                .ok_or(BalanceError::NotConfigured(token_type))?;
            let balance = node.get_token_balance(token, holder, standard).await?;
            Ok(balance.to_string())
        }
    }
}
