// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-721 token contract interactions.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

use super::client::{map_contract_error, NodeError};

sol! {
    #[sol(rpc)]
    interface IERC721 {
        function balanceOf(address owner) external view returns (uint256);
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
    }
}

/// ERC-721 contract wrapper.
pub struct Erc721Contract<P> {
    contract: IERC721::IERC721Instance<P>,
}

impl<P: Provider + Clone> Erc721Contract<P> {
    /// Bind to the collection at `address`.
    pub fn new(provider: &P, address: Address) -> Self {
        Self {
            contract: IERC721::new(address, provider.clone()),
        }
    }

    /// Number of tokens held by `holder`.
    pub async fn balance_of(&self, holder: Address) -> Result<U256, NodeError> {
        self.contract
            .balanceOf(holder)
            .call()
            .await
            .map_err(map_contract_error)
    }
}
