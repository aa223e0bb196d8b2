// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

use super::client::{map_contract_error, NodeError};

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// ERC-20 contract wrapper.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    /// Bind to the token at `address`.
    pub fn new(provider: &P, address: Address) -> Self {
        Self {
            contract: IERC20::new(address, provider.clone()),
        }
    }

    /// Get the balance of an address in the token's smallest unit.
    pub async fn balance_of(&self, holder: Address) -> Result<U256, NodeError> {
        self.contract
            .balanceOf(holder)
            .call()
            .await
            .map_err(map_contract_error)
    }
}
