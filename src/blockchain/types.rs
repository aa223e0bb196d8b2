// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::{fmt, str::FromStr};

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, U256},
    rpc::types::TransactionRequest,
};

/// Gas limit for a plain value transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Gas limit for ERC-20 / ERC-721 transfers.
///
/// Fixed rather than estimated; a transfer that needs more will revert
/// on-chain after being broadcast.
pub const TOKEN_TRANSFER_GAS: u64 = 100_000;

/// Decimals of the native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// Asset kind a relay request moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Native currency (ETH).
    #[default]
    Eth,
    /// Fungible token.
    Erc20,
    /// Non-fungible token.
    Erc721,
}

impl TokenType {
    /// Label used in relay response messages.
    pub fn label(self) -> &'static str {
        match self {
            TokenType::Eth => "ETH",
            TokenType::Erc20 => "ERC20",
            TokenType::Erc721 => "ERC721",
        }
    }

    /// Token standard for contract balance reads, `None` for native.
    pub fn standard(self) -> Option<TokenStandard> {
        match self {
            TokenType::Eth => None,
            TokenType::Erc20 => Some(TokenStandard::Erc20),
            TokenType::Erc721 => Some(TokenStandard::Erc721),
        }
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "eth" | "native" => Ok(TokenType::Eth),
            "erc20" => Ok(TokenType::Erc20),
            "erc721" => Ok(TokenType::Erc721),
            other => Err(format!("Unsupported token type: {other}")),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Contract interface used to read a token balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStandard {
    Erc20,
    Erc721,
}

/// Configured token contracts the relayer transfers from.
#[derive(Debug, Clone, Default)]
pub struct TokenContracts {
    pub erc20: Option<Address>,
    pub erc721: Option<Address>,
}

impl TokenContracts {
    /// Contract address for a token standard, if configured.
    pub fn contract_for(&self, standard: TokenStandard) -> Option<Address> {
        match standard {
            TokenStandard::Erc20 => self.erc20,
            TokenStandard::Erc721 => self.erc721,
        }
    }
}

/// A fully specified legacy transaction awaiting the relayer's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx {
    /// Recipient (the token contract for token transfers)
    pub to: Address,
    /// Value in wei
    pub value: U256,
    /// Call data
    pub data: Bytes,
    /// Relayer account nonce
    pub nonce: u64,
    /// Gas limit
    pub gas_limit: u64,
    /// Gas price in wei
    pub gas_price: u128,
    /// EIP-155 chain id
    pub chain_id: u64,
}

impl UnsignedTx {
    /// Convert into an alloy transaction request.
    ///
    /// Only `gas_price` is set on the fee side, so the request builds into
    /// a legacy (type 0) transaction.
    pub fn into_request(self) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.to)
            .with_value(self.value)
            .with_input(self.data)
            .with_nonce(self.nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price)
            .with_chain_id(self.chain_id)
    }
}

/// Format a wei amount as ether with exactly six decimals.
///
/// Rounds half to even at the sixth decimal, so zero is `"0.000000"`.
pub fn format_ether_fixed(wei: U256) -> String {
    let unit = U256::from(1_000_000_000_000u64); // 1e12 wei = 1e-6 ether
    let half = U256::from(500_000_000_000u64);

    let mut micros = wei / unit;
    let remainder = wei % unit;
    if remainder > half || (remainder == half && micros.bit(0)) {
        micros += U256::from(1u8);
    }

    let million = U256::from(1_000_000u64);
    let whole = micros / million;
    let fraction: u64 = (micros % million).to();
    format!("{whole}.{fraction:06}")
}
