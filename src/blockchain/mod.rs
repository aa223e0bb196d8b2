// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM chain integration.
//!
//! This module provides functionality for:
//! - Encoding and verifying client-signed relay intents
//! - Building native, ERC-20 and ERC-721 transfers
//! - Querying balances and broadcasting transactions through a node

pub mod client;
pub mod erc20;
pub mod erc721;
pub mod message;
pub mod signing;
pub mod transactions;
pub mod types;
pub mod verify;

pub use client::{NodeClient, NodeError, RpcNodeClient};
pub use message::{encode_intent, to_signable_digest};
pub use signing::{load_relayer_signer, KeyError};
pub use transactions::{
    build_erc20_transfer, build_erc721_transfer, build_native_transfer, BuildError,
};
pub use types::*;
pub use verify::{recover_signer, verify, VerifyError};
