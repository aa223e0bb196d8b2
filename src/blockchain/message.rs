// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical encoding of a relay intent.
//!
//! Clients sign `keccak256(PREFIX || keccak256(packed))` where `packed` is
//! the Solidity `abi.encodePacked(address from, address to, uint256 value,
//! uint256 nonce, bytes data)` layout:
//!
//! | Field   | Bytes    |
//! |---------|----------|
//! | `from`  | 20       |
//! | `to`    | 20       |
//! | `value` | 32 (BE)  |
//! | `nonce` | 32 (BE)  |
//! | `data`  | variable |
//!
//! Every issued client signature depends on this exact layout.

use alloy::primitives::{keccak256, Address, B256, U256};

/// Personal-message prefix for a 32-byte payload.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Length of the fixed-width part of the packed encoding.
const FIXED_LEN: usize = 20 + 20 + 32 + 32;

/// Pack the intent fields into their signed byte layout.
pub fn pack_intent(from: &Address, to: &Address, value: U256, nonce: U256, data: &[u8]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(FIXED_LEN + data.len());
    packed.extend_from_slice(from.as_slice());
    packed.extend_from_slice(to.as_slice());
    packed.extend_from_slice(&value.to_be_bytes::<32>());
    packed.extend_from_slice(&nonce.to_be_bytes::<32>());
    packed.extend_from_slice(data);
    packed
}

/// Hash of the packed intent.
pub fn encode_intent(from: &Address, to: &Address, value: U256, nonce: U256, data: &[u8]) -> B256 {
    keccak256(pack_intent(from, to, value, nonce, data))
}

/// Wrap an intent digest in the personal-message envelope and hash again.
///
/// The result is the hash the client's wallet actually signs.
pub fn to_signable_digest(digest: &B256) -> B256 {
    let mut buf = [0u8; PERSONAL_MESSAGE_PREFIX.len() + 32];
    buf[..PERSONAL_MESSAGE_PREFIX.len()].copy_from_slice(PERSONAL_MESSAGE_PREFIX);
    buf[PERSONAL_MESSAGE_PREFIX.len()..].copy_from_slice(digest.as_slice());
    keccak256(buf)
}
