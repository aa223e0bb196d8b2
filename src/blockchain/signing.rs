// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relayer key loading.
//!
//! The relayer key is supplied either as a hex string or as a PEM file
//! (SEC1 `EC PRIVATE KEY` or PKCS#8 `PRIVATE KEY`). Error messages describe
//! the failure without echoing any key material.

use alloy::signers::local::PrivateKeySigner;
use k256::SecretKey;

use crate::config::RelayerKey;

/// Errors raised while loading the relayer key.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid relayer private key: {0}")]
    InvalidPrivateKey(String),
}

/// Build the relayer signer from configured key material.
pub fn load_relayer_signer(key: &RelayerKey) -> Result<PrivateKeySigner, KeyError> {
    match key {
        RelayerKey::Hex(hex) => signer_from_hex(hex.expose()),
        RelayerKey::Pem(pem) => signer_from_pem(pem.expose().as_bytes()),
    }
}

/// Create a signer from a hex private key (`0x` prefix optional).
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, KeyError> {
    let trimmed = private_key_hex.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    let key_bytes = alloy::hex::decode(trimmed)
        .map_err(|_| KeyError::InvalidPrivateKey("not valid hex".to_string()))?;

    if key_bytes.len() != 32 {
        return Err(KeyError::InvalidPrivateKey(format!(
            "expected 32 bytes, got {}",
            key_bytes.len()
        )));
    }

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|_| KeyError::InvalidPrivateKey("not a valid secp256k1 scalar".to_string()))
}

/// Create a signer from a PEM-encoded private key.
pub fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, KeyError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|_| KeyError::InvalidPrivateKey("PEM is not UTF-8".to_string()))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| KeyError::InvalidPrivateKey(format!("Invalid PEM: {e}")))?;

    // SEC1 first, then PKCS#8
    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| parse_pkcs8_to_secret_key(pem.contents()))
        .map_err(|_| KeyError::InvalidPrivateKey("unsupported key format".to_string()))?;

    PrivateKeySigner::from_slice(&secret_key.to_bytes())
        .map_err(|_| KeyError::InvalidPrivateKey("not a valid secp256k1 scalar".to_string()))
}

/// Parse PKCS#8 DER to extract the secret key.
fn parse_pkcs8_to_secret_key(der: &[u8]) -> Result<SecretKey, k256::pkcs8::Error> {
    use k256::pkcs8::DecodePrivateKey;
    SecretKey::from_pkcs8_der(der)
}
