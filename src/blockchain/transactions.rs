// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Unsigned transaction assembly for native, ERC-20 and ERC-721 transfers.
//!
//! Gas limits are fixed constants and the gas price is whatever the caller
//! read from the node; nothing here talks to the network.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

use super::erc20::IERC20;
use super::erc721::IERC721;
use super::types::{UnsignedTx, NATIVE_DECIMALS, NATIVE_TRANSFER_GAS, TOKEN_TRANSFER_GAS};

/// Errors raised while assembling a transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unsupported token type: {0}")]
    UnsupportedTokenType(String),

    #[error("No {0} contract address is configured")]
    TokenNotConfigured(&'static str),
}

/// Build a native currency transfer.
///
/// # Arguments
/// * `to` - Recipient address
/// * `value_ether` - Amount in ether as a decimal string (e.g. "1" or "0.5")
/// * `nonce` - Relayer account nonce
/// * `gas_price` - Gas price in wei
/// * `chain_id` - EIP-155 chain id
/// * `data` - Optional call data
pub fn build_native_transfer(
    to: Address,
    value_ether: &str,
    nonce: u64,
    gas_price: u128,
    chain_id: u64,
    data: Bytes,
) -> Result<UnsignedTx, BuildError> {
    let value = parse_amount(value_ether, NATIVE_DECIMALS)?;

    Ok(UnsignedTx {
        to,
        value,
        data,
        nonce,
        gas_limit: NATIVE_TRANSFER_GAS,
        gas_price,
        chain_id,
    })
}

/// Build an ERC-20 `transfer(to, amount)` call from the relayer's balance.
pub fn build_erc20_transfer(
    token: Address,
    to: Address,
    amount: U256,
    nonce: u64,
    gas_price: u128,
    chain_id: u64,
) -> Result<UnsignedTx, BuildError> {
    let call = IERC20::transferCall { to, amount };

    Ok(UnsignedTx {
        to: token,
        value: U256::ZERO,
        data: call.abi_encode().into(),
        nonce,
        gas_limit: TOKEN_TRANSFER_GAS,
        gas_price,
        chain_id,
    })
}

/// Build an ERC-721 `safeTransferFrom(from, to, tokenId)` call.
///
/// The relayer must be the owner of `token_id` or an approved operator for
/// `from`, otherwise the transaction reverts on-chain.
pub fn build_erc721_transfer(
    token: Address,
    from: Address,
    to: Address,
    token_id: U256,
    nonce: u64,
    gas_price: u128,
    chain_id: u64,
) -> Result<UnsignedTx, BuildError> {
    let call = IERC721::safeTransferFromCall {
        from,
        to,
        tokenId: token_id,
    };

    Ok(UnsignedTx {
        to: token,
        value: U256::ZERO,
        data: call.abi_encode().into(),
        nonce,
        gas_limit: TOKEN_TRANSFER_GAS,
        gas_price,
        chain_id,
    })
}

/// Parse a human-readable amount to wei (or token units).
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimals (18 for ETH)
///
/// # Returns
/// * `Ok(U256)` - Amount in smallest unit
/// * `Err` - If parsing fails or the result does not fit 256 bits
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, BuildError> {
    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(BuildError::InvalidAmount("empty amount".to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(BuildError::InvalidAmount(format!("not a decimal number: {amount}")));
    }
    if fraction.len() > decimals as usize {
        return Err(BuildError::InvalidAmount(format!(
            "Too many decimal places (max {decimals})"
        )));
    }

    let parse = |digits: &str| -> Result<U256, BuildError> {
        if digits.is_empty() {
            return Ok(U256::ZERO);
        }
        U256::from_str_radix(digits, 10)
            .map_err(|_| BuildError::InvalidAmount("Amount overflow".to_string()))
    };

    // Pad with zeros to match decimals
    let padded = format!("{:0<width$}", fraction, width = decimals as usize);
    let multiplier = U256::from(10u64).pow(U256::from(decimals));

    let whole = parse(whole)?;
    let fraction = parse(&padded)?;

    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| BuildError::InvalidAmount("Amount overflow".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address::repeat_byte(0xaa);
    const FROM: Address = Address::repeat_byte(0x01);
    const TO: Address = Address::repeat_byte(0x02);

    #[test]
    fn test_parse_amount_whole() {
        let result = parse_amount("1", 18).unwrap();
        assert_eq!(result, U256::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_decimal() {
        let result = parse_amount("1.5", 18).unwrap();
        assert_eq!(result, U256::from(1_500_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_small() {
        let result = parse_amount("0.001", 18).unwrap();
        assert_eq!(result, U256::from(1_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("", 18).is_err());
        assert!(parse_amount("-1", 18).is_err());
        assert!(parse_amount("1.2.3", 18).is_err());
        assert!(parse_amount("0.0000000000000000001", 18).is_err());
    }

    #[test]
    fn test_parse_amount_overflow() {
        let max = U256::MAX.to_string();
        let err = parse_amount(&max, 18).unwrap_err();
        assert_eq!(err, BuildError::InvalidAmount("Amount overflow".to_string()));
    }

    #[test]
    fn native_transfer_uses_fixed_gas_and_wei() {
        let tx = build_native_transfer(TO, "1", 3, 1_000_000_000, 11155111, Bytes::new()).unwrap();

        assert_eq!(tx.to, TO);
        assert_eq!(tx.gas_limit, NATIVE_TRANSFER_GAS);
        assert_eq!(tx.value, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(tx.nonce, 3);
        assert_eq!(tx.chain_id, 11155111);
        assert!(tx.data.is_empty());
    }

    #[test]
    fn erc20_transfer_targets_token_contract() {
        let tx = build_erc20_transfer(TOKEN, TO, U256::from(250u64), 0, 1, 1).unwrap();

        assert_eq!(tx.to, TOKEN);
        assert_eq!(tx.value, U256::ZERO);
        assert_eq!(tx.gas_limit, TOKEN_TRANSFER_GAS);
        // transfer(address,uint256)
        assert_eq!(&tx.data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(tx.data.len(), 4 + 32 + 32);
        assert_eq!(&tx.data[16..36], TO.as_slice());
        assert_eq!(U256::from_be_slice(&tx.data[36..68]), U256::from(250u64));
    }

    #[test]
    fn erc721_transfer_encodes_safe_transfer_from() {
        let tx = build_erc721_transfer(TOKEN, FROM, TO, U256::from(42u64), 9, 1, 1).unwrap();

        assert_eq!(tx.to, TOKEN);
        assert_eq!(tx.value, U256::ZERO);
        assert_eq!(tx.gas_limit, TOKEN_TRANSFER_GAS);
        // safeTransferFrom(address,address,uint256)
        assert_eq!(&tx.data[..4], &[0x42, 0x84, 0x2e, 0x0e]);
        assert_eq!(&tx.data[16..36], FROM.as_slice());
        assert_eq!(&tx.data[48..68], TO.as_slice());
        assert_eq!(U256::from_be_slice(&tx.data[68..100]), U256::from(42u64));
    }
}
