// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relay request schema and boundary validation.

use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::RelayError;

/// A non-negative integer sent either as a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum IntegerInput {
    Number(u64),
    Text(String),
}

impl IntegerInput {
    fn parse(&self, field: &str) -> Result<U256, RelayError> {
        match self {
            IntegerInput::Number(n) => Ok(U256::from(*n)),
            IntegerInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
                    return Err(RelayError::MalformedInput(format!(
                        "{field} must be a non-negative integer"
                    )));
                }
                U256::from_str_radix(text, 10).map_err(|_| {
                    RelayError::MalformedInput(format!("{field} does not fit in 256 bits"))
                })
            }
        }
    }
}

impl From<u64> for IntegerInput {
    fn from(value: u64) -> Self {
        IntegerInput::Number(value)
    }
}

/// Relay request body.
///
/// Unknown fields are rejected so that misspelled or legacy field names
/// (for instance `signature` instead of `signed`) fail loudly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelayRequest {
    /// Client address that signed the intent
    pub from: Option<String>,
    /// Recipient address
    pub to: Option<String>,
    /// Amount: whole ether for `eth`, smallest unit for `erc20`, token id for `erc721`
    pub value: Option<IntegerInput>,
    /// Hex call data (default empty)
    pub data: Option<String>,
    /// Hex `r || s || v` signature over the intent
    pub signed: Option<String>,
    /// Client intent nonce
    pub nonce: Option<IntegerInput>,
    /// `eth` (default), `erc20` or `erc721`
    pub token_type: Option<String>,
}

/// A relay request whose fields have all been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayIntent {
    /// `from` exactly as the client sent it
    pub claimed_from: String,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: U256,
    pub data: Bytes,
    pub signature: Bytes,
    pub token_type: Option<String>,
}

impl RelayRequest {
    /// Check that the mandatory fields are present and non-empty.
    pub fn require_fields(&self) -> Result<(), RelayError> {
        let missing: Vec<&str> = [
            ("from", &self.from),
            ("to", &self.to),
            ("signed", &self.signed),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RelayError::MissingParameter(missing.join(", ")))
        }
    }

    /// Parse every field into its typed form.
    pub fn validate(self) -> Result<RelayIntent, RelayError> {
        self.require_fields()?;

        let claimed_from = self.from.unwrap_or_default().trim().to_string();
        let from = parse_address("from", &claimed_from)?;
        let to = parse_address("to", self.to.as_deref().unwrap_or_default())?;

        let value = match &self.value {
            Some(value) => value.parse("value")?,
            None => U256::ZERO,
        };
        let nonce = self
            .nonce
            .as_ref()
            .ok_or_else(|| RelayError::MalformedInput("nonce is required".to_string()))?
            .parse("nonce")?;

        let data = parse_hex("data", self.data.as_deref().unwrap_or_default())?;
        let signature = parse_hex("signed", self.signed.as_deref().unwrap_or_default())?;

        Ok(RelayIntent {
            claimed_from,
            from,
            to,
            value,
            nonce,
            data,
            signature,
            token_type: self.token_type,
        })
    }
}

/// Parse a 20-byte hex address, accepting any letter case.
pub fn parse_address(field: &str, raw: &str) -> Result<Address, RelayError> {
    let raw = raw.trim();
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
    if digits.len() != 40 {
        return Err(RelayError::MalformedInput(format!(
            "{field} must be a 20-byte hex address"
        )));
    }
    Address::from_str(digits)
        .map_err(|_| RelayError::MalformedInput(format!("{field} must be a 20-byte hex address")))
}

/// Parse hex bytes; empty input and a bare `0x` are empty byte strings.
pub fn parse_hex(field: &str, raw: &str) -> Result<Bytes, RelayError> {
    let raw = raw.trim();
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
    alloy::hex::decode(digits)
        .map(Bytes::from)
        .map_err(|_| RelayError::MalformedInput(format!("{field} must be valid hex")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RelayRequest {
        RelayRequest {
            from: Some("0xAbC0000000000000000000000000000000000001".to_string()),
            to: Some("0xdef0000000000000000000000000000000000002".to_string()),
            value: Some(IntegerInput::Text("1".to_string())),
            data: None,
            signed: Some(format!("0x{}", "11".repeat(65))),
            nonce: Some(5.into()),
            token_type: None,
        }
    }

    #[test]
    fn validates_complete_request() {
        let intent = base().validate().unwrap();
        assert_eq!(intent.value, U256::from(1u8));
        assert_eq!(intent.nonce, U256::from(5u8));
        assert!(intent.data.is_empty());
        assert_eq!(intent.signature.len(), 65);
        assert_eq!(intent.claimed_from, "0xAbC0000000000000000000000000000000000001");
    }

    #[test]
    fn reports_every_missing_field() {
        let request = RelayRequest {
            from: None,
            to: Some(" ".to_string()),
            signed: None,
            ..base()
        };
        assert_eq!(
            request.require_fields().unwrap_err(),
            RelayError::MissingParameter("from, to, signed".to_string())
        );
    }

    #[test]
    fn value_defaults_to_zero() {
        let intent = RelayRequest { value: None, ..base() }.validate().unwrap();
        assert_eq!(intent.value, U256::ZERO);
    }

    #[test]
    fn rejects_malformed_fields() {
        let cases = [
            RelayRequest { value: Some(IntegerInput::Text("-1".into())), ..base() },
            RelayRequest { value: Some(IntegerInput::Text("1.5".into())), ..base() },
            RelayRequest { nonce: None, ..base() },
            RelayRequest { nonce: Some(IntegerInput::Text("abc".into())), ..base() },
            RelayRequest { data: Some("0xzz".into()), ..base() },
            RelayRequest { data: Some("0xabc".into()), ..base() },
            RelayRequest { to: Some("0x1234".into()), ..base() },
            RelayRequest { signed: Some("not-hex".into()), ..base() },
        ];

        for request in cases {
            let err = request.clone().validate().unwrap_err();
            assert!(
                matches!(err, RelayError::MalformedInput(_)),
                "expected MalformedInput for {request:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_values_wider_than_256_bits() {
        let too_big = format!("{}0", U256::MAX);
        let err = RelayRequest { value: Some(IntegerInput::Text(too_big)), ..base() }
            .validate()
            .unwrap_err();
        assert!(matches!(err, RelayError::MalformedInput(_)));
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let request: RelayRequest = serde_json::from_str(
            r#"{"from":"0x1","to":"0x2","value":"10","nonce":3,"signed":"0x","tokenType":"erc20"}"#,
        )
        .unwrap();
        assert_eq!(request.value, Some(IntegerInput::Text("10".into())));
        assert_eq!(request.nonce, Some(IntegerInput::Number(3)));
        assert_eq!(request.token_type.as_deref(), Some("erc20"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<RelayRequest, _> =
            serde_json::from_str(r#"{"from":"0x1","signature":"0x00"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn parse_hex_accepts_empty_forms() {
        assert!(parse_hex("data", "").unwrap().is_empty());
        assert!(parse_hex("data", "0x").unwrap().is_empty());
        assert_eq!(parse_hex("data", "0xCAFE").unwrap().as_ref(), &[0xca, 0xfe]);
    }
}
