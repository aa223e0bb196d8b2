// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signer recovery for client-signed relay intents.

use alloy::primitives::{Address, Signature, B256, U256};

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// Errors returned while recovering a signer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    #[error("Signature recovery failed: {0}")]
    RecoveryFailed(String),
}

/// Recover the address that produced `signature` over `digest`.
///
/// `signature` must be 65 bytes, `r || s || v`, with `v` either a raw
/// parity bit (0/1) or the legacy 27/28 form.
pub fn recover_signer(digest: &B256, signature: &[u8]) -> Result<Address, VerifyError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(VerifyError::InvalidSignatureFormat(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }

    let y_parity = match signature[64] {
        0 | 27 => false,
        1 | 28 => true,
        v => {
            return Err(VerifyError::InvalidSignatureFormat(format!(
                "recovery id {v} out of range"
            )))
        }
    };

    let r = U256::from_be_slice(&signature[..32]);
    let s = U256::from_be_slice(&signature[32..64]);

    Signature::new(r, s, y_parity)
        .recover_address_from_prehash(digest)
        .map_err(|e| VerifyError::RecoveryFailed(e.to_string()))
}

/// Compare a client-claimed address with a recovered one.
///
/// Comparison ignores case, so checksummed and lower-cased inputs match.
pub fn verify(claimed: &str, recovered: &Address) -> bool {
    let claimed = claimed.trim();
    let claimed = claimed
        .strip_prefix("0x")
        .or_else(|| claimed.strip_prefix("0X"))
        .unwrap_or(claimed);
    claimed.eq_ignore_ascii_case(&alloy::hex::encode(recovered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::message::{encode_intent, to_signable_digest};
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    fn intent_digest(from: &Address) -> B256 {
        encode_intent(
            from,
            &Address::repeat_byte(0x22),
            U256::from(1u8),
            U256::from(5u8),
            b"",
        )
    }

    #[test]
    fn recovers_personal_message_signer() {
        let signer = PrivateKeySigner::random();
        let digest = intent_digest(&signer.address());

        // Wallets sign the 32-byte digest as a personal message.
        let signature = signer.sign_message_sync(digest.as_slice()).unwrap();
        let recovered = recover_signer(&to_signable_digest(&digest), &signature.as_bytes()).unwrap();

        assert_eq!(recovered, signer.address());
        assert!(verify(&signer.address().to_checksum(None), &recovered));
        assert!(verify(&signer.address().to_string().to_lowercase(), &recovered));
    }

    #[test]
    fn accepts_raw_parity_recovery_id() {
        let signer = PrivateKeySigner::random();
        let hash = to_signable_digest(&intent_digest(&signer.address()));

        let mut bytes = signer.sign_hash_sync(&hash).unwrap().as_bytes();
        bytes[64] -= 27;

        assert_eq!(recover_signer(&hash, &bytes).unwrap(), signer.address());
    }

    #[test]
    fn different_key_recovers_different_address() {
        let client = PrivateKeySigner::random();
        let attacker = PrivateKeySigner::random();
        let digest = intent_digest(&client.address());

        let signature = attacker.sign_message_sync(digest.as_slice()).unwrap();
        let recovered = recover_signer(&to_signable_digest(&digest), &signature.as_bytes()).unwrap();

        assert!(!verify(&client.address().to_string(), &recovered));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = recover_signer(&B256::ZERO, &[0u8; 64]).unwrap_err();
        assert!(matches!(err, VerifyError::InvalidSignatureFormat(_)));
    }

    #[test]
    fn rejects_out_of_range_recovery_id() {
        let mut bytes = [1u8; SIGNATURE_LEN];
        bytes[64] = 29;
        let err = recover_signer(&B256::ZERO, &bytes).unwrap_err();
        assert!(matches!(err, VerifyError::InvalidSignatureFormat(_)));
    }

    #[test]
    fn zero_signature_fails_recovery() {
        let err = recover_signer(&B256::repeat_byte(0x42), &[0u8; SIGNATURE_LEN]).unwrap_err();
        assert!(matches!(err, VerifyError::RecoveryFailed(_)));
    }

    #[test]
    fn verify_ignores_case_and_prefix_case() {
        let addr: Address = "0x52908400098527886E0F7030069857D2E4169EE7".parse().unwrap();
        assert!(verify("0x52908400098527886e0f7030069857d2e4169ee7", &addr));
        assert!(verify("0X52908400098527886E0F7030069857D2E4169EE7", &addr));
        assert!(!verify("0x52908400098527886e0f7030069857d2e4169ee8", &addr));
    }
}
