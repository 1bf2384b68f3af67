//! Intent-separated signing
//!
//! Every signed payload is prefixed with a three-byte intent
//! `[scope, version, app_id]` so a signature for one purpose can never be
//! replayed as another. The signed value is the BLAKE2b-256 digest of
//! `intent || payload`.

use serde::{Deserialize, Serialize};

use crate::types::blake2b256;
use crate::utils::codec::BcsWriter;

/// What the signed bytes represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IntentScope {
    TransactionData = 0,
    TransactionEffects = 1,
    CheckpointSummary = 2,
    PersonalMessage = 3,
}

/// Intent prefix. Sui currently only uses version 0 and app id 0 (Sui).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intent {
    pub scope: IntentScope,
    pub version: u8,
    pub app_id: u8,
}

impl Intent {
    pub const fn new(scope: IntentScope) -> Self {
        Self {
            scope,
            version: 0,
            app_id: 0,
        }
    }

    pub const fn transaction_data() -> Self {
        Self::new(IntentScope::TransactionData)
    }

    pub const fn personal_message() -> Self {
        Self::new(IntentScope::PersonalMessage)
    }

    pub fn to_bytes(&self) -> [u8; 3] {
        [self.scope as u8, self.version, self.app_id]
    }
}

/// `intent || payload`
pub fn intent_message(intent: Intent, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 + payload.len());
    out.extend_from_slice(&intent.to_bytes());
    out.extend_from_slice(payload);
    out
}

/// BLAKE2b-256 of `intent || payload`, the bytes handed to the raw signer
pub fn intent_digest(intent: Intent, payload: &[u8]) -> [u8; 32] {
    blake2b256(&[&intent.to_bytes(), payload])
}

/// Personal messages are signed as a BCS `vector<u8>`
pub fn personal_message_bytes(message: &[u8]) -> Vec<u8> {
    let mut writer = BcsWriter::new();
    writer.write_bytes(message);
    writer.into_bytes()
}

/// Digest signed for a personal message
pub fn personal_message_digest(message: &[u8]) -> [u8; 32] {
    intent_digest(Intent::personal_message(), &personal_message_bytes(message))
}

/// Digest signed for transaction bytes
pub fn transaction_digest_for_signing(tx_bytes: &[u8]) -> [u8; 32] {
    intent_digest(Intent::transaction_data(), tx_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_prefix() {
        assert_eq!(Intent::transaction_data().to_bytes(), [0, 0, 0]);
        assert_eq!(Intent::personal_message().to_bytes(), [3, 0, 0]);
        assert_eq!(
            intent_message(Intent::new(IntentScope::CheckpointSummary), b"ab"),
            vec![2, 0, 0, b'a', b'b']
        );
    }

    #[test]
    fn test_personal_message_is_bcs_vector() {
        let msg = b"hello";
        assert_eq!(personal_message_bytes(msg), bcs::to_bytes(&msg.to_vec()).unwrap());
        assert_eq!(personal_message_bytes(msg)[0], 5);
    }

    #[test]
    fn test_scopes_separate_digests() {
        let payload = b"same payload";
        assert_ne!(
            intent_digest(Intent::transaction_data(), payload),
            intent_digest(Intent::personal_message(), payload)
        );
        assert_eq!(
            intent_digest(Intent::transaction_data(), payload),
            blake2b256(&[&intent_message(Intent::transaction_data(), payload)])
        );
    }
}
