//! Sui transaction core
//!
//! Authorization and transaction construction for Sui clients.
//!
//! # Architecture
//!
//! This crate provides:
//! - **crypto**: Keypairs, intent signing, signature parsing and weighted multisig
//! - **transaction**: Programmable transaction builder with argument
//!   resolution and automatic gas configuration
//! - **rpc**: The node RPC surface the builder depends on, as a trait
//! - **config**: Gas and logging defaults with environment overrides
//!
//! # Security
//!
//! Secret keys and mnemonics are held in `zeroize` wrappers and are wiped
//! when dropped. Log output redacts sensitive fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use sui_tx_core::{SignatureScheme, SuiKeyPair};
//!
//! let keypair = SuiKeyPair::from_mnemonic(SignatureScheme::Ed25519, phrase, None)?;
//! let signature = keypair.sign_personal_message(b"hello")?;
//! println!("{} signed {}", keypair.address(), signature);
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod rpc;
pub mod serde_bytes;
pub mod transaction;
pub mod types;
pub mod utils;

pub use config::{GasConfig, SdkConfig};
pub use crypto::{
    verify_personal_message_signature, verify_transaction_signature, Intent, IntentScope,
    MultiSig, MultiSigPublicKey, PublicKey, SerializedSignature, SignatureScheme, SuiKeyPair,
};
pub use error::{ErrorCode, SuiError, SuiResult};
pub use rpc::SuiRpc;
pub use transaction::{
    BuiltTransaction, CallArgInput, MoveFunctionCache, PureValue, SignedTransaction,
    TransactionBuilder, TransactionData, TransactionResult,
};
pub use types::{Digest, ObjectId, ObjectRef, SuiAddress, TransactionDigest};
