//! Programmable transaction construction
//!
//! - `types`: BCS wire types for `TransactionData`
//! - `type_tag`: Move type tag parsing
//! - `pure`: pure value coercion and encoding
//! - `resolver`: argument classification and batched object lookup
//! - `cache`: Move function signature cache
//! - `gas`: gas price, budget and payment selection
//! - `builder`: the transaction builder itself

pub mod builder;
pub mod cache;
pub mod gas;
pub mod pure;
pub mod resolver;
pub mod type_tag;
pub mod types;

pub use builder::{BuiltTransaction, SignedTransaction, TransactionBuilder, TransactionResult};
pub use cache::MoveFunctionCache;
pub use gas::{compute_gas_budget, GasCost};
pub use pure::{PureType, PureValue};
pub use resolver::CallArgInput;
pub use type_tag::{StructTag, TypeTag};
pub use types::{
    transaction_digest, Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData, TransactionDataV1, TransactionExpiration,
    TransactionKind,
};
