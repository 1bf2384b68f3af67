//! Programmable transaction data
//!
//! These types serialize with `bcs` to the exact bytes a Sui validator
//! hashes and signs. Enum variant order is part of the wire format.

use serde::{Deserialize, Serialize};

use super::type_tag::TypeTag;
use crate::error::SuiResult;
use crate::types::{blake2b256, ObjectId, ObjectRef, SuiAddress, TransactionDigest};

/// Domain separator for transaction digests
const TRANSACTION_DATA_SALT: &[u8] = b"TransactionData::";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS-encoded pure value
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    },
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectArg::ImmOrOwnedObject(r) | ObjectArg::Receiving(r) => r.object_id,
            ObjectArg::SharedObject { id, .. } => *id,
        }
    }
}

/// Reference to a transaction input or an earlier command's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    /// (objects, recipient)
    TransferObjects(Vec<Argument>, Argument),
    /// (coin, amounts)
    SplitCoins(Argument, Vec<Argument>),
    /// (destination, sources)
    MergeCoins(Argument, Vec<Argument>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

impl TransactionKind {
    pub fn to_bcs_bytes(&self) -> SuiResult<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    #[default]
    None,
    /// Invalid once the chain passes this epoch
    Epoch(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    pub fn v1(&self) -> &TransactionDataV1 {
        match self {
            TransactionData::V1(v1) => v1,
        }
    }

    pub fn to_bcs_bytes(&self) -> SuiResult<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn from_bcs_bytes(bytes: &[u8]) -> SuiResult<Self> {
        Ok(bcs::from_bytes(bytes)?)
    }

    /// BLAKE2b-256("TransactionData::" || bcs bytes)
    pub fn digest(&self) -> SuiResult<TransactionDigest> {
        let bytes = self.to_bcs_bytes()?;
        Ok(transaction_digest(&bytes))
    }
}

/// Digest of already-serialized `TransactionData`
pub fn transaction_digest(tx_bytes: &[u8]) -> TransactionDigest {
    TransactionDigest::new(blake2b256(&[TRANSACTION_DATA_SALT, tx_bytes]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Digest;

    fn sample() -> TransactionData {
        TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
                inputs: vec![CallArg::Pure(vec![1, 0, 0, 0, 0, 0, 0, 0])],
                commands: vec![Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)])],
            }),
            sender: SuiAddress::from_u8(1),
            gas_data: GasData {
                payment: vec![ObjectRef::new(SuiAddress::from_u8(9), 3, Digest::new([4u8; 32]))],
                owner: SuiAddress::from_u8(1),
                price: 1000,
                budget: 5_000_000,
            },
            expiration: TransactionExpiration::None,
        })
    }

    #[test]
    fn test_bcs_layout_prefix() {
        let bytes = sample().to_bcs_bytes().unwrap();
        // V1, ProgrammableTransaction, 1 input, Pure, 8 bytes
        assert_eq!(&bytes[..5], &[0, 0, 1, 0, 8]);
        // 1 command, SplitCoins, GasCoin, 1 amount, Input(0)
        assert_eq!(&bytes[13..19], &[1, 2, 0, 1, 1, 0]);
        assert_eq!(*bytes.last().unwrap(), 0);
    }

    #[test]
    fn test_bcs_roundtrip_and_digest() {
        let tx = sample();
        let bytes = tx.to_bcs_bytes().unwrap();
        assert_eq!(TransactionData::from_bcs_bytes(&bytes).unwrap(), tx);
        assert_eq!(tx.digest().unwrap(), transaction_digest(&bytes));
        assert_ne!(transaction_digest(&bytes), TransactionDigest::new(blake2b256(&[&bytes])));
    }

    #[test]
    fn test_argument_encoding() {
        assert_eq!(bcs::to_bytes(&Argument::NestedResult(1, 2)).unwrap(), vec![3, 1, 0, 2, 0]);
        assert_eq!(bcs::to_bytes(&TransactionExpiration::Epoch(5)).unwrap(), vec![1, 5, 0, 0, 0, 0, 0, 0, 0]);
    }
}
