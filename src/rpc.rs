//! JSON-RPC collaborator
//!
//! The transaction builder never talks to the network itself. Everything
//! it needs from a full node goes through [`SuiRpc`], and the response
//! types below mirror the JSON-RPC field names so any transport can hand
//! `serde_json` output straight through.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SuiResult;
use crate::serde_bytes::u64_string;
use crate::types::{ObjectId, SuiAddress};

/// Read-only full node operations used by the builder
pub trait SuiRpc {
    /// `suix_getReferenceGasPrice`
    fn get_reference_gas_price(&self) -> SuiResult<u64>;

    /// `sui_dryRunTransactionBlock` with base64 `TransactionData` bytes
    fn dry_run_transaction_block(&self, tx_bytes_b64: &str) -> SuiResult<DryRunTransactionBlockResponse>;

    /// `sui_devInspectTransactionBlock` with base64 `TransactionKind` bytes
    fn dev_inspect_transaction_block(
        &self,
        sender: &SuiAddress,
        tx_kind_b64: &str,
        gas_price: Option<u64>,
    ) -> SuiResult<DevInspectResults>;

    /// `sui_multiGetObjects`
    fn multi_get_objects(
        &self,
        object_ids: &[ObjectId],
        options: &ObjectDataOptions,
    ) -> SuiResult<Vec<SuiObjectResponse>>;

    /// `sui_getNormalizedMoveFunction`
    fn get_normalized_move_function(
        &self,
        package: &str,
        module: &str,
        function: &str,
    ) -> SuiResult<NormalizedMoveFunction>;

    /// `suix_getCoins`
    fn get_coins(
        &self,
        owner: &SuiAddress,
        coin_type: Option<&str>,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> SuiResult<CoinPage>;
}

// MARK: - Move function signatures

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveVisibility {
    Private,
    Public,
    Friend,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAbilitySet {
    #[serde(default)]
    pub abilities: Vec<String>,
}

/// Parameter type as returned by `sui_getNormalizedMoveFunction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizedMoveType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Struct {
        address: String,
        module: String,
        name: String,
        #[serde(rename = "typeArguments", default)]
        type_arguments: Vec<NormalizedMoveType>,
    },
    Vector(Box<NormalizedMoveType>),
    TypeParameter(u16),
    Reference(Box<NormalizedMoveType>),
    MutableReference(Box<NormalizedMoveType>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMoveFunction {
    pub visibility: MoveVisibility,
    pub is_entry: bool,
    #[serde(default)]
    pub type_parameters: Vec<MoveAbilitySet>,
    #[serde(default)]
    pub parameters: Vec<NormalizedMoveType>,
    #[serde(rename = "return", default)]
    pub return_types: Vec<NormalizedMoveType>,
}

// MARK: - Objects

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataOptions {
    pub show_type: bool,
    pub show_owner: bool,
    pub show_previous_transaction: bool,
    pub show_display: bool,
    pub show_content: bool,
    pub show_bcs: bool,
    pub show_storage_rebate: bool,
}

impl ObjectDataOptions {
    /// What argument resolution needs: owner and type
    pub fn with_owner() -> Self {
        Self {
            show_type: true,
            show_owner: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    AddressOwner(SuiAddress),
    ObjectOwner(SuiAddress),
    Shared {
        #[serde(with = "u64_string")]
        initial_shared_version: u64,
    },
    Immutable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectData {
    pub object_id: ObjectId,
    #[serde(with = "u64_string")]
    pub version: u64,
    /// Base58
    pub digest: String,
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiObjectResponse {
    #[serde(default)]
    pub data: Option<SuiObjectData>,
    #[serde(default)]
    pub error: Option<Value>,
}

// MARK: - Execution results

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatusKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: ExecutionStatusKind,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatusKind::Success
    }
}

/// Gas numbers are decimal strings; see `transaction::gas` for parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    pub computation_cost: String,
    pub storage_cost: String,
    pub storage_rebate: String,
    #[serde(default)]
    pub non_refundable_storage_fee: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockEffects {
    pub status: ExecutionStatus,
    pub gas_used: GasCostSummary,
    #[serde(default)]
    pub transaction_digest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunTransactionBlockResponse {
    pub effects: TransactionBlockEffects,
    #[serde(default)]
    pub events: Vec<Value>,
    #[serde(default)]
    pub object_changes: Vec<Value>,
    #[serde(default)]
    pub balance_changes: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiExecutionResult {
    #[serde(default)]
    pub mutable_reference_outputs: Vec<Value>,
    /// `(bcs bytes, type)` per return value
    #[serde(default)]
    pub return_values: Vec<(Vec<u8>, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevInspectResults {
    pub effects: TransactionBlockEffects,
    #[serde(default)]
    pub results: Option<Vec<SuiExecutionResult>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub events: Vec<Value>,
}

// MARK: - Coins

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_type: String,
    pub coin_object_id: ObjectId,
    #[serde(with = "u64_string")]
    pub version: u64,
    pub digest: String,
    #[serde(with = "u64_string")]
    pub balance: u64,
    #[serde(default)]
    pub previous_transaction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}
