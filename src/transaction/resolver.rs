//! Argument resolution
//!
//! Turns loosely typed caller input into transaction arguments:
//! 1. Each parameter is classified from its declared Move type.
//! 2. Pure values are coerced and encoded immediately; object ids are
//!    parked in a side table keyed by argument position.
//! 3. All parked ids are fetched with a single `multi_get_objects` call
//!    and turned into owned or shared object arguments.

use std::collections::BTreeMap;

use super::pure::{encode_pure, encode_pure_untyped, PureType, PureValue};
use super::type_tag::TypeTag;
use super::types::{Argument, ObjectArg};
use crate::error::{SuiError, SuiResult};
use crate::rpc::{NormalizedMoveType, ObjectDataOptions, Owner, SuiObjectResponse, SuiRpc};
use crate::types::special_addresses::{MOVE_STDLIB, SUI_FRAMEWORK};
use crate::types::{Digest, ObjectId, ObjectRef, SuiAddress};
use crate::log_debug;

/// One caller-supplied argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArgInput {
    /// Output of an earlier command, or the gas coin
    Result(Argument),
    /// On-chain object, by id
    ObjectId(String),
    /// Address passed by value
    Address(String),
    Pure(PureValue),
}

impl CallArgInput {
    pub fn object(id: impl Into<String>) -> Self {
        CallArgInput::ObjectId(id.into())
    }

    pub fn address(address: impl Into<String>) -> Self {
        CallArgInput::Address(address.into())
    }

    pub fn pure(value: impl Into<PureValue>) -> Self {
        CallArgInput::Pure(value.into())
    }

    pub fn gas_coin() -> Self {
        CallArgInput::Result(Argument::GasCoin)
    }

    fn kind(&self) -> &'static str {
        match self {
            CallArgInput::Result(_) => "command result",
            CallArgInput::ObjectId(_) => "object id",
            CallArgInput::Address(_) => "address",
            CallArgInput::Pure(_) => "pure value",
        }
    }
}

impl From<Argument> for CallArgInput {
    fn from(argument: Argument) -> Self {
        CallArgInput::Result(argument)
    }
}

/// How a parameter must be supplied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Pure(PureType),
    Object { mutable: bool },
    /// Bare type parameter: object for an id, pure otherwise
    Generic,
    /// Only a command result can feed it (e.g. `vector<Coin<T>>`)
    ResultOnly(String),
}

fn is_struct(address: &str, module: &str, name: &str, want: &SuiAddress, want_module: &str, want_name: &str) -> bool {
    module == want_module
        && name == want_name
        && SuiAddress::from_hex(address).map(|a| a == *want).unwrap_or(false)
}

fn is_tx_context(ty: &NormalizedMoveType) -> bool {
    match ty {
        NormalizedMoveType::Reference(inner) | NormalizedMoveType::MutableReference(inner) => {
            matches!(
                inner.as_ref(),
                NormalizedMoveType::Struct { address, module, name, .. }
                    if is_struct(address, module, name, &SUI_FRAMEWORK, "tx_context", "TxContext")
            )
        }
        _ => false,
    }
}

/// Parameters the caller supplies; a trailing `TxContext` is implicit
pub fn user_parameters(parameters: &[NormalizedMoveType]) -> &[NormalizedMoveType] {
    match parameters.split_last() {
        Some((last, rest)) if is_tx_context(last) => rest,
        _ => parameters,
    }
}

/// Pure view of a normalized type, substituting known type arguments
fn pure_type(ty: &NormalizedMoveType, type_args: &[TypeTag]) -> Option<PureType> {
    let pure = match ty {
        NormalizedMoveType::Bool => PureType::Bool,
        NormalizedMoveType::U8 => PureType::U8,
        NormalizedMoveType::U16 => PureType::U16,
        NormalizedMoveType::U32 => PureType::U32,
        NormalizedMoveType::U64 => PureType::U64,
        NormalizedMoveType::U128 => PureType::U128,
        NormalizedMoveType::U256 => PureType::U256,
        NormalizedMoveType::Address => PureType::Address,
        NormalizedMoveType::Vector(inner) => PureType::Vector(Box::new(pure_type(inner, type_args)?)),
        NormalizedMoveType::Struct {
            address,
            module,
            name,
            type_arguments,
        } => {
            if is_struct(address, module, name, &MOVE_STDLIB, "string", "String") {
                PureType::String
            } else if is_struct(address, module, name, &MOVE_STDLIB, "ascii", "String") {
                PureType::AsciiString
            } else if is_struct(address, module, name, &SUI_FRAMEWORK, "object", "ID") {
                PureType::ObjectId
            } else if is_struct(address, module, name, &MOVE_STDLIB, "option", "Option")
                && type_arguments.len() == 1
            {
                PureType::Option(Box::new(pure_type(&type_arguments[0], type_args)?))
            } else {
                return None;
            }
        }
        NormalizedMoveType::TypeParameter(i) => PureType::from_type_tag(type_args.get(usize::from(*i))?)?,
        NormalizedMoveType::Signer
        | NormalizedMoveType::Reference(_)
        | NormalizedMoveType::MutableReference(_) => return None,
    };
    Some(pure)
}

/// Classify a declared parameter type
pub fn classify(ty: &NormalizedMoveType, type_args: &[TypeTag]) -> ParamKind {
    match ty {
        NormalizedMoveType::Reference(_) => ParamKind::Object { mutable: false },
        NormalizedMoveType::MutableReference(_) => ParamKind::Object { mutable: true },
        NormalizedMoveType::TypeParameter(_) => ParamKind::Generic,
        NormalizedMoveType::Struct { .. } => match pure_type(ty, type_args) {
            Some(pure) => ParamKind::Pure(pure),
            // Struct by value is an owned object
            None => ParamKind::Object { mutable: true },
        },
        other => match pure_type(other, type_args) {
            Some(pure) => ParamKind::Pure(pure),
            None => ParamKind::ResultOnly(format!("{:?}", other)),
        },
    }
}

/// A resolved argument slot, not yet attached to transaction inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedArg {
    Argument(Argument),
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingObject {
    id: ObjectId,
    mutable: bool,
}

/// Argument slots of one command while objects are outstanding
#[derive(Debug, Default)]
pub struct UnresolvedParameter {
    slots: Vec<Option<ResolvedArg>>,
    pending: BTreeMap<usize, PendingObject>,
}

fn parse_object_id(index: usize, value: &str) -> SuiResult<ObjectId> {
    SuiAddress::from_hex(value).map_err(|_| SuiError::InvalidObjectId {
        index,
        value: value.to_string(),
    })
}

impl UnresolvedParameter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn push(&mut self, arg: ResolvedArg) {
        self.slots.push(Some(arg));
    }

    fn push_pending(&mut self, id: ObjectId, mutable: bool) {
        self.pending.insert(self.slots.len(), PendingObject { id, mutable });
        self.slots.push(None);
    }

    /// Validate `input` against `kind` and append it as slot `index`
    pub fn add(&mut self, index: usize, input: &CallArgInput, kind: &ParamKind) -> SuiResult<()> {
        match (kind, input) {
            (_, CallArgInput::Result(argument)) => self.push(ResolvedArg::Argument(*argument)),

            (ParamKind::Object { mutable }, CallArgInput::ObjectId(id)) => {
                self.push_pending(parse_object_id(index, id)?, *mutable)
            }
            (ParamKind::Generic, CallArgInput::ObjectId(id)) => {
                self.push_pending(parse_object_id(index, id)?, true)
            }

            (ParamKind::Pure(ty), CallArgInput::Pure(value)) => {
                self.push(ResolvedArg::Pure(encode_pure(index, value, ty)?))
            }
            (ParamKind::Pure(ty @ (PureType::Address | PureType::ObjectId)), CallArgInput::Address(s))
            | (ParamKind::Pure(ty @ PureType::ObjectId), CallArgInput::ObjectId(s)) => {
                let value = PureValue::Address(parse_object_id(index, s)?);
                self.push(ResolvedArg::Pure(encode_pure(index, &value, ty)?))
            }
            (ParamKind::Generic, CallArgInput::Pure(value)) => {
                self.push(ResolvedArg::Pure(encode_pure_untyped(index, value)?))
            }
            (ParamKind::Generic, CallArgInput::Address(s)) => {
                let value = PureValue::Address(parse_object_id(index, s)?);
                self.push(ResolvedArg::Pure(encode_pure_untyped(index, &value)?))
            }

            (ParamKind::Object { .. }, other) => {
                return Err(SuiError::type_mismatch(index, "object id", other.kind()))
            }
            (ParamKind::Pure(ty), other) => {
                return Err(SuiError::type_mismatch(index, ty.to_string(), other.kind()))
            }
            (ParamKind::ResultOnly(ty), other) => {
                return Err(SuiError::type_mismatch(index, format!("result for {}", ty), other.kind()))
            }
        }
        Ok(())
    }

    /// Distinct pending ids in first-seen order
    fn pending_ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = Vec::with_capacity(self.pending.len());
        for pending in self.pending.values() {
            if !ids.contains(&pending.id) {
                ids.push(pending.id);
            }
        }
        ids
    }

    /// Fetch every pending object in one round trip and fill the slots
    pub fn resolve<R: SuiRpc + ?Sized>(mut self, rpc: &R) -> SuiResult<Vec<ResolvedArg>> {
        if !self.pending.is_empty() {
            let ids = self.pending_ids();
            let responses = rpc.multi_get_objects(&ids, &ObjectDataOptions::with_owner())?;
            if responses.len() != ids.len() {
                return Err(SuiError::rpc(format!(
                    "requested {} objects, received {}",
                    ids.len(),
                    responses.len()
                )));
            }
            log_debug!("resolver", "Fetched objects", count = ids.len());

            let fetched: Vec<(ObjectId, &SuiObjectResponse)> = ids.into_iter().zip(responses.iter()).collect();
            for (slot, pending) in std::mem::take(&mut self.pending) {
                let response = fetched
                    .iter()
                    .find(|(id, _)| *id == pending.id)
                    .map(|(_, response)| *response)
                    .ok_or_else(|| SuiError::ObjectNotFound(pending.id.to_hex()))?;
                self.slots[slot] = Some(ResolvedArg::Object(object_arg(&pending, response)?));
            }
        }

        self.slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.ok_or_else(|| SuiError::InvalidPureValue {
                index: i,
                reason: "argument left unresolved".into(),
            }))
            .collect()
    }
}

fn object_arg(pending: &PendingObject, response: &SuiObjectResponse) -> SuiResult<ObjectArg> {
    let data = response
        .data
        .as_ref()
        .ok_or_else(|| SuiError::ObjectNotFound(pending.id.to_hex()))?;

    match &data.owner {
        Some(Owner::Shared {
            initial_shared_version,
        }) => Ok(ObjectArg::SharedObject {
            id: pending.id,
            initial_shared_version: *initial_shared_version,
            mutable: pending.mutable,
        }),
        _ => {
            let digest = Digest::from_base58(&data.digest)?;
            Ok(ObjectArg::ImmOrOwnedObject(ObjectRef::new(
                data.object_id,
                data.version,
                digest,
            )))
        }
    }
}
