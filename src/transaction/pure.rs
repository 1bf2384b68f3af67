//! Pure (non-object) call arguments
//!
//! Caller-supplied values are loosely typed: an integer literal may feed a
//! `u8` or a `u256`, a string may be a Move `String` or an address. They
//! are coerced against the declared parameter type and then BCS-encoded.

use serde::{Serialize, Serializer};
use std::fmt;

use super::type_tag::TypeTag;
use crate::error::{SuiError, SuiResult};
use crate::types::special_addresses::{MOVE_STDLIB, SUI_FRAMEWORK};
use crate::types::SuiAddress;

/// Caller-facing pure value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PureValue {
    Bool(bool),
    /// Untyped integer literal
    Number(u128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    /// Little-endian
    U256([u8; 32]),
    Address(SuiAddress),
    String(String),
    Bytes(Vec<u8>),
    Vector(Vec<PureValue>),
    Option(Option<Box<PureValue>>),
}

/// Integer literal widened to 256 bits, little-endian
type Wide = [u8; 32];

fn widen(le: &[u8]) -> Wide {
    let mut wide = [0u8; 32];
    wide[..le.len()].copy_from_slice(le);
    wide
}

fn narrow<const N: usize>(wide: &Wide) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&wide[..N]);
    out
}

enum Literal {
    Int(Wide),
    TooLarge,
}

/// Parse an unsigned decimal string, `None` if it is not one
fn parse_decimal(s: &str) -> Option<Literal> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut wide = [0u8; 32];
    for digit in s.bytes().map(|b| b - b'0') {
        let mut carry = u16::from(digit);
        for byte in wide.iter_mut() {
            let v = u16::from(*byte) * 10 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        if carry != 0 {
            return Some(Literal::TooLarge);
        }
    }
    Some(Literal::Int(wide))
}

impl PureValue {
    fn kind(&self) -> &'static str {
        match self {
            PureValue::Bool(_) => "bool",
            PureValue::Number(_) => "number",
            PureValue::U8(_) => "u8",
            PureValue::U16(_) => "u16",
            PureValue::U32(_) => "u32",
            PureValue::U64(_) => "u64",
            PureValue::U128(_) => "u128",
            PureValue::U256(_) => "u256",
            PureValue::Address(_) => "address",
            PureValue::String(_) => "string",
            PureValue::Bytes(_) => "bytes",
            PureValue::Vector(_) => "vector",
            PureValue::Option(_) => "option",
        }
    }

    fn as_integer(&self) -> Option<Literal> {
        let wide = match self {
            PureValue::Number(n) | PureValue::U128(n) => widen(&n.to_le_bytes()),
            PureValue::U8(n) => widen(&[*n]),
            PureValue::U16(n) => widen(&n.to_le_bytes()),
            PureValue::U32(n) => widen(&n.to_le_bytes()),
            PureValue::U64(n) => widen(&n.to_le_bytes()),
            PureValue::U256(n) => *n,
            // Decimal strings are accepted for large integers
            PureValue::String(s) => return parse_decimal(s.trim()),
            _ => return None,
        };
        Some(Literal::Int(wide))
    }

    fn literal(&self) -> String {
        match self {
            PureValue::Number(n) | PureValue::U128(n) => n.to_string(),
            PureValue::U8(n) => n.to_string(),
            PureValue::U16(n) => n.to_string(),
            PureValue::U32(n) => n.to_string(),
            PureValue::U64(n) => n.to_string(),
            PureValue::U256(n) => {
                let mut be = *n;
                be.reverse();
                format!("0x{}", hex::encode(be))
            }
            PureValue::String(s) => s.clone(),
            other => other.kind().to_string(),
        }
    }
}

impl From<bool> for PureValue {
    fn from(value: bool) -> Self {
        PureValue::Bool(value)
    }
}

impl From<u64> for PureValue {
    fn from(value: u64) -> Self {
        PureValue::U64(value)
    }
}

impl From<SuiAddress> for PureValue {
    fn from(value: SuiAddress) -> Self {
        PureValue::Address(value)
    }
}

impl From<&str> for PureValue {
    fn from(value: &str) -> Self {
        PureValue::String(value.to_string())
    }
}

impl From<String> for PureValue {
    fn from(value: String) -> Self {
        PureValue::String(value)
    }
}

impl From<Vec<u8>> for PureValue {
    fn from(value: Vec<u8>) -> Self {
        PureValue::Bytes(value)
    }
}

/// Declared type of a pure parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PureType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    /// `0x1::string::String`
    String,
    /// `0x1::ascii::String`
    AsciiString,
    /// `0x2::object::ID`
    ObjectId,
    Vector(Box<PureType>),
    /// `0x1::option::Option<T>`
    Option(Box<PureType>),
}

impl PureType {
    /// Pure view of a type tag, `None` for object types
    pub fn from_type_tag(tag: &TypeTag) -> Option<Self> {
        let ty = match tag {
            TypeTag::Bool => PureType::Bool,
            TypeTag::U8 => PureType::U8,
            TypeTag::U16 => PureType::U16,
            TypeTag::U32 => PureType::U32,
            TypeTag::U64 => PureType::U64,
            TypeTag::U128 => PureType::U128,
            TypeTag::U256 => PureType::U256,
            TypeTag::Address => PureType::Address,
            TypeTag::Signer => return None,
            TypeTag::Vector(inner) => PureType::Vector(Box::new(Self::from_type_tag(inner)?)),
            TypeTag::Struct(s) => {
                if s.is(&MOVE_STDLIB, "string", "String") {
                    PureType::String
                } else if s.is(&MOVE_STDLIB, "ascii", "String") {
                    PureType::AsciiString
                } else if s.is(&SUI_FRAMEWORK, "object", "ID") {
                    PureType::ObjectId
                } else if s.is(&MOVE_STDLIB, "option", "Option") && s.type_params.len() == 1 {
                    PureType::Option(Box::new(Self::from_type_tag(&s.type_params[0])?))
                } else {
                    return None;
                }
            }
        };
        Some(ty)
    }

    /// Width in bytes of an integer type
    fn integer_width(&self) -> Option<usize> {
        match self {
            PureType::U8 => Some(1),
            PureType::U16 => Some(2),
            PureType::U32 => Some(4),
            PureType::U64 => Some(8),
            PureType::U128 => Some(16),
            PureType::U256 => Some(32),
            _ => None,
        }
    }
}

impl fmt::Display for PureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PureType::Bool => write!(f, "bool"),
            PureType::U8 => write!(f, "u8"),
            PureType::U16 => write!(f, "u16"),
            PureType::U32 => write!(f, "u32"),
            PureType::U64 => write!(f, "u64"),
            PureType::U128 => write!(f, "u128"),
            PureType::U256 => write!(f, "u256"),
            PureType::Address => write!(f, "address"),
            PureType::String => write!(f, "0x1::string::String"),
            PureType::AsciiString => write!(f, "0x1::ascii::String"),
            PureType::ObjectId => write!(f, "0x2::object::ID"),
            PureType::Vector(inner) => write!(f, "vector<{}>", inner),
            PureType::Option(inner) => write!(f, "0x1::option::Option<{}>", inner),
        }
    }
}

/// Value after coercion, serialized with `bcs`
#[derive(Debug, Clone, PartialEq, Eq)]
enum Typed {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    /// Little-endian
    U256([u8; 32]),
    Address(SuiAddress),
    String(String),
    Bytes(Vec<u8>),
    Vector(Vec<Typed>),
    Option(Option<Box<Typed>>),
}

impl Serialize for Typed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Typed::Bool(v) => v.serialize(serializer),
            Typed::U8(v) => v.serialize(serializer),
            Typed::U16(v) => v.serialize(serializer),
            Typed::U32(v) => v.serialize(serializer),
            Typed::U64(v) => v.serialize(serializer),
            Typed::U128(v) => v.serialize(serializer),
            Typed::U256(v) => v.serialize(serializer),
            Typed::Address(v) => v.serialize(serializer),
            Typed::String(v) => v.serialize(serializer),
            Typed::Bytes(v) => v.serialize(serializer),
            Typed::Vector(v) => v.serialize(serializer),
            Typed::Option(v) => v.serialize(serializer),
        }
    }
}

fn coerce(index: usize, value: &PureValue, ty: &PureType) -> SuiResult<Typed> {
    let mismatch = || SuiError::type_mismatch(index, ty.to_string(), value.kind());

    if let Some(width) = ty.integer_width() {
        let too_large = || SuiError::InvalidPureValue {
            index,
            reason: format!("{} does not fit in {}", value.literal(), ty),
        };
        let wide = match value.as_integer().ok_or_else(mismatch)? {
            Literal::Int(wide) => wide,
            Literal::TooLarge => return Err(too_large()),
        };
        if wide[width..].iter().any(|&b| b != 0) {
            return Err(too_large());
        }
        let typed = match ty {
            PureType::U8 => Typed::U8(wide[0]),
            PureType::U16 => Typed::U16(u16::from_le_bytes(narrow(&wide))),
            PureType::U32 => Typed::U32(u32::from_le_bytes(narrow(&wide))),
            PureType::U64 => Typed::U64(u64::from_le_bytes(narrow(&wide))),
            PureType::U128 => Typed::U128(u128::from_le_bytes(narrow(&wide))),
            _ => Typed::U256(wide),
        };
        return Ok(typed);
    }

    match (ty, value) {
        (PureType::Bool, PureValue::Bool(b)) => Ok(Typed::Bool(*b)),
        (PureType::Address | PureType::ObjectId, PureValue::Address(a)) => Ok(Typed::Address(*a)),
        (PureType::Address | PureType::ObjectId, PureValue::String(s)) => SuiAddress::from_hex(s)
            .map(Typed::Address)
            .map_err(|_| SuiError::InvalidPureValue {
                index,
                reason: format!("`{}` is not an address", s),
            }),
        (PureType::String, PureValue::String(s)) => Ok(Typed::String(s.clone())),
        (PureType::AsciiString, PureValue::String(s)) => {
            if !s.is_ascii() {
                return Err(SuiError::InvalidPureValue {
                    index,
                    reason: "ascii string contains non-ASCII characters".into(),
                });
            }
            Ok(Typed::String(s.clone()))
        }
        (PureType::Vector(inner), PureValue::Bytes(bytes)) if **inner == PureType::U8 => {
            Ok(Typed::Bytes(bytes.clone()))
        }
        (PureType::Vector(inner), PureValue::String(s)) if **inner == PureType::U8 => {
            Ok(Typed::Bytes(s.as_bytes().to_vec()))
        }
        (PureType::Vector(inner), PureValue::Vector(items)) => items
            .iter()
            .map(|item| coerce(index, item, inner))
            .collect::<SuiResult<Vec<_>>>()
            .map(Typed::Vector),
        (PureType::Option(_), PureValue::Option(None)) => Ok(Typed::Option(None)),
        (PureType::Option(inner), PureValue::Option(Some(v))) => {
            Ok(Typed::Option(Some(Box::new(coerce(index, v, inner)?))))
        }
        // A bare value for an Option parameter means Some(value)
        (PureType::Option(inner), v) => Ok(Typed::Option(Some(Box::new(coerce(index, v, inner)?)))),
        _ => Err(mismatch()),
    }
}

fn infer(index: usize, value: &PureValue) -> SuiResult<Typed> {
    let typed = match value {
        PureValue::Bool(b) => Typed::Bool(*b),
        PureValue::Number(n) => match u64::try_from(*n) {
            Ok(n) => Typed::U64(n),
            Err(_) => Typed::U128(*n),
        },
        PureValue::U8(n) => Typed::U8(*n),
        PureValue::U16(n) => Typed::U16(*n),
        PureValue::U32(n) => Typed::U32(*n),
        PureValue::U64(n) => Typed::U64(*n),
        PureValue::U128(n) => Typed::U128(*n),
        PureValue::U256(n) => Typed::U256(*n),
        PureValue::Address(a) => Typed::Address(*a),
        PureValue::String(s) => Typed::String(s.clone()),
        PureValue::Bytes(b) => Typed::Bytes(b.clone()),
        PureValue::Vector(items) => Typed::Vector(
            items
                .iter()
                .map(|item| infer(index, item))
                .collect::<SuiResult<Vec<_>>>()?,
        ),
        PureValue::Option(None) => Typed::Option(None),
        PureValue::Option(Some(v)) => Typed::Option(Some(Box::new(infer(index, v)?))),
    };
    Ok(typed)
}

/// Coerce `value` to `ty` and BCS-encode it. `index` names the argument
/// in errors.
pub fn encode_pure(index: usize, value: &PureValue, ty: &PureType) -> SuiResult<Vec<u8>> {
    let typed = coerce(index, value, ty)?;
    Ok(bcs::to_bytes(&typed)?)
}

/// Encode without a declared type, using each value's natural Move type
pub fn encode_pure_untyped(index: usize, value: &PureValue) -> SuiResult<Vec<u8>> {
    let typed = infer(index, value)?;
    Ok(bcs::to_bytes(&typed)?)
}
