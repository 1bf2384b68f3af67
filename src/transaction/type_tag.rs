//! Move type tags
//!
//! Parses the textual form used for Move call type arguments, e.g.
//! `0x2::coin::Coin<0x2::sui::SUI>` or `vector<u8>`, into the BCS
//! `TypeTag` enum. Variant order matches the on-chain enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::SuiAddress;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    /// `address::module::name` matches, ignoring type parameters
    pub fn is(&self, address: &SuiAddress, module: &str, name: &str) -> bool {
        self.address == *address && self.module == module && self.name == name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TypeTagError(String);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    ColonColon,
    Lt,
    Gt,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token>, TypeTagError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' => {
                chars.next();
            }
            '<' => {
                chars.next();
                tokens.push(Token::Lt);
            }
            '>' => {
                chars.next();
                tokens.push(Token::Gt);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            ':' => {
                chars.next();
                if chars.next() != Some(':') {
                    return Err(TypeTagError("expected `::`".into()));
                }
                tokens.push(Token::ColonColon);
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(name));
            }
            other => return Err(TypeTagError(format!("unexpected character `{}`", other))),
        }
    }
    Ok(tokens)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expect(&mut self, expected: Token) -> Result<(), TypeTagError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            other => Err(TypeTagError(format!("expected {:?}, found {:?}", expected, other))),
        }
    }

    fn identifier(&mut self) -> Result<String, TypeTagError> {
        match self.next() {
            Some(Token::Name(name)) if is_identifier(&name) => Ok(name),
            other => Err(TypeTagError(format!("expected identifier, found {:?}", other))),
        }
    }

    fn type_params(&mut self) -> Result<Vec<TypeTag>, TypeTagError> {
        let mut params = Vec::new();
        if self.peek() != Some(&Token::Lt) {
            return Ok(params);
        }
        self.next();
        loop {
            params.push(self.type_tag()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::Gt) => break,
                other => return Err(TypeTagError(format!("expected `,` or `>`, found {:?}", other))),
            }
        }
        Ok(params)
    }

    fn type_tag(&mut self) -> Result<TypeTag, TypeTagError> {
        let name = match self.next() {
            Some(Token::Name(name)) => name,
            other => return Err(TypeTagError(format!("expected type, found {:?}", other))),
        };
        let tag = match name.as_str() {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            "vector" => {
                self.expect(Token::Lt)?;
                let inner = self.type_tag()?;
                self.expect(Token::Gt)?;
                TypeTag::Vector(Box::new(inner))
            }
            _ => {
                let address = SuiAddress::from_hex(&name)
                    .map_err(|_| TypeTagError(format!("invalid address `{}`", name)))?;
                self.expect(Token::ColonColon)?;
                let module = self.identifier()?;
                self.expect(Token::ColonColon)?;
                let struct_name = self.identifier()?;
                let type_params = self.type_params()?;
                TypeTag::Struct(Box::new(StructTag {
                    address,
                    module,
                    name: struct_name,
                    type_params,
                }))
            }
        };
        Ok(tag)
    }
}

impl FromStr for TypeTag {
    type Err = TypeTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            tokens: tokenize(s)?,
            pos: 0,
        };
        let tag = parser.type_tag()?;
        if parser.pos != parser.tokens.len() {
            return Err(TypeTagError("trailing input after type".into()));
        }
        Ok(tag)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => write!(f, "{}", tag),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::special_addresses::SUI_FRAMEWORK;

    #[test]
    fn test_parse_primitives() {
        assert_eq!("u64".parse::<TypeTag>().unwrap(), TypeTag::U64);
        assert_eq!(
            "vector<vector<u8>>".parse::<TypeTag>().unwrap(),
            TypeTag::Vector(Box::new(TypeTag::Vector(Box::new(TypeTag::U8))))
        );
    }

    #[test]
    fn test_parse_struct() {
        let tag: TypeTag = "0x2::coin::Coin<0x2::sui::SUI>".parse().unwrap();
        match &tag {
            TypeTag::Struct(s) => {
                assert!(s.is(&SUI_FRAMEWORK, "coin", "Coin"));
                assert_eq!(s.type_params.len(), 1);
            }
            _ => panic!("expected struct"),
        }
        assert_eq!(
            tag.to_string(),
            format!("{}::coin::Coin<{}::sui::SUI>", SUI_FRAMEWORK, SUI_FRAMEWORK)
        );

        let pair: TypeTag = "0x2::pool::Pool< 0x2::sui::SUI , u64 >".parse().unwrap();
        match pair {
            TypeTag::Struct(s) => assert_eq!(s.type_params, vec![
                "0x2::sui::SUI".parse().unwrap(),
                TypeTag::U64
            ]),
            _ => panic!("expected struct"),
        }
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "u7", "vector<u8", "0x2::coin", "0x2::coin::Coin<>", "0xzz::a::B", "u8 u8", "0x2:coin::Coin"] {
            assert!(bad.parse::<TypeTag>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_bcs_variant_indices() {
        assert_eq!(bcs::to_bytes(&TypeTag::U64).unwrap(), vec![2]);
        assert_eq!(bcs::to_bytes(&TypeTag::U16).unwrap(), vec![8]);
        let sui: TypeTag = "0x2::sui::SUI".parse().unwrap();
        let bytes = bcs::to_bytes(&sui).unwrap();
        assert_eq!(bytes[0], 7);
        assert_eq!(bytes[32], 2);
        // module name length prefix follows the address
        assert_eq!(bytes[33], 3);
    }
}
