//! EIP-712 typed structured data hashing.
//!
//! This module implements [EIP-712] for hashing typed structured data,
//! enabling human-readable signing of structured messages in Ethereum wallets.
//!
//! # Overview
//!
//! EIP-712 typed data consists of:
//!
//! 1. **Type Definitions**: struct name to ordered `(name, type)` fields
//! 2. **Domain**: a struct value of type `EIP712Domain`
//! 3. **Message**: a struct value of type `primaryType`
//!
//! Hashing is driven entirely by the type definitions. The domain and the
//! message are converted once into the structural [`Value`] and then walked
//! field by field.
//!
//! # Hash Computation
//!
//! ```text
//! encodeType(T) = "T(type1 name1,...)" ++ encodeType of every struct T
//!                 references (transitively), sorted by name
//! typeHash(T)   = keccak256(encodeType(T))
//! hashStruct(v) = keccak256(typeHash(T) || encodeData(v))
//! signing hash  = keccak256("\x19\x01" || hashStruct(domain) || hashStruct(message))
//! ```
//!
//! `encodeData` writes one 32-byte word per field: atomic values are ABI
//! encoded, `string` and `bytes` are hashed, arrays hash the concatenation of
//! their encoded elements, and nested structs contribute their `hashStruct`.
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::TypedData;
//!
//! let json = r#"{
//!     "types": {
//!         "EIP712Domain": [{"name": "name", "type": "string"}],
//!         "Person": [
//!             {"name": "name", "type": "string"},
//!             {"name": "wallet", "type": "address"}
//!         ]
//!     },
//!     "primaryType": "Person",
//!     "domain": {"name": "My DApp"},
//!     "message": {
//!         "name": "Alice",
//!         "wallet": "0x0000000000000000000000000000000000000001"
//!     }
//! }"#;
//!
//! let typed_data = TypedData::from_json(json).unwrap();
//! assert_eq!(
//!     typed_data.encode_type("Person").unwrap(),
//!     "Person(string name,address wallet)"
//! );
//! let hash = typed_data.signing_hash().unwrap();
//! assert!(!hash.is_zero());
//! ```
//!
//! [EIP-712]: https://eips.ethereum.org/EIPS/eip-712

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::Address;
use crate::crypto::{self, PrivateKey};
use crate::error::{Error, Result};
use crate::hash::keccak256;
use crate::signature::Signature;

/// Name of the struct type the domain is hashed as.
pub const DOMAIN_TYPE: &str = "EIP712Domain";

/// Prefix of the EIP-712 signing payload.
const SIGNING_PREFIX: [u8; 2] = [0x19, 0x01];

/// Domain fields in the order EIP-712 lists them, with their types.
const DOMAIN_FIELDS: [(&str, &str); 5] = [
    ("name", "string"),
    ("version", "string"),
    ("chainId", "uint256"),
    ("verifyingContract", "address"),
    ("salt", "bytes32"),
];

/// A field definition in an EIP-712 struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
    /// The field name.
    pub name: String,
    /// The field type (e.g. "address", "uint256", "Person[]").
    #[serde(rename = "type")]
    pub field_type: String,
}

impl TypeField {
    /// Creates a field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// A structural EIP-712 value.
///
/// Atomic values keep their JSON shape (`Bool`, `Number`, `String`) and are
/// interpreted against the declared field type during hashing, so the same
/// `"0x..."` string can be an `address`, `bytes` or `uint256`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A JSON boolean.
    Bool(bool),
    /// A JSON integer.
    Number(i128),
    /// A JSON string: text, hex data, an address or a decimal/hex integer.
    String(String),
    /// An array of values.
    Array(Vec<Value>),
    /// A struct value, keyed by field name.
    Struct(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the fields if this is a struct value.
    #[must_use]
    pub const fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the elements if this is an array value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the string if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Struct(_) => "struct",
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        Ok(match value {
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                let n = n
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| n.as_u64().map(i128::from))
                    .ok_or_else(|| {
                        Error::InvalidTypedData(format!("non-integer number {n}"))
                    })?;
                Self::Number(n)
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Array(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<_>>()?,
            ),
            serde_json::Value::Object(map) => Self::Struct(
                map.into_iter()
                    .map(|(k, v)| Ok((k, Self::try_from(v)?)))
                    .collect::<Result<_>>()?,
            ),
            serde_json::Value::Null => {
                return Err(Error::InvalidTypedData("null value".to_string()));
            }
        })
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => i64::try_from(n)
                .map(Self::from)
                .or_else(|_| u64::try_from(n).map(Self::from))
                .unwrap_or_else(|_| Self::String(n.to_string())),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Struct(fields) => {
                Self::Object(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(i128::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Address> for Value {
    fn from(address: Address) -> Self {
        Self::String(address.to_checksum_hex())
    }
}

impl From<B256> for Value {
    fn from(word: B256) -> Self {
        Self::String(word.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self::Struct(fields)
    }
}

/// EIP-712 domain parameters.
///
/// A typed convenience for building the domain value. Only the fields that
/// are set become part of the `EIP712Domain` type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eip712Domain {
    /// The user-readable name of the signing domain.
    pub name: Option<String>,
    /// The current major version of the signing domain.
    pub version: Option<String>,
    /// The EIP-155 chain ID.
    pub chain_id: Option<u64>,
    /// The address of the contract that will verify the signature.
    pub verifying_contract: Option<Address>,
    /// A disambiguating salt for the protocol.
    pub salt: Option<B256>,
}

impl Eip712Domain {
    /// Returns the `EIP712Domain` field definitions for the set fields.
    #[must_use]
    pub fn type_fields(&self) -> Vec<TypeField> {
        let present = [
            self.name.is_some(),
            self.version.is_some(),
            self.chain_id.is_some(),
            self.verifying_contract.is_some(),
            self.salt.is_some(),
        ];
        DOMAIN_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, set)| *set)
            .map(|((name, ty), _)| TypeField::new(*name, *ty))
            .collect()
    }
}

impl From<Eip712Domain> for Value {
    fn from(domain: Eip712Domain) -> Self {
        let mut fields = BTreeMap::new();
        if let Some(name) = domain.name {
            fields.insert("name".to_string(), Self::String(name));
        }
        if let Some(version) = domain.version {
            fields.insert("version".to_string(), Self::String(version));
        }
        if let Some(chain_id) = domain.chain_id {
            fields.insert("chainId".to_string(), chain_id.into());
        }
        if let Some(contract) = domain.verifying_contract {
            fields.insert("verifyingContract".to_string(), contract.into());
        }
        if let Some(salt) = domain.salt {
            fields.insert("salt".to_string(), salt.into());
        }
        Self::Struct(fields)
    }
}

/// EIP-712 typed data: type definitions, domain and message.
///
/// Parse with [`TypedData::from_json`] or build with [`TypedData::new`].
/// When the definitions omit `EIP712Domain`, it is inferred from the domain
/// fields that are present, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TypedDataJson", into = "TypedDataJson")]
pub struct TypedData {
    types: BTreeMap<String, Vec<TypeField>>,
    primary_type: String,
    domain: Value,
    message: Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypedDataJson {
    types: BTreeMap<String, Vec<TypeField>>,
    primary_type: String,
    domain: serde_json::Value,
    message: serde_json::Value,
}

impl TryFrom<TypedDataJson> for TypedData {
    type Error = Error;

    fn try_from(raw: TypedDataJson) -> Result<Self> {
        Self::from_parts(
            raw.types,
            raw.primary_type,
            Value::try_from(raw.domain)?,
            Value::try_from(raw.message)?,
        )
    }
}

impl From<TypedData> for TypedDataJson {
    fn from(data: TypedData) -> Self {
        Self {
            types: data.types,
            primary_type: data.primary_type,
            domain: data.domain.into(),
            message: data.message.into(),
        }
    }
}

impl TypedData {
    /// Creates typed data from a typed domain, JSON type definitions and a
    /// JSON message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonError`] if `types` is not a map of field lists,
    /// or [`Error::InvalidTypedData`] if the message is not a struct value.
    pub fn new(
        domain: Eip712Domain,
        types: serde_json::Value,
        primary_type: impl Into<String>,
        message: serde_json::Value,
    ) -> Result<Self> {
        let mut types: BTreeMap<String, Vec<TypeField>> = serde_json::from_value(types)?;
        types
            .entry(DOMAIN_TYPE.to_string())
            .or_insert_with(|| domain.type_fields());
        Self::from_parts(
            types,
            primary_type.into(),
            domain.into(),
            Value::try_from(message)?,
        )
    }

    /// Assembles typed data from already converted parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTypedData`] if the domain or the message is not
    /// a struct value.
    pub fn from_parts(
        mut types: BTreeMap<String, Vec<TypeField>>,
        primary_type: String,
        domain: Value,
        message: Value,
    ) -> Result<Self> {
        let domain_fields = domain
            .as_struct()
            .ok_or_else(|| Error::InvalidTypedData("domain must be an object".to_string()))?;
        if message.as_struct().is_none() {
            return Err(Error::InvalidTypedData(
                "message must be an object".to_string(),
            ));
        }
        if !types.contains_key(DOMAIN_TYPE) {
            let inferred = DOMAIN_FIELDS
                .iter()
                .filter(|(name, _)| domain_fields.contains_key(*name))
                .map(|(name, ty)| TypeField::new(*name, *ty))
                .collect();
            types.insert(DOMAIN_TYPE.to_string(), inferred);
        }

        Ok(Self {
            types,
            primary_type,
            domain,
            message,
        })
    }

    /// Parses typed data from `eth_signTypedData_v4` JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonError`] if the JSON is malformed, including when
    /// the domain or message is not an object or holds a null or fractional
    /// value.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the typed data to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonError`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the type definitions.
    #[must_use]
    pub const fn types(&self) -> &BTreeMap<String, Vec<TypeField>> {
        &self.types
    }

    /// Returns the name of the message type.
    #[must_use]
    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    /// Returns the domain value.
    #[must_use]
    pub const fn domain(&self) -> &Value {
        &self.domain
    }

    /// Returns the message value.
    #[must_use]
    pub const fn message(&self) -> &Value {
        &self.message
    }

    /// Computes the EIP-712 signing hash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedType`] if a referenced type is not defined,
    /// or [`Error::InvalidTypedData`] if a value does not match its type.
    pub fn signing_hash(&self) -> Result<B256> {
        let domain_separator = self.domain_separator()?;
        let message_hash = self.hash_struct(&self.primary_type, &self.message)?;

        let mut buf = [0u8; 66];
        buf[..2].copy_from_slice(&SIGNING_PREFIX);
        buf[2..34].copy_from_slice(domain_separator.as_slice());
        buf[34..].copy_from_slice(message_hash.as_slice());

        let hash = B256::from(keccak256(buf));
        debug!(primary_type = %self.primary_type, %hash, "typed data hashed");
        Ok(hash)
    }

    /// Computes `hashStruct(domain)` over the `EIP712Domain` definition.
    ///
    /// # Errors
    ///
    /// See [`Self::signing_hash`].
    pub fn domain_separator(&self) -> Result<B256> {
        self.hash_struct(DOMAIN_TYPE, &self.domain)
    }

    /// Signs the typed data. The signature is low-S.
    ///
    /// # Errors
    ///
    /// See [`Self::signing_hash`].
    pub fn sign(&self, key: &PrivateKey) -> Result<Signature> {
        crypto::sign(&self.signing_hash()?.0, key)
    }

    /// Recovers the address that produced `signature` over this typed data.
    ///
    /// # Errors
    ///
    /// See [`Self::signing_hash`]; returns [`Error::InvalidSignature`] if
    /// recovery fails.
    pub fn recover_signer(&self, signature: &Signature) -> Result<Address> {
        signature.recover_address(&self.signing_hash()?.0)
    }

    /// Encodes a struct type with its transitive dependencies, e.g.
    /// `Mail(Person from,Person to,string contents)Person(string name,address wallet)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedType`] if `type_name` or any type it
    /// references is neither defined nor atomic.
    pub fn encode_type(&self, type_name: &str) -> Result<String> {
        let mut deps = BTreeSet::new();
        self.collect_dependencies(type_name, &mut deps)?;
        deps.remove(type_name);

        let mut encoded = format_struct(type_name, self.fields(type_name)?);
        for dep in &deps {
            encoded.push_str(&format_struct(dep, self.fields(dep)?));
        }
        Ok(encoded)
    }

    /// Computes `keccak256(encodeType(type_name))`.
    ///
    /// # Errors
    ///
    /// See [`Self::encode_type`].
    pub fn type_hash(&self, type_name: &str) -> Result<B256> {
        Ok(B256::from(keccak256(self.encode_type(type_name)?)))
    }

    /// Computes `hashStruct` of `value` as an instance of `type_name`.
    ///
    /// # Errors
    ///
    /// See [`Self::signing_hash`].
    pub fn hash_struct(&self, type_name: &str, value: &Value) -> Result<B256> {
        let fields = self.fields(type_name)?;
        let values = value.as_struct().ok_or_else(|| {
            Error::InvalidTypedData(format!(
                "expected struct for {type_name}, got {}",
                value.kind()
            ))
        })?;

        let mut buf = Vec::with_capacity(32 * (fields.len() + 1));
        buf.extend_from_slice(self.type_hash(type_name)?.as_slice());
        for field in fields {
            let field_value = values.get(&field.name).ok_or_else(|| {
                Error::InvalidTypedData(format!("{type_name} is missing field {}", field.name))
            })?;
            buf.extend_from_slice(&self.encode_field(&field.field_type, field_value)?);
        }

        Ok(B256::from(keccak256(&buf)))
    }

    fn fields(&self, type_name: &str) -> Result<&[TypeField]> {
        self.types
            .get(type_name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UndefinedType(type_name.to_string()))
    }

    fn collect_dependencies(&self, type_name: &str, found: &mut BTreeSet<String>) -> Result<()> {
        if !found.insert(type_name.to_string()) {
            return Ok(());
        }
        for field in self.fields(type_name)? {
            let base = base_type(&field.field_type);
            if self.types.contains_key(base) {
                self.collect_dependencies(base, found)?;
            } else if AtomicType::parse(base).is_none() {
                return Err(Error::UndefinedType(base.to_string()));
            }
        }
        Ok(())
    }

    fn encode_field(&self, field_type: &str, value: &Value) -> Result<[u8; 32]> {
        if let Some((element_type, len)) = split_array(field_type)? {
            let items = value.as_array().ok_or_else(|| {
                Error::InvalidTypedData(format!(
                    "expected array for {field_type}, got {}",
                    value.kind()
                ))
            })?;
            if let Some(len) = len.filter(|len| *len != items.len()) {
                return Err(Error::InvalidTypedData(format!(
                    "{field_type} expects {len} elements, got {}",
                    items.len()
                )));
            }

            let mut buf = Vec::with_capacity(32 * items.len());
            for item in items {
                buf.extend_from_slice(&self.encode_field(element_type, item)?);
            }
            return Ok(keccak256(&buf));
        }

        if self.types.contains_key(field_type) {
            return Ok(self.hash_struct(field_type, value)?.0);
        }

        AtomicType::parse(field_type)
            .ok_or_else(|| Error::UndefinedType(field_type.to_string()))?
            .encode(value)
    }
}

fn format_struct(name: &str, fields: &[TypeField]) -> String {
    let members: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.field_type, f.name))
        .collect();
    format!("{name}({})", members.join(","))
}

/// Strips every array suffix: `Person[][3]` becomes `Person`.
fn base_type(field_type: &str) -> &str {
    field_type.split('[').next().unwrap_or(field_type)
}

/// Splits the outermost array suffix: `uint8[2][]` becomes `("uint8[2]", None)`.
fn split_array(field_type: &str) -> Result<Option<(&str, Option<usize>)>> {
    let Some(inner) = field_type.strip_suffix(']') else {
        return Ok(None);
    };
    let open = inner
        .rfind('[')
        .ok_or_else(|| Error::InvalidTypedData(format!("malformed array type {field_type}")))?;
    let len = &inner[open + 1..];
    let len = if len.is_empty() {
        None
    } else {
        Some(len.parse::<usize>().map_err(|_| {
            Error::InvalidTypedData(format!("malformed array length in {field_type}"))
        })?)
    };
    Ok(Some((&inner[..open], len)))
}

/// The atomic Solidity types EIP-712 encodes directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AtomicType {
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Uint(usize),
    Int(usize),
}

impl AtomicType {
    fn parse(name: &str) -> Option<Self> {
        fn int_bits(digits: &str) -> Option<usize> {
            digits
                .parse::<usize>()
                .ok()
                .filter(|n| (8..=256).contains(n) && n % 8 == 0)
        }

        match name {
            "address" => Some(Self::Address),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            "bytes" => Some(Self::Bytes),
            _ => {
                if let Some(digits) = name.strip_prefix("bytes") {
                    digits
                        .parse::<usize>()
                        .ok()
                        .filter(|n| (1..=32).contains(n))
                        .map(Self::FixedBytes)
                } else if let Some(digits) = name.strip_prefix("uint") {
                    int_bits(digits).map(Self::Uint)
                } else if let Some(digits) = name.strip_prefix("int") {
                    int_bits(digits).map(Self::Int)
                } else {
                    None
                }
            }
        }
    }

    fn encode(self, value: &Value) -> Result<[u8; 32]> {
        let mut word = [0u8; 32];
        match self {
            Self::Address => {
                let address = Address::from_hex(expect_str(value, "address")?)
                    .map_err(|e| Error::InvalidTypedData(e.to_string()))?;
                word[12..].copy_from_slice(address.as_bytes());
            }
            Self::Bool => match value {
                Value::Bool(b) => word[31] = u8::from(*b),
                other => {
                    return Err(Error::InvalidTypedData(format!(
                        "expected bool, got {}",
                        other.kind()
                    )));
                }
            },
            Self::String => word = keccak256(expect_str(value, "string")?.as_bytes()),
            Self::Bytes => word = keccak256(parse_hex_data(value)?),
            Self::FixedBytes(size) => {
                let bytes = parse_hex_data(value)?;
                if bytes.len() > size {
                    return Err(Error::InvalidTypedData(format!(
                        "{} bytes do not fit bytes{size}",
                        bytes.len()
                    )));
                }
                word[..bytes.len()].copy_from_slice(&bytes);
            }
            Self::Uint(bits) => {
                let (negative, magnitude) = parse_integer(value)?;
                if (negative && !magnitude.is_zero()) || magnitude.bit_len() > bits {
                    return Err(Error::InvalidTypedData(format!(
                        "value out of range for uint{bits}"
                    )));
                }
                word = magnitude.to_be_bytes::<32>();
            }
            Self::Int(bits) => {
                let (negative, magnitude) = parse_integer(value)?;
                let limit = U256::from(1u8) << (bits - 1);
                let in_range = if negative {
                    magnitude <= limit
                } else {
                    magnitude < limit
                };
                if !in_range {
                    return Err(Error::InvalidTypedData(format!(
                        "value out of range for int{bits}"
                    )));
                }
                let twos = if negative {
                    U256::ZERO.wrapping_sub(magnitude)
                } else {
                    magnitude
                };
                word = twos.to_be_bytes::<32>();
            }
        }
        Ok(word)
    }
}

fn expect_str<'a>(value: &'a Value, expected: &str) -> Result<&'a str> {
    value.as_str().ok_or_else(|| {
        Error::InvalidTypedData(format!("expected {expected} string, got {}", value.kind()))
    })
}

fn parse_hex_data(value: &Value) -> Result<Vec<u8>> {
    let s = expect_str(value, "hex")?;
    Ok(hex::decode(s.strip_prefix("0x").unwrap_or(s))?)
}

/// Parses a JSON number, decimal string or `0x` hex string into sign and
/// magnitude.
fn parse_integer(value: &Value) -> Result<(bool, U256)> {
    match value {
        Value::Number(n) => Ok((*n < 0, U256::from(n.unsigned_abs()))),
        Value::String(s) => {
            let (negative, digits) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s.as_str()),
            };
            let (radix, body) = match digits.strip_prefix("0x") {
                Some(hex_digits) => (16, hex_digits),
                None => (10, digits),
            };
            if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
                return Err(Error::InvalidTypedData(format!("invalid integer {s:?}")));
            }
            let magnitude = U256::from_str_radix(body, u64::from(radix))
                .map_err(|_| Error::InvalidTypedData(format!("invalid integer {s:?}")))?;
            Ok((negative, magnitude))
        }
        other => Err(Error::InvalidTypedData(format!(
            "expected integer, got {}",
            other.kind()
        ))),
    }
}
