//! Recursive Length Prefix (RLP) encoding and decoding.
//!
//! RLP is Ethereum's serialization format for nested byte strings. Every
//! value is either a byte string or a list of values:
//!
//! | Value                          | Encoding                                   |
//! |--------------------------------|--------------------------------------------|
//! | single byte `< 0x80`           | the byte itself                            |
//! | byte string, length `<= 55`    | `0x80 + len`, bytes                        |
//! | byte string, length `> 55`     | `0xb7 + len_of_len`, big-endian len, bytes |
//! | list, payload `<= 55`          | `0xc0 + len`, payload                      |
//! | list, payload `> 55`           | `0xf7 + len_of_len`, big-endian len, payload |
//!
//! Integers are encoded as their minimal big-endian byte string; zero is the
//! empty string.
//!
//! [`decode`] is strict: truncated input, trailing bytes, and every
//! non-canonical length form are rejected with [`Error::MalformedRlp`].
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::rlp::{self, RlpItem};
//!
//! let item = RlpItem::List(vec![RlpItem::bytes("cat"), RlpItem::bytes("dog")]);
//! let encoded = rlp::encode(&item);
//! assert_eq!(hex::encode(&encoded), "c88363617483646f67");
//! assert_eq!(rlp::decode(&encoded).unwrap(), item);
//! ```

use alloy_primitives::U256;
use alloy_rlp::Header;

use crate::error::{Error, Result};

/// Maximum list nesting accepted by [`decode`].
const MAX_DEPTH: usize = 64;

/// A decoded RLP value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    /// A byte string.
    Bytes(Vec<u8>),
    /// A list of items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Creates a byte-string item.
    #[must_use]
    pub fn bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self::Bytes(bytes.as_ref().to_vec())
    }

    /// Creates an empty byte-string item (`0x80`).
    #[must_use]
    pub const fn empty() -> Self {
        Self::Bytes(Vec::new())
    }

    /// Creates an integer item: minimal big-endian bytes, zero as empty.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self::bytes(trim_leading_zeros(&value.to_be_bytes()))
    }

    /// Creates an integer item from a 256-bit value.
    #[must_use]
    pub fn from_u256(value: &U256) -> Self {
        Self::bytes(trim_leading_zeros(&value.to_be_bytes::<32>()))
    }

    /// Creates an integer item from a 32-byte big-endian word (e.g. `r`, `s`).
    #[must_use]
    pub fn from_word(word: &[u8; 32]) -> Self {
        Self::bytes(trim_leading_zeros(word))
    }

    /// Returns the byte string, or an error if this is a list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRlp`] if the item is a list.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::List(_) => Err(Error::MalformedRlp(
                "expected byte string, found list".to_string(),
            )),
        }
    }

    /// Returns the list items, or an error if this is a byte string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRlp`] if the item is a byte string.
    pub fn as_list(&self) -> Result<&[RlpItem]> {
        match self {
            Self::List(items) => Ok(items),
            Self::Bytes(_) => Err(Error::MalformedRlp(
                "expected list, found byte string".to_string(),
            )),
        }
    }

    /// Interprets the byte string as a canonical integer that fits in a `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRlp`] if the item is a list, has a leading
    /// zero byte, or is longer than 8 bytes.
    pub fn as_u64(&self) -> Result<u64> {
        let bytes = canonical_uint(self.as_bytes()?, 8)?;
        Ok(bytes
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    /// Interprets the byte string as a canonical 256-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRlp`] if the item is a list, has a leading
    /// zero byte, or is longer than 32 bytes.
    pub fn as_u256(&self) -> Result<U256> {
        let bytes = canonical_uint(self.as_bytes()?, 32)?;
        Ok(U256::from_be_slice(bytes))
    }

    /// Interprets the byte string as a 32-byte word, left-padding with zeros.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRlp`] under the same conditions as
    /// [`Self::as_u256`].
    pub fn as_word(&self) -> Result<[u8; 32]> {
        Ok(self.as_u256()?.to_be_bytes::<32>())
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bytes(bytes) if bytes.len() == 1 && bytes[0] < 0x80 => out.push(bytes[0]),
            Self::Bytes(bytes) => {
                let header = Header {
                    list: false,
                    payload_length: bytes.len(),
                };
                header.encode(out);
                out.extend_from_slice(bytes);
            }
            Self::List(items) => {
                let mut payload = Vec::new();
                for item in items {
                    item.encode_into(&mut payload);
                }
                let header = Header {
                    list: true,
                    payload_length: payload.len(),
                };
                header.encode(out);
                out.extend_from_slice(&payload);
            }
        }
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        Self::List(items)
    }
}

/// Encodes an item to its RLP byte representation.
#[must_use]
pub fn encode(item: &RlpItem) -> Vec<u8> {
    let mut out = Vec::new();
    item.encode_into(&mut out);
    out
}

/// Encodes a list of items. Equivalent to `encode(&RlpItem::List(items))`.
#[must_use]
pub fn encode_list(items: &[RlpItem]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        item.encode_into(&mut payload);
    }
    let mut out = Vec::with_capacity(payload.len() + 9);
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(&mut out);
    out.extend_from_slice(&payload);
    out
}

/// Decodes exactly one RLP item from `data`.
///
/// # Errors
///
/// Returns [`Error::MalformedRlp`] if the input is empty, truncated, has
/// bytes after the item, uses a non-canonical length, or nests deeper than
/// 64 lists.
pub fn decode(data: &[u8]) -> Result<RlpItem> {
    let mut buf = data;
    let item = decode_item(&mut buf, 0)?;
    if !buf.is_empty() {
        return Err(Error::MalformedRlp(format!(
            "{} trailing bytes after item",
            buf.len()
        )));
    }
    Ok(item)
}

fn decode_item(buf: &mut &[u8], depth: usize) -> Result<RlpItem> {
    if depth > MAX_DEPTH {
        return Err(Error::MalformedRlp("list nesting too deep".to_string()));
    }

    let header = Header::decode(buf)?;
    if buf.len() < header.payload_length {
        return Err(Error::MalformedRlp("payload truncated".to_string()));
    }
    let (payload, rest) = buf.split_at(header.payload_length);
    *buf = rest;

    if !header.list {
        return Ok(RlpItem::Bytes(payload.to_vec()));
    }

    let mut inner = payload;
    let mut items = Vec::new();
    while !inner.is_empty() {
        items.push(decode_item(&mut inner, depth + 1)?);
    }
    Ok(RlpItem::List(items))
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn canonical_uint(bytes: &[u8], max_len: usize) -> Result<&[u8]> {
    if bytes.first() == Some(&0) {
        return Err(Error::MalformedRlp(
            "integer has leading zero byte".to_string(),
        ));
    }
    if bytes.len() > max_len {
        return Err(Error::MalformedRlp(format!(
            "integer longer than {max_len} bytes"
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of(item: &RlpItem) -> String {
        hex::encode(encode(item))
    }

    #[test]
    fn encode_strings() {
        assert_eq!(hex_of(&RlpItem::bytes("dog")), "83646f67");
        assert_eq!(hex_of(&RlpItem::empty()), "80");
        assert_eq!(hex_of(&RlpItem::bytes([0x0f])), "0f");
        assert_eq!(hex_of(&RlpItem::bytes([0x80])), "8180");
    }

    #[test]
    fn encode_long_string() {
        let lorem = "Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        assert_eq!(lorem.len(), 56);
        let encoded = encode(&RlpItem::bytes(lorem));
        assert_eq!(&encoded[..2], &[0xb8, 0x38]);
        assert_eq!(&encoded[2..], lorem.as_bytes());
    }

    #[test]
    fn encode_integers() {
        assert_eq!(hex_of(&RlpItem::from_u64(0)), "80");
        assert_eq!(hex_of(&RlpItem::from_u64(15)), "0f");
        assert_eq!(hex_of(&RlpItem::from_u64(1024)), "820400");
        assert_eq!(
            hex_of(&RlpItem::from_u256(&U256::from(1_000_000_000u64))),
            "843b9aca00"
        );
        assert_eq!(hex_of(&RlpItem::from_u256(&U256::ZERO)), "80");
    }

    #[test]
    fn encode_lists() {
        assert_eq!(hex_of(&RlpItem::List(vec![])), "c0");
        let cat_dog = RlpItem::List(vec![RlpItem::bytes("cat"), RlpItem::bytes("dog")]);
        assert_eq!(hex_of(&cat_dog), "c88363617483646f67");
        assert_eq!(
            hex::encode(encode_list(&[RlpItem::bytes("cat"), RlpItem::bytes("dog")])),
            "c88363617483646f67"
        );
    }

    #[test]
    fn encode_set_theoretic_representation() {
        // [ [], [[]], [ [], [[]] ] ]
        let empty = RlpItem::List(vec![]);
        let one = RlpItem::List(vec![empty.clone()]);
        let two = RlpItem::List(vec![empty.clone(), one.clone()]);
        let item = RlpItem::List(vec![empty, one, two]);
        assert_eq!(hex_of(&item), "c7c0c1c0c3c0c1c0");
    }

    #[test]
    fn encode_long_list() {
        let items: Vec<RlpItem> = (0..20).map(|_| RlpItem::bytes("abc")).collect();
        let encoded = encode(&RlpItem::List(items));
        // 20 * 4 = 80 bytes of payload
        assert_eq!(&encoded[..2], &[0xf8, 80]);
        assert_eq!(encoded.len(), 82);
    }

    #[test]
    fn roundtrip_nested() {
        let item = RlpItem::List(vec![
            RlpItem::from_u64(0),
            RlpItem::bytes([0x7f]),
            RlpItem::bytes(vec![0xaa; 100]),
            RlpItem::List(vec![
                RlpItem::List(vec![]),
                RlpItem::bytes("nested"),
                RlpItem::List((0..30).map(|i| RlpItem::from_u64(i * 1000)).collect()),
            ]),
        ]);
        assert_eq!(decode(&encode(&item)).unwrap(), item);
    }

    #[test]
    fn roundtrip_long_payload_boundaries() {
        for len in [0usize, 1, 55, 56, 255, 256, 1024] {
            let item = RlpItem::Bytes(vec![0x99; len]);
            assert_eq!(decode(&encode(&item)).unwrap(), item, "length {len}");
        }
    }

    #[test]
    fn decode_single_byte() {
        assert_eq!(decode(&[0x2a]).unwrap(), RlpItem::Bytes(vec![0x2a]));
        assert_eq!(decode(&[0x80]).unwrap(), RlpItem::empty());
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert!(matches!(decode(&[]), Err(Error::MalformedRlp(_))));
    }

    #[test]
    fn decode_rejects_truncated() {
        assert!(matches!(decode(&[0x83, 0x61]), Err(Error::MalformedRlp(_))));
        assert!(matches!(decode(&[0xc2, 0x80]), Err(Error::MalformedRlp(_))));
        assert!(matches!(decode(&[0xb8]), Err(Error::MalformedRlp(_))));
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        assert!(matches!(decode(&[0x80, 0x00]), Err(Error::MalformedRlp(_))));
    }

    #[test]
    fn decode_rejects_non_canonical_single_byte() {
        assert!(matches!(decode(&[0x81, 0x05]), Err(Error::MalformedRlp(_))));
    }

    #[test]
    fn decode_rejects_long_form_for_short_payload() {
        assert!(matches!(
            decode(&[0xb8, 0x02, 0x61, 0x62]),
            Err(Error::MalformedRlp(_))
        ));
    }

    #[test]
    fn decode_rejects_length_with_leading_zero() {
        let mut data = vec![0xb9, 0x00, 0x38];
        data.extend_from_slice(&[0x61; 56]);
        assert!(matches!(decode(&data), Err(Error::MalformedRlp(_))));
    }

    #[test]
    fn decode_rejects_excessive_nesting() {
        let mut item = RlpItem::List(vec![]);
        for _ in 0..100 {
            item = RlpItem::List(vec![item]);
        }
        assert!(matches!(decode(&encode(&item)), Err(Error::MalformedRlp(_))));
    }

    #[test]
    fn integer_accessors() {
        assert_eq!(RlpItem::from_u64(0).as_u64().unwrap(), 0);
        assert_eq!(RlpItem::from_u64(21_000).as_u64().unwrap(), 21_000);
        assert_eq!(
            RlpItem::from_u256(&U256::MAX).as_u256().unwrap(),
            U256::MAX
        );
        assert!(RlpItem::bytes([0x00, 0x01]).as_u64().is_err());
        assert!(RlpItem::bytes([0x01; 9]).as_u64().is_err());
        assert!(RlpItem::List(vec![]).as_u64().is_err());
    }

    #[test]
    fn word_accessor_pads() {
        let word = RlpItem::bytes([0x01, 0x02]).as_word().unwrap();
        assert_eq!(word[30..], [0x01, 0x02]);
        assert_eq!(word[..30], [0u8; 30]);
    }
}
