//! Ethereum ECDSA signature type for secp256k1.
//!
//! A [`Signature`] holds the three components produced by
//! [`crypto::sign`](crate::crypto::sign):
//!
//! - `r`: the x-coordinate of the ephemeral point, reduced mod `n` (32 bytes)
//! - `s`: the signature scalar, always `<= n/2` when produced here (32 bytes)
//! - `v`: the recovery id, `0` or `1`
//!
//! How `v` is written on the wire depends on the context:
//!
//! | Context                     | Encoded `v`                |
//! |-----------------------------|----------------------------|
//! | EIP-1559 transaction        | `recovery_id`              |
//! | EIP-155 legacy transaction  | `recovery_id + 35 + 2 * chain_id` |
//! | `personal_sign` / EIP-712   | `recovery_id + 27`         |
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::Signature;
//!
//! let sig = Signature::new([1u8; 32], [2u8; 32], true);
//! assert_eq!(sig.to_bytes()[64], 1);
//! assert_eq!(sig.to_rsv_bytes()[64], 28);
//!
//! // Both encodings parse back to the same signature.
//! assert_eq!(Signature::from_bytes(&sig.to_rsv_bytes()).unwrap(), sig);
//! ```

use core::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::{Error, Result};

/// An Ethereum secp256k1 ECDSA signature.
///
/// # Wire Format
///
/// Serialized as 65 bytes: `r (32 bytes) || s (32 bytes) || v (1 byte)`.
/// [`Self::to_bytes`] writes the raw recovery id, [`Self::to_rsv_bytes`]
/// writes `27 + recovery_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// The R component of the signature (32 bytes).
    #[serde(with = "hex_bytes")]
    r: [u8; 32],

    /// The S component of the signature (32 bytes).
    #[serde(with = "hex_bytes")]
    s: [u8; 32],

    /// The recovery id (`0` or `1`).
    #[serde(deserialize_with = "deserialize_v")]
    v: u8,
}

fn deserialize_v<'de, D>(deserializer: D) -> core::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    normalize_v(u8::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

/// Serde helper for hex encoding/decoding 32-byte arrays.
mod hex_bytes {
    use hex::{decode, encode};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", encode(bytes)))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = decode(s).map_err(de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| de::Error::custom("expected 32 bytes"))
    }
}

impl Signature {
    /// The length of a serialized signature in bytes.
    pub const BYTE_LEN: usize = 65;

    /// Offset added to the recovery id in `personal_sign` and EIP-712
    /// signatures.
    pub const RSV_OFFSET: u8 = 27;

    /// Creates a new signature from raw components and the y-parity of the
    /// ephemeral point (the recovery id).
    #[must_use]
    pub const fn new(r: [u8; 32], s: [u8; 32], y_parity: bool) -> Self {
        Self {
            r,
            s,
            v: y_parity as u8,
        }
    }

    /// Creates a signature from a 65-byte `r || s || v` slice.
    ///
    /// `v` may be the raw recovery id (`0`, `1`) or the offset form (`27`,
    /// `28`); both are stored as the recovery id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignature`] if the slice is not 65 bytes or
    /// `v` is not one of `0`, `1`, `27`, `28`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BYTE_LEN {
            return Err(Error::InvalidSignature(format!(
                "expected {} bytes, got {}",
                Self::BYTE_LEN,
                bytes.len()
            )));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        let v = normalize_v(bytes[64])?;

        Ok(Self::new(r, s, v == 1))
    }

    /// Serializes to 65 bytes with the raw recovery id as `v`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::BYTE_LEN] {
        let mut bytes = [0u8; Self::BYTE_LEN];
        bytes[0..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    /// Serializes to 65 bytes with `v = 27 + recovery_id`, the form returned
    /// by `personal_sign` and `eth_signTypedData`.
    #[must_use]
    pub fn to_rsv_bytes(&self) -> [u8; Self::BYTE_LEN] {
        let mut bytes = self.to_bytes();
        bytes[64] += Self::RSV_OFFSET;
        bytes
    }

    /// Returns the R component of the signature.
    #[must_use]
    pub const fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Returns the S component of the signature.
    #[must_use]
    pub const fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Returns the recovery id (`0` or `1`).
    #[must_use]
    pub const fn v(&self) -> u8 {
        self.v
    }

    /// Returns the y-parity of the ephemeral point, as stored in typed
    /// transactions.
    #[must_use]
    pub const fn y_parity(&self) -> bool {
        self.v & 1 == 1
    }

    /// Returns the R component as a [`U256`].
    #[must_use]
    pub const fn r_u256(&self) -> U256 {
        U256::from_be_bytes(self.r)
    }

    /// Returns the S component as a [`U256`].
    #[must_use]
    pub const fn s_u256(&self) -> U256 {
        U256::from_be_bytes(self.s)
    }

    /// Checks whether `s` is in the lower half of the curve order.
    #[must_use]
    pub fn is_low_s(&self) -> bool {
        self.s_u256() <= U256::from_be_bytes(crate::crypto::HALF_CURVE_ORDER)
    }

    /// Recovers the address that signed `hash`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignature`] if recovery fails.
    pub fn recover_address(&self, hash: &[u8; 32]) -> Result<Address> {
        crate::address::recover_address(hash, self)
    }

    /// Encodes the signature as `0x`-prefixed hex with the raw recovery id.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Encodes the signature as `0x`-prefixed hex with `v = 27 + recovery_id`.
    #[must_use]
    pub fn to_rsv_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_rsv_bytes()))
    }

    /// Parses a signature from a hex string, optionally prefixed with `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HexDecodeFailed`] if the hex string is invalid, or
    /// [`Error::InvalidSignature`] under the conditions of
    /// [`Self::from_bytes`].
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }
}

fn normalize_v(v: u8) -> Result<u8> {
    match v {
        0 | 1 => Ok(v),
        27 | 28 => Ok(v - Signature::RSV_OFFSET),
        other => Err(Error::InvalidSignature(format!(
            "unsupported v value {other}"
        ))),
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rsv_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_new() {
        let r = [1u8; 32];
        let s = [2u8; 32];
        let sig = Signature::new(r, s, true);

        assert_eq!(sig.r(), &r);
        assert_eq!(sig.s(), &s);
        assert_eq!(sig.v(), 1);
        assert!(sig.y_parity());
    }

    #[test]
    fn from_bytes_accepts_all_v_forms() {
        let mut bytes = [0u8; 65];
        bytes[0..32].copy_from_slice(&[1u8; 32]);
        bytes[32..64].copy_from_slice(&[2u8; 32]);

        for (v, expected) in [(0u8, 0u8), (1, 1), (27, 0), (28, 1)] {
            bytes[64] = v;
            let sig = Signature::from_bytes(&bytes).unwrap();
            assert_eq!(sig.v(), expected, "v = {v}");
        }
    }

    #[test]
    fn from_bytes_rejects_unknown_v() {
        let mut bytes = [0u8; 65];
        for v in [2u8, 26, 29, 37, 38, 255] {
            bytes[64] = v;
            assert!(matches!(
                Signature::from_bytes(&bytes),
                Err(Error::InvalidSignature(_))
            ));
        }
    }

    #[test]
    fn from_bytes_invalid_length() {
        let result = Signature::from_bytes(&[0u8; 64]);
        assert!(matches!(result, Err(Error::InvalidSignature(_))));
    }

    #[test]
    fn rsv_bytes_offset() {
        let sig = Signature::new([3u8; 32], [4u8; 32], false);
        assert_eq!(sig.to_bytes()[64], 0);
        assert_eq!(sig.to_rsv_bytes()[64], 27);
        assert_eq!(sig.to_bytes()[..64], sig.to_rsv_bytes()[..64]);
    }

    #[test]
    fn signature_hex_roundtrip() {
        let sig = Signature::new([5u8; 32], [6u8; 32], true);
        assert_eq!(Signature::from_hex(&sig.to_hex()).unwrap(), sig);
        assert_eq!(Signature::from_hex(&sig.to_rsv_hex()).unwrap(), sig);
    }

    #[test]
    fn signature_hex_without_prefix() {
        let sig = Signature::new([0u8; 32], [0u8; 32], false);
        let hex = sig.to_hex();
        let recovered = Signature::from_hex(hex.strip_prefix("0x").unwrap()).unwrap();
        assert_eq!(sig, recovered);
    }

    #[test]
    fn signature_display_uses_rsv() {
        let sig = Signature::new([0u8; 32], [0u8; 32], true);
        let display = format!("{sig}");
        assert_eq!(display.len(), 132);
        assert!(display.ends_with("1c"));
    }

    #[test]
    fn low_s_boundary() {
        let half = crate::crypto::HALF_CURVE_ORDER;
        assert!(Signature::new([1u8; 32], half, false).is_low_s());

        let above = U256::from_be_bytes(half) + U256::from(1);
        assert!(!Signature::new([1u8; 32], above.to_be_bytes::<32>(), false).is_low_s());
    }

    #[test]
    fn signature_serde_roundtrip() {
        let sig = Signature::new([7u8; 32], [8u8; 32], true);
        let json = serde_json::to_string(&sig).unwrap();
        assert!(json.contains("0x0707"));
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn serde_rejects_out_of_range_v() {
        let r = format!("0x{}", "01".repeat(32));
        let s = format!("0x{}", "02".repeat(32));

        for v in [2u8, 29, 250] {
            let json = format!(r#"{{"r":"{r}","s":"{s}","v":{v}}}"#);
            assert!(serde_json::from_str::<Signature>(&json).is_err(), "v = {v}");
        }

        let json = format!(r#"{{"r":"{r}","s":"{s}","v":28}}"#);
        let sig: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig.v(), 1);
        assert_eq!(sig.to_rsv_bytes()[64], 28);
    }

    #[test]
    fn v_is_always_a_recovery_id() {
        for y_parity in [false, true] {
            let sig = Signature::new([1u8; 32], [2u8; 32], y_parity);
            assert!(sig.v() <= 1);
            assert_eq!(sig.y_parity(), y_parity);
            assert_eq!(sig.to_rsv_bytes()[64], 27 + u8::from(y_parity));
        }
    }
}
