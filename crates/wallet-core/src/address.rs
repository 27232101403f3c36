//! Ethereum address derivation and EIP-55 checksums.
//!
//! An address is the last 20 bytes of the Keccak-256 hash of the 64-byte
//! uncompressed public key (`x || y`, without the `0x04` SEC1 prefix):
//!
//! 1. Take the uncompressed public key (65 bytes: `0x04 || x || y`)
//! 2. Remove the `0x04` prefix to get 64 bytes (`x || y`)
//! 3. Compute the Keccak-256 hash of the 64 bytes
//! 4. Take the last 20 bytes of the hash as the address
//!
//! Addresses are displayed with the [EIP-55] mixed-case checksum: hex digit
//! `i` is uppercased iff nibble `i` of `keccak256(lowercase_hex)` is `>= 8`.
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::address::{is_valid_address, to_checksum_address};
//!
//! let checksummed =
//!     to_checksum_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
//! assert_eq!(checksummed, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
//! assert!(is_valid_address(&checksummed));
//! assert!(!is_valid_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));
//! ```
//!
//! [EIP-55]: https://eips.ethereum.org/EIPS/eip-55

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address as AlloyAddress;
use serde::{Deserialize, Serialize};

use crate::crypto::{PrivateKey, PublicKey, recover_public_key};
use crate::error::{Error, Result};
use crate::hash::keccak256;
use crate::signature::Signature;

/// An Ethereum address (20 bytes).
///
/// A wrapper around [`alloy_primitives::Address`] that adds derivation from
/// secp256k1 keys and strict EIP-55 parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(AlloyAddress);

impl Address {
    /// The length of an Ethereum address in bytes.
    pub const BYTE_LEN: usize = 20;

    /// Creates a new address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; Self::BYTE_LEN]) -> Self {
        Self(AlloyAddress::new(bytes))
    }

    /// Returns the zero address (`0x0000...0000`).
    #[must_use]
    pub const fn zero() -> Self {
        Self(AlloyAddress::ZERO)
    }

    /// Checks if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Derives the address of a secp256k1 public key.
    #[must_use]
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let uncompressed = public_key.to_uncompressed();
        Self::from_coordinates(&uncompressed[1..])
    }

    /// Derives the address controlled by a private key.
    #[must_use]
    pub fn from_private_key(private_key: &PrivateKey) -> Self {
        Self::from_public_key(&private_key.public_key())
    }

    /// Derives an address from raw uncompressed public key bytes.
    ///
    /// Accepts either 65 bytes (`0x04 || x || y`) or 64 bytes (`x || y`).
    /// The point is not checked to be on the curve.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPublicKey`] if:
    /// - The byte length is not 64 or 65
    /// - For 65-byte input, the first byte is not `0x04`
    pub fn from_public_key_bytes(bytes: &[u8]) -> Result<Self> {
        let pubkey_bytes = match bytes.len() {
            64 => bytes,
            65 => {
                if bytes[0] != 0x04 {
                    return Err(Error::InvalidPublicKey(
                        "65-byte public key must start with 0x04".to_string(),
                    ));
                }
                &bytes[1..]
            }
            len => {
                return Err(Error::InvalidPublicKey(format!(
                    "expected 64 or 65 bytes, got {len}"
                )));
            }
        };

        Ok(Self::from_coordinates(pubkey_bytes))
    }

    fn from_coordinates(xy: &[u8]) -> Self {
        let hash = keccak256(xy);
        let mut address_bytes = [0u8; Self::BYTE_LEN];
        address_bytes.copy_from_slice(&hash[12..]);
        Self::new(address_bytes)
    }

    /// Returns the [`Address`] as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; Self::BYTE_LEN] {
        self.0.as_ref()
    }

    /// Returns the [`Address`] as a 20-byte array.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; Self::BYTE_LEN] {
        self.0.0.0
    }

    /// Returns the EIP-55 checksummed hex string with `0x` prefix.
    #[must_use]
    pub fn to_checksum_hex(&self) -> String {
        checksum_encode(self.as_bytes())
    }

    /// Returns the [`Address`] as a lowercase hex string with `0x` prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.as_bytes()))
    }

    /// Parses an [`Address`] from hex in any letter case, optionally prefixed
    /// with `0x`. The checksum is not checked; see [`Self::parse_checksummed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::HexDecodeFailed`] if the hex string is invalid, or
    /// [`Error::InvalidAddress`] if the decoded bytes are not 20 bytes.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(hex_str)?;

        let address_bytes: [u8; Self::BYTE_LEN] = bytes.as_slice().try_into().map_err(|_| {
            Error::InvalidAddress(format!(
                "expected {} bytes, got {}",
                Self::BYTE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self::new(address_bytes))
    }

    /// Parses an address, rejecting mixed-case input whose EIP-55 checksum
    /// does not match. All-lowercase and all-uppercase input is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] on a checksum mismatch, plus the
    /// errors of [`Self::from_hex`].
    pub fn parse_checksummed(s: &str) -> Result<Self> {
        let address = Self::from_hex(s)?;
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if is_mixed_case(digits) && address.to_checksum_hex()[2..] != *digits {
            return Err(Error::InvalidAddress(format!("bad EIP-55 checksum: {s}")));
        }
        Ok(address)
    }

    /// Returns the inner [`alloy_primitives::Address`].
    #[must_use]
    pub const fn inner(&self) -> AlloyAddress {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum_hex())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_checksummed(s)
    }
}

impl From<AlloyAddress> for Address {
    fn from(addr: AlloyAddress) -> Self {
        Self(addr)
    }
}

impl From<Address> for AlloyAddress {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self::new(bytes)
    }
}

/// Derives the EIP-55 address for a raw 32-byte private key.
///
/// # Errors
///
/// Returns [`Error::InvalidPrivateKey`] if the scalar is zero or `>= n`.
pub fn private_key_to_address(private_key: &[u8; 32]) -> Result<Address> {
    Ok(Address::from_private_key(&PrivateKey::from_bytes(
        private_key,
    )?))
}

/// Re-encodes an address string with the EIP-55 checksum. Idempotent.
///
/// # Errors
///
/// Returns [`Error::HexDecodeFailed`] or [`Error::InvalidAddress`] if the
/// input is not 20 bytes of hex.
pub fn to_checksum_address(address: &str) -> Result<String> {
    Ok(Address::from_hex(address)?.to_checksum_hex())
}

/// Checks that `address` is `0x` plus 40 hex digits and, when mixed-case,
/// carries a correct EIP-55 checksum.
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    let Some(digits) = address.strip_prefix("0x") else {
        return false;
    };
    digits.len() == 40
        && digits.bytes().all(|b| b.is_ascii_hexdigit())
        && Address::parse_checksummed(address).is_ok()
}

/// Recovers the address that produced `signature` over `hash`.
///
/// # Errors
///
/// Returns [`Error::InvalidSignature`] if public-key recovery fails.
pub fn recover_address(hash: &[u8; 32], signature: &Signature) -> Result<Address> {
    Ok(Address::from_public_key(&recover_public_key(
        hash, signature,
    )?))
}

fn checksum_encode(bytes: &[u8; 20]) -> String {
    let lower = hex::encode(bytes);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn is_mixed_case(digits: &str) -> bool {
    digits.bytes().any(|b| b.is_ascii_lowercase()) && digits.bytes().any(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EIP55_VECTORS: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn address_zero() {
        let zero = Address::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.as_bytes(), &[0u8; 20]);
    }

    #[test]
    fn hardhat_account_zero() {
        let key = hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
            .unwrap()
            .try_into()
            .unwrap();
        let address = private_key_to_address(&key).unwrap();
        assert_eq!(
            address.to_checksum_hex(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn keystore_account() {
        let key = hex::decode("eff4580ef3a4ecd61f8e4d8ef18da75fddc0d5aadfb437c1dd7e9500e36de930")
            .unwrap()
            .try_into()
            .unwrap();
        let address = private_key_to_address(&key).unwrap();
        assert_eq!(
            address.to_string(),
            "0x39b97205B9826F21Fd39B535CF972C809e160E5f"
        );
    }

    #[test]
    fn private_key_to_address_rejects_zero() {
        assert!(matches!(
            private_key_to_address(&[0u8; 32]),
            Err(Error::InvalidPrivateKey)
        ));
    }

    #[test]
    fn address_from_public_key_bytes_forms_agree() {
        let mut prefixed = [0u8; 65];
        prefixed[0] = 0x04;
        let addr = Address::from_public_key_bytes(&prefixed).unwrap();
        let addr_64 = Address::from_public_key_bytes(&[0u8; 64]).unwrap();
        assert_eq!(addr, addr_64);

        let expected: [u8; 20] = keccak256([0u8; 64])[12..].try_into().unwrap();
        assert_eq!(addr.to_bytes(), expected);
    }

    #[test]
    fn address_from_public_key_bytes_invalid() {
        let mut wrong_prefix = [0u8; 65];
        wrong_prefix[0] = 0x02;
        assert!(matches!(
            Address::from_public_key_bytes(&wrong_prefix),
            Err(Error::InvalidPublicKey(_))
        ));
        assert!(matches!(
            Address::from_public_key_bytes(&[0u8; 63]),
            Err(Error::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn checksum_vectors() {
        for vector in EIP55_VECTORS {
            let lower = vector.to_lowercase();
            assert_eq!(to_checksum_address(&lower).unwrap(), vector);
            assert!(is_valid_address(vector));
        }
    }

    #[test]
    fn checksum_matches_alloy() {
        for vector in EIP55_VECTORS {
            let address = Address::from_hex(vector).unwrap();
            assert_eq!(address.to_checksum_hex(), address.inner().to_checksum(None));
        }
    }

    #[test]
    fn checksum_is_idempotent() {
        for vector in EIP55_VECTORS {
            let once = to_checksum_address(vector).unwrap();
            assert_eq!(to_checksum_address(&once).unwrap(), once);
        }
    }

    #[test]
    fn single_case_addresses_are_valid() {
        assert!(is_valid_address("0x52908400098527886E0F7030069857D2E4169EE7"));
        assert!(is_valid_address("0xde709f2102306220921060314715629080e2fb77"));
    }

    #[test]
    fn bad_checksum_rejected() {
        assert!(!is_valid_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));
        assert!(matches!(
            "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<Address>(),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn malformed_addresses_rejected() {
        assert!(!is_valid_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_valid_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeA"));
        assert!(!is_valid_address("0xzzzeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_valid_address(""));
        assert!(matches!(
            Address::from_hex("0x1234"),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn address_hex_roundtrip() {
        let original = Address::new([0xab; 20]);
        let recovered = Address::from_hex(&original.to_hex()).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn recover_address_of_signature() {
        let key = PrivateKey::from_hex(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let hash = keccak256(b"recover me");
        let signature = key.sign_hash(&hash).unwrap();
        assert_eq!(
            recover_address(&hash, &signature).unwrap(),
            Address::from_private_key(&key)
        );
    }

    #[test]
    fn address_alloy_conversions() {
        let addr: Address = AlloyAddress::ZERO.into();
        assert!(addr.is_zero());
        let back: AlloyAddress = addr.into();
        assert!(back.is_zero());
    }
}
