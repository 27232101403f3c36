//! Hash primitives used across the wallet core.
//!
//! Ethereum hashes everything with **Keccak-256**, the pre-standard SHA-3
//! submission. It pads with the `0x01` domain byte, while FIPS-202 SHA3-256
//! pads with `0x06`, so the two produce completely different digests for the
//! same input. [`keccak256`] is the only hash used for addresses,
//! transactions, messages and keystore MACs.
//!
//! The remaining helpers serve BIP-32 (HMAC-SHA512, HASH160) and BIP-39
//! checksums (SHA-256).
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::hash::keccak256;
//!
//! let digest = keccak256(b"");
//! assert_eq!(
//!     hex::encode(digest),
//!     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
//! );
//! ```

use alloy_primitives::keccak256 as alloy_keccak256;
use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// Computes the Keccak-256 digest of `data` (original `0x01` padding).
#[must_use]
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    alloy_keccak256(data).0
}

/// Computes HMAC-SHA512 over the concatenation of `parts`.
///
/// The output is wrapped in [`Zeroizing`] because in BIP-32 its left half is
/// private key material.
#[must_use]
pub fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Computes the SHA-256 digest of `data`.
#[must_use]
pub fn sha256(data: impl AsRef<[u8]>) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Computes `RIPEMD160(SHA256(data))`, used for BIP-32 key fingerprints.
#[must_use]
pub fn hash160(data: impl AsRef<[u8]>) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}
