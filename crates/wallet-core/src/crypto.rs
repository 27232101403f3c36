//! secp256k1 key handling, signing and public-key recovery.
//!
//! Signing is deterministic ECDSA (RFC 6979) over a 32-byte prehash. Every
//! signature produced here is normalized to low-S form (EIP-2); the recovery
//! id is adjusted to match, so `r || s || v` always recovers the signer.
//!
//! Recovery accepts high-S signatures: they are normalized before the public
//! key is reconstructed.
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::crypto::{PrivateKey, recover_public_key, sign};
//! use evm_wallet_core::hash::keccak256;
//!
//! let key = PrivateKey::from_hex(
//!     "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
//! )
//! .unwrap();
//! let hash = keccak256(b"hello");
//! let signature = sign(&hash, &key).unwrap();
//! assert_eq!(recover_public_key(&hash, &signature).unwrap(), key.public_key());
//! ```

use core::fmt;

use k256::FieldBytes;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::signature::Signature;

/// The order `n` of the secp256k1 group.
pub const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// `n / 2`, the largest `s` accepted as low-S.
pub const HALF_CURVE_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// A secp256k1 private key: a nonzero scalar below [`CURVE_ORDER`].
///
/// The bytes are zeroed on drop and redacted from `Debug` output.
#[derive(Clone)]
pub struct PrivateKey {
    bytes: Zeroizing<[u8; 32]>,
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Creates a private key from its 32-byte big-endian scalar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] if the scalar is zero or `>= n`.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let signing_key = SigningKey::from_bytes(&FieldBytes::from(*bytes))
            .map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self {
            bytes: Zeroizing::new(*bytes),
            signing_key,
        })
    }

    /// Creates a private key from a slice that must be exactly 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] on a wrong length or invalid scalar.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; 32] = bytes.try_into().map_err(|_| Error::InvalidPrivateKey)?;
        Self::from_bytes(bytes)
    }

    /// Parses a private key from hex, with or without `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HexDecodeFailed`] for invalid hex and
    /// [`Error::InvalidPrivateKey`] for a wrong length or invalid scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        Self::from_slice(&bytes)
    }

    /// Returns the raw scalar bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Returns the scalar as `0x`-prefixed lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(*self.bytes)))
    }

    /// Computes the public point `scalar * G`.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().clone())
    }

    /// Signs a 32-byte prehash. See [`sign`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignature`] if the signer fails.
    pub fn sign_hash(&self, hash: &[u8; 32]) -> Result<Signature> {
        sign(hash, self)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        *self.bytes == *other.bytes
    }
}

impl Eq for PrivateKey {}

/// A secp256k1 public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parses a SEC1-encoded point (33-byte compressed or 65-byte
    /// uncompressed).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPublicKey`] if the bytes are not a valid point.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidPublicKey("not a valid secp256k1 point".to_string()))
    }

    /// Returns the 33-byte compressed SEC1 encoding.
    #[must_use]
    pub fn to_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out.copy_from_slice(self.0.to_encoded_point(true).as_bytes());
        out
    }

    /// Returns the 65-byte uncompressed SEC1 encoding (`0x04 || x || y`).
    #[must_use]
    pub fn to_uncompressed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out.copy_from_slice(self.0.to_encoded_point(false).as_bytes());
        out
    }

    pub(crate) const fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }

    pub(crate) const fn from_verifying_key(key: VerifyingKey) -> Self {
        Self(key)
    }
}

/// Signs a 32-byte prehash with RFC 6979 deterministic ECDSA.
///
/// The returned signature has `s <= n/2` and a recovery id in `{0, 1}`.
///
/// # Errors
///
/// Returns [`Error::InvalidSignature`] if the signer fails.
pub fn sign(hash: &[u8; 32], key: &PrivateKey) -> Result<Signature> {
    let (signature, recovery_id) = key
        .signing_key
        .sign_prehash_recoverable(hash)
        .map_err(|e| Error::InvalidSignature(e.to_string()))?;

    let (signature, recovery_id) = normalize_s(signature, recovery_id);

    let bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    Ok(Signature::new(r, s, recovery_id.is_y_odd()))
}

/// Recovers the public key that produced `signature` over `hash`.
///
/// # Errors
///
/// Returns [`Error::InvalidSignature`] if `r` or `s` is out of range or no
/// point can be recovered.
pub fn recover_public_key(hash: &[u8; 32], signature: &Signature) -> Result<PublicKey> {
    let ecdsa = EcdsaSignature::from_scalars(
        FieldBytes::from(*signature.r()),
        FieldBytes::from(*signature.s()),
    )
    .map_err(|_| Error::InvalidSignature("r or s out of range".to_string()))?;
    let recovery_id = RecoveryId::from_byte(signature.v())
        .ok_or_else(|| Error::InvalidSignature(format!("invalid recovery id {}", signature.v())))?;

    let (ecdsa, recovery_id) = normalize_s(ecdsa, recovery_id);

    VerifyingKey::recover_from_prehash(hash, &ecdsa, recovery_id)
        .map(PublicKey)
        .map_err(|_| Error::InvalidSignature("public key recovery failed".to_string()))
}

/// Computes the public key for a raw 32-byte scalar.
///
/// # Errors
///
/// Returns [`Error::InvalidPrivateKey`] if the scalar is zero or `>= n`.
pub fn private_key_to_public_key(private_key: &[u8; 32]) -> Result<PublicKey> {
    Ok(PrivateKey::from_bytes(private_key)?.public_key())
}

/// Verifies a signature against a public key. The recovery id is ignored.
///
/// High-S signatures are rejected.
#[must_use]
pub fn verify(hash: &[u8; 32], signature: &Signature, public_key: &PublicKey) -> bool {
    EcdsaSignature::from_scalars(
        FieldBytes::from(*signature.r()),
        FieldBytes::from(*signature.s()),
    )
    .is_ok_and(|sig| public_key.0.verify_prehash(hash, &sig).is_ok())
}

/// Flips a high-S signature to `n - s` and the recovery id's y-parity with it.
fn normalize_s(signature: EcdsaSignature, recovery_id: RecoveryId) -> (EcdsaSignature, RecoveryId) {
    match signature.normalize_s() {
        Some(normalized) => (
            normalized,
            RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
        ),
        None => (signature, recovery_id),
    }
}
