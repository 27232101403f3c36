//! Message signing: EIP-191 `personal_sign` and EIP-712 typed data.
//!
//! Both signing modes return a [`Signature`] whose wire form is
//! [`Signature::to_rsv_bytes`]: `r || s || (recovery_id + 27)`. The `+27`
//! offset is specific to message signing; raw transactions encode `v`
//! differently (see [`crate::transaction`]).
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::crypto::PrivateKey;
//! use evm_wallet_core::message::{personal_sign, recover_personal_signer};
//!
//! let key = PrivateKey::from_hex(
//!     "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
//! )
//! .unwrap();
//!
//! let sig = personal_sign(b"hello", &key).unwrap();
//! let signer = recover_personal_signer(b"hello", &sig).unwrap();
//! assert_eq!(signer.to_checksum_hex(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
//! ```

use alloy_primitives::B256;
use tracing::debug;

use crate::address::Address;
use crate::crypto::{self, PrivateKey};
use crate::eip712::TypedData;
use crate::error::Result;
use crate::hash::keccak256;
use crate::signature::Signature;

/// EIP-191 version `0x45` prefix, followed by the decimal message length.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Computes the EIP-191 hash of `message`:
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`.
#[must_use]
pub fn hash_message(message: impl AsRef<[u8]>) -> B256 {
    let message = message.as_ref();
    let mut data = format!("{PERSONAL_MESSAGE_PREFIX}{}", message.len()).into_bytes();
    data.extend_from_slice(message);
    B256::from(keccak256(&data))
}

/// Signs `message` with the `personal_sign` scheme.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSignature`] if signing fails.
pub fn personal_sign(message: impl AsRef<[u8]>, key: &PrivateKey) -> Result<Signature> {
    let message = message.as_ref();
    let hash = hash_message(message);
    debug!(len = message.len(), "signing personal message");
    crypto::sign(&hash.0, key)
}

/// Recovers the address that produced a `personal_sign` signature.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSignature`] if recovery fails.
pub fn recover_personal_signer(
    message: impl AsRef<[u8]>,
    signature: &Signature,
) -> Result<Address> {
    signature.recover_address(&hash_message(message).0)
}

/// Parses `eth_signTypedData_v4` JSON and signs its EIP-712 hash.
///
/// # Errors
///
/// Returns [`crate::Error::JsonError`] if the JSON is malformed, plus the
/// errors of [`TypedData::signing_hash`].
pub fn sign_typed_data(json: &str, key: &PrivateKey) -> Result<Signature> {
    let typed_data = TypedData::from_json(json)?;
    debug!(primary_type = typed_data.primary_type(), "signing typed data");
    typed_data.sign(key)
}
