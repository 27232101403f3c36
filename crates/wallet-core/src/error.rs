//! Error types for the EVM wallet core.
//!
//! This module provides a single error type [`enum@Error`] that covers every
//! failure mode of key derivation, signing, encoding and keystore handling.
//!
//! # Error Categories
//!
//! - **Key material errors**: mnemonic validation, derivation paths, HD
//!   derivation edge cases and invalid scalars
//! - **Encoding errors**: malformed RLP, unsupported transaction types and
//!   invalid EIP-712 typed data
//! - **Keystore errors**: unsupported formats, KDF cost limits and wrong
//!   passwords
//!
//! Only [`Error::ChildKeyDerivationFailed`] is recoverable by retrying (with
//! the next child index). Every other error is terminal for the call that
//! produced it.
//!
//! Messages never include key material, seeds or passwords.
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::Error;
//!
//! fn example() -> Result<(), Error> {
//!     let err = Error::WrongPassword;
//!     assert!(matches!(err, Error::WrongPassword));
//!     Ok(())
//! }
//! ```

use alloy_rlp::Error as AlloyRlpError;
use core::result::Result as CoreResult;
use hex::FromHexError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// The main error type for the EVM wallet core.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Mnemonic and Derivation Errors
    // =========================================================================
    /// The mnemonic has an unknown word, a bad length, or a bad checksum.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// The derivation path string could not be parsed.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    /// The child key at this index is invalid (`I_L >= n` or the key is zero),
    /// or a hardened child was requested from a public-only key.
    ///
    /// For the invalid-scalar case callers should retry with `index + 1`.
    #[error("child key derivation failed at index {0}")]
    ChildKeyDerivationFailed(u32),

    // =========================================================================
    // Cryptographic Errors
    // =========================================================================
    /// The private key scalar is zero or not below the curve order.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// The public key is invalid or malformed.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The signature is invalid or malformed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The address string is malformed or fails its EIP-55 checksum.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    // =========================================================================
    // Transaction Errors
    // =========================================================================
    /// The RLP input is truncated, has trailing bytes, or is not canonical.
    #[error("malformed RLP: {0}")]
    MalformedRlp(String),

    /// The transaction type is not legacy or EIP-1559.
    #[error("unsupported transaction type: {0}")]
    UnsupportedTransactionType(String),

    // =========================================================================
    // EIP-712 Errors
    // =========================================================================
    /// The EIP-712 typed data is invalid.
    #[error("invalid EIP-712 typed data: {0}")]
    InvalidTypedData(String),

    /// A type referenced in the typed data is not defined.
    #[error("undefined type in EIP-712 data: {0}")]
    UndefinedType(String),

    // =========================================================================
    // Keystore Errors
    // =========================================================================
    /// The keystore version, KDF or cipher is not supported.
    #[error("unsupported keystore: {0}")]
    UnsupportedKeystoreVersion(String),

    /// The keystore MAC did not match; the password is wrong or the file was
    /// tampered with.
    #[error("wrong password")]
    WrongPassword,

    /// The keystore KDF parameters exceed the configured cost limit.
    #[error("keystore KDF cost {cost} exceeds limit {limit}")]
    KdfCostExceeded {
        /// The cost requested by the keystore file.
        cost: u64,
        /// The configured upper bound.
        limit: u64,
    },

    /// The decrypted key does not belong to the address in the keystore.
    #[error("keystore address mismatch: expected {expected}, derived {derived}")]
    KeystoreAddressMismatch {
        /// The address recorded in the keystore.
        expected: String,
        /// The address derived from the decrypted key.
        derived: String,
    },

    // =========================================================================
    // Serialization Errors
    // =========================================================================
    /// Failed to parse hex data.
    #[error("hex decoding failed: {0}")]
    HexDecodeFailed(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl From<FromHexError> for Error {
    fn from(err: FromHexError) -> Self {
        Error::HexDecodeFailed(err.to_string())
    }
}

impl From<SerdeJsonError> for Error {
    fn from(err: SerdeJsonError) -> Self {
        Error::JsonError(err.to_string())
    }
}

impl From<AlloyRlpError> for Error {
    fn from(err: AlloyRlpError) -> Self {
        Error::MalformedRlp(err.to_string())
    }
}

/// A specialized [`Result`] type for wallet core operations.
pub type Result<T> = CoreResult<T, Error>;
