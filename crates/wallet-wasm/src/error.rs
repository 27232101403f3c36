//! JavaScript-friendly error types for WASM bindings.
//!
//! Core errors are grouped into a few categories JavaScript callers can
//! branch on. Every variant converts into a JS `Error` whose message starts
//! with the category, e.g. `"Wrong password"` or `"Invalid mnemonic: ..."`.
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::Error as CoreError;
//! use evm_wallet_wasm::error::WasmError;
//!
//! let error = WasmError::from(CoreError::WrongPassword);
//! assert_eq!(error.to_string(), "Wrong password");
//! ```

use std::{error, fmt};

use evm_wallet_core::error::Error as CoreError;
use js_sys::Error as JsError;
use wasm_bindgen::prelude::*;

/// Error type for WASM operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WasmError {
    /// The mnemonic or derivation path is invalid.
    InvalidMnemonic(String),

    /// The private key, address or signature input is invalid.
    InvalidKey(String),

    /// The transaction JSON or its encoding is invalid.
    InvalidTransaction(String),

    /// The EIP-712 typed data is invalid.
    InvalidTypedData(String),

    /// The keystore password is wrong.
    WrongPassword,

    /// The keystore is malformed, unsupported or too expensive to open.
    InvalidKeystore(String),

    /// Any other core library error.
    CoreError(String),
}

impl fmt::Display for WasmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMnemonic(msg) => {
                write!(f, "Invalid mnemonic: {msg}")
            }
            Self::InvalidKey(msg) => {
                write!(f, "Invalid key: {msg}")
            }
            Self::InvalidTransaction(msg) => {
                write!(f, "Invalid transaction: {msg}")
            }
            Self::InvalidTypedData(msg) => {
                write!(f, "Invalid typed data: {msg}")
            }
            Self::WrongPassword => {
                write!(f, "Wrong password")
            }
            Self::InvalidKeystore(msg) => {
                write!(f, "Invalid keystore: {msg}")
            }
            Self::CoreError(msg) => {
                write!(f, "Core error: {msg}")
            }
        }
    }
}

impl error::Error for WasmError {}

impl From<WasmError> for JsValue {
    fn from(error: WasmError) -> Self {
        JsError::new(&error.to_string()).into()
    }
}

impl From<CoreError> for WasmError {
    fn from(error: CoreError) -> Self {
        let msg = error.to_string();
        match error {
            CoreError::InvalidMnemonic(_)
            | CoreError::InvalidDerivationPath(_)
            | CoreError::ChildKeyDerivationFailed(_) => Self::InvalidMnemonic(msg),
            CoreError::InvalidPrivateKey
            | CoreError::InvalidPublicKey(_)
            | CoreError::InvalidSignature(_)
            | CoreError::InvalidAddress(_) => Self::InvalidKey(msg),
            CoreError::MalformedRlp(_) | CoreError::UnsupportedTransactionType(_) => {
                Self::InvalidTransaction(msg)
            }
            CoreError::InvalidTypedData(_) | CoreError::UndefinedType(_) => {
                Self::InvalidTypedData(msg)
            }
            CoreError::WrongPassword => Self::WrongPassword,
            CoreError::UnsupportedKeystoreVersion(_)
            | CoreError::KdfCostExceeded { .. }
            | CoreError::KeystoreAddressMismatch { .. } => Self::InvalidKeystore(msg),
            _ => Self::CoreError(msg),
        }
    }
}

/// Result type for WASM operations.
pub type WasmResult<T> = Result<T, WasmError>;
