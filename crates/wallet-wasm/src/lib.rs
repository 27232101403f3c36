//! EVM Wallet WASM Library
//!
//! This crate exposes the EVM wallet core to JavaScript through
//! `wasm-bindgen`. Every binding is a stateless function: key material is
//! parsed inside the call, used, and dropped before the call returns.
//!
//! # Quick Start
//!
//! ```javascript
//! import init, { deriveAddress, signTransaction, personalSign } from 'evm-wallet-wasm';
//!
//! await init();
//!
//! const address = deriveAddress(mnemonic, "", "m/44'/60'/0'/0/0");
//!
//! const raw = signTransaction(privateKey, JSON.stringify({
//!     type: "eip1559",
//!     chainId: 1,
//!     nonce: 0,
//!     maxPriorityFeePerGas: "0x3b9aca00",
//!     maxFeePerGas: "0x77359400",
//!     gasLimit: 21000,
//!     to: "0x000000000000000000000000000000000000dEaD",
//!     value: "0x0",
//!     data: "0x"
//! }));
//!
//! const signature = personalSign(privateKey, "hello");
//! ```
//!
//! # API Reference
//!
//! - [`deriveAddress(mnemonic, passphrase, path)`](bindings::derive_address)
//! - [`signTransaction(privateKey, txJson)`](bindings::sign_transaction)
//! - [`personalSign(privateKey, message)`](bindings::personal_sign)
//! - [`signTypedData(privateKey, typedDataJson)`](bindings::sign_typed_data)
//! - [`recoverPersonalSigner(message, signature)`](bindings::recover_personal_signer)
//! - [`decryptKeystore(json, password)`](bindings::decrypt_keystore)
//! - [`toChecksumAddress(address)`](bindings::to_checksum_address)
//! - [`isValidAddress(address)`](bindings::is_valid_address)
//!
//! Errors are thrown as JavaScript `Error` objects; see [`WasmError`].

pub mod bindings;
pub mod error;

pub use error::{WasmError, WasmResult};

#[cfg(target_arch = "wasm32")]
use getrandom as _;
use wasm_bindgen::prelude::*;

/// Returns the library version.
///
/// # Returns
///
/// The version string (e.g., `"0.1.0"`).
#[wasm_bindgen(js_name = "getVersion")]
#[must_use]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}
