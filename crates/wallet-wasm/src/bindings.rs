//! Stateless `wasm_bindgen` functions over the wallet core.
//!
//! Each function parses its key material, uses it and drops it before
//! returning; nothing is cached on the JavaScript side of the boundary.

use evm_wallet_core::error::Error as CoreError;
use evm_wallet_core::{Address, PrivateKey, Transaction, address, hd, keystore, message, mnemonic};
use wasm_bindgen::prelude::*;

use crate::error::{WasmError, WasmResult};

/// Derives the EIP-55 address at `path` (e.g. `m/44'/60'/0'/0/0`) from a
/// mnemonic and optional passphrase.
#[wasm_bindgen(js_name = "deriveAddress")]
pub fn derive_address(mnemonic: &str, passphrase: &str, path: &str) -> Result<String, JsValue> {
    derive_address_internal(mnemonic, passphrase, path).map_err(JsValue::from)
}

fn derive_address_internal(mnemonic: &str, passphrase: &str, path: &str) -> WasmResult<String> {
    let seed = mnemonic::mnemonic_to_seed(mnemonic, passphrase)?;
    let address = hd::derive_address(&*seed, path)?;
    Ok(address.to_checksum_hex())
}

/// Signs a transaction given as JSON (`{"type": "legacy" | "eip1559", ...}`)
/// and returns the `0x`-prefixed raw transaction.
#[wasm_bindgen(js_name = "signTransaction")]
pub fn sign_transaction(private_key: &str, tx_json: &str) -> Result<String, JsValue> {
    sign_transaction_internal(private_key, tx_json).map_err(JsValue::from)
}

fn sign_transaction_internal(private_key: &str, tx_json: &str) -> WasmResult<String> {
    let tx = Transaction::from_json(tx_json).map_err(json_as(WasmError::InvalidTransaction))?;
    let key = PrivateKey::from_hex(private_key)?;
    let signed = tx.sign(&key)?;
    Ok(signed.to_raw_hex())
}

/// Signs a UTF-8 message with `personal_sign` and returns the 65-byte
/// `r || s || v` signature as hex, with `v` in `{27, 28}`.
#[wasm_bindgen(js_name = "personalSign")]
pub fn personal_sign(private_key: &str, message: &str) -> Result<String, JsValue> {
    personal_sign_internal(private_key, message).map_err(JsValue::from)
}

fn personal_sign_internal(private_key: &str, msg: &str) -> WasmResult<String> {
    let key = PrivateKey::from_hex(private_key)?;
    Ok(message::personal_sign(msg, &key)?.to_rsv_hex())
}

/// Signs `eth_signTypedData_v4` JSON and returns the 65-byte signature as
/// hex, with `v` in `{27, 28}`.
#[wasm_bindgen(js_name = "signTypedData")]
pub fn sign_typed_data(private_key: &str, typed_data_json: &str) -> Result<String, JsValue> {
    sign_typed_data_internal(private_key, typed_data_json).map_err(JsValue::from)
}

fn sign_typed_data_internal(private_key: &str, typed_data_json: &str) -> WasmResult<String> {
    let key = PrivateKey::from_hex(private_key)?;
    let signature = message::sign_typed_data(typed_data_json, &key)
        .map_err(json_as(WasmError::InvalidTypedData))?;
    Ok(signature.to_rsv_hex())
}

/// Decrypts a V3 keystore and returns the private key as `0x`-prefixed hex.
#[wasm_bindgen(js_name = "decryptKeystore")]
pub fn decrypt_keystore(keystore_json: &str, password: &str) -> Result<String, JsValue> {
    decrypt_keystore_internal(keystore_json, password).map_err(JsValue::from)
}

fn decrypt_keystore_internal(keystore_json: &str, password: &str) -> WasmResult<String> {
    let key = keystore::decrypt(keystore_json, password)
        .map_err(json_as(WasmError::InvalidKeystore))?;
    Ok(key.to_hex().to_string())
}

/// Returns the EIP-55 checksummed form of a hex address.
#[wasm_bindgen(js_name = "toChecksumAddress")]
pub fn to_checksum_address(address: &str) -> Result<String, JsValue> {
    address::to_checksum_address(address)
        .map_err(WasmError::from)
        .map_err(JsValue::from)
}

/// Checks that `address` is `0x` plus 40 hex digits and, if mixed-case,
/// carries a valid EIP-55 checksum.
#[wasm_bindgen(js_name = "isValidAddress")]
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    address::is_valid_address(address)
}

/// Returns the address that produced a `personal_sign` signature.
#[wasm_bindgen(js_name = "recoverPersonalSigner")]
pub fn recover_personal_signer(message: &str, signature: &str) -> Result<String, JsValue> {
    recover_personal_signer_internal(message, signature).map_err(JsValue::from)
}

fn recover_personal_signer_internal(msg: &str, signature: &str) -> WasmResult<String> {
    let signature = evm_wallet_core::Signature::from_hex(signature)?;
    let signer: Address = message::recover_personal_signer(msg, &signature)?;
    Ok(signer.to_checksum_hex())
}

/// Maps JSON parse failures to a caller-facing category; other errors keep
/// their default mapping.
fn json_as(category: fn(String) -> WasmError) -> impl Fn(CoreError) -> WasmError {
    move |error| match error {
        CoreError::JsonError(msg) => category(msg),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str = "test test test test test test test test test test test junk";
    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn derives_hardhat_accounts() {
        assert_eq!(
            derive_address_internal(MNEMONIC, "", "m/44'/60'/0'/0/0").unwrap(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(
            derive_address_internal(MNEMONIC, "", "m/44'/60'/0'/0/1").unwrap(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
        assert!(matches!(
            derive_address_internal("test junk", "", "m/44'/60'/0'/0/0"),
            Err(WasmError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn signs_legacy_transaction_json() {
        let tx = r#"{
            "type": "legacy",
            "chainId": 1,
            "nonce": 0,
            "gasPrice": "0x3b9aca00",
            "gasLimit": 21000,
            "to": "0x000000000000000000000000000000000000dEaD",
            "value": "0x0",
            "data": "0x"
        }"#;
        let raw = sign_transaction_internal(KEY, tx).unwrap();
        assert!(raw.starts_with("0xf86380843b9aca00825208"));
        assert!(raw.ends_with("63bacd"));
    }

    #[test]
    fn rejects_bad_transaction_json() {
        assert!(matches!(
            sign_transaction_internal(KEY, "{\"type\": \"eip4844\"}"),
            Err(WasmError::InvalidTransaction(_))
        ));
        assert!(matches!(
            sign_transaction_internal(KEY, "[]"),
            Err(WasmError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn personal_sign_roundtrip() {
        let signature = personal_sign_internal(KEY, "hello").unwrap();
        assert_eq!(signature.len(), 132);
        assert_eq!(
            recover_personal_signer_internal("hello", &signature).unwrap(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn bad_key_rejected() {
        assert!(matches!(
            personal_sign_internal("0x00", "hello"),
            Err(WasmError::InvalidKey(_))
        ));
        assert!(matches!(
            sign_typed_data_internal(KEY, "not json"),
            Err(WasmError::InvalidTypedData(_))
        ));
    }

    #[test]
    fn keystore_errors() {
        assert!(matches!(
            decrypt_keystore_internal("{}", "pw"),
            Err(WasmError::InvalidKeystore(_))
        ));
    }

    #[test]
    fn address_helpers() {
        assert!(is_valid_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!is_valid_address("0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!is_valid_address("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
    }
}
