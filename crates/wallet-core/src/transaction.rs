//! Ethereum transaction encoding, signing and decoding.
//!
//! Two transaction types are supported:
//!
//! - **EIP-155 legacy transactions**: the original format with chain-id
//!   replay protection folded into `v`
//! - **EIP-1559 (type 2) transactions**: priority fee and fee cap, with the
//!   signature's y-parity stored directly
//!
//! Any other type byte (`0x01` access-list, `0x03` blob, `0x04` set-code, ...)
//! is rejected with [`Error::UnsupportedTransactionType`].
//!
//! # Signing Flow
//!
//! 1. Build a [`Transaction`]
//! 2. [`Transaction::signing_hash`] gives the 32-byte hash to sign
//! 3. [`sign_transaction`] signs it and returns a [`SignedTransaction`]
//! 4. [`SignedTransaction::to_raw_hex`] gives the bytes for
//!    `eth_sendRawTransaction`
//!
//! # Example
//!
//! ```
//! use alloy_primitives::U256;
//! use evm_wallet_core::crypto::PrivateKey;
//! use evm_wallet_core::{Address, LegacyTransaction, SignedTransaction, Transaction, sign_transaction};
//!
//! let key = PrivateKey::from_hex(
//!     "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
//! )
//! .unwrap();
//! let tx = Transaction::Legacy(LegacyTransaction {
//!     chain_id: 1,
//!     nonce: 0,
//!     gas_price: U256::from(1_000_000_000u64),
//!     gas_limit: 21_000,
//!     to: Some(Address::from_hex("0x000000000000000000000000000000000000dEaD").unwrap()),
//!     value: U256::ZERO,
//!     data: Default::default(),
//! });
//!
//! let signed = sign_transaction(&tx, &key).unwrap();
//! assert!(signed.to_raw_hex().starts_with("0xf863"));
//!
//! let decoded = SignedTransaction::decode(&signed.to_raw()).unwrap();
//! assert_eq!(decoded.recover_signer().unwrap(), Address::from_private_key(&key));
//! ```

use alloy_primitives::{B256, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::address::{Address, recover_address};
use crate::crypto::PrivateKey;
use crate::error::{Error, Result};
use crate::hash::keccak256;
use crate::rlp::{self, RlpItem};
use crate::signature::Signature;

/// An access list entry for EIP-2930/EIP-1559 transactions.
///
/// Access lists specify which addresses and storage keys will be accessed
/// during transaction execution, potentially reducing gas costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListEntry {
    /// The address being accessed.
    pub address: Address,

    /// The storage keys being accessed at this address.
    pub storage_keys: Vec<B256>,
}

/// An EIP-155 legacy transaction.
///
/// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTransaction {
    /// The chain ID for replay protection.
    pub chain_id: u64,

    /// The transaction nonce.
    pub nonce: u64,

    /// The gas price in wei.
    pub gas_price: U256,

    /// The gas limit.
    pub gas_limit: u64,

    /// The recipient address, or `None` for contract creation.
    pub to: Option<Address>,

    /// The value to transfer in wei.
    pub value: U256,

    /// The transaction input data.
    #[serde(default)]
    pub data: Bytes,
}

impl LegacyTransaction {
    fn unsigned_fields(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::from_u64(self.nonce),
            RlpItem::from_u256(&self.gas_price),
            RlpItem::from_u64(self.gas_limit),
            to_item(self.to.as_ref()),
            RlpItem::from_u256(&self.value),
            RlpItem::bytes(&self.data),
        ]
    }

    /// Returns the EIP-155 signing payload:
    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut fields = self.unsigned_fields();
        fields.extend([
            RlpItem::from_u64(self.chain_id),
            RlpItem::empty(),
            RlpItem::empty(),
        ]);
        rlp::encode_list(&fields)
    }

    /// Returns `keccak256` of [`Self::signing_payload`].
    #[must_use]
    pub fn signing_hash(&self) -> B256 {
        B256::from(keccak256(self.signing_payload()))
    }

    /// Returns the EIP-155 `v`: `recovery_id + chain_id * 2 + 35`.
    #[must_use]
    pub fn eip155_v(&self, signature: &Signature) -> U256 {
        U256::from(self.chain_id) * U256::from(2) + U256::from(35) + U256::from(signature.v())
    }

    /// Encodes the signed transaction:
    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`.
    #[must_use]
    pub fn signed_rlp(&self, signature: &Signature) -> Vec<u8> {
        let mut fields = self.unsigned_fields();
        fields.extend([
            RlpItem::from_u256(&self.eip155_v(signature)),
            RlpItem::from_word(signature.r()),
            RlpItem::from_word(signature.s()),
        ]);
        rlp::encode_list(&fields)
    }

    fn decode_signed(items: &[RlpItem]) -> Result<(Self, Signature)> {
        let [nonce, gas_price, gas_limit, to, value, data, v, r, s] = items else {
            return Err(Error::MalformedRlp(format!(
                "legacy transaction has {} fields, expected 9",
                items.len()
            )));
        };

        let v = v.as_u256()?;
        if v < U256::from(35) {
            return Err(Error::UnsupportedTransactionType(format!(
                "legacy transaction without EIP-155 chain id (v = {v})"
            )));
        }
        let offset = v - U256::from(35);
        let chain_id = u64::try_from(offset / U256::from(2))
            .map_err(|_| Error::MalformedRlp("chain id does not fit in 64 bits".to_string()))?;
        let recovery_id = offset.bit(0);

        let tx = Self {
            chain_id,
            nonce: nonce.as_u64()?,
            gas_price: gas_price.as_u256()?,
            gas_limit: gas_limit.as_u64()?,
            to: decode_to(to)?,
            value: value.as_u256()?,
            data: Bytes::copy_from_slice(data.as_bytes()?),
        };
        Ok((tx, Signature::new(r.as_word()?, s.as_word()?, recovery_id)))
    }
}

/// An EIP-1559 (type 2) transaction.
///
/// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip1559Transaction {
    /// The chain ID.
    pub chain_id: u64,

    /// The transaction nonce.
    pub nonce: u64,

    /// The maximum priority fee per gas (tip).
    pub max_priority_fee_per_gas: U256,

    /// The maximum total fee per gas.
    pub max_fee_per_gas: U256,

    /// The gas limit.
    pub gas_limit: u64,

    /// The recipient address, or `None` for contract creation.
    pub to: Option<Address>,

    /// The value to transfer in wei.
    pub value: U256,

    /// The transaction input data.
    #[serde(default)]
    pub data: Bytes,

    /// The access list.
    #[serde(default)]
    pub access_list: Vec<AccessListEntry>,
}

impl Eip1559Transaction {
    /// The transaction type identifier for EIP-1559.
    pub const TX_TYPE: u8 = 0x02;

    fn unsigned_fields(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::from_u64(self.chain_id),
            RlpItem::from_u64(self.nonce),
            RlpItem::from_u256(&self.max_priority_fee_per_gas),
            RlpItem::from_u256(&self.max_fee_per_gas),
            RlpItem::from_u64(self.gas_limit),
            to_item(self.to.as_ref()),
            RlpItem::from_u256(&self.value),
            RlpItem::bytes(&self.data),
            access_list_item(&self.access_list),
        ]
    }

    /// Returns the signing payload:
    /// `0x02 || rlp([chainId, nonce, maxPriorityFeePerGas, maxFeePerGas,
    /// gasLimit, to, value, data, accessList])`.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        typed_envelope(Self::TX_TYPE, &self.unsigned_fields())
    }

    /// Returns `keccak256` of [`Self::signing_payload`].
    #[must_use]
    pub fn signing_hash(&self) -> B256 {
        B256::from(keccak256(self.signing_payload()))
    }

    /// Encodes the signed transaction:
    /// `0x02 || rlp([..., yParity, r, s])`.
    #[must_use]
    pub fn signed_rlp(&self, signature: &Signature) -> Vec<u8> {
        let mut fields = self.unsigned_fields();
        fields.extend([
            RlpItem::from_u64(u64::from(signature.v())),
            RlpItem::from_word(signature.r()),
            RlpItem::from_word(signature.s()),
        ]);
        typed_envelope(Self::TX_TYPE, &fields)
    }

    fn decode_signed(items: &[RlpItem]) -> Result<(Self, Signature)> {
        let [
            chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            to,
            value,
            data,
            access_list,
            y_parity,
            r,
            s,
        ] = items
        else {
            return Err(Error::MalformedRlp(format!(
                "EIP-1559 transaction has {} fields, expected 12",
                items.len()
            )));
        };

        let y_parity = y_parity.as_u64()?;
        if y_parity > 1 {
            return Err(Error::InvalidSignature(format!(
                "y parity must be 0 or 1, got {y_parity}"
            )));
        }

        let tx = Self {
            chain_id: chain_id.as_u64()?,
            nonce: nonce.as_u64()?,
            max_priority_fee_per_gas: max_priority_fee_per_gas.as_u256()?,
            max_fee_per_gas: max_fee_per_gas.as_u256()?,
            gas_limit: gas_limit.as_u64()?,
            to: decode_to(to)?,
            value: value.as_u256()?,
            data: Bytes::copy_from_slice(data.as_bytes()?),
            access_list: decode_access_list(access_list)?,
        };
        let recovery_id = y_parity == 1;
        Ok((tx, Signature::new(r.as_word()?, s.as_word()?, recovery_id)))
    }
}

/// A transaction of one of the supported types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Transaction {
    /// EIP-155 legacy transaction.
    #[serde(rename = "legacy")]
    Legacy(LegacyTransaction),
    /// EIP-1559 (type 2) transaction.
    #[serde(rename = "eip1559")]
    Eip1559(Eip1559Transaction),
}

impl Transaction {
    /// Returns the EIP-2718 type byte (`0` for legacy).
    #[must_use]
    pub const fn tx_type(&self) -> u8 {
        match self {
            Self::Legacy(_) => 0,
            Self::Eip1559(_) => Eip1559Transaction::TX_TYPE,
        }
    }

    /// Returns the bytes whose hash is signed.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        match self {
            Self::Legacy(tx) => tx.signing_payload(),
            Self::Eip1559(tx) => tx.signing_payload(),
        }
    }

    /// Returns the 32-byte hash that should be signed.
    #[must_use]
    pub fn signing_hash(&self) -> B256 {
        match self {
            Self::Legacy(tx) => tx.signing_hash(),
            Self::Eip1559(tx) => tx.signing_hash(),
        }
    }

    /// Returns the chain ID for this transaction.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.chain_id,
            Self::Eip1559(tx) => tx.chain_id,
        }
    }

    /// Encodes this transaction with `signature` attached.
    #[must_use]
    pub fn signed_rlp(&self, signature: &Signature) -> Vec<u8> {
        match self {
            Self::Legacy(tx) => tx.signed_rlp(signature),
            Self::Eip1559(tx) => tx.signed_rlp(signature),
        }
    }

    /// Signs this transaction. See [`sign_transaction`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignature`] if signing fails.
    pub fn sign(&self, key: &PrivateKey) -> Result<SignedTransaction> {
        sign_transaction(self, key)
    }

    /// Parses a transaction from JSON.
    ///
    /// The object must carry `"type": "legacy"` or `"type": "eip1559"`;
    /// numeric fields use camelCase names as in JSON-RPC.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTransactionType`] for a missing or unknown
    /// `type`, and [`Error::JsonError`] if the fields do not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        match value.get("type").and_then(Value::as_str) {
            Some("legacy" | "eip1559") => Ok(serde_json::from_value(value)?),
            Some(other) => Err(Error::UnsupportedTransactionType(other.to_string())),
            None => Err(Error::UnsupportedTransactionType(
                "missing \"type\" field".to_string(),
            )),
        }
    }

    /// Serializes the transaction to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonError`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A transaction together with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: Signature,
}

impl SignedTransaction {
    /// Pairs a transaction with a signature over its signing hash.
    #[must_use]
    pub const fn new(transaction: Transaction, signature: Signature) -> Self {
        Self {
            transaction,
            signature,
        }
    }

    /// Returns the unsigned transaction.
    #[must_use]
    pub const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Returns the signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the raw signed bytes, as accepted by `eth_sendRawTransaction`.
    #[must_use]
    pub fn to_raw(&self) -> Vec<u8> {
        self.transaction.signed_rlp(&self.signature)
    }

    /// Returns the raw signed bytes as `0x`-prefixed hex.
    #[must_use]
    pub fn to_raw_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_raw()))
    }

    /// Returns the transaction hash, `keccak256(raw)`.
    #[must_use]
    pub fn hash(&self) -> B256 {
        B256::from(keccak256(self.to_raw()))
    }

    /// Recovers the sender address from the signature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignature`] if recovery fails.
    pub fn recover_signer(&self) -> Result<Address> {
        recover_address(&self.transaction.signing_hash().0, &self.signature)
    }

    /// Decodes a raw signed legacy or EIP-1559 transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTransactionType`] for other type bytes or
    /// pre-EIP-155 legacy transactions, [`Error::MalformedRlp`] for invalid
    /// encodings, and [`Error::InvalidSignature`] for a bad y-parity.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let (&first, rest) = raw
            .split_first()
            .ok_or_else(|| Error::MalformedRlp("empty transaction".to_string()))?;

        let (transaction, signature) = match first {
            0xc0.. => {
                let (tx, sig) = LegacyTransaction::decode_signed(rlp::decode(raw)?.as_list()?)?;
                (Transaction::Legacy(tx), sig)
            }
            Eip1559Transaction::TX_TYPE => {
                let (tx, sig) = Eip1559Transaction::decode_signed(rlp::decode(rest)?.as_list()?)?;
                (Transaction::Eip1559(tx), sig)
            }
            0x80..=0xbf => {
                return Err(Error::MalformedRlp(
                    "transaction is an RLP string, not a list or typed envelope".to_string(),
                ));
            }
            other => {
                return Err(Error::UnsupportedTransactionType(format!("0x{other:02x}")));
            }
        };

        debug!(
            tx_type = transaction.tx_type(),
            chain_id = transaction.chain_id(),
            "decoded signed transaction"
        );
        Ok(Self::new(transaction, signature))
    }

    /// Decodes a raw signed transaction from hex, with or without `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HexDecodeFailed`] for invalid hex, plus the errors of
    /// [`Self::decode`].
    pub fn decode_hex(raw: &str) -> Result<Self> {
        let raw = raw.strip_prefix("0x").unwrap_or(raw);
        Self::decode(&hex::decode(raw)?)
    }
}

/// Signs a transaction with `key`.
///
/// # Errors
///
/// Returns [`Error::InvalidSignature`] if signing fails.
pub fn sign_transaction(tx: &Transaction, key: &PrivateKey) -> Result<SignedTransaction> {
    debug!(
        tx_type = tx.tx_type(),
        chain_id = tx.chain_id(),
        "signing transaction"
    );
    let signature = key.sign_hash(&tx.signing_hash().0)?;
    Ok(SignedTransaction::new(tx.clone(), signature))
}

fn typed_envelope(tx_type: u8, fields: &[RlpItem]) -> Vec<u8> {
    let body = rlp::encode_list(fields);
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(tx_type);
    out.extend_from_slice(&body);
    out
}

fn to_item(to: Option<&Address>) -> RlpItem {
    match to {
        Some(address) => RlpItem::bytes(address.as_bytes()),
        None => RlpItem::empty(),
    }
}

fn access_list_item(access_list: &[AccessListEntry]) -> RlpItem {
    RlpItem::List(
        access_list
            .iter()
            .map(|entry| {
                RlpItem::List(vec![
                    RlpItem::bytes(entry.address.as_bytes()),
                    RlpItem::List(entry.storage_keys.iter().map(RlpItem::bytes).collect()),
                ])
            })
            .collect(),
    )
}

fn decode_to(item: &RlpItem) -> Result<Option<Address>> {
    let bytes = item.as_bytes()?;
    if bytes.is_empty() {
        return Ok(None);
    }
    let bytes: [u8; 20] = bytes.try_into().map_err(|_| {
        Error::MalformedRlp(format!("recipient must be 20 bytes, got {}", bytes.len()))
    })?;
    Ok(Some(Address::new(bytes)))
}

fn decode_access_list(item: &RlpItem) -> Result<Vec<AccessListEntry>> {
    item.as_list()?
        .iter()
        .map(|entry| {
            let [address, keys] = entry.as_list()? else {
                return Err(Error::MalformedRlp(
                    "access list entry must have 2 fields".to_string(),
                ));
            };
            let address = decode_to(address)?
                .ok_or_else(|| Error::MalformedRlp("access list address is empty".to_string()))?;
            let storage_keys = keys
                .as_list()?
                .iter()
                .map(|key| {
                    let key: [u8; 32] = key.as_bytes()?.try_into().map_err(|_| {
                        Error::MalformedRlp("storage key must be 32 bytes".to_string())
                    })?;
                    Ok(B256::from(key))
                })
                .collect::<Result<_>>()?;
            Ok(AccessListEntry {
                address,
                storage_keys,
            })
        })
        .collect()
}
