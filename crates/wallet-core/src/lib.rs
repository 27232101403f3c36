//! EVM Wallet Core Library
//!
//! This crate provides the cryptographic core of a self-custodial EVM wallet:
//! deterministic key derivation, secp256k1 signing, transaction encoding and
//! keystore decryption. Every operation is a synchronous pure function over
//! caller-owned key material.
//!
//! # Overview
//!
//! - **Mnemonics**: BIP-39 validation and seed derivation ([`mnemonic`])
//! - **HD Keys**: BIP-32/44 derivation and `xprv`/`xpub` export ([`hd`])
//! - **Signing**: low-S secp256k1 ECDSA with public-key recovery ([`crypto`])
//! - **Addresses**: Keccak-256 addresses with EIP-55 checksums ([`address`])
//! - **Transactions**: RLP, EIP-155 legacy and EIP-1559 signing ([`transaction`])
//! - **Messages**: `personal_sign` and EIP-712 typed data ([`message`], [`eip712`])
//! - **Keystores**: Web3 Secret Storage V3 ([`keystore`])
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Transaction  │   Message    │   Keystore   │   Address     │
//! │   Signing     │   Signing    │  Decryption  │   Codec       │
//! ├─────────────────────────────────────────────────────────────┤
//! │        HD Derivation        │     secp256k1 Sign/Recover    │
//! ├─────────────────────────────────────────────────────────────┤
//! │      Mnemonic / Seed        │   RLP   │  Keccak / HMAC      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows one way: mnemonic → seed → extended key → (address | signature).
//!
//! # Quick Start
//!
//! ## Deriving an Account
//!
//! ```rust
//! use evm_wallet_core::hd::derive_private_key;
//! use evm_wallet_core::mnemonic::mnemonic_to_seed;
//! use evm_wallet_core::Address;
//!
//! let seed = mnemonic_to_seed(
//!     "test test test test test test test test test test test junk",
//!     "",
//! )
//! .unwrap();
//! let key = derive_private_key(&*seed, "m/44'/60'/0'/0/0").unwrap();
//!
//! assert_eq!(
//!     Address::from_private_key(&key).to_checksum_hex(),
//!     "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
//! );
//! ```
//!
//! ## Signing a Transaction
//!
//! ```rust
//! use evm_wallet_core::crypto::PrivateKey;
//! use evm_wallet_core::{Address, Eip1559Transaction, Transaction, sign_transaction};
//! use alloy_primitives::U256;
//!
//! let key = PrivateKey::from_bytes(&[0x42; 32]).unwrap();
//! let tx = Transaction::Eip1559(Eip1559Transaction {
//!     chain_id: 1,
//!     nonce: 0,
//!     max_priority_fee_per_gas: U256::from(1_000_000_000u64),
//!     max_fee_per_gas: U256::from(100_000_000_000u64),
//!     gas_limit: 21000,
//!     to: Some(Address::zero()),
//!     value: U256::from(1_000_000_000_000_000_000u128),
//!     data: Default::default(),
//!     access_list: vec![],
//! });
//!
//! let signed = sign_transaction(&tx, &key).unwrap();
//! assert!(signed.to_raw_hex().starts_with("0x02"));
//! ```
//!
//! ## Signing a Message
//!
//! ```rust
//! use evm_wallet_core::crypto::PrivateKey;
//! use evm_wallet_core::message::personal_sign;
//!
//! let key = PrivateKey::from_bytes(&[0x42; 32]).unwrap();
//! let signature = personal_sign("hello", &key).unwrap();
//! assert_eq!(signature.to_rsv_bytes().len(), 65);
//! ```
//!
//! # Security Considerations
//!
//! - Private keys, seeds and mnemonic phrases are zeroized on drop and
//!   redacted from `Debug` output
//! - Nothing here logs key material; `tracing` events carry only public data
//! - Every signature produced is normalized to low-S form
//! - Keystore KDF cost is bounded by [`config::KdfLimits`] before any work

// Modules
pub mod address;
pub mod config;
pub mod crypto;
pub mod eip712;
pub mod error;
pub mod hash;
pub mod hd;
mod kdf;
pub mod keystore;
pub mod message;
pub mod mnemonic;
pub mod rlp;
pub mod signature;
pub mod transaction;

// Re-exports for convenience
pub use address::Address;
pub use crypto::{PrivateKey, PublicKey};
pub use eip712::{Eip712Domain, TypedData};
pub use error::{Error, Result};
pub use hd::{ChildIndex, DerivationPath, ExtendedKey};
pub use mnemonic::Mnemonic;
pub use signature::Signature;
pub use transaction::{
    AccessListEntry, Eip1559Transaction, LegacyTransaction, SignedTransaction, Transaction,
    sign_transaction,
};

// Re-export commonly used alloy types
pub use alloy_primitives::{B256, U256};
