//! Web3 Secret Storage (Keystore V3) decryption and encryption.
//!
//! A V3 keystore stores a private key encrypted under a password:
//!
//! 1. `dk = KDF(password, salt)`, 32 bytes, via scrypt or
//!    PBKDF2-HMAC-SHA256.
//! 2. `mac = keccak256(dk[16..32] || ciphertext)` must equal `crypto.mac`;
//!    otherwise the password is wrong and nothing is decrypted.
//! 3. `private_key = AES-128-CTR(dk[0..16], iv).decrypt(ciphertext)`.
//!
//! KDF parameters come from the file itself, so they are checked against
//! [`KdfLimits`] before any derivation work starts.
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::crypto::PrivateKey;
//! use evm_wallet_core::keystore::{self, KdfKind};
//!
//! let key = PrivateKey::from_bytes(&[0x11; 32]).unwrap();
//! let json = keystore::encrypt(&key, "hunter2", KdfKind::Pbkdf2 { iterations: 1024 }).unwrap();
//!
//! let decrypted = keystore::decrypt(&json, "hunter2").unwrap();
//! assert_eq!(decrypted.as_bytes(), key.as_bytes());
//! assert!(keystore::decrypt(&json, "hunter3").is_err());
//! ```

use aes::Aes128;
use ctr::Ctr128BE;
use ctr::cipher::{KeyIvInit, StreamCipher};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Builder;
use zeroize::Zeroizing;

use crate::address::Address;
use crate::config::KdfLimits;
use crate::crypto::PrivateKey;
use crate::error::{Error, Result};
use crate::hash::keccak256;
use crate::kdf::derive_scrypt;

type Aes128Ctr = Ctr128BE<Aes128>;

/// The only supported keystore version.
pub const KEYSTORE_VERSION: u32 = 3;

/// The only supported cipher.
pub const CIPHER: &str = "aes-128-ctr";

/// The only supported PBKDF2 pseudo-random function.
pub const PBKDF2_PRF: &str = "hmac-sha256";

const DK_LEN: usize = 32;
const SALT_LEN: usize = 32;
const IV_LEN: usize = 16;

/// A V3 keystore document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedKeystore {
    /// Format version; must be `3`.
    pub version: u32,
    /// Random identifier, usually a UUID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Lowercase hex address of the key, without `0x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// The encrypted key and its parameters. Older files spell this `Crypto`.
    #[serde(alias = "Crypto")]
    pub crypto: CryptoSection,
}

/// The `crypto` section of a keystore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSection {
    /// Cipher name; must be `aes-128-ctr`.
    pub cipher: String,
    /// Hex ciphertext.
    pub ciphertext: String,
    /// Cipher parameters.
    pub cipherparams: CipherParams,
    /// KDF name: `scrypt` or `pbkdf2`.
    pub kdf: String,
    /// KDF parameters, interpreted according to `kdf`.
    pub kdfparams: serde_json::Value,
    /// Hex MAC.
    pub mac: String,
}

/// AES-128-CTR parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    /// Hex 16-byte initial counter block.
    pub iv: String,
}

/// scrypt `kdfparams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// Derived key length.
    pub dklen: usize,
    /// CPU/memory cost, a power of two.
    pub n: u64,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
    /// Hex salt.
    pub salt: String,
}

/// PBKDF2 `kdfparams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pbkdf2Params {
    /// Iteration count.
    pub c: u32,
    /// Derived key length.
    pub dklen: usize,
    /// Pseudo-random function; must be `hmac-sha256`.
    pub prf: String,
    /// Hex salt.
    pub salt: String,
}

/// KDF choice for [`encrypt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfKind {
    /// scrypt with the given cost parameters.
    Scrypt {
        /// CPU/memory cost, a power of two.
        n: u64,
        /// Block size.
        r: u32,
        /// Parallelism.
        p: u32,
    },
    /// PBKDF2-HMAC-SHA256 with the given iteration count.
    Pbkdf2 {
        /// Iteration count.
        iterations: u32,
    },
}

impl KdfKind {
    /// geth's standard scrypt profile.
    pub const STANDARD_SCRYPT: Self = Self::Scrypt {
        n: 1 << 18,
        r: 8,
        p: 1,
    };

    /// geth's light scrypt profile.
    pub const LIGHT_SCRYPT: Self = Self::Scrypt {
        n: 1 << 12,
        r: 8,
        p: 6,
    };
}

/// Decrypts a keystore with the default [`KdfLimits`].
///
/// # Errors
///
/// See [`decrypt_with_limits`].
pub fn decrypt(json: &str, password: &str) -> Result<PrivateKey> {
    decrypt_with_limits(json, password, &KdfLimits::default())
}

/// Decrypts a keystore, refusing KDF parameters beyond `limits`.
///
/// Either the full private key is returned or nothing is: the MAC is checked
/// before decryption, and the decrypted bytes are zeroized if any later check
/// fails.
///
/// # Errors
///
/// - [`Error::JsonError`] if the document or its `kdfparams` are malformed
/// - [`Error::UnsupportedKeystoreVersion`] for an unknown version, cipher,
///   KDF or PRF, or unusable KDF parameters
/// - [`Error::KdfCostExceeded`] if the KDF cost exceeds `limits`
/// - [`Error::WrongPassword`] if the MAC does not match
/// - [`Error::InvalidPrivateKey`] if the plaintext is not a valid key
/// - [`Error::KeystoreAddressMismatch`] if the embedded address does not
///   belong to the decrypted key
pub fn decrypt_with_limits(json: &str, password: &str, limits: &KdfLimits) -> Result<PrivateKey> {
    let keystore: EncryptedKeystore = serde_json::from_str(json)?;
    keystore.decrypt(password, limits)
}

impl EncryptedKeystore {
    /// Decrypts this keystore. See [`decrypt_with_limits`].
    ///
    /// # Errors
    ///
    /// See [`decrypt_with_limits`].
    pub fn decrypt(&self, password: &str, limits: &KdfLimits) -> Result<PrivateKey> {
        if self.version != KEYSTORE_VERSION {
            return Err(Error::UnsupportedKeystoreVersion(format!(
                "version {}",
                self.version
            )));
        }
        let crypto = &self.crypto;
        if crypto.cipher != CIPHER {
            return Err(Error::UnsupportedKeystoreVersion(format!(
                "cipher {}",
                crypto.cipher
            )));
        }

        let ciphertext = decode_hex(&crypto.ciphertext)?;
        let iv = decode_hex(&crypto.cipherparams.iv)?;
        let mac = decode_hex(&crypto.mac)?;
        if iv.len() != IV_LEN {
            return Err(Error::UnsupportedKeystoreVersion(format!(
                "iv length {}",
                iv.len()
            )));
        }

        let dk = derive_key(&crypto.kdf, &crypto.kdfparams, password, limits)?;

        if !bool::from(compute_mac(&dk, &ciphertext).as_slice().ct_eq(&mac)) {
            debug!("keystore MAC mismatch");
            return Err(Error::WrongPassword);
        }

        let mut plaintext = Zeroizing::new(ciphertext);
        apply_cipher(&dk, &iv, &mut plaintext)?;
        let key = PrivateKey::from_slice(&plaintext)?;

        if let Some(expected) = &self.address {
            let expected = Address::from_hex(expected)?;
            let derived = Address::from_private_key(&key);
            if expected != derived {
                return Err(Error::KeystoreAddressMismatch {
                    expected: expected.to_checksum_hex(),
                    derived: derived.to_checksum_hex(),
                });
            }
        }

        debug!(address = %Address::from_private_key(&key), "keystore decrypted");
        Ok(key)
    }
}

/// Encrypts `key` into a V3 keystore JSON document with a random salt, IV
/// and id.
///
/// # Errors
///
/// Returns [`Error::UnsupportedKeystoreVersion`] if the scrypt parameters
/// are unusable, or [`Error::JsonError`] if serialization fails.
pub fn encrypt(key: &PrivateKey, password: &str, kdf: KdfKind) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    let mut id = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);
    OsRng.fill_bytes(&mut id);

    let (kdf_name, kdfparams) = match kdf {
        KdfKind::Scrypt { n, r, p } => (
            "scrypt",
            serde_json::to_value(ScryptParams {
                dklen: DK_LEN,
                n,
                r,
                p,
                salt: hex::encode(salt),
            })?,
        ),
        KdfKind::Pbkdf2 { iterations } => (
            "pbkdf2",
            serde_json::to_value(Pbkdf2Params {
                c: iterations,
                dklen: DK_LEN,
                prf: PBKDF2_PRF.to_string(),
                salt: hex::encode(salt),
            })?,
        ),
    };

    let dk = derive_key(kdf_name, &kdfparams, password, &KdfLimits::unbounded())?;
    let mut ciphertext = key.as_bytes().to_vec();
    apply_cipher(&dk, &iv, &mut ciphertext)?;
    let mac = compute_mac(&dk, &ciphertext);

    let address = Address::from_private_key(key);
    let keystore = EncryptedKeystore {
        version: KEYSTORE_VERSION,
        id: Some(Builder::from_random_bytes(id).into_uuid().to_string()),
        address: Some(hex::encode(address.as_bytes())),
        crypto: CryptoSection {
            cipher: CIPHER.to_string(),
            ciphertext: hex::encode(&ciphertext),
            cipherparams: CipherParams {
                iv: hex::encode(iv),
            },
            kdf: kdf_name.to_string(),
            kdfparams,
            mac: hex::encode(mac),
        },
    };

    debug!(%address, kdf = kdf_name, "keystore encrypted");
    Ok(serde_json::to_string(&keystore)?)
}

fn derive_key(
    kdf: &str,
    kdfparams: &serde_json::Value,
    password: &str,
    limits: &KdfLimits,
) -> Result<Zeroizing<[u8; DK_LEN]>> {
    let mut dk = Zeroizing::new([0u8; DK_LEN]);

    match kdf {
        "scrypt" => {
            let params: ScryptParams = serde_json::from_value(kdfparams.clone())?;
            check_dklen(params.dklen)?;
            if params.n < 2 || !params.n.is_power_of_two() {
                return Err(Error::UnsupportedKeystoreVersion(format!(
                    "scrypt n {} is not a power of two",
                    params.n
                )));
            }
            limits.check_scrypt(params.n, params.r, params.p)?;
            let salt = decode_hex(&params.salt)?;

            #[allow(clippy::cast_possible_truncation)]
            let log_n = params.n.trailing_zeros() as u8;

            debug!(n = params.n, r = params.r, p = params.p, "deriving keystore key with scrypt");
            derive_scrypt(password.as_bytes(), &salt, log_n, params.r, params.p, &mut dk[..])?;
        }
        "pbkdf2" => {
            let params: Pbkdf2Params = serde_json::from_value(kdfparams.clone())?;
            check_dklen(params.dklen)?;
            if params.prf != PBKDF2_PRF {
                return Err(Error::UnsupportedKeystoreVersion(format!(
                    "pbkdf2 prf {}",
                    params.prf
                )));
            }
            limits.check_pbkdf2(params.c)?;
            let salt = decode_hex(&params.salt)?;

            debug!(iterations = params.c, "deriving keystore key with pbkdf2");
            pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, params.c, &mut dk[..]);
        }
        other => {
            return Err(Error::UnsupportedKeystoreVersion(format!("kdf {other}")));
        }
    }

    Ok(dk)
}

fn check_dklen(dklen: usize) -> Result<()> {
    if dklen != DK_LEN {
        return Err(Error::UnsupportedKeystoreVersion(format!("dklen {dklen}")));
    }
    Ok(())
}

fn compute_mac(dk: &[u8; DK_LEN], ciphertext: &[u8]) -> [u8; 32] {
    let mut data = Vec::with_capacity(16 + ciphertext.len());
    data.extend_from_slice(&dk[16..]);
    data.extend_from_slice(ciphertext);
    keccak256(&data)
}

fn apply_cipher(dk: &[u8; DK_LEN], iv: &[u8], buf: &mut [u8]) -> Result<()> {
    let mut cipher = Aes128Ctr::new_from_slices(&dk[..16], iv)
        .map_err(|_| Error::UnsupportedKeystoreVersion("invalid cipher parameters".to_string()))?;
    cipher.apply_keystream(buf);
    Ok(())
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(s.strip_prefix("0x").unwrap_or(s))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "eff4580ef3a4ecd61f8e4d8ef18da75fddc0d5aadfb437c1dd7e9500e36de930";
    const CHEAP_SCRYPT: KdfKind = KdfKind::Scrypt { n: 1024, r: 8, p: 1 };

    fn key() -> PrivateKey {
        PrivateKey::from_hex(KEY).unwrap()
    }

    #[test]
    fn scrypt_roundtrip() {
        let json = encrypt(&key(), "1qazXSW@3edc", CHEAP_SCRYPT).unwrap();
        let decrypted = decrypt(&json, "1qazXSW@3edc").unwrap();
        assert_eq!(hex::encode(decrypted.as_bytes()), KEY);
        assert_eq!(
            Address::from_private_key(&decrypted).to_checksum_hex(),
            "0x39b97205B9826F21Fd39B535CF972C809e160E5f"
        );
    }

    #[test]
    fn scrypt_r1_roundtrip() {
        let r1 = KdfKind::Scrypt {
            n: 1 << 16,
            r: 1,
            p: 1,
        };
        let json = encrypt(&key(), "1qazXSW@3edc", r1).unwrap();
        assert_eq!(decrypt(&json, "1qazXSW@3edc").unwrap(), key());
        assert!(matches!(
            decrypt(&json, "1qazXSW@3edC"),
            Err(Error::WrongPassword)
        ));
    }

    #[test]
    fn pbkdf2_roundtrip() {
        let json = encrypt(&key(), "pw", KdfKind::Pbkdf2 { iterations: 2048 }).unwrap();
        assert_eq!(decrypt(&json, "pw").unwrap(), key());
    }

    #[test]
    fn encrypted_document_shape() {
        let json = encrypt(&key(), "pw", CHEAP_SCRYPT).unwrap();
        let keystore: EncryptedKeystore = serde_json::from_str(&json).unwrap();

        assert_eq!(keystore.version, 3);
        assert_eq!(
            keystore.address.as_deref(),
            Some("39b97205b9826f21fd39b535cf972c809e160e5f")
        );
        assert_eq!(keystore.crypto.cipher, "aes-128-ctr");
        assert_eq!(keystore.crypto.kdf, "scrypt");
        assert_eq!(keystore.crypto.kdfparams["n"], 1024);
        assert_eq!(keystore.crypto.ciphertext.len(), 64);

        let id = uuid::Uuid::parse_str(keystore.id.as_deref().unwrap()).unwrap();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn encryption_is_randomized() {
        let a = encrypt(&key(), "pw", KdfKind::Pbkdf2 { iterations: 1 }).unwrap();
        let b = encrypt(&key(), "pw", KdfKind::Pbkdf2 { iterations: 1 }).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_password() {
        let json = encrypt(&key(), "1qazXSW@3edc", CHEAP_SCRYPT).unwrap();
        assert!(matches!(
            decrypt(&json, "1qazXSW@3edd"),
            Err(Error::WrongPassword)
        ));
        assert!(matches!(decrypt(&json, ""), Err(Error::WrongPassword)));
    }

    #[test]
    fn tampered_ciphertext_is_wrong_password() {
        let json = encrypt(&key(), "pw", KdfKind::Pbkdf2 { iterations: 1 }).unwrap();
        let mut keystore: EncryptedKeystore = serde_json::from_str(&json).unwrap();
        let mut ciphertext = hex::decode(&keystore.crypto.ciphertext).unwrap();
        ciphertext[0] ^= 1;
        keystore.crypto.ciphertext = hex::encode(ciphertext);

        assert!(matches!(
            keystore.decrypt("pw", &KdfLimits::default()),
            Err(Error::WrongPassword)
        ));
    }

    #[test]
    fn capitalized_crypto_accepted() {
        let json = encrypt(&key(), "pw", KdfKind::Pbkdf2 { iterations: 1 }).unwrap();
        let legacy = json.replace("\"crypto\"", "\"Crypto\"");
        assert_eq!(decrypt(&legacy, "pw").unwrap(), key());
    }

    #[test]
    fn address_mismatch_detected() {
        let json = encrypt(&key(), "pw", KdfKind::Pbkdf2 { iterations: 1 }).unwrap();
        let mut keystore: EncryptedKeystore = serde_json::from_str(&json).unwrap();
        keystore.address = Some("f39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string());

        assert!(matches!(
            keystore.decrypt("pw", &KdfLimits::default()),
            Err(Error::KeystoreAddressMismatch { .. })
        ));

        keystore.address = None;
        assert_eq!(keystore.decrypt("pw", &KdfLimits::default()).unwrap(), key());
    }

    #[test]
    fn unsupported_parameters() {
        let json = encrypt(&key(), "pw", KdfKind::Pbkdf2 { iterations: 1 }).unwrap();
        let keystore: EncryptedKeystore = serde_json::from_str(&json).unwrap();
        let limits = KdfLimits::default();

        let mut v2 = keystore.clone();
        v2.version = 2;
        assert!(matches!(
            v2.decrypt("pw", &limits),
            Err(Error::UnsupportedKeystoreVersion(_))
        ));

        let mut cbc = keystore.clone();
        cbc.crypto.cipher = "aes-128-cbc".to_string();
        assert!(matches!(
            cbc.decrypt("pw", &limits),
            Err(Error::UnsupportedKeystoreVersion(_))
        ));

        let mut argon = keystore.clone();
        argon.crypto.kdf = "argon2id".to_string();
        assert!(matches!(
            argon.decrypt("pw", &limits),
            Err(Error::UnsupportedKeystoreVersion(_))
        ));

        let mut sha512 = keystore;
        sha512.crypto.kdfparams["prf"] = "hmac-sha512".into();
        assert!(matches!(
            sha512.decrypt("pw", &limits),
            Err(Error::UnsupportedKeystoreVersion(_))
        ));
    }

    #[test]
    fn kdf_cost_limit_checked_first() {
        let json = encrypt(&key(), "pw", CHEAP_SCRYPT).unwrap();
        let limits = KdfLimits {
            max_scrypt_cost: 1024,
            ..KdfLimits::default()
        };
        assert!(matches!(
            decrypt_with_limits(&json, "pw", &limits),
            Err(Error::KdfCostExceeded {
                cost: 8192,
                limit: 1024
            })
        ));

        let mut keystore: EncryptedKeystore = serde_json::from_str(&json).unwrap();
        keystore.crypto.kdfparams["n"] = (1u64 << 40).into();
        assert!(matches!(
            keystore.decrypt("pw", &KdfLimits::default()),
            Err(Error::KdfCostExceeded { .. })
        ));
    }

    #[test]
    fn non_power_of_two_scrypt_rejected() {
        let json = encrypt(&key(), "pw", CHEAP_SCRYPT).unwrap();
        let mut keystore: EncryptedKeystore = serde_json::from_str(&json).unwrap();
        keystore.crypto.kdfparams["n"] = 1000.into();
        assert!(matches!(
            keystore.decrypt("pw", &KdfLimits::default()),
            Err(Error::UnsupportedKeystoreVersion(_))
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(decrypt("{}", "pw"), Err(Error::JsonError(_))));
        assert!(matches!(decrypt("not json", "pw"), Err(Error::JsonError(_))));
    }
}
