//! BIP-39 mnemonic validation and seed derivation.
//!
//! A mnemonic encodes 128 to 256 bits of entropy as 12, 15, 18, 21 or 24
//! words from the English word list. The last `entropy_bits / 32` bits of the
//! word indices are a checksum: the leading bits of `SHA-256(entropy)`.
//!
//! The seed is
//!
//! ```text
//! PBKDF2-HMAC-SHA512(
//!     password   = NFKD(mnemonic),
//!     salt       = "mnemonic" || NFKD(passphrase),
//!     iterations = 2048,
//!     length     = 64,
//! )
//! ```
//!
//! Input is trimmed and split on any run of whitespace before validation, so
//! `"  abandon\tabandon ... about\n"` is accepted.
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::mnemonic::{Mnemonic, mnemonic_to_seed};
//!
//! let phrase = "test test test test test test test test test test test junk";
//! let mnemonic = Mnemonic::parse(phrase).unwrap();
//! assert_eq!(mnemonic.word_count(), 12);
//!
//! let seed = mnemonic_to_seed(phrase, "").unwrap();
//! assert_eq!(*seed, *mnemonic.to_seed(""));
//! ```

use core::fmt;

use bip39::Language;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};

/// PBKDF2 rounds used for seed derivation.
pub const SEED_ITERATIONS: u32 = 2048;

/// Length of a BIP-39 seed in bytes.
pub const SEED_LEN: usize = 64;

/// A validated English BIP-39 mnemonic.
///
/// Stores the NFKD-normalized phrase with single spaces between words. The
/// phrase is zeroed on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    phrase: Zeroizing<String>,
    word_count: usize,
}

impl Mnemonic {
    /// Validates a mnemonic phrase: word-list membership, length and checksum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMnemonic`] if a word is unknown, the word count
    /// is not 12, 15, 18, 21 or 24, or the checksum does not match.
    pub fn parse(phrase: &str) -> Result<Self> {
        let normalized = normalize_phrase(phrase);
        let mut parsed = bip39::Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
        let word_count = parsed.word_count();
        parsed.zeroize();
        debug!(word_count, "mnemonic validated");
        Ok(Self {
            phrase: normalized,
            word_count,
        })
    }

    /// Encodes 16, 20, 24, 28 or 32 bytes of entropy as a mnemonic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMnemonic`] if the entropy length is not
    /// supported.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        let mut parsed = bip39::Mnemonic::from_entropy_in(Language::English, entropy)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
        let mnemonic = Self {
            phrase: Zeroizing::new(parsed.to_string()),
            word_count: parsed.word_count(),
        };
        parsed.zeroize();
        Ok(mnemonic)
    }

    /// Returns the normalized phrase.
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Returns the number of words.
    #[must_use]
    pub const fn word_count(&self) -> usize {
        self.word_count
    }

    /// Derives the 64-byte seed for `passphrase` (empty for none).
    #[must_use]
    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; SEED_LEN]> {
        derive_seed(&self.phrase, passphrase)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("word_count", &self.word_count)
            .finish_non_exhaustive()
    }
}

/// Validates a mnemonic phrase. See [`Mnemonic::parse`].
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonic`] if validation fails.
pub fn validate(mnemonic: &str) -> Result<()> {
    Mnemonic::parse(mnemonic).map(|_| ())
}

/// Validates `mnemonic` and derives its 64-byte seed.
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonic`] if validation fails.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    Ok(Mnemonic::parse(mnemonic)?.to_seed(passphrase))
}

fn normalize_phrase(phrase: &str) -> Zeroizing<String> {
    let decomposed = Zeroizing::new(phrase.nfkd().collect::<String>());
    Zeroizing::new(decomposed.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn derive_seed(normalized_phrase: &str, passphrase: &str) -> Zeroizing<[u8; SEED_LEN]> {
    let mut salt = Zeroizing::new(String::from("mnemonic"));
    salt.extend(passphrase.nfkd());

    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    pbkdf2_hmac::<Sha512>(
        normalized_phrase.as_bytes(),
        salt.as_bytes(),
        SEED_ITERATIONS,
        &mut seed[..],
    );
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn bip39_vector_trezor_passphrase() {
        let seed = mnemonic_to_seed(ABANDON, "TREZOR").unwrap();
        assert_eq!(
            hex::encode(*seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn bip39_vector_empty_passphrase() {
        let seed = mnemonic_to_seed(ABANDON, "").unwrap();
        assert_eq!(
            hex::encode(*seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn seed_is_deterministic() {
        let a = mnemonic_to_seed(ABANDON, "pass").unwrap();
        let b = mnemonic_to_seed(ABANDON, "pass").unwrap();
        let c = mnemonic_to_seed(ABANDON, "other").unwrap();
        assert_eq!(*a, *b);
        assert_ne!(*a, *c);
    }

    #[test]
    fn passphrase_is_nfkd_normalized() {
        let composed = mnemonic_to_seed(ABANDON, "caf\u{e9}").unwrap();
        let decomposed = mnemonic_to_seed(ABANDON, "cafe\u{301}").unwrap();
        assert_eq!(*composed, *decomposed);
    }

    #[test]
    fn whitespace_is_normalized() {
        let messy = format!("  {}\n", ABANDON.replace(' ', " \t "));
        let mnemonic = Mnemonic::parse(&messy).unwrap();
        assert_eq!(mnemonic.phrase(), ABANDON);
        assert_eq!(*mnemonic.to_seed(""), *mnemonic_to_seed(ABANDON, "").unwrap());
    }

    #[test]
    fn all_lengths_accepted() {
        for len in [16usize, 20, 24, 28, 32] {
            let mnemonic = Mnemonic::from_entropy(&vec![0x7f; len]).unwrap();
            assert_eq!(mnemonic.word_count(), len * 3 / 4);
            validate(mnemonic.phrase()).unwrap();
        }
    }

    #[test]
    fn entropy_encoding_vector() {
        let mnemonic = Mnemonic::from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(mnemonic.phrase(), ABANDON);
    }

    #[test]
    fn bad_checksum_rejected() {
        let bad = ABANDON.replace("about", "abandon");
        assert!(matches!(validate(&bad), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn unknown_word_rejected() {
        let bad = ABANDON.replace("about", "bitcoinz");
        assert!(matches!(validate(&bad), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn bad_length_rejected() {
        let eleven = ABANDON.splitn(2, ' ').nth(1).unwrap();
        assert!(matches!(validate(eleven), Err(Error::InvalidMnemonic(_))));
        assert!(matches!(validate(""), Err(Error::InvalidMnemonic(_))));
        assert!(matches!(
            Mnemonic::from_entropy(&[0u8; 15]),
            Err(Error::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn debug_hides_phrase() {
        let debug = format!("{:?}", Mnemonic::parse(ABANDON).unwrap());
        assert!(!debug.contains("abandon"));
        assert!(debug.contains("word_count"));
    }

    #[test]
    fn parsed_word_indices_can_be_wiped() {
        fn wipeable<T: Zeroize>(_: &T) {}
        let parsed = bip39::Mnemonic::parse_in_normalized(Language::English, ABANDON).unwrap();
        wipeable(&parsed);
        assert_eq!(Mnemonic::parse(ABANDON).unwrap().word_count(), 12);
    }
}
