//! BIP-32 hierarchical deterministic keys and BIP-44 Ethereum paths.
//!
//! # Derivation
//!
//! The master key is `(I_L, I_R) = HMAC-SHA512("Bitcoin seed", seed)` with
//! private key `I_L` and chain code `I_R`. A child at index `i` is
//!
//! ```text
//! hardened: data = 0x00 || parent_private || be32(i | 0x80000000)
//! normal:   data = parent_public_compressed || be32(i)
//!
//! (I_L, I_R)  = HMAC-SHA512(parent_chain_code, data)
//! child       = (I_L + parent_private) mod n      (or I_L*G + parent_public)
//! chain_code  = I_R
//! ```
//!
//! If `I_L >= n` or the child key is zero, derivation fails with
//! [`Error::ChildKeyDerivationFailed`]; BIP-32 callers then move on to
//! `i + 1`. The probability is below `2^-127`.
//!
//! Normal children can also be derived from a public-only key (see
//! [`ExtendedKey::neuter`]); hardened children cannot.
//!
//! # Paths
//!
//! Paths look like `m/44'/60'/0'/0/7`. `'`, `h` and `H` mark a hardened
//! component. Components must be decimal and below `2^31`.
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::hd::derive_address;
//! use evm_wallet_core::mnemonic::mnemonic_to_seed;
//!
//! let seed = mnemonic_to_seed(
//!     "test test test test test test test test test test test junk",
//!     "",
//! )
//! .unwrap();
//! let address = derive_address(&*seed, "m/44'/60'/0'/0/0").unwrap();
//! assert_eq!(address.to_string(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
//! ```

use core::fmt;
use core::ops::Range;
use core::str::FromStr;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::address::Address;
use crate::crypto::{PrivateKey, PublicKey};
use crate::error::{Error, Result};
use crate::hash::{hash160, hmac_sha512};

/// HMAC key for the master node.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Mainnet `xprv` version bytes.
const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];

/// Mainnet `xpub` version bytes.
const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

// =============================================================================
// Child indices and paths
// =============================================================================

/// A BIP-32 child index: a number below `2^31` plus a hardened flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex(u32);

impl ChildIndex {
    /// Bit set on hardened indices in their serialized form.
    pub const HARDENED_BIT: u32 = 0x8000_0000;

    /// Creates a normal (non-hardened) index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if `index >= 2^31`.
    pub fn normal(index: u32) -> Result<Self> {
        Self::check(index)?;
        Ok(Self(index))
    }

    /// Creates a hardened index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if `index >= 2^31`.
    pub fn hardened(index: u32) -> Result<Self> {
        Self::check(index)?;
        Ok(Self(index | Self::HARDENED_BIT))
    }

    /// Rebuilds an index from its serialized 32-bit form.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the serialized 32-bit form (hardened bit included).
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Returns the index without the hardened bit.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 & !Self::HARDENED_BIT
    }

    /// Checks whether this index is hardened.
    #[must_use]
    pub const fn is_hardened(self) -> bool {
        self.0 & Self::HARDENED_BIT != 0
    }

    fn check(index: u32) -> Result<()> {
        if index & Self::HARDENED_BIT != 0 {
            return Err(Error::InvalidDerivationPath(format!(
                "index {index} is not below 2^31"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => (digits, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidDerivationPath(format!(
                "invalid path component {s:?}"
            )));
        }
        let index: u32 = digits.parse().map_err(|_| {
            Error::InvalidDerivationPath(format!("path component {s:?} out of range"))
        })?;
        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

/// A parsed derivation path such as `m/44'/60'/0'/0/0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// BIP-44 purpose and Ethereum coin type, `m/44'/60'`.
    pub const ETHEREUM_PREFIX: &'static str = "m/44'/60'";

    /// BIP-44 purpose field.
    pub const PURPOSE: u32 = 44;

    /// SLIP-44 coin type for Ether.
    pub const ETHEREUM_COIN_TYPE: u32 = 60;

    /// Returns the standard Ethereum path `m/44'/60'/account'/0/index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if either number is `>= 2^31`.
    pub fn ethereum(account: u32, index: u32) -> Result<Self> {
        Ok(Self::ethereum_account(account)?.child(ChildIndex::normal(index)?))
    }

    /// Returns the external chain of an Ethereum account, `m/44'/60'/account'/0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if `account >= 2^31`.
    pub fn ethereum_account(account: u32) -> Result<Self> {
        Ok(Self(vec![
            ChildIndex::hardened(Self::PURPOSE)?,
            ChildIndex::hardened(Self::ETHEREUM_COIN_TYPE)?,
            ChildIndex::hardened(account)?,
            ChildIndex::normal(0)?,
        ]))
    }

    /// Returns this path extended by one component.
    #[must_use]
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut components = self.0.clone();
        components.push(index);
        Self(components)
    }

    /// Returns the path components.
    #[must_use]
    pub fn components(&self) -> &[ChildIndex] {
        &self.0
    }

    /// Returns the number of components (the depth of the derived key).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether this is the master path `m`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('/');
        if parts.next() != Some("m") {
            return Err(Error::InvalidDerivationPath(format!(
                "path must start with \"m\": {s:?}"
            )));
        }
        parts.map(ChildIndex::from_str).collect::<Result<_>>().map(Self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Extended keys
// =============================================================================

/// A node of the BIP-32 key tree.
///
/// Holds a private key unless it was [neutered](Self::neuter).
#[derive(Clone)]
pub struct ExtendedKey {
    private_key: Option<PrivateKey>,
    public_key: PublicKey,
    chain_code: Zeroizing<[u8; 32]>,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: ChildIndex,
}

impl ExtendedKey {
    /// Derives the master node from a seed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] if `I_L` is zero or `>= n`; such
    /// a seed cannot be used.
    pub fn master(seed: &[u8]) -> Result<Self> {
        let i = hmac_sha512(MASTER_HMAC_KEY, &[seed]);
        let private_key = PrivateKey::from_slice(&i[..32])?;
        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&i[32..]);

        Ok(Self {
            public_key: private_key.public_key(),
            private_key: Some(private_key),
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: ChildIndex::from_bits(0),
        })
    }

    /// Derives the child at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChildKeyDerivationFailed`] if `I_L >= n`, the child
    /// key is zero or the point at infinity, or a hardened child is requested
    /// from a public-only key. Returns [`Error::InvalidDerivationPath`] if the
    /// tree is deeper than 255 levels.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| Error::InvalidDerivationPath("depth exceeds 255".to_string()))?;
        let index_bytes = index.to_bits().to_be_bytes();
        let failed = || Error::ChildKeyDerivationFailed(index.index());

        let i = match (&self.private_key, index.is_hardened()) {
            (Some(private_key), true) => hmac_sha512(
                self.chain_code.as_slice(),
                &[&[0u8], private_key.as_bytes(), &index_bytes],
            ),
            (_, false) => hmac_sha512(
                self.chain_code.as_slice(),
                &[&self.public_key.to_compressed(), &index_bytes],
            ),
            (None, true) => return Err(failed()),
        };

        let mut il = FieldBytes::default();
        il.copy_from_slice(&i[..32]);
        let tweak: Scalar = Option::from(Scalar::from_repr(il)).ok_or_else(failed)?;

        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&i[32..]);

        let (private_key, public_key) = match &self.private_key {
            Some(parent) => {
                let parent_scalar: Scalar =
                    Option::from(Scalar::from_repr(FieldBytes::from(*parent.as_bytes())))
                        .ok_or(Error::InvalidPrivateKey)?;
                let child = Zeroizing::new(tweak + parent_scalar);
                let mut child_bytes = Zeroizing::new([0u8; 32]);
                child_bytes.copy_from_slice(&child.to_repr());
                let child_key = PrivateKey::from_bytes(&child_bytes).map_err(|_| failed())?;
                let public_key = child_key.public_key();
                (Some(child_key), public_key)
            }
            None => {
                let parent_point = ProjectivePoint::from(*self.public_key.verifying_key().as_affine());
                let child_point = ProjectivePoint::GENERATOR * tweak + parent_point;
                let verifying_key =
                    VerifyingKey::from_affine(AffinePoint::from(child_point)).map_err(|_| failed())?;
                (None, PublicKey::from_verifying_key(verifying_key))
            }
        };

        trace!(depth, hardened = index.is_hardened(), "derived child key");

        Ok(Self {
            private_key,
            public_key,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_index: index,
        })
    }

    /// Derives every component of `path` in turn, starting from this node.
    ///
    /// # Errors
    ///
    /// Propagates the first error of [`Self::derive_child`].
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let key = path
            .components()
            .iter()
            .try_fold(self.clone(), |key, &index| key.derive_child(index))?;
        debug!(depth = key.depth, "derived path");
        Ok(key)
    }

    /// Returns a copy without the private key.
    #[must_use]
    pub fn neuter(&self) -> Self {
        Self {
            private_key: None,
            ..self.clone()
        }
    }

    /// Returns the private key, if present.
    #[must_use]
    pub const fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_ref()
    }

    /// Returns the public key.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the chain code.
    #[must_use]
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Returns the depth in the tree (0 for the master node).
    #[must_use]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Returns the fingerprint of the parent node (zero for the master node).
    #[must_use]
    pub const fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Returns the index this node was derived at.
    #[must_use]
    pub const fn child_index(&self) -> ChildIndex {
        self.child_index
    }

    /// Returns this node's fingerprint, `HASH160(public_key)[..4]`.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 4] {
        let hash = hash160(self.public_key.to_compressed());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Returns the Ethereum address of this node's key.
    #[must_use]
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key)
    }

    /// Serializes as a Base58Check `xprv` string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] if this is a public-only key.
    pub fn to_xprv(&self) -> Result<Zeroizing<String>> {
        let private_key = self.private_key.as_ref().ok_or(Error::InvalidPrivateKey)?;
        let mut key_data = Zeroizing::new([0u8; 33]);
        key_data[1..].copy_from_slice(private_key.as_bytes());
        Ok(Zeroizing::new(self.serialize(XPRV_VERSION, &key_data)))
    }

    /// Serializes as a Base58Check `xpub` string.
    #[must_use]
    pub fn to_xpub(&self) -> String {
        self.serialize(XPUB_VERSION, &self.public_key.to_compressed())
    }

    fn serialize(&self, version: [u8; 4], key_data: &[u8; 33]) -> String {
        let mut data = Zeroizing::new(Vec::with_capacity(78));
        data.extend_from_slice(&version);
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_index.to_bits().to_be_bytes());
        data.extend_from_slice(self.chain_code.as_slice());
        data.extend_from_slice(key_data);
        bs58::encode(data.as_slice()).with_check().into_string()
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("has_private_key", &self.private_key.is_some())
            .field("public_key", &hex::encode(self.public_key.to_compressed()))
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Seed-level helpers
// =============================================================================

/// Derives the master node from a seed. See [`ExtendedKey::master`].
///
/// # Errors
///
/// Returns [`Error::InvalidPrivateKey`] for an unusable seed.
pub fn master_key(seed: &[u8]) -> Result<ExtendedKey> {
    ExtendedKey::master(seed)
}

/// Derives one child of `parent`. See [`ExtendedKey::derive_child`].
///
/// # Errors
///
/// Returns [`Error::ChildKeyDerivationFailed`] when the index yields no valid
/// key; retry with the next index.
pub fn derive_child(parent: &ExtendedKey, index: ChildIndex) -> Result<ExtendedKey> {
    parent.derive_child(index)
}

/// Derives the private key at `path` from a seed.
///
/// # Errors
///
/// Returns [`Error::InvalidDerivationPath`] for a malformed path and
/// propagates derivation errors.
pub fn derive_private_key(seed: &[u8], path: &str) -> Result<PrivateKey> {
    let path: DerivationPath = path.parse()?;
    let key = ExtendedKey::master(seed)?.derive_path(&path)?;
    key.private_key.ok_or(Error::InvalidPrivateKey)
}

/// Derives the EIP-55 address at `path` from a seed.
///
/// # Errors
///
/// Same as [`derive_private_key`].
pub fn derive_address(seed: &[u8], path: &str) -> Result<Address> {
    let path: DerivationPath = path.parse()?;
    Ok(ExtendedKey::master(seed)?.derive_path(&path)?.address())
}

/// Derives the addresses `m/44'/60'/account'/0/i` for every `i` in `indices`.
///
/// The account node is derived once; each address then costs one normal
/// child derivation.
///
/// # Errors
///
/// Returns [`Error::InvalidDerivationPath`] if `account` or an index is
/// `>= 2^31`, and propagates derivation errors.
pub fn derive_addresses(seed: &[u8], account: u32, indices: Range<u32>) -> Result<Vec<Address>> {
    let account_node =
        ExtendedKey::master(seed)?.derive_path(&DerivationPath::ethereum_account(account)?)?;
    debug!(account, count = indices.len(), "deriving address batch");
    indices
        .map(|i| Ok(account_node.derive_child(ChildIndex::normal(i)?)?.address()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::mnemonic_to_seed;

    const TEST_JUNK: &str = "test test test test test test test test test test test junk";

    fn junk_seed() -> Zeroizing<[u8; 64]> {
        mnemonic_to_seed(TEST_JUNK, "").unwrap()
    }

    fn bip32_vector1_master() -> ExtendedKey {
        ExtendedKey::master(&hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()).unwrap()
    }

    #[test]
    fn hardhat_account_zero() {
        let seed = junk_seed();
        let key = derive_private_key(&*seed, "m/44'/60'/0'/0/0").unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
        );
        assert_eq!(
            derive_address(&*seed, "m/44'/60'/0'/0/0").unwrap().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn hardhat_accounts_one_and_two() {
        let seed = junk_seed();
        assert_eq!(
            derive_address(&*seed, "m/44'/60'/0'/0/1").unwrap().to_string(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
        assert_eq!(
            derive_address(&*seed, "m/44'/60'/0'/0/2").unwrap().to_string(),
            "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"
        );
    }

    #[test]
    fn batch_matches_single_derivation() {
        let seed = junk_seed();
        let batch = derive_addresses(&*seed, 0, 0..3).unwrap();
        assert_eq!(batch.len(), 3);
        for (i, address) in batch.iter().enumerate() {
            let path = format!("m/44'/60'/0'/0/{i}");
            assert_eq!(*address, derive_address(&*seed, &path).unwrap());
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let master = bip32_vector1_master();
        let index = ChildIndex::hardened(7).unwrap();
        let a = master.derive_child(index).unwrap();
        let b = derive_child(&master, index).unwrap();
        assert_eq!(a.to_xpub(), b.to_xpub());
        assert_eq!(a.chain_code(), b.chain_code());
    }

    #[test]
    fn bip32_vector1_master_serialization() {
        let master = bip32_vector1_master();
        assert_eq!(
            master.to_xprv().unwrap().as_str(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            master.to_xpub(),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );
    }

    #[test]
    fn bip32_vector1_hardened_child() {
        let child = bip32_vector1_master()
            .derive_path(&"m/0H".parse().unwrap())
            .unwrap();
        assert_eq!(
            child.to_xprv().unwrap().as_str(),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );
        assert_eq!(
            child.to_xpub(),
            "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw"
        );
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent_fingerprint(), bip32_vector1_master().fingerprint());
    }

    #[test]
    fn bip32_vector1_normal_child_from_public_parent() {
        let hardened = bip32_vector1_master()
            .derive_path(&"m/0'".parse().unwrap())
            .unwrap();
        let expected = "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ";

        let private_path = hardened.derive_child(ChildIndex::normal(1).unwrap()).unwrap();
        assert_eq!(private_path.to_xpub(), expected);

        let public_path = hardened
            .neuter()
            .derive_child(ChildIndex::normal(1).unwrap())
            .unwrap();
        assert_eq!(public_path.to_xpub(), expected);
        assert!(public_path.private_key().is_none());
    }

    #[test]
    fn hardened_child_of_public_key_fails() {
        let public = bip32_vector1_master().neuter();
        assert!(matches!(
            public.derive_child(ChildIndex::hardened(0).unwrap()),
            Err(Error::ChildKeyDerivationFailed(0))
        ));
        assert!(matches!(public.to_xprv(), Err(Error::InvalidPrivateKey)));
    }

    #[test]
    fn path_parsing() {
        let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
        assert_eq!(path, DerivationPath::ethereum(0, 0).unwrap());
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/0");
        assert_eq!(path.len(), 5);

        let alt: DerivationPath = "m/44h/60H/0'/0/0".parse().unwrap();
        assert_eq!(alt, path);

        let master: DerivationPath = "m".parse().unwrap();
        assert!(master.is_empty());
    }

    #[test]
    fn malformed_paths_rejected() {
        for bad in [
            "",
            "44'/60'/0'/0/0",
            "m/",
            "m//0",
            "m/abc",
            "m/-1",
            "m/1''",
            "m/0x10",
            "m/2147483648",
            "m/2147483648'",
            "m/99999999999",
            "n/0",
        ] {
            assert!(
                matches!(
                    bad.parse::<DerivationPath>(),
                    Err(Error::InvalidDerivationPath(_))
                ),
                "{bad:?} should be rejected"
            );
        }
        assert!(matches!(
            derive_address(&[0u8; 64], "m/44'/x"),
            Err(Error::InvalidDerivationPath(_))
        ));
    }

    #[test]
    fn child_index_bounds() {
        let max = ChildIndex::hardened((1 << 31) - 1).unwrap();
        assert_eq!(max.to_bits(), u32::MAX);
        assert_eq!(max.index(), (1 << 31) - 1);
        assert!(ChildIndex::normal(1 << 31).is_err());
        assert_eq!(ChildIndex::from_bits(0x8000_002c).to_string(), "44'");
    }

    #[test]
    fn debug_hides_private_key() {
        let key = derive_private_key(&*junk_seed(), "m/44'/60'/0'/0/0").unwrap();
        let node = ExtendedKey::master(&*junk_seed()).unwrap();
        let debug = format!("{node:?} {key:?}");
        assert!(!debug.contains("ac0974"));
        assert!(debug.contains("has_private_key: true"));
    }
}
