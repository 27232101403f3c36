//! Resource limits applied before running a keystore KDF.
//!
//! Keystore files carry their own scrypt/PBKDF2 parameters, so a hostile file
//! can ask for gigabytes of memory or billions of iterations. [`KdfLimits`]
//! bounds that cost. The defaults accept every keystore produced by common
//! wallets (geth's "standard" scrypt profile is `N = 2^18, r = 8, p = 1`).
//!
//! # Example
//!
//! ```
//! use evm_wallet_core::config::KdfLimits;
//!
//! let limits: KdfLimits = serde_json::from_str(r#"{"max_scrypt_cost": 1024}"#).unwrap();
//! assert_eq!(limits.max_scrypt_cost, 1024);
//! assert_eq!(limits.max_pbkdf2_iterations, KdfLimits::default().max_pbkdf2_iterations);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bounds on keystore KDF cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfLimits {
    /// Maximum allowed `N * r * p` for scrypt.
    pub max_scrypt_cost: u64,

    /// Maximum allowed PBKDF2 iteration count.
    pub max_pbkdf2_iterations: u32,
}

impl KdfLimits {
    /// Default bound on scrypt `N * r * p` (`2^21`).
    pub const DEFAULT_MAX_SCRYPT_COST: u64 = 1 << 21;

    /// Default bound on PBKDF2 iterations (`2^22`).
    pub const DEFAULT_MAX_PBKDF2_ITERATIONS: u32 = 1 << 22;

    /// Limits that accept any parameters. Only for trusted input.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_scrypt_cost: u64::MAX,
            max_pbkdf2_iterations: u32::MAX,
        }
    }

    /// Checks scrypt parameters against [`Self::max_scrypt_cost`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KdfCostExceeded`] if `n * r * p` overflows or exceeds
    /// the limit.
    pub fn check_scrypt(&self, n: u64, r: u32, p: u32) -> Result<()> {
        let cost = n
            .checked_mul(u64::from(r))
            .and_then(|c| c.checked_mul(u64::from(p)))
            .unwrap_or(u64::MAX);
        if cost > self.max_scrypt_cost {
            return Err(Error::KdfCostExceeded {
                cost,
                limit: self.max_scrypt_cost,
            });
        }
        Ok(())
    }

    /// Checks a PBKDF2 iteration count against [`Self::max_pbkdf2_iterations`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KdfCostExceeded`] if the count exceeds the limit.
    pub fn check_pbkdf2(&self, iterations: u32) -> Result<()> {
        if iterations > self.max_pbkdf2_iterations {
            return Err(Error::KdfCostExceeded {
                cost: u64::from(iterations),
                limit: u64::from(self.max_pbkdf2_iterations),
            });
        }
        Ok(())
    }
}

impl Default for KdfLimits {
    fn default() -> Self {
        Self {
            max_scrypt_cost: Self::DEFAULT_MAX_SCRYPT_COST,
            max_pbkdf2_iterations: Self::DEFAULT_MAX_PBKDF2_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_standard_profiles() {
        let limits = KdfLimits::default();
        // geth standard: N=2^18, r=8, p=1
        assert!(limits.check_scrypt(1 << 18, 8, 1).is_ok());
        // Web3 Secret Storage reference vector: N=2^18, r=1, p=8
        assert!(limits.check_scrypt(1 << 18, 1, 8).is_ok());
        assert!(limits.check_pbkdf2(262_144).is_ok());
    }

    #[test]
    fn oversized_scrypt_rejected() {
        let limits = KdfLimits::default();
        let err = limits.check_scrypt(1 << 20, 8, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::KdfCostExceeded {
                cost: 8_388_608,
                limit: 2_097_152
            }
        ));
    }

    #[test]
    fn overflowing_cost_rejected() {
        let limits = KdfLimits::default();
        assert!(limits.check_scrypt(u64::MAX, 2, 2).is_err());
    }

    #[test]
    fn unbounded_accepts_everything() {
        let limits = KdfLimits::unbounded();
        assert!(limits.check_scrypt(1 << 40, 16, 16).is_ok());
        assert!(limits.check_pbkdf2(u32::MAX).is_ok());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let limits: KdfLimits = serde_json::from_str(r#"{"max_pbkdf2_iterations": 10}"#).unwrap();
        assert_eq!(limits.max_scrypt_cost, KdfLimits::DEFAULT_MAX_SCRYPT_COST);
        assert!(limits.check_pbkdf2(11).is_err());
    }
}
