//! scrypt key derivation for keystores (RFC 7914).
//!
//! [`derive_scrypt`] hands the work to the `scrypt` crate whenever its
//! `Params` accept the parameters. That crate refuses `log2(N) >= 16 * r`,
//! which rules out keystores written with `r = 1` and `N >= 2^16` (the Web3
//! Secret Storage reference file among them). Those run through the ROMix
//! below instead. Both paths compute the same function. Cost limits are the
//! caller's job.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::trace;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};

/// Words in one Salsa20 block (64 bytes).
const SALSA_WORDS: usize = 16;

/// Runs scrypt with `N = 2^log_n`, writing `out.len()` bytes of key.
pub(crate) fn derive_scrypt(
    password: &[u8],
    salt: &[u8],
    log_n: u8,
    r: u32,
    p: u32,
    out: &mut [u8],
) -> Result<()> {
    match scrypt::Params::new(log_n, r, p, out.len()) {
        Ok(params) => scrypt::scrypt(password, salt, &params, out)
            .map_err(|e| Error::UnsupportedKeystoreVersion(format!("scrypt: {e}"))),
        Err(_) => {
            trace!(log_n, r, p, "scrypt parameters outside scrypt crate range, using ROMix");
            romix_scrypt(password, salt, log_n, r, p, out)
        }
    }
}

fn invalid_params(log_n: u8, r: u32, p: u32) -> Error {
    Error::UnsupportedKeystoreVersion(format!("scrypt params: log_n={log_n}, r={r}, p={p}"))
}

/// `PBKDF2(P, S, 1, p * 128r)`, ROMix over each `128r`-byte block, then
/// `PBKDF2(P, B, 1, dkLen)`.
fn romix_scrypt(
    password: &[u8],
    salt: &[u8],
    log_n: u8,
    r: u32,
    p: u32,
    out: &mut [u8],
) -> Result<()> {
    if log_n == 0 || r == 0 || p == 0 {
        return Err(invalid_params(log_n, r, p));
    }
    let n = 1usize
        .checked_shl(u32::from(log_n))
        .ok_or_else(|| invalid_params(log_n, r, p))?;
    let block_words = usize::try_from(r)
        .ok()
        .and_then(|r| r.checked_mul(2 * SALSA_WORDS))
        .ok_or_else(|| invalid_params(log_n, r, p))?;
    let block_len = block_words * 4;
    let b_len = usize::try_from(p)
        .ok()
        .and_then(|p| p.checked_mul(block_len))
        .ok_or_else(|| invalid_params(log_n, r, p))?;
    let v_words = block_words
        .checked_mul(n)
        .ok_or_else(|| invalid_params(log_n, r, p))?;

    let mut b = Zeroizing::new(vec![0u8; b_len]);
    pbkdf2_hmac::<Sha256>(password, salt, 1, &mut b);

    let mut x = Zeroizing::new(vec![0u32; block_words]);
    let mut y = Zeroizing::new(vec![0u32; block_words]);
    let mut v = Zeroizing::new(vec![0u32; v_words]);

    for chunk in b.chunks_exact_mut(block_len) {
        for (word, bytes) in x.iter_mut().zip(chunk.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        romix(&mut x, &mut y, &mut v, n);
        for (word, bytes) in x.iter().zip(chunk.chunks_exact_mut(4)) {
            bytes.copy_from_slice(&word.to_le_bytes());
        }
    }

    pbkdf2_hmac::<Sha256>(password, &b, 1, out);
    Ok(())
}

fn romix(x: &mut [u32], y: &mut [u32], v: &mut [u32], n: usize) {
    let len = x.len();
    for slot in v.chunks_exact_mut(len) {
        slot.copy_from_slice(x);
        block_mix(x, y);
        x.copy_from_slice(y);
    }
    for _ in 0..n {
        let j = integerify(x, n);
        for (xi, vi) in x.iter_mut().zip(&v[j * len..(j + 1) * len]) {
            *xi ^= vi;
        }
        block_mix(x, y);
        x.copy_from_slice(y);
    }
}

/// Low bits of the first word pair of the last 64-byte block, mod `n`.
fn integerify(x: &[u32], n: usize) -> usize {
    let tail = &x[x.len() - SALSA_WORDS..];
    let j = u64::from(tail[0]) | (u64::from(tail[1]) << 32);
    #[allow(clippy::cast_possible_truncation)]
    let j = j as usize;
    j & (n - 1)
}

/// BlockMix with Salsa20/8. Output blocks are even-indexed results followed
/// by odd-indexed ones.
fn block_mix(input: &[u32], output: &mut [u32]) {
    let half = input.len() / SALSA_WORDS / 2;
    let mut t = [0u32; SALSA_WORDS];
    t.copy_from_slice(&input[input.len() - SALSA_WORDS..]);

    for (i, block) in input.chunks_exact(SALSA_WORDS).enumerate() {
        for (ti, bi) in t.iter_mut().zip(block) {
            *ti ^= bi;
        }
        salsa20_8(&mut t);
        let dest = if i % 2 == 0 { i / 2 } else { half + i / 2 };
        output[dest * SALSA_WORDS..(dest + 1) * SALSA_WORDS].copy_from_slice(&t);
    }
    t.zeroize();
}

fn salsa20_8(b: &mut [u32; SALSA_WORDS]) {
    let mut x = *b;
    for _ in 0..4 {
        // columns
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 5, 9, 13, 1);
        quarter_round(&mut x, 10, 14, 2, 6);
        quarter_round(&mut x, 15, 3, 7, 11);
        // rows
        quarter_round(&mut x, 0, 1, 2, 3);
        quarter_round(&mut x, 5, 6, 7, 4);
        quarter_round(&mut x, 10, 11, 8, 9);
        quarter_round(&mut x, 15, 12, 13, 14);
    }
    for (bi, xi) in b.iter_mut().zip(x) {
        *bi = bi.wrapping_add(xi);
    }
    x.zeroize();
}

fn quarter_round(x: &mut [u32; SALSA_WORDS], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn romix_rfc7914_empty_password() {
        let mut out = [0u8; 64];
        romix_scrypt(b"", b"", 4, 1, 1, &mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442\
             fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906"
        );
    }

    #[test]
    fn romix_rfc7914_nacl() {
        let mut out = [0u8; 64];
        romix_scrypt(b"password", b"NaCl", 10, 8, 16, &mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162\
             2eaf30d92e22a3886ff109279d9830dac727afb94a83ee6d8360cbdfa2cc0640"
        );
    }

    #[test]
    fn romix_matches_scrypt_crate() {
        for (log_n, r, p) in [(10u8, 8u32, 1u32), (6, 2, 3), (4, 1, 1)] {
            let params = scrypt::Params::new(log_n, r, p, 32).unwrap();
            let mut expected = [0u8; 32];
            scrypt::scrypt(b"hunter2", b"salty", &params, &mut expected).unwrap();

            let mut actual = [0u8; 32];
            romix_scrypt(b"hunter2", b"salty", log_n, r, p, &mut actual).unwrap();
            assert_eq!(actual, expected, "log_n={log_n} r={r} p={p}");
        }
    }

    #[test]
    fn r1_outside_crate_range_still_derives() {
        assert!(scrypt::Params::new(16, 1, 1, 32).is_err());

        let mut out = [0u8; 32];
        derive_scrypt(b"pw", b"salt", 16, 1, 1, &mut out).unwrap();
        assert_ne!(out, [0u8; 32]);
    }

    #[test]
    fn degenerate_params_rejected() {
        let mut out = [0u8; 32];
        for (log_n, r, p) in [(0u8, 1u32, 1u32), (4, 0, 1), (4, 1, 0), (200, 1, 1)] {
            assert!(
                matches!(
                    romix_scrypt(b"pw", b"salt", log_n, r, p, &mut out),
                    Err(Error::UnsupportedKeystoreVersion(_))
                ),
                "log_n={log_n} r={r} p={p}"
            );
        }
    }
}
