//! Strong-name public key tokens for assembly references.
//!
//! An assembly reference identifies a strong-named assembly through an 8-byte public key
//! token: the last 8 bytes of the hash of the full public key, stored in reverse order.
//! The all-zero token is used as the "no strong name" sentinel throughout this crate.
//!
//! # Example
//! ```rust
//! use dotref::metadata::identity::{HashAlgorithm, PublicKeyToken};
//!
//! let token: PublicKeyToken = "b77a5c561934e089".parse()?;
//! assert!(!token.is_none());
//! assert_eq!(token.to_string(), "b77a5c561934e089");
//!
//! let derived = PublicKeyToken::from_public_key(&[1, 2, 3, 4], HashAlgorithm::Sha1);
//! assert!(!derived.is_none());
//! # Ok::<(), dotref::Error>(())
//! ```

use std::{fmt, str::FromStr};

use md5::{Digest, Md5};
use sha1::Sha1;

use crate::{Error, Result};

/// Size in bytes of a public key token
pub const PUBLIC_KEY_TOKEN_SIZE: usize = 8;

/// Hash algorithms an assembly can use to derive its public key token (`CALG_MD5` and
/// `CALG_SHA1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// MD5
    Md5,
    /// SHA1, the default for strong names
    #[default]
    Sha1,
}

/// Fixed-size public key token of a referenced assembly.
///
/// [`PublicKeyToken::NONE`] (all zeroes) means the referenced assembly carries no
/// strong name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PublicKeyToken(pub [u8; PUBLIC_KEY_TOKEN_SIZE]);

impl PublicKeyToken {
    /// The "no strong-name key" sentinel
    pub const NONE: PublicKeyToken = PublicKeyToken([0; PUBLIC_KEY_TOKEN_SIZE]);

    /// Wraps raw token bytes, in metadata order
    #[must_use]
    pub fn new(bytes: [u8; PUBLIC_KEY_TOKEN_SIZE]) -> Self {
        PublicKeyToken(bytes)
    }

    /// Derives the token from a full public key blob.
    ///
    /// The token is the last 8 bytes of the hash of the key, reversed.
    ///
    /// # Arguments
    /// * `public_key` - The full public key blob of the referenced assembly
    /// * `algo`       - The hash algorithm the referenced assembly uses
    #[must_use]
    pub fn from_public_key(public_key: &[u8], algo: HashAlgorithm) -> Self {
        let digest: Vec<u8> = match algo {
            HashAlgorithm::Md5 => {
                let mut hasher = Md5::new();
                hasher.update(public_key);
                hasher.finalize().to_vec()
            }
            HashAlgorithm::Sha1 => {
                let mut hasher = Sha1::new();
                hasher.update(public_key);
                hasher.finalize().to_vec()
            }
        };

        let mut bytes = [0u8; PUBLIC_KEY_TOKEN_SIZE];
        for (dst, src) in bytes
            .iter_mut()
            .zip(digest[digest.len() - PUBLIC_KEY_TOKEN_SIZE..].iter().rev())
        {
            *dst = *src;
        }

        PublicKeyToken(bytes)
    }

    /// Raw token bytes, in metadata order
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_TOKEN_SIZE] {
        &self.0
    }

    /// Returns true for the all-zero sentinel
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for PublicKeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyToken({})", self)
    }
}

impl fmt::Display for PublicKeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for PublicKeyToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("null") {
            return Ok(PublicKeyToken::NONE);
        }

        let bytes = decode_hex(s)?;
        let bytes: [u8; PUBLIC_KEY_TOKEN_SIZE] = bytes.try_into().map_err(|_| {
            malformed_error!(
                "Public key token must be {} hex digits - '{}'",
                PUBLIC_KEY_TOKEN_SIZE * 2,
                s
            )
        })?;

        Ok(PublicKeyToken(bytes))
    }
}

/// Decodes a hex string as found in assembly display names
pub(crate) fn decode_hex(s: &str) -> Result<Vec<u8>> {
    if s.is_empty() || s.len() % 2 != 0 || !s.is_ascii() {
        return Err(malformed_error!("Invalid hex string - '{}'", s));
    }

    (0..s.len())
        .step_by(2)
        .map(|index| {
            u8::from_str_radix(&s[index..index + 2], 16)
                .map_err(|_| malformed_error!("Invalid hex digits - '{}'", s))
        })
        .collect()
}
