//! Assembly descriptors and the assembly reference emission record.
//!
//! [`AssemblyReference`] is the logical description of an external assembly as the
//! upstream producer hands it to the resolver. [`AssemblyMetadata`] is the structured
//! record derived from it when an assembly reference is emitted into the store: locale
//! and public key sentinels are folded into explicit lengths there, so store
//! implementations never have to know about them.
//!
//! # Examples
//!
//! ```rust
//! use dotref::metadata::identity::{AssemblyMetadata, AssemblyReference, AssemblyVersion};
//!
//! let tracer = AssemblyReference::parse(
//!     "Elastic.Apm.Profiler.Managed, Version=1.0.0.0, Culture=neutral, PublicKeyToken=ae7400d2c189cf22",
//! )?;
//! assert_eq!(tracer.version, AssemblyVersion::new(1, 0, 0, 0));
//!
//! let record = AssemblyMetadata::from_reference(&tracer);
//! assert_eq!(record.locale, None);
//! assert_eq!(record.public_key_len, 8);
//! # Ok::<(), dotref::Error>(())
//! ```

use std::{fmt, str::FromStr};

use bitflags::bitflags;

use crate::{
    metadata::identity::publickey::{
        decode_hex, HashAlgorithm, PublicKeyToken, PUBLIC_KEY_TOKEN_SIZE,
    },
    Error, Result,
};

/// Locale value meaning "culture-neutral"
pub const NEUTRAL_LOCALE: &str = "neutral";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Flags carried by an `AssemblyRef` row
    pub struct AssemblyRefFlags: u32 {
        /// The implementation of this assembly used at runtime is not expected to match the version seen at compile time
        const RETARGETABLE = 0x0100;
    }
}

/// Four-part assembly version (`major.minor.build.revision`).
///
/// ```rust
/// use dotref::metadata::identity::AssemblyVersion;
///
/// let version = AssemblyVersion::new(1, 2, 3, 4);
/// assert_eq!(version.to_string(), "1.2.3.4");
///
/// let parsed = AssemblyVersion::parse("2.0.0.0")?;
/// assert!(parsed > version);
/// # Ok::<(), dotref::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyVersion {
    /// Major version component
    pub major: u16,
    /// Minor version component
    pub minor: u16,
    /// Build number component
    pub build: u16,
    /// Revision number component
    pub revision: u16,
}

impl AssemblyVersion {
    /// Creates a version from its four components
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        AssemblyVersion {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Parses a dotted version string.
    ///
    /// Between one and four components are accepted; missing components are zero.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for empty input, more than four components, or
    /// components that are not 16-bit unsigned integers.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(malformed_error!("Empty assembly version"));
        }

        let mut parts = [0u16; 4];
        let mut count = 0;
        for component in value.split('.') {
            if count == 4 {
                return Err(malformed_error!(
                    "Assembly version has more than four components - '{}'",
                    value
                ));
            }

            parts[count] = component.parse::<u16>().map_err(|_| {
                malformed_error!("Invalid assembly version component - '{}'", value)
            })?;
            count += 1;
        }

        Ok(AssemblyVersion::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AssemblyVersion::parse(s)
    }
}

/// Logical description of a referenced assembly.
///
/// Compared by value. The locale uses [`NEUTRAL_LOCALE`] and the public key uses
/// [`PublicKeyToken::NONE`] as their "absent" sentinels, matching how the upstream
/// producer describes references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyReference {
    /// Simple assembly name (e.g. "mscorlib", "Elastic.Apm.Profiler.Managed")
    pub name: String,
    /// Four-part version of the referenced assembly
    pub version: AssemblyVersion,
    /// Culture of the referenced assembly, [`NEUTRAL_LOCALE`] when culture-neutral
    pub locale: String,
    /// Public key token, [`PublicKeyToken::NONE`] when not strong-named
    pub public_key: PublicKeyToken,
    /// The runtime may bind the reference to a different assembly (portable libraries)
    pub retargetable: bool,
}

impl AssemblyReference {
    /// Creates a culture-neutral reference without a strong name
    pub fn new(name: impl Into<String>, version: AssemblyVersion) -> Self {
        AssemblyReference {
            name: name.into(),
            version,
            locale: NEUTRAL_LOCALE.to_string(),
            public_key: PublicKeyToken::NONE,
            retargetable: false,
        }
    }

    /// Replaces the locale
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Replaces the public key token
    #[must_use]
    pub fn with_public_key(mut self, public_key: PublicKeyToken) -> Self {
        self.public_key = public_key;
        self
    }

    /// Sets the public key token derived from the full public key of the assembly
    #[must_use]
    pub fn with_public_key_blob(mut self, public_key: &[u8], algorithm: HashAlgorithm) -> Self {
        self.public_key = PublicKeyToken::from_public_key(public_key, algorithm);
        self
    }

    /// Marks the reference as retargetable
    #[must_use]
    pub fn with_retargetable(mut self, retargetable: bool) -> Self {
        self.retargetable = retargetable;
        self
    }

    /// Returns true if the reference names a culture-neutral assembly
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.locale == NEUTRAL_LOCALE
    }

    /// Parses an assembly display name.
    ///
    /// Accepts `Name[, Version=a.b.c.d][, Culture=xx][, PublicKeyToken=hex|null]
    /// [, PublicKey=hex][, Retargetable=Yes|No]`. A full `PublicKey` is reduced to its
    /// SHA1 token. Missing components fall back to version 0.0.0.0, the neutral locale
    /// and no strong name. Unknown components (e.g. `ProcessorArchitecture`) are ignored.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for an empty name, a component without `=`, or an
    /// unparsable version or key token.
    pub fn parse(display_name: &str) -> Result<Self> {
        let mut parts = display_name.split(',');

        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(malformed_error!(
                "Assembly display name has no simple name - '{}'",
                display_name
            ));
        }

        let mut reference = AssemblyReference::new(name, AssemblyVersion::default());
        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                return Err(malformed_error!(
                    "Assembly display name component without value - '{}'",
                    part.trim()
                ));
            };

            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "version" => reference.version = AssemblyVersion::parse(value)?,
                "culture" => reference.locale = value.to_string(),
                "publickeytoken" => reference.public_key = value.parse()?,
                "publickey" if !value.eq_ignore_ascii_case("null") => {
                    let blob = decode_hex(value)?;
                    reference = reference.with_public_key_blob(&blob, HashAlgorithm::Sha1);
                }
                "retargetable" => reference.retargetable = value.eq_ignore_ascii_case("yes"),
                _ => {}
            }
        }

        Ok(reference)
    }

    /// Formats the reference as a display name
    #[must_use]
    pub fn display_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AssemblyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Version={}, Culture={}, PublicKeyToken=",
            self.name, self.version, self.locale
        )?;

        if self.public_key.is_none() {
            write!(f, "null")?;
        } else {
            write!(f, "{}", self.public_key)?;
        }

        if self.retargetable {
            write!(f, ", Retargetable=Yes")?;
        }
        Ok(())
    }
}

impl FromStr for AssemblyReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AssemblyReference::parse(s)
    }
}

/// The structured record handed to the store when an assembly reference is emitted.
///
/// Locale: a neutral reference carries `locale: None` and `locale_len: 0`; any other
/// locale carries the string and its byte length.
///
/// Public key: the 8-byte buffer is always passed, but `public_key_len` is zero for the
/// all-zero sentinel so the store records an unsigned reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyMetadata {
    /// Version of the referenced assembly
    pub version: AssemblyVersion,
    /// Culture string, `None` for culture-neutral references
    pub locale: Option<String>,
    /// Byte length of `locale`, zero when absent
    pub locale_len: usize,
    /// Public key token buffer, always present
    pub public_key: [u8; PUBLIC_KEY_TOKEN_SIZE],
    /// Number of meaningful bytes in `public_key`, zero for unsigned references
    pub public_key_len: usize,
    /// Row flags for the `AssemblyRef` entry
    pub flags: AssemblyRefFlags,
}

impl AssemblyMetadata {
    /// Builds the emission record for a descriptor
    #[must_use]
    pub fn from_reference(reference: &AssemblyReference) -> Self {
        let locale = if reference.is_neutral() {
            None
        } else {
            Some(reference.locale.clone())
        };
        let locale_len = locale.as_ref().map_or(0, String::len);

        let public_key_len = if reference.public_key.is_none() {
            0
        } else {
            PUBLIC_KEY_TOKEN_SIZE
        };

        AssemblyMetadata {
            version: reference.version,
            locale,
            locale_len,
            public_key: *reference.public_key.as_bytes(),
            public_key_len,
            // A token is emitted, never a full key, so PublicKey (0x0001) stays clear
            flags: if reference.retargetable {
                AssemblyRefFlags::RETARGETABLE
            } else {
                AssemblyRefFlags::empty()
            },
        }
    }

    /// The meaningful part of the public key buffer
    #[must_use]
    pub fn public_key_bytes(&self) -> &[u8] {
        &self.public_key[..self.public_key_len]
    }
}
