//! Assembly identity for reference emission.
//!
//! This module describes *which* assembly a reference points to, and how that
//! description is turned into the record the metadata store receives.
//!
//! # Key Components
//!
//! - [`AssemblyReference`] - Name, version, locale and public key token of a referenced assembly
//! - [`AssemblyVersion`] - Four-part version numbering (major.minor.build.revision)
//! - [`PublicKeyToken`] - 8-byte strong-name token, all-zero when absent
//! - [`AssemblyMetadata`] - Emission record with locale and key sentinels resolved to lengths
//!
//! # Sentinels
//!
//! Upstream producers never use `Option` for the locale or the public key. A
//! culture-neutral assembly uses the locale `"neutral"`, and an assembly without a
//! strong name uses the all-zero token. [`AssemblyMetadata::from_reference`] is the
//! single place that interprets both.

pub use assembly::{
    AssemblyMetadata, AssemblyRefFlags, AssemblyReference, AssemblyVersion, NEUTRAL_LOCALE,
};
pub use publickey::{HashAlgorithm, PublicKeyToken, PUBLIC_KEY_TOKEN_SIZE};

mod assembly;
mod publickey;
