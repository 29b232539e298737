//! Logical descriptors for type and method references, and the cache keys derived from them.
//!
//! Descriptors are immutable values built by the upstream producer (the component that
//! decides which hooks to inject). Each one exposes a deterministic cache key. Keys are
//! structured owned values rather than hashes, so two different logical entities can
//! never share a key within a module's lifetime.
//!
//! # Example
//!
//! ```rust
//! use dotref::metadata::{
//!     identity::{AssemblyReference, AssemblyVersion},
//!     references::{MethodReference, MethodSignature, TypeReference},
//! };
//!
//! let helper = TypeReference::new(
//!     AssemblyReference::new("MyApp", AssemblyVersion::new(1, 0, 0, 0)),
//!     "MyApp.Helper",
//! );
//! // static void Log()
//! let log = MethodReference::new(helper.clone(), "Log", MethodSignature::new(vec![0x00, 0x00, 0x01]));
//!
//! assert_eq!(log.method_cache_key().type_key(), &helper.type_cache_key());
//! ```

use std::fmt;

use crate::metadata::identity::AssemblyReference;

/// Pre-serialized method signature blob.
///
/// Carries the calling convention, parameter count, return type and parameter types
/// exactly as the store expects them. The resolver never interprets the bytes; they are
/// only compared, as a whole, by the store and by cache keys.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct MethodSignature(Vec<u8>);

impl MethodSignature {
    /// Wraps an already encoded signature blob
    #[must_use]
    pub fn new(blob: Vec<u8>) -> Self {
        MethodSignature(blob)
    }

    /// The raw signature bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the blob in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for an empty blob
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for MethodSignature {
    fn from(blob: Vec<u8>) -> Self {
        MethodSignature(blob)
    }
}

impl From<&[u8]> for MethodSignature {
    fn from(blob: &[u8]) -> Self {
        MethodSignature(blob.to_vec())
    }
}

impl AsRef<[u8]> for MethodSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodSignature({})", self)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// A type, identified by its owning assembly and its full name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeReference {
    /// The assembly defining the type
    pub assembly: AssemblyReference,
    /// Namespace-qualified type name (e.g. "System.Exception")
    pub type_name: String,
}

impl TypeReference {
    /// Creates a type descriptor
    pub fn new(assembly: AssemblyReference, type_name: impl Into<String>) -> Self {
        TypeReference {
            assembly,
            type_name: type_name.into(),
        }
    }

    /// Derives the cache key for this type
    #[must_use]
    pub fn type_cache_key(&self) -> TypeCacheKey {
        TypeCacheKey {
            assembly: self.assembly.clone(),
            type_name: self.type_name.clone(),
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}", self.assembly.name, self.type_name)
    }
}

/// A method on a referenced type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodReference {
    /// The type declaring the method
    pub type_reference: TypeReference,
    /// Simple method name (e.g. "OnMethodBegin")
    pub method_name: String,
    /// Encoded signature used to select the overload
    pub method_signature: MethodSignature,
}

impl MethodReference {
    /// Creates a method descriptor
    pub fn new(
        type_reference: TypeReference,
        method_name: impl Into<String>,
        method_signature: impl Into<MethodSignature>,
    ) -> Self {
        MethodReference {
            type_reference,
            method_name: method_name.into(),
            method_signature: method_signature.into(),
        }
    }

    /// Derives the cache key for this method
    #[must_use]
    pub fn method_cache_key(&self) -> MethodCacheKey {
        MethodCacheKey {
            type_key: self.type_reference.type_cache_key(),
            method_name: self.method_name.clone(),
            signature: self.method_signature.clone(),
        }
    }
}

impl fmt::Display for MethodReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_reference, self.method_name)
    }
}

/// The entry and exit hooks injected around one instrumented method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodAdvice {
    /// Hook called before the original method body runs
    pub on_enter: MethodReference,
    /// Hook called after the original method body returns or throws
    pub on_exit: MethodReference,
}

impl MethodAdvice {
    /// Pairs an entry hook with an exit hook
    #[must_use]
    pub fn new(on_enter: MethodReference, on_exit: MethodReference) -> Self {
        MethodAdvice { on_enter, on_exit }
    }
}

/// Memoization key of a type reference: full assembly identity plus type name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeCacheKey {
    assembly: AssemblyReference,
    type_name: String,
}

impl TypeCacheKey {
    /// The assembly component of the key
    #[must_use]
    pub fn assembly(&self) -> &AssemblyReference {
        &self.assembly
    }

    /// The type name component of the key
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for TypeCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}", self.assembly, self.type_name)
    }
}

/// Memoization key of a method reference: type key, method name and signature bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodCacheKey {
    type_key: TypeCacheKey,
    method_name: String,
    signature: MethodSignature,
}

impl MethodCacheKey {
    /// The key of the declaring type
    #[must_use]
    pub fn type_key(&self) -> &TypeCacheKey {
        &self.type_key
    }

    /// The method name component of the key
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// The signature component of the key
    #[must_use]
    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }
}

impl fmt::Display for MethodCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}({})",
            self.type_key, self.method_name, self.signature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::identity::{AssemblyVersion, PublicKeyToken};
    use std::collections::HashSet;

    fn tracer(version: AssemblyVersion) -> AssemblyReference {
        AssemblyReference::new("Tracer", version)
    }

    #[test]
    fn test_type_key_is_deterministic() {
        let a = TypeReference::new(tracer(AssemblyVersion::new(1, 0, 0, 0)), "Tracer.Hooks");
        let b = TypeReference::new(tracer(AssemblyVersion::new(1, 0, 0, 0)), "Tracer.Hooks");

        assert_eq!(a.type_cache_key(), b.type_cache_key());
    }

    #[test]
    fn test_type_key_distinguishes_assembly_identity() {
        let v1 = TypeReference::new(tracer(AssemblyVersion::new(1, 0, 0, 0)), "Tracer.Hooks");
        let v2 = TypeReference::new(tracer(AssemblyVersion::new(2, 0, 0, 0)), "Tracer.Hooks");
        let signed = TypeReference::new(
            tracer(AssemblyVersion::new(1, 0, 0, 0))
                .with_public_key(PublicKeyToken::new([1, 2, 3, 4, 5, 6, 7, 8])),
            "Tracer.Hooks",
        );

        let keys: HashSet<_> = [&v1, &v2, &signed]
            .iter()
            .map(|t| t.type_cache_key())
            .collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_type_key_no_concatenation_collision() {
        // "A" + "B.C" and "A.B" + "C" must not collide
        let first = TypeReference::new(
            AssemblyReference::new("A", AssemblyVersion::default()),
            "B.C",
        );
        let second = TypeReference::new(
            AssemblyReference::new("A.B", AssemblyVersion::default()),
            "C",
        );

        assert_ne!(first.type_cache_key(), second.type_cache_key());
    }

    #[test]
    fn test_method_key_distinguishes_overloads() {
        let hooks = TypeReference::new(tracer(AssemblyVersion::new(1, 0, 0, 0)), "Tracer.Hooks");
        let no_args = MethodReference::new(hooks.clone(), "Enter", vec![0x00, 0x00, 0x01]);
        let one_arg = MethodReference::new(hooks.clone(), "Enter", vec![0x00, 0x01, 0x01, 0x1C]);
        let exit = MethodReference::new(hooks, "Exit", vec![0x00, 0x00, 0x01]);

        assert_ne!(no_args.method_cache_key(), one_arg.method_cache_key());
        assert_ne!(no_args.method_cache_key(), exit.method_cache_key());
        assert_eq!(
            no_args.method_cache_key(),
            no_args.clone().method_cache_key()
        );
    }

    #[test]
    fn test_key_display() {
        let hooks = TypeReference::new(tracer(AssemblyVersion::new(1, 0, 0, 0)), "Tracer.Hooks");
        let enter = MethodReference::new(hooks.clone(), "Enter", vec![0x00, 0x00, 0x01]);

        assert_eq!(hooks.to_string(), "[Tracer]Tracer.Hooks");
        assert_eq!(enter.to_string(), "[Tracer]Tracer.Hooks::Enter");
        assert_eq!(
            enter.method_cache_key().to_string(),
            "[Tracer, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null]Tracer.Hooks::Enter(000001)"
        );
    }

    #[test]
    fn test_signature_accessors() {
        let signature = MethodSignature::from(&[0x20u8, 0x00, 0x01][..]);
        assert_eq!(signature.len(), 3);
        assert!(!signature.is_empty());
        assert_eq!(signature.as_bytes(), &[0x20, 0x00, 0x01]);
        assert!(MethodSignature::default().is_empty());
    }
}
