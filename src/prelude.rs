//! # dotref Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotref library. Import this module to get quick access to everything an
//! instrumentation engine needs to resolve its hook references.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotref operations
pub use crate::Error;

/// The result type used throughout dotref
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Per-module resolution context
pub use crate::metadata::module::ModuleMetadata;

/// Tokens of a resolved advice pair
pub use crate::metadata::resolver::ResolvedAdvice;

/// Resolution configuration and foundational types
pub use crate::metadata::config::{ResolverConfig, WellKnownType};

// ================================================================================================
// Descriptors
// ================================================================================================

/// Assembly identity
pub use crate::metadata::identity::{AssemblyReference, AssemblyVersion, PublicKeyToken};

/// Type and method descriptors
pub use crate::metadata::references::{
    MethodAdvice, MethodReference, MethodSignature, TypeReference,
};

// ================================================================================================
// Store
// ================================================================================================

/// Store interface and outcomes
pub use crate::metadata::store::{Lookup, MetadataStore, StoreError, StoreOperation};

/// In-process store implementation
pub use crate::metadata::memory::InMemoryStore;

/// Metadata tokens
pub use crate::metadata::token::{TableId, Token};
