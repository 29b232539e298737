//! The metadata store interface consumed by the resolver.
//!
//! The store is the authoritative container of a module's assembly, type and member
//! references. The resolver only ever talks to it through [`MetadataStore`], which keeps
//! the surface narrow: one lookup of existing assembly references, and a search/define
//! pair for type and member references.
//!
//! # Search results
//!
//! Searches return [`Lookup`], a distinguished "found or not found" outcome, wrapped in
//! a [`StoreResult`]. A missing entry is an expected answer that leads to a define call;
//! only genuine failures travel through the error channel as [`StoreError`].
//!
//! # Implementations
//!
//! - [`crate::metadata::memory::InMemoryStore`] - a table-backed store with row
//!   de-duplication, used by tests and self-contained hosts
//! - `&mut S` for any store `S`, so a module context can borrow a store owned elsewhere

use strum::{Display, EnumIter};
use thiserror::Error;

use crate::metadata::{identity::AssemblyMetadata, token::Token};

/// Result type of every store operation
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of a store search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// An existing entry matched; its token
    Found(Token),
    /// No entry matched; the caller may define one
    NotFound,
}

impl Lookup {
    /// The found token, if any
    #[must_use]
    pub fn token(self) -> Option<Token> {
        match self {
            Lookup::Found(token) => Some(token),
            Lookup::NotFound => None,
        }
    }

    /// Returns true if the search matched an entry
    #[must_use]
    pub fn is_found(self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

impl From<Option<Token>> for Lookup {
    fn from(value: Option<Token>) -> Self {
        value.map_or(Lookup::NotFound, Lookup::Found)
    }
}

/// The store operations, used to label failures and recorded calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum StoreOperation {
    /// [`MetadataStore::find_assembly_reference`]
    FindAssemblyReference,
    /// [`MetadataStore::define_assembly_reference`]
    DefineAssemblyReference,
    /// [`MetadataStore::find_type_reference`]
    FindTypeReference,
    /// [`MetadataStore::define_type_reference`]
    DefineTypeReference,
    /// [`MetadataStore::find_member_reference`]
    FindMemberReference,
    /// [`MetadataStore::define_member_reference`]
    DefineMemberReference,
}

impl StoreOperation {
    /// Returns true for operations that may create a new entry
    #[must_use]
    pub fn is_define(self) -> bool {
        matches!(
            self,
            StoreOperation::DefineAssemblyReference
                | StoreOperation::DefineTypeReference
                | StoreOperation::DefineMemberReference
        )
    }
}

/// A failure reported by the metadata store.
///
/// Carries the operation that failed and an HRESULT-style status code, so callers
/// can tell malformed arguments from capacity limits without string matching.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{operation} failed with status 0x{code:08X}{}",
    .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default()
)]
pub struct StoreError {
    /// The operation that failed
    pub operation: StoreOperation,
    /// Status code reported by the store
    pub code: u32,
    /// Optional detail supplied by the store
    pub message: Option<String>,
}

impl StoreError {
    /// Unspecified failure
    pub const E_FAIL: u32 = 0x8000_4005;
    /// One or more arguments are invalid
    pub const E_INVALIDARG: u32 = 0x8007_0057;
    /// The store ran out of space for new rows
    pub const E_OUTOFMEMORY: u32 = 0x8007_000E;

    /// Creates an error without detail
    #[must_use]
    pub fn new(operation: StoreOperation, code: u32) -> Self {
        StoreError {
            operation,
            code,
            message: None,
        }
    }

    /// Creates an error with a detail message
    pub fn with_message(operation: StoreOperation, code: u32, message: impl Into<String>) -> Self {
        StoreError {
            operation,
            code,
            message: Some(message.into()),
        }
    }
}

/// The narrow capability the resolver needs from a module's metadata store.
///
/// All calls are synchronous and may mutate the store; callers serialize access to one
/// store per module.
pub trait MetadataStore {
    /// Returns the first existing assembly reference among `candidates`, tried in order.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the assembly reference table cannot be read.
    fn find_assembly_reference(&mut self, candidates: &[&str]) -> StoreResult<Option<Token>>;

    /// Defines an assembly reference.
    ///
    /// Defining an identical reference twice is expected to coalesce into one entry.
    ///
    /// # Errors
    /// Returns a [`StoreError`] on malformed input or when the store is full.
    fn define_assembly_reference(
        &mut self,
        name: &str,
        metadata: &AssemblyMetadata,
    ) -> StoreResult<Token>;

    /// Defines a type reference under `scope`, either [`Token::MODULE`] or an
    /// `AssemblyRef` token.
    ///
    /// # Errors
    /// Returns a [`StoreError`] for an invalid scope or name.
    fn define_type_reference(&mut self, scope: Token, type_name: &str) -> StoreResult<Token>;

    /// Searches for a type reference scoped to an `AssemblyRef` token.
    ///
    /// # Errors
    /// Returns a [`StoreError`] for failures other than "no such entry".
    fn find_type_reference(&mut self, assembly_scope: Token, type_name: &str)
        -> StoreResult<Lookup>;

    /// Searches for a member reference on `type_scope` with an identical signature blob.
    ///
    /// # Errors
    /// Returns a [`StoreError`] for failures other than "no such entry".
    fn find_member_reference(
        &mut self,
        type_scope: Token,
        method_name: &str,
        signature: &[u8],
    ) -> StoreResult<Lookup>;

    /// Defines a member reference on `type_scope`.
    ///
    /// # Errors
    /// Returns a [`StoreError`] for an invalid scope, name or signature.
    fn define_member_reference(
        &mut self,
        type_scope: Token,
        method_name: &str,
        signature: &[u8],
    ) -> StoreResult<Token>;
}

impl<S: MetadataStore + ?Sized> MetadataStore for &mut S {
    fn find_assembly_reference(&mut self, candidates: &[&str]) -> StoreResult<Option<Token>> {
        (**self).find_assembly_reference(candidates)
    }

    fn define_assembly_reference(
        &mut self,
        name: &str,
        metadata: &AssemblyMetadata,
    ) -> StoreResult<Token> {
        (**self).define_assembly_reference(name, metadata)
    }

    fn define_type_reference(&mut self, scope: Token, type_name: &str) -> StoreResult<Token> {
        (**self).define_type_reference(scope, type_name)
    }

    fn find_type_reference(
        &mut self,
        assembly_scope: Token,
        type_name: &str,
    ) -> StoreResult<Lookup> {
        (**self).find_type_reference(assembly_scope, type_name)
    }

    fn find_member_reference(
        &mut self,
        type_scope: Token,
        method_name: &str,
        signature: &[u8],
    ) -> StoreResult<Lookup> {
        (**self).find_member_reference(type_scope, method_name, signature)
    }

    fn define_member_reference(
        &mut self,
        type_scope: Token,
        method_name: &str,
        signature: &[u8],
    ) -> StoreResult<Token> {
        (**self).define_member_reference(type_scope, method_name, signature)
    }
}
