//! Reference resolution: from logical descriptors to store tokens.
//!
//! The resolver turns [`AssemblyReference`], [`TypeReference`] and [`MethodReference`]
//! descriptors into tokens that rewritten code can embed. Every successful resolution
//! is memoized in the module's [`crate::metadata::cache::ReferenceCache`]; a cache hit
//! performs no store access at all.
//!
//! # Resolution paths
//!
//! ## Assembly references
//! Always defined, never searched. The store coalesces identical definitions, so
//! emitting the same reference again is harmless.
//!
//! ## Type references
//! - **Same module**: the descriptor's assembly is the module's own assembly. The type
//!   reference is defined directly under [`Token::MODULE`], without a search.
//! - **Cross assembly**: the owning `AssemblyRef` must already exist, otherwise
//!   resolution fails with [`Error::MissingAssemblyReference`]. The type reference is
//!   then searched under that assembly and only defined when the search reports
//!   [`Lookup::NotFound`].
//!
//! ## Method references
//! Emit the owning assembly reference, resolve the owning type, then search the member
//! reference by name and exact signature, defining it when not found.
//!
//! # Errors
//!
//! Store failures abort the current resolution and propagate unchanged. Nothing is
//! retried, and a failed resolution never adds a cache entry for the key it was
//! resolving.

use tracing::{debug, trace};

use crate::{
    metadata::{
        identity::{AssemblyMetadata, AssemblyReference},
        module::ModuleMetadata,
        references::{MethodAdvice, MethodReference, TypeReference},
        store::{Lookup, MetadataStore, StoreResult},
        token::Token,
    },
    Error, Result,
};

/// Member reference tokens of a resolved advice pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAdvice {
    /// `MemberRef` token of the entry hook
    pub on_enter: Token,
    /// `MemberRef` token of the exit hook
    pub on_exit: Token,
}

impl<S: MetadataStore> ModuleMetadata<S> {
    /// Emits an assembly reference into the store.
    ///
    /// The descriptor is converted with [`AssemblyMetadata::from_reference`], which maps
    /// the neutral locale to an absent locale and the all-zero public key to a zero key
    /// length. The store is called unconditionally.
    ///
    /// # Errors
    /// Returns [`Error::StoreFailure`] if the store rejects the definition.
    pub fn emit_assembly_reference(&mut self, descriptor: &AssemblyReference) -> Result<()> {
        let metadata = AssemblyMetadata::from_reference(descriptor);
        let token = self
            .store
            .define_assembly_reference(&descriptor.name, &metadata)?;

        debug!(assembly = %descriptor, %token, "assembly reference emitted");
        Ok(())
    }

    /// Resolves a type reference, consulting the cache first.
    ///
    /// # Errors
    /// - [`Error::MissingAssemblyReference`] if the type lives in another assembly that
    ///   the module does not reference yet
    /// - [`Error::StoreFailure`] for any store failure other than "not found"
    pub fn find_type_reference(&mut self, descriptor: &TypeReference) -> Result<Token> {
        let key = descriptor.type_cache_key();
        if let Some(token) = self.cache.type_ref(&key) {
            trace!(%key, %token, "type reference cache hit");
            return Ok(token);
        }

        let token = if descriptor.assembly.name == self.assembly_name {
            self.store
                .define_type_reference(Token::MODULE, &descriptor.type_name)?
        } else {
            let assembly = self
                .store
                .find_assembly_reference(&[descriptor.assembly.name.as_str()])?
                .ok_or_else(|| Error::MissingAssemblyReference {
                    assembly: descriptor.assembly.name.clone(),
                })?;

            Self::find_or_define_type_reference(&mut self.store, assembly, &descriptor.type_name)?
        };

        debug!(%key, %token, "type reference resolved");
        Ok(self.cache.insert_type_ref(key, token))
    }

    /// Resolves a type reference for the instrumentation engine.
    ///
    /// Same as [`ModuleMetadata::find_type_reference`].
    ///
    /// # Errors
    /// See [`ModuleMetadata::find_type_reference`].
    pub fn resolve_type_reference(&mut self, descriptor: &TypeReference) -> Result<Token> {
        self.find_type_reference(descriptor)
    }

    /// Resolves a method reference and caches its token.
    ///
    /// On a cache miss the owning assembly reference is emitted first, even if an earlier
    /// method already emitted it, then the owning type is resolved and finally the member
    /// reference is searched and, if missing, defined.
    ///
    /// # Errors
    /// Returns the first error of the emission, type resolution or member resolution
    /// step.
    pub fn store_method_reference(&mut self, descriptor: &MethodReference) -> Result<()> {
        self.resolve_method_reference(descriptor).map(|_| ())
    }

    /// Resolves a method reference and returns its `MemberRef` token.
    ///
    /// # Errors
    /// See [`ModuleMetadata::store_method_reference`].
    pub fn resolve_method_reference(&mut self, descriptor: &MethodReference) -> Result<Token> {
        let key = descriptor.method_cache_key();
        if let Some(token) = self.cache.member_ref(&key) {
            trace!(%key, %token, "member reference cache hit");
            return Ok(token);
        }

        self.emit_assembly_reference(&descriptor.type_reference.assembly)?;
        let type_token = self.find_type_reference(&descriptor.type_reference)?;

        let name = descriptor.method_name.as_str();
        let signature = descriptor.method_signature.as_bytes();
        let token = match self.store.find_member_reference(type_token, name, signature)? {
            Lookup::Found(token) => token,
            Lookup::NotFound => self
                .store
                .define_member_reference(type_token, name, signature)?,
        };

        debug!(%key, %token, "member reference resolved");
        Ok(self.cache.insert_member_ref(key, token))
    }

    /// Token of a method reference resolved earlier, without touching the store
    #[must_use]
    pub fn method_reference_token(&self, descriptor: &MethodReference) -> Option<Token> {
        self.cache.member_ref(&descriptor.method_cache_key())
    }

    /// Resolves the entry and exit hooks of an advice pair, in that order.
    ///
    /// If the entry hook fails, the exit hook is not attempted. If the exit hook fails,
    /// the entry hook stays cached.
    ///
    /// # Errors
    /// Returns the error of the first hook that failed to resolve.
    pub fn store_method_advice(&mut self, advice: &MethodAdvice) -> Result<()> {
        self.store_method_reference(&advice.on_enter)?;
        self.store_method_reference(&advice.on_exit)
    }

    /// Resolves an advice pair for the instrumentation engine.
    ///
    /// Same as [`ModuleMetadata::store_method_advice`].
    ///
    /// # Errors
    /// See [`ModuleMetadata::store_method_advice`].
    pub fn resolve_method_advice(&mut self, advice: &MethodAdvice) -> Result<()> {
        self.store_method_advice(advice)
    }

    /// Resolves an advice pair and returns both member reference tokens.
    ///
    /// # Errors
    /// See [`ModuleMetadata::store_method_advice`].
    pub fn resolve_advice_tokens(&mut self, advice: &MethodAdvice) -> Result<ResolvedAdvice> {
        let on_enter = self.resolve_method_reference(&advice.on_enter)?;
        let on_exit = self.resolve_method_reference(&advice.on_exit)?;

        Ok(ResolvedAdvice { on_enter, on_exit })
    }

    /// Searches a type reference under an `AssemblyRef` scope and defines it when the
    /// store reports it as missing.
    pub(crate) fn find_or_define_type_reference(
        store: &mut S,
        assembly_scope: Token,
        type_name: &str,
    ) -> StoreResult<Token> {
        match store.find_type_reference(assembly_scope, type_name)? {
            Lookup::Found(token) => Ok(token),
            Lookup::NotFound => store.define_type_reference(assembly_scope, type_name),
        }
    }
}
