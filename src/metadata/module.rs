//! The per-module reference resolution context.
//!
//! [`ModuleMetadata`] owns everything the resolver mutates for one module: the store
//! handle, the memoization caches and the tokens of the foundational runtime types. One
//! instance lives for one instrumentation session over one module and is never shared
//! with another module, so multi-module hosts simply keep one context per module.
//!
//! # Initialization
//!
//! Creating a context looks up the core library among a prioritized candidate list
//! (see [`ResolverConfig::core_library_candidates`]) and resolves each configured
//! [`WellKnownType`] against it. Both steps are lenient: a module without a core library
//! reference, or a single type that cannot be resolved, only leaves the corresponding
//! entries absent from [`ModuleMetadata::type_refs`].
//!
//! # Example
//!
//! ```rust
//! use dotref::prelude::*;
//!
//! let mut store = InMemoryStore::new();
//! store.add_assembly_reference(&AssemblyReference::new("mscorlib", AssemblyVersion::new(4, 0, 0, 0)))?;
//!
//! let module = ModuleMetadata::new(store, "MyApp");
//! assert!(module.core_library().is_some());
//! assert!(module.type_ref(WellKnownType::Exception).is_some());
//! # Ok::<(), dotref::Error>(())
//! ```

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::metadata::{
    cache::ReferenceCache,
    config::{ResolverConfig, WellKnownType},
    store::MetadataStore,
    token::Token,
};

/// Reference resolution context of one module
#[derive(Debug)]
pub struct ModuleMetadata<S: MetadataStore> {
    /// Simple name of the assembly the module belongs to
    pub(crate) assembly_name: String,
    /// The module's metadata store
    pub(crate) store: S,
    pub(crate) config: ResolverConfig,
    /// `AssemblyRef` of the core library, if the module references one
    pub(crate) core_library: Option<Token>,
    /// Foundational type tokens; a missing entry failed to resolve
    pub(crate) type_refs: HashMap<WellKnownType, Token>,
    pub(crate) cache: ReferenceCache,
}

impl<S: MetadataStore> ModuleMetadata<S> {
    /// Creates a context with the default [`ResolverConfig`].
    ///
    /// # Arguments
    ///
    /// * `store` - The module's metadata store
    /// * `assembly_name` - Simple name of the assembly being instrumented
    pub fn new(store: S, assembly_name: impl Into<String>) -> Self {
        Self::with_config(store, assembly_name, ResolverConfig::default())
    }

    /// Creates a context and pre-resolves the configured foundational types.
    ///
    /// Never fails: resolution problems during initialization are logged and leave the
    /// affected [`WellKnownType`] entries absent.
    pub fn with_config(store: S, assembly_name: impl Into<String>, config: ResolverConfig) -> Self {
        let mut module = ModuleMetadata {
            assembly_name: assembly_name.into(),
            store,
            config,
            core_library: None,
            type_refs: HashMap::new(),
            cache: ReferenceCache::new(),
        };

        module.load_foundational_types();
        module
    }

    fn load_foundational_types(&mut self) {
        let candidates: Vec<&str> = self
            .config
            .core_library_candidates
            .iter()
            .map(String::as_str)
            .collect();

        let core_library = match self.store.find_assembly_reference(&candidates) {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!(
                    module = %self.assembly_name,
                    ?candidates,
                    "no core library reference, foundational types left unresolved"
                );
                return;
            }
            Err(error) => {
                warn!(
                    module = %self.assembly_name,
                    %error,
                    "core library lookup failed, foundational types left unresolved"
                );
                return;
            }
        };

        debug!(module = %self.assembly_name, token = %core_library, "core library reference found");
        self.core_library = Some(core_library);

        for ty in self.config.foundational_types.iter().copied() {
            match Self::find_or_define_type_reference(&mut self.store, core_library, ty.full_name()) {
                Ok(token) => {
                    self.type_refs.insert(ty, token);
                }
                Err(error) => {
                    warn!(
                        module = %self.assembly_name,
                        type_name = ty.full_name(),
                        %error,
                        "foundational type left unresolved"
                    );
                }
            }
        }
    }

    /// Simple name of the assembly being instrumented
    #[must_use]
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    /// `AssemblyRef` token of the core library found during initialization
    #[must_use]
    pub fn core_library(&self) -> Option<Token> {
        self.core_library
    }

    /// Tokens of the foundational types that resolved during initialization
    #[must_use]
    pub fn type_refs(&self) -> &HashMap<WellKnownType, Token> {
        &self.type_refs
    }

    /// Token of one foundational type, `None` if it could not be resolved
    #[must_use]
    pub fn type_ref(&self, ty: WellKnownType) -> Option<Token> {
        self.type_refs.get(&ty).copied()
    }

    /// The memoized type and member references
    #[must_use]
    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// The configuration the context was created with
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The underlying store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    ///
    /// Entries created directly through the store are unknown to the caches; the
    /// resolver will still find them through its search step.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Ends the session and hands the store back
    pub fn into_store(self) -> S {
        self.store
    }
}
