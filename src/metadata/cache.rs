//! Per-module memoization of resolved reference tokens.
//!
//! Once a key is present, its token is final: entries are never overwritten and never
//! evicted for the lifetime of the owning module context. Failed resolutions never
//! reach the cache.

use std::collections::{hash_map::Entry, HashMap};

use crate::metadata::{
    references::{MethodCacheKey, TypeCacheKey},
    token::Token,
};

/// Type and member reference tokens keyed by logical identity
#[derive(Debug, Default)]
pub struct ReferenceCache {
    type_ref_cache: HashMap<TypeCacheKey, Token>,
    member_ref_cache: HashMap<MethodCacheKey, Token>,
}

impl ReferenceCache {
    /// Creates an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached token of a type reference
    #[must_use]
    pub fn type_ref(&self, key: &TypeCacheKey) -> Option<Token> {
        self.type_ref_cache.get(key).copied()
    }

    /// Cached token of a member reference
    #[must_use]
    pub fn member_ref(&self, key: &MethodCacheKey) -> Option<Token> {
        self.member_ref_cache.get(key).copied()
    }

    /// Records a resolved type reference and returns the token now cached for `key`.
    ///
    /// If the key is already present the existing token wins.
    pub fn insert_type_ref(&mut self, key: TypeCacheKey, token: Token) -> Token {
        match self.type_ref_cache.entry(key) {
            Entry::Occupied(existing) => *existing.get(),
            Entry::Vacant(slot) => *slot.insert(token),
        }
    }

    /// Records a resolved member reference and returns the token now cached for `key`.
    ///
    /// If the key is already present the existing token wins.
    pub fn insert_member_ref(&mut self, key: MethodCacheKey, token: Token) -> Token {
        match self.member_ref_cache.entry(key) {
            Entry::Occupied(existing) => *existing.get(),
            Entry::Vacant(slot) => *slot.insert(token),
        }
    }

    /// Number of cached type references
    #[must_use]
    pub fn type_ref_count(&self) -> usize {
        self.type_ref_cache.len()
    }

    /// Number of cached member references
    #[must_use]
    pub fn member_ref_count(&self) -> usize {
        self.member_ref_cache.len()
    }

    /// Iterates over cached type references
    pub fn type_refs(&self) -> impl Iterator<Item = (&TypeCacheKey, &Token)> {
        self.type_ref_cache.iter()
    }

    /// Iterates over cached member references
    pub fn member_refs(&self) -> impl Iterator<Item = (&MethodCacheKey, &Token)> {
        self.member_ref_cache.iter()
    }
}
