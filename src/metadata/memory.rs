//! A table-backed, in-process metadata store.
//!
//! [`InMemoryStore`] keeps one row vector per reference table and hands out tokens the
//! way a metadata emitter does: the table id in the high byte, a 1-based RID in the low
//! 24 bits. Define calls coalesce identical entries, which is the behaviour the resolver
//! relies on for its unconditional assembly and same-module type definitions.
//!
//! # Validation
//!
//! - Empty names are rejected with [`StoreError::E_INVALIDARG`]
//! - Scope tokens must point to an existing row of the expected table
//! - A table that would exceed 24-bit RIDs fails with [`StoreError::E_OUTOFMEMORY`]
//!
//! # Example
//!
//! ```rust
//! use dotref::metadata::{
//!     identity::{AssemblyMetadata, AssemblyReference, AssemblyVersion},
//!     memory::InMemoryStore,
//!     store::{Lookup, MetadataStore},
//! };
//!
//! let mut store = InMemoryStore::new();
//! let mscorlib = AssemblyReference::new("mscorlib", AssemblyVersion::new(4, 0, 0, 0));
//! let assembly = store.define_assembly_reference("mscorlib", &AssemblyMetadata::from_reference(&mscorlib))?;
//!
//! assert_eq!(store.find_type_reference(assembly, "System.Object")?, Lookup::NotFound);
//! let object = store.define_type_reference(assembly, "System.Object")?;
//! assert_eq!(store.find_type_reference(assembly, "System.Object")?, Lookup::Found(object));
//! # Ok::<(), dotref::metadata::store::StoreError>(())
//! ```

use std::collections::HashMap;

use crate::metadata::{
    identity::{AssemblyMetadata, AssemblyReference},
    store::{Lookup, MetadataStore, StoreError, StoreOperation, StoreResult},
    token::{TableId, Token},
};

/// Highest RID a token can address
const MAX_RID: u32 = 0x00FF_FFFF;

/// A row of the `AssemblyRef` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRefRow {
    /// Token of this row
    pub token: Token,
    /// Simple name of the referenced assembly
    pub name: String,
    /// Version, locale and key as emitted
    pub metadata: AssemblyMetadata,
}

/// A row of the `TypeRef` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRefRow {
    /// Token of this row
    pub token: Token,
    /// Resolution scope, the module or an `AssemblyRef`
    pub scope: Token,
    /// Namespace-qualified type name
    pub name: String,
}

/// A row of the `MemberRef` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRefRow {
    /// Token of this row
    pub token: Token,
    /// The `TypeRef` declaring the member
    pub parent: Token,
    /// Member name
    pub name: String,
    /// Signature blob
    pub signature: Vec<u8>,
}

/// In-process implementation of [`MetadataStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    assembly_refs: Vec<AssemblyRefRow>,
    type_refs: Vec<TypeRefRow>,
    member_refs: Vec<MemberRefRow>,
    /// Track next available RIDs for each table
    next_rids: HashMap<TableId, u32>,
}

impl InMemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits an assembly reference for a descriptor, as an existing module would already
    /// carry it.
    ///
    /// # Errors
    /// Returns a [`StoreError`] for an empty name or a full table.
    pub fn add_assembly_reference(&mut self, reference: &AssemblyReference) -> StoreResult<Token> {
        let metadata = AssemblyMetadata::from_reference(reference);
        self.define_assembly_reference(&reference.name, &metadata)
    }

    /// All `AssemblyRef` rows, in RID order
    #[must_use]
    pub fn assembly_refs(&self) -> &[AssemblyRefRow] {
        &self.assembly_refs
    }

    /// All `TypeRef` rows, in RID order
    #[must_use]
    pub fn type_refs(&self) -> &[TypeRefRow] {
        &self.type_refs
    }

    /// All `MemberRef` rows, in RID order
    #[must_use]
    pub fn member_refs(&self) -> &[MemberRefRow] {
        &self.member_refs
    }

    /// Gets the next available RID for a given table
    #[must_use]
    pub fn next_rid(&self, table_id: TableId) -> u32 {
        self.next_rids.get(&table_id).copied().unwrap_or(1)
    }

    fn allocate(&mut self, table_id: TableId, operation: StoreOperation) -> StoreResult<Token> {
        let rid = self.next_rid(table_id);
        if rid > MAX_RID {
            return Err(StoreError::with_message(
                operation,
                StoreError::E_OUTOFMEMORY,
                format!("{table_id} table is full"),
            ));
        }

        self.next_rids.insert(table_id, rid + 1);
        Ok(Token::from_parts(table_id, rid))
    }

    fn has_row(&self, token: Token) -> bool {
        let index = token.row() as usize;
        if index == 0 {
            return false;
        }

        match token.table_id() {
            Some(TableId::AssemblyRef) => index <= self.assembly_refs.len(),
            Some(TableId::TypeRef) => index <= self.type_refs.len(),
            Some(TableId::MemberRef) => index <= self.member_refs.len(),
            Some(TableId::Module) => token == Token::MODULE,
            None => false,
        }
    }

    fn require_name(operation: StoreOperation, name: &str) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::with_message(
                operation,
                StoreError::E_INVALIDARG,
                "name must not be empty",
            ));
        }
        Ok(())
    }

    fn require_scope(
        &self,
        operation: StoreOperation,
        scope: Token,
        allowed: &[TableId],
    ) -> StoreResult<()> {
        let table_ok = scope
            .table_id()
            .is_some_and(|table| allowed.contains(&table));

        if !table_ok || !self.has_row(scope) {
            return Err(StoreError::with_message(
                operation,
                StoreError::E_INVALIDARG,
                format!("invalid scope token {scope}"),
            ));
        }
        Ok(())
    }
}

impl MetadataStore for InMemoryStore {
    fn find_assembly_reference(&mut self, candidates: &[&str]) -> StoreResult<Option<Token>> {
        for candidate in candidates {
            if let Some(row) = self.assembly_refs.iter().find(|row| row.name == *candidate) {
                return Ok(Some(row.token));
            }
        }

        Ok(None)
    }

    fn define_assembly_reference(
        &mut self,
        name: &str,
        metadata: &AssemblyMetadata,
    ) -> StoreResult<Token> {
        let operation = StoreOperation::DefineAssemblyReference;
        Self::require_name(operation, name)?;

        if let Some(existing) = self
            .assembly_refs
            .iter()
            .find(|row| row.name == name && row.metadata == *metadata)
        {
            return Ok(existing.token);
        }

        let token = self.allocate(TableId::AssemblyRef, operation)?;
        self.assembly_refs.push(AssemblyRefRow {
            token,
            name: name.to_string(),
            metadata: metadata.clone(),
        });

        Ok(token)
    }

    fn define_type_reference(&mut self, scope: Token, type_name: &str) -> StoreResult<Token> {
        let operation = StoreOperation::DefineTypeReference;
        Self::require_name(operation, type_name)?;
        self.require_scope(operation, scope, &[TableId::Module, TableId::AssemblyRef])?;

        if let Some(existing) = self
            .type_refs
            .iter()
            .find(|row| row.scope == scope && row.name == type_name)
        {
            return Ok(existing.token);
        }

        let token = self.allocate(TableId::TypeRef, operation)?;
        self.type_refs.push(TypeRefRow {
            token,
            scope,
            name: type_name.to_string(),
        });

        Ok(token)
    }

    fn find_type_reference(
        &mut self,
        assembly_scope: Token,
        type_name: &str,
    ) -> StoreResult<Lookup> {
        self.require_scope(
            StoreOperation::FindTypeReference,
            assembly_scope,
            &[TableId::AssemblyRef],
        )?;

        Ok(self
            .type_refs
            .iter()
            .find(|row| row.scope == assembly_scope && row.name == type_name)
            .map(|row| row.token)
            .into())
    }

    fn find_member_reference(
        &mut self,
        type_scope: Token,
        method_name: &str,
        signature: &[u8],
    ) -> StoreResult<Lookup> {
        self.require_scope(
            StoreOperation::FindMemberReference,
            type_scope,
            &[TableId::TypeRef],
        )?;

        Ok(self
            .member_refs
            .iter()
            .find(|row| {
                row.parent == type_scope && row.name == method_name && row.signature == signature
            })
            .map(|row| row.token)
            .into())
    }

    fn define_member_reference(
        &mut self,
        type_scope: Token,
        method_name: &str,
        signature: &[u8],
    ) -> StoreResult<Token> {
        let operation = StoreOperation::DefineMemberReference;
        Self::require_name(operation, method_name)?;
        self.require_scope(operation, type_scope, &[TableId::TypeRef])?;

        if signature.is_empty() {
            return Err(StoreError::with_message(
                operation,
                StoreError::E_INVALIDARG,
                "signature must not be empty",
            ));
        }

        let token = self.allocate(TableId::MemberRef, operation)?;
        self.member_refs.push(MemberRefRow {
            token,
            parent: type_scope,
            name: method_name.to_string(),
            signature: signature.to_vec(),
        });

        Ok(token)
    }
}
