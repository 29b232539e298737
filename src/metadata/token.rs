//! Metadata tokens handed out by the store.
//!
//! A token packs the target table into its high byte and a 1-based row id into the low
//! 24 bits. Only the tables the resolver emits into have a [`TableId`].

use std::fmt;
use std::hash::{Hash, Hasher};

/// Metadata tables a reference token can point into.
///
/// Only the tables the resolver emits into are listed. The numeric values are the
/// ECMA-335 table ids and end up in the high byte of a [`Token`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, strum::EnumIter, strum::Display)]
#[repr(u8)]
pub enum TableId {
    /// `Module` table (0x00) - the module being instrumented
    Module = 0x00,
    /// `TypeRef` table (0x01) - references to types, local or external
    TypeRef = 0x01,
    /// `MemberRef` table (0x0A) - references to methods on referenced types
    MemberRef = 0x0A,
    /// `AssemblyRef` table (0x23) - references to external assemblies
    AssemblyRef = 0x23,
}

impl TableId {
    /// Maps the high byte of a token back to a known table.
    #[must_use]
    pub fn from_table_byte(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(TableId::Module),
            0x01 => Some(TableId::TypeRef),
            0x0A => Some(TableId::MemberRef),
            0x23 => Some(TableId::AssemblyRef),
            _ => None,
        }
    }
}

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
///
/// The resolver treats tokens as opaque handles handed out by the metadata store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// The null token (table 0, row 0). It addresses no row and is never returned by a
    /// resolution; a type that failed to resolve has no token at all.
    pub const NIL: Token = Token(0);

    /// The token of the module itself; scope for type references to locally defined types
    pub const MODULE: Token = Token(0x0000_0001);

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Builds a token from a table and a 1-based row id
    #[must_use]
    pub fn from_parts(table: TableId, row: u32) -> Self {
        Token(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the table of the token, if it is one the resolver knows about
    #[must_use]
    pub fn table_id(&self) -> Option<TableId> {
        TableId::from_table_byte(self.table())
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
