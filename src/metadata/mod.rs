//! Reference resolution against a module's metadata store.
//!
//! # Key Components
//!
//! ## Descriptors
//! - [`identity`] - Assembly descriptors, versions, public key tokens and the emission record
//! - [`references`] - Type, method and advice descriptors with their cache keys
//!
//! ## Store
//! - [`token`] - Metadata tokens handed out by the store
//! - [`store`] - The [`store::MetadataStore`] interface and its lookup/error types
//! - [`memory`] - A table-backed in-process store
//!
//! ## Resolution
//! - [`module`] - [`module::ModuleMetadata`], the per-module context
//! - [`resolver`] - Assembly, type, method and advice resolution on that context
//! - [`cache`] - Memoized tokens keyed by logical identity
//! - [`config`] - Core library candidates and foundational types

pub mod cache;
pub mod config;
pub mod identity;
pub mod memory;
pub mod module;
pub mod references;
pub mod resolver;
pub mod store;
pub mod token;
