// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotref
//!
//! Reference resolution and de-duplication for .NET metadata instrumentation.
//!
//! An instrumentation engine that injects calls to externally defined hooks (entry and
//! exit advice around a method body) needs a metadata token for every hook it calls.
//! `dotref` produces those tokens: given a logical description of an assembly, a type
//! or a method, it returns a stable token, reusing the one it produced earlier for the
//! same entity, and otherwise negotiating with the module's metadata store by searching
//! for an existing entry before defining a new one.
//!
//! ## Quick Start
//!
//! ```rust
//! use dotref::prelude::*;
//!
//! let mut store = InMemoryStore::new();
//! store.add_assembly_reference(&AssemblyReference::new("mscorlib", AssemblyVersion::new(4, 0, 0, 0)))?;
//!
//! let mut module = ModuleMetadata::new(store, "MyApp");
//!
//! let hooks = TypeReference::new(
//!     AssemblyReference::parse("Tracer, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null")?,
//!     "Tracer.Hooks",
//! );
//! let advice = MethodAdvice::new(
//!     MethodReference::new(hooks.clone(), "OnMethodBegin", vec![0x00, 0x00, 0x01]),
//!     MethodReference::new(hooks, "OnMethodEnd", vec![0x00, 0x00, 0x01]),
//! );
//!
//! let tokens = module.resolve_advice_tokens(&advice)?;
//! assert_eq!(tokens.on_enter.table_id(), Some(TableId::MemberRef));
//!
//! // Resolving again is served entirely from the cache
//! assert_eq!(module.resolve_advice_tokens(&advice)?, tokens);
//! # Ok::<(), dotref::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Descriptors, the store interface and the resolver
//! - [`Error`] and [`Result`] - Error handling
//!
//! ### Resolution Context
//!
//! [`metadata::module::ModuleMetadata`] is created once per instrumented module. It owns
//! the store handle, the caches and the tokens of foundational runtime types such as
//! `System.Exception`. All resolution methods take `&mut self`, so one context is only
//! ever driven by one caller at a time.
//!
//! ### Logging
//!
//! The crate emits [`tracing`] events (cache hits at `trace`, store definitions at
//! `debug`, lenient initialization failures at `warn`) and never installs a subscriber.
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotref::prelude::*;
///
/// let module = ModuleMetadata::new(InMemoryStore::new(), "MyApp");
/// assert_eq!(module.type_ref(WellKnownType::Object), None);
/// ```
pub mod prelude;

/// Descriptors, the metadata store interface and the reference resolver
pub mod metadata;

/// `dotref` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotref` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;
