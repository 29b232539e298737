use thiserror::Error;

use crate::metadata::store::StoreError;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Resolution Errors
/// - [`Error::StoreFailure`] - The metadata store rejected a search or define call
/// - [`Error::MissingAssemblyReference`] - A cross-assembly type was requested before its
///   owning assembly reference was emitted
///
/// ## Descriptor Errors
/// - [`Error::Malformed`] - A textual descriptor (display name, version, key token) could
///   not be parsed
///
/// A "not found" answer from the store is never an error. It is reported as
/// [`crate::metadata::store::Lookup::NotFound`] and consumed by the resolver, which then
/// defines the missing entry.
///
/// # Examples
///
/// ```rust
/// use dotref::prelude::*;
///
/// let mut module = ModuleMetadata::new(InMemoryStore::new(), "MyApp");
/// let target = TypeReference::new(
///     AssemblyReference::new("Tracer", AssemblyVersion::new(1, 0, 0, 0)),
///     "Tracer.Hooks",
/// );
///
/// match module.find_type_reference(&target) {
///     Ok(token) => println!("resolved to {}", token),
///     Err(Error::MissingAssemblyReference { assembly }) => {
///         eprintln!("emit a reference to {} first", assembly);
///     }
///     Err(e) => eprintln!("store failure: {}", e),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The metadata store failed an operation.
    ///
    /// Covers malformed arguments, store corruption and capacity limits. Always fatal
    /// to the current resolution call and propagated unchanged.
    #[error("{0}")]
    StoreFailure(#[from] StoreError),

    /// Cross-assembly type resolution was requested before the owning assembly
    /// reference existed in the store.
    ///
    /// The resolver does not emit the assembly reference on its own; emit it through
    /// [`crate::metadata::module::ModuleMetadata::emit_assembly_reference`] or resolve
    /// a method on the type, which emits it as its first step.
    #[error("No assembly reference to '{assembly}' exists in the module")]
    MissingAssemblyReference {
        /// Simple name of the assembly that could not be found
        assembly: String,
    },

    /// A textual descriptor could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
