//! Configuration of a module's reference resolution context.

use strum::{AsRefStr, Display, EnumIter};

/// Core library names, most preferred first.
///
/// Reference assemblies compiled against .NET Core point at `System.Runtime`, .NET
/// Framework modules at `mscorlib`. `System.Private.CoreLib` only shows up in modules
/// compiled against the implementation assembly itself.
pub const DEFAULT_CORE_LIBRARIES: &[&str] = &[
    "System.Runtime",
    "mscorlib",
    "netstandard",
    "System.Private.CoreLib",
];

/// Foundational types resolved by default: the catch-all exception handler needs
/// `System.Exception`, and `System.Object` is the universal argument type of the hooks
pub const DEFAULT_FOUNDATIONAL_TYPES: &[WellKnownType] =
    &[WellKnownType::Object, WellKnownType::Exception];

/// Foundational runtime types pre-resolved when a module context is created.
///
/// Code generation needs some of these without going through a descriptor, e.g. the
/// base exception type for the catch clause wrapped around an instrumented body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr, EnumIter)]
pub enum WellKnownType {
    /// The root of the type hierarchy
    #[strum(serialize = "System.Object")]
    Object,
    /// The root of the exception hierarchy
    #[strum(serialize = "System.Exception")]
    Exception,
    /// Runtime type handles and reflection
    #[strum(serialize = "System.Type")]
    Type,
    /// Base of all value types
    #[strum(serialize = "System.ValueType")]
    ValueType,
    /// Return type of procedures
    #[strum(serialize = "System.Void")]
    Void,
    /// Strings
    #[strum(serialize = "System.String")]
    String,
    /// 32-bit integers
    #[strum(serialize = "System.Int32")]
    Int32,
    /// 64-bit integers
    #[strum(serialize = "System.Int64")]
    Int64,
    /// Booleans
    #[strum(serialize = "System.Boolean")]
    Boolean,
}

impl WellKnownType {
    /// Namespace-qualified name of the type
    #[must_use]
    pub fn full_name(self) -> &'static str {
        match self {
            WellKnownType::Object => "System.Object",
            WellKnownType::Exception => "System.Exception",
            WellKnownType::Type => "System.Type",
            WellKnownType::ValueType => "System.ValueType",
            WellKnownType::Void => "System.Void",
            WellKnownType::String => "System.String",
            WellKnownType::Int32 => "System.Int32",
            WellKnownType::Int64 => "System.Int64",
            WellKnownType::Boolean => "System.Boolean",
        }
    }
}

/// Options for [`crate::metadata::module::ModuleMetadata`].
///
/// ```rust
/// use dotref::metadata::config::{ResolverConfig, WellKnownType};
///
/// let config = ResolverConfig::default()
///     .with_core_libraries(["mscorlib"])
///     .with_foundational_types([WellKnownType::Object, WellKnownType::Exception]);
///
/// assert_eq!(config.core_library_candidates, vec!["mscorlib".to_string()]);
/// assert_eq!(config.foundational_types.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Assemblies searched, in order, for the core library reference
    pub core_library_candidates: Vec<String>,
    /// Types resolved against the core library when the context is created; the others
    /// are opt-in through [`ResolverConfig::with_foundational_types`]
    pub foundational_types: Vec<WellKnownType>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            core_library_candidates: DEFAULT_CORE_LIBRARIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            foundational_types: DEFAULT_FOUNDATIONAL_TYPES.to_vec(),
        }
    }
}

impl ResolverConfig {
    /// Replaces the prioritized core library list
    #[must_use]
    pub fn with_core_libraries<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.core_library_candidates = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the set of pre-resolved foundational types
    #[must_use]
    pub fn with_foundational_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = WellKnownType>,
    {
        self.foundational_types = types.into_iter().collect();
        self
    }
}
