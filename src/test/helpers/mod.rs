//! Helper functions for creating test descriptors

use crate::metadata::{
    identity::{AssemblyReference, AssemblyVersion},
    references::{MethodAdvice, MethodReference, TypeReference},
};

/// `default void ()`
pub const SIG_VOID_NO_ARGS: &[u8] = &[0x00, 0x00, 0x01];

/// `default void (object)`
pub const SIG_VOID_OBJECT: &[u8] = &[0x00, 0x01, 0x01, 0x1C];

// Helper function to create a culture-neutral, unsigned assembly descriptor
pub fn create_assembly_ref(name: &str) -> AssemblyReference {
    AssemblyReference::new(name, AssemblyVersion::new(1, 0, 0, 0))
}

// Helper function to create a type descriptor
pub fn create_type_ref(assembly: &str, type_name: &str) -> TypeReference {
    TypeReference::new(create_assembly_ref(assembly), type_name)
}

// Helper function to create a method descriptor
pub fn create_method_ref(
    assembly: &str,
    type_name: &str,
    method_name: &str,
    signature: &[u8],
) -> MethodReference {
    MethodReference::new(create_type_ref(assembly, type_name), method_name, signature)
}

// Helper function to create the enter/exit advice pair of a tracer hook type
pub fn create_advice(assembly: &str, type_name: &str) -> MethodAdvice {
    MethodAdvice::new(
        create_method_ref(assembly, type_name, "OnMethodBegin", SIG_VOID_OBJECT),
        create_method_ref(assembly, type_name, "OnMethodEnd", SIG_VOID_OBJECT),
    )
}
