//! Integration tests for reference resolution through the public API.
//!
//! These tests drive a [`ModuleMetadata`] the way an instrumentation engine does: one
//! context per module, advice pairs resolved per injection site, and the resulting store
//! contents inspected afterwards.

use dotref::{metadata::store::StoreResult, prelude::*, Result};
use dotref::metadata::identity::{AssemblyMetadata, AssemblyRefFlags};

/// `default void ()`
const SIG_VOID: &[u8] = &[0x00, 0x00, 0x01];

/// `default void (object)`
const SIG_VOID_OBJECT: &[u8] = &[0x00, 0x01, 0x01, 0x1C];

/// Counts store calls per operation on top of an [`InMemoryStore`].
#[derive(Default)]
struct CountingStore {
    inner: InMemoryStore,
    calls: Vec<StoreOperation>,
}

impl CountingStore {
    fn total(&self) -> usize {
        self.calls.len()
    }

    fn count(&self, operation: StoreOperation) -> usize {
        self.calls.iter().filter(|op| **op == operation).count()
    }

    fn reset(&mut self) {
        self.calls.clear();
    }
}

impl MetadataStore for CountingStore {
    fn find_assembly_reference(&mut self, candidates: &[&str]) -> StoreResult<Option<Token>> {
        self.calls.push(StoreOperation::FindAssemblyReference);
        self.inner.find_assembly_reference(candidates)
    }

    fn define_assembly_reference(
        &mut self,
        name: &str,
        metadata: &AssemblyMetadata,
    ) -> StoreResult<Token> {
        self.calls.push(StoreOperation::DefineAssemblyReference);
        self.inner.define_assembly_reference(name, metadata)
    }

    fn define_type_reference(&mut self, scope: Token, type_name: &str) -> StoreResult<Token> {
        self.calls.push(StoreOperation::DefineTypeReference);
        self.inner.define_type_reference(scope, type_name)
    }

    fn find_type_reference(&mut self, assembly_scope: Token, type_name: &str) -> StoreResult<Lookup> {
        self.calls.push(StoreOperation::FindTypeReference);
        self.inner.find_type_reference(assembly_scope, type_name)
    }

    fn find_member_reference(
        &mut self,
        type_scope: Token,
        method_name: &str,
        signature: &[u8],
    ) -> StoreResult<Lookup> {
        self.calls.push(StoreOperation::FindMemberReference);
        self.inner
            .find_member_reference(type_scope, method_name, signature)
    }

    fn define_member_reference(
        &mut self,
        type_scope: Token,
        method_name: &str,
        signature: &[u8],
    ) -> StoreResult<Token> {
        self.calls.push(StoreOperation::DefineMemberReference);
        self.inner
            .define_member_reference(type_scope, method_name, signature)
    }
}

fn mscorlib() -> Result<AssemblyReference> {
    AssemblyReference::parse(
        "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    )
}

fn tracer_hooks() -> Result<TypeReference> {
    Ok(TypeReference::new(
        AssemblyReference::parse(
            "Elastic.Apm.Profiler.Managed, Version=1.0.0.0, Culture=neutral, PublicKeyToken=ae7400d2c189cf22",
        )?,
        "Elastic.Apm.Profiler.Managed.CallTarget.CallTargetInvoker",
    ))
}

fn module_for(assembly_name: &str) -> Result<ModuleMetadata<CountingStore>> {
    let mut store = CountingStore::default();
    store.inner.add_assembly_reference(&mscorlib()?)?;

    // Start counting after the foundational types were resolved
    let mut module = ModuleMetadata::new(store, assembly_name);
    module.store_mut().reset();
    Ok(module)
}

/// Same-assembly helper: defined directly, member searched then defined, and a repeat
/// call costs nothing.
#[test]
fn test_same_assembly_helper_scenario() -> Result<()> {
    let mut module = module_for("MyApp")?;
    assert_eq!(module.store().total(), 0);

    let log = MethodReference::new(
        TypeReference::new(
            AssemblyReference::new("MyApp", AssemblyVersion::new(1, 0, 0, 0)),
            "MyApp.Helper",
        ),
        "Log",
        SIG_VOID,
    );

    module.store_method_reference(&log)?;

    let store = module.store();
    assert_eq!(store.count(StoreOperation::FindTypeReference), 0);
    assert_eq!(store.count(StoreOperation::FindMemberReference), 1);
    assert_eq!(store.count(StoreOperation::DefineMemberReference), 1);

    let type_token = module
        .cache()
        .type_ref(&log.type_reference.type_cache_key())
        .expect("type reference cached");
    let member_token = module
        .cache()
        .member_ref(&log.method_cache_key())
        .expect("member reference cached");

    let rows = module.store().inner.type_refs();
    let helper = rows.iter().find(|row| row.token == type_token).unwrap();
    assert_eq!(helper.scope, Token::MODULE);
    assert_eq!(helper.name, "MyApp.Helper");
    assert_eq!(member_token.table_id(), Some(TableId::MemberRef));

    let after_first = module.store().total();
    assert_eq!(after_first, 4);

    module.store_method_reference(&log)?;
    assert_eq!(module.store().total(), after_first);

    Ok(())
}

/// Cross-assembly advice pair: the tracer assembly is emitted, the hook type is searched
/// before it is defined, and both hooks share one type reference.
#[test]
fn test_cross_assembly_advice() -> Result<()> {
    let mut module = module_for("MyApp")?;
    let hooks = tracer_hooks()?;
    let advice = MethodAdvice::new(
        MethodReference::new(hooks.clone(), "BeginMethod", SIG_VOID_OBJECT),
        MethodReference::new(hooks.clone(), "EndMethod", SIG_VOID_OBJECT),
    );

    let tokens = module.resolve_advice_tokens(&advice)?;
    assert_ne!(tokens.on_enter, tokens.on_exit);

    let store = &module.store().inner;
    let tracer = store
        .assembly_refs()
        .iter()
        .find(|row| row.name == "Elastic.Apm.Profiler.Managed")
        .expect("tracer assembly reference emitted");
    assert_eq!(tracer.metadata.public_key_len, 8);
    assert_eq!(tracer.metadata.locale, None);

    let hook_rows: Vec<_> = store
        .type_refs()
        .iter()
        .filter(|row| row.name == hooks.type_name)
        .collect();
    assert_eq!(hook_rows.len(), 1);
    assert_eq!(hook_rows[0].scope, tracer.token);

    assert!(store
        .member_refs()
        .iter()
        .all(|row| row.parent == hook_rows[0].token));

    Ok(())
}

/// Many injection sites sharing one advice pair produce exactly two member references.
#[test]
fn test_repeated_injection_sites_do_not_duplicate() -> Result<()> {
    let mut module = module_for("MyApp")?;
    let hooks = tracer_hooks()?;
    let advice = MethodAdvice::new(
        MethodReference::new(hooks.clone(), "BeginMethod", SIG_VOID_OBJECT),
        MethodReference::new(hooks, "EndMethod", SIG_VOID_OBJECT),
    );

    let first = module.resolve_advice_tokens(&advice)?;
    let calls = module.store().total();

    for _ in 0..50 {
        module.resolve_method_advice(&advice)?;
        assert_eq!(module.resolve_advice_tokens(&advice)?, first);
    }

    assert_eq!(module.store().total(), calls);
    assert_eq!(module.store().inner.member_refs().len(), 2);
    assert_eq!(module.cache().member_ref_count(), 2);

    Ok(())
}

/// A type from an assembly the module never referenced fails fast and leaves no trace.
#[test]
fn test_missing_assembly_reference_is_reported() -> Result<()> {
    let mut module = module_for("MyApp")?;
    let hooks = tracer_hooks()?;

    match module.resolve_type_reference(&hooks) {
        Err(Error::MissingAssemblyReference { assembly }) => {
            assert_eq!(assembly, "Elastic.Apm.Profiler.Managed");
        }
        other => panic!("expected a missing assembly reference, got {other:?}"),
    }
    assert_eq!(module.cache().type_ref_count(), 0);

    // Emitting the assembly reference first makes the same request succeed
    module.emit_assembly_reference(&hooks.assembly)?;
    let token = module.resolve_type_reference(&hooks)?;
    assert_eq!(token.table_id(), Some(TableId::TypeRef));

    Ok(())
}

/// Foundational types resolve against the referenced core library and reuse the rows a
/// compiler already emitted.
#[test]
fn test_foundational_types() -> Result<()> {
    let mut store = CountingStore::default();
    let corlib = store.inner.add_assembly_reference(&mscorlib()?)?;
    let existing_object = store.inner.define_type_reference(corlib, "System.Object")?;

    let module = ModuleMetadata::new(store, "MyApp");

    assert_eq!(module.core_library(), Some(corlib));
    assert_eq!(module.type_ref(WellKnownType::Object), Some(existing_object));

    let exception = module
        .type_ref(WellKnownType::Exception)
        .expect("exception type resolved");
    let row = module
        .store()
        .inner
        .type_refs()
        .iter()
        .find(|row| row.token == exception)
        .unwrap();
    assert_eq!(row.name, "System.Exception");
    assert_eq!(row.scope, corlib);

    Ok(())
}

/// Without any core library reference, construction still succeeds.
#[test]
fn test_module_without_core_library() {
    let module = ModuleMetadata::new(InMemoryStore::new(), "MyApp");

    assert_eq!(module.core_library(), None);
    assert!(module.type_refs().is_empty());
}

/// Contexts of different modules never share cache entries.
#[test]
fn test_contexts_are_isolated() -> Result<()> {
    let mut first = module_for("First")?;
    let mut second = module_for("Second")?;
    let log = MethodReference::new(
        TypeReference::new(
            AssemblyReference::new("Shared", AssemblyVersion::new(1, 0, 0, 0)),
            "Shared.Log",
        ),
        "Write",
        SIG_VOID,
    );

    first.store_method_reference(&log)?;

    assert!(first.method_reference_token(&log).is_some());
    assert!(second.method_reference_token(&log).is_none());
    assert_eq!(second.cache().member_ref_count(), 0);

    second.store_method_reference(&log)?;
    assert_eq!(second.store().count(StoreOperation::DefineMemberReference), 1);

    Ok(())
}

/// A module referencing both `System.Runtime` and `mscorlib` scopes its foundational
/// types to `System.Runtime`.
#[test]
fn test_core_library_preference() -> Result<()> {
    let mut store = InMemoryStore::new();
    store.add_assembly_reference(&mscorlib()?)?;
    let runtime = store.add_assembly_reference(&AssemblyReference::parse(
        "System.Runtime, Version=8.0.0.0, Culture=neutral, PublicKeyToken=b03f5f7f11d50a3a",
    )?)?;

    let module = ModuleMetadata::new(store, "MyApp");
    assert_eq!(module.core_library(), Some(runtime));

    let exception = module
        .type_ref(WellKnownType::Exception)
        .expect("exception type resolved");
    let row = module
        .store()
        .type_refs()
        .iter()
        .find(|row| row.token == exception)
        .unwrap();
    assert_eq!(row.scope, runtime);

    Ok(())
}

/// A fresh context only adds `System.Object` and `System.Exception` to the module.
#[test]
fn test_default_foundational_types_are_minimal() -> Result<()> {
    let mut store = InMemoryStore::new();
    store.add_assembly_reference(&mscorlib()?)?;

    let module = ModuleMetadata::new(store, "MyApp");
    let names: Vec<&str> = module
        .store()
        .type_refs()
        .iter()
        .map(|row| row.name.as_str())
        .collect();

    assert_eq!(names, vec!["System.Object", "System.Exception"]);
    assert_eq!(module.type_refs().len(), 2);

    Ok(())
}

/// A descriptor built from a full public key is emitted with its derived token, and a
/// retargetable reference keeps its flag.
#[test]
fn test_emit_reference_from_full_public_key() -> Result<()> {
    let mut module = module_for("MyApp")?;
    let portable = AssemblyReference::parse(
        "System.Core, Version=2.0.5.0, PublicKey=00000000000000000400000000000000, Retargetable=Yes",
    )?;

    module.emit_assembly_reference(&portable)?;

    let row = module
        .store()
        .inner
        .assembly_refs()
        .iter()
        .find(|row| row.name == "System.Core")
        .expect("assembly reference emitted");
    assert_eq!(row.metadata.public_key_bytes(), portable.public_key.as_bytes());
    assert_eq!(row.metadata.public_key_len, 8);
    assert_eq!(row.metadata.flags, AssemblyRefFlags::RETARGETABLE);

    Ok(())
}
