use std::sync::Arc;

use polyres::{
    CandidateNames, FormatRegistry, JsonResourceLoader, Locale, MemoryProvider, ResolutionEngine,
    ResourceError, ResourceMap, ResourceStore, TypeId, TypeRegistry, TypeSpec,
};

/// The five-level fixture: `Impl -> BaseImpl -> AbstractImpl`, every class
/// implementing `SubInterface`, which extends `Interface`.
struct Fixture {
    registry: Arc<TypeRegistry>,
    interface: TypeId,
    abstract_impl: TypeId,
    impl_ty: TypeId,
}

fn five_level_fixture() -> Fixture {
    let mut registry = TypeRegistry::new();
    let interface = registry.define(TypeSpec::new("fixture.Interface")).unwrap();
    let sub_interface = registry
        .define(TypeSpec::new("fixture.SubInterface").implements([interface]))
        .unwrap();
    let abstract_impl = registry
        .define(TypeSpec::new("fixture.AbstractImpl").implements([sub_interface]))
        .unwrap();
    let base_impl = registry
        .define(
            TypeSpec::new("fixture.BaseImpl")
                .extends(abstract_impl)
                .implements([sub_interface]),
        )
        .unwrap();
    let impl_ty = registry
        .define(
            TypeSpec::new("fixture.Impl")
                .extends(base_impl)
                .implements([sub_interface]),
        )
        .unwrap();
    Fixture {
        registry: Arc::new(registry),
        interface,
        abstract_impl,
        impl_ty,
    }
}

fn engine_over(fixture: &Fixture, provider: MemoryProvider) -> ResolutionEngine {
    ResolutionEngine::builder()
        .graph(Arc::clone(&fixture.registry) as Arc<dyn polyres::TypeGraph>)
        .provider(Arc::new(provider))
        .build()
        .unwrap()
}

#[test]
fn interface_value_overridden_at_abstract_impl() {
    let fixture = five_level_fixture();
    let provider = MemoryProvider::new()
        .with(
            "fixture/Interface.properties",
            &b"interfaceToOverride=I\ninterfaceOnly=from interface"[..],
        )
        .with(
            "fixture/AbstractImpl.properties",
            &b"interfaceToOverride=A"[..],
        );
    let engine = engine_over(&fixture, provider);

    // resolving for AbstractImpl: the class's own store shadows the
    // interface's
    let resources = engine
        .resolve(fixture.abstract_impl, &Locale::root())
        .unwrap();
    assert_eq!(resources.get_string("interfaceToOverride").unwrap(), "A");
    assert_eq!(
        resources.get_string("interfaceOnly").unwrap(),
        "from interface"
    );

    // resolving for the interface directly sees only its own value
    let resources = engine.resolve(fixture.interface, &Locale::root()).unwrap();
    assert_eq!(resources.get_string("interfaceToOverride").unwrap(), "I");
}

#[test]
fn deep_hierarchy_inherits_interface_values() {
    let fixture = five_level_fixture();
    let provider = MemoryProvider::new().with(
        "fixture/Interface.properties",
        &b"interfaceOnly=from interface"[..],
    );
    let engine = engine_over(&fixture, provider);

    let resources = engine.resolve(fixture.impl_ty, &Locale::root()).unwrap();
    assert_eq!(
        resources.get_string("interfaceOnly").unwrap(),
        "from interface"
    );
    assert_eq!(resources.context_name(), "fixture.Impl");
}

#[test]
fn locale_specific_bundle_shadows_root_bundle() {
    let fixture = five_level_fixture();
    let provider = MemoryProvider::new()
        .with("fixture/Impl.properties", &b"greeting=hello"[..])
        .with("fixture/Impl_fr.properties", &b"greeting=bonjour"[..])
        .with(
            "fixture/Impl_fr_CA.properties",
            "greeting=bonjour-qu\\u00e9bec".as_bytes(),
        );
    let engine = engine_over(&fixture, provider);

    let root = engine.resolve(fixture.impl_ty, &Locale::root()).unwrap();
    assert_eq!(root.get_string("greeting").unwrap(), "hello");

    let fr = engine
        .resolve(fixture.impl_ty, &"fr".parse().unwrap())
        .unwrap();
    assert_eq!(fr.get_string("greeting").unwrap(), "bonjour");

    let fr_ca = engine
        .resolve(fixture.impl_ty, &"fr-CA".parse().unwrap())
        .unwrap();
    assert_eq!(fr_ca.get_string("greeting").unwrap(), "bonjour-québec");
}

#[test]
fn parent_chain_answers_what_contexts_miss() {
    let fixture = five_level_fixture();
    let provider = MemoryProvider::new().with(
        "fixture/Impl.properties",
        &b"local=from impl"[..],
    );

    let engine = ResolutionEngine::builder()
        .graph(Arc::clone(&fixture.registry) as Arc<dyn polyres::TypeGraph>)
        .provider(Arc::new(provider))
        .parent_chain(|context, _locale| {
            let map: ResourceMap = [("parent.only", "from parent")].into_iter().collect();
            Ok(Some(ResourceStore::node(context, map, ResourceStore::Empty)))
        })
        .build()
        .unwrap();

    let resources = engine.resolve(fixture.impl_ty, &Locale::root()).unwrap();
    assert_eq!(resources.get_string("local").unwrap(), "from impl");
    // present only on the externally supplied parent, absent from every
    // resolved context
    assert_eq!(
        resources.get_string("parent.only").unwrap(),
        "from parent"
    );
    assert!(resources.has_resource("parent.only"));
}

#[test]
fn host_delegated_parent_participates_in_chain() {
    let fixture = five_level_fixture();
    let provider = MemoryProvider::new().with(
        "fixture/Impl.properties",
        &b"local=from impl"[..],
    );

    let engine = ResolutionEngine::builder()
        .graph(Arc::clone(&fixture.registry) as Arc<dyn polyres::TypeGraph>)
        .provider(Arc::new(provider))
        .parent_chain(|_context, _locale| {
            Ok(Some(ResourceStore::delegated(
                "host-localizer",
                |key| (key == "host.key").then(|| "host value".to_string()),
                ResourceStore::Empty,
            )))
        })
        .build()
        .unwrap();

    let resources = engine.resolve(fixture.impl_ty, &Locale::root()).unwrap();
    assert_eq!(resources.get_string("local").unwrap(), "from impl");
    assert_eq!(resources.get_string("host.key").unwrap(), "host value");
}

#[test]
fn missing_key_reports_key_and_requesting_type() {
    let fixture = five_level_fixture();
    let engine = engine_over(&fixture, MemoryProvider::new());

    let resources = engine.resolve(fixture.impl_ty, &Locale::root()).unwrap();
    let err = resources.get_string("nowhere.to.be.found").unwrap_err();
    let ResourceError::MissingKey { key, context } = err else {
        panic!("expected missing-key error, got {err}");
    };
    assert_eq!(key, "nowhere.to.be.found");
    assert_eq!(context, "fixture.Impl");
}

#[test]
fn explicit_base_names_resolve_without_type_bundles() {
    let fixture = five_level_fixture();
    let provider = MemoryProvider::new().with(
        "app/messages.properties",
        &b"app.name=Fixture App"[..],
    );

    let engine = ResolutionEngine::builder()
        .graph(Arc::clone(&fixture.registry) as Arc<dyn polyres::TypeGraph>)
        .provider(Arc::new(provider))
        .candidate_names(CandidateNames::names_only(["app.messages"]))
        .no_ancestors()
        .build()
        .unwrap();

    let resources = engine.resolve(fixture.impl_ty, &Locale::root()).unwrap();
    assert_eq!(resources.get_string("app.name").unwrap(), "Fixture App");
}

#[test]
fn registered_json_format_shadows_properties() {
    let fixture = five_level_fixture();
    let provider = MemoryProvider::new()
        .with("fixture/Impl.json", &br#"{"source": "json", "count": 2}"#[..])
        .with("fixture/Impl.properties", &b"source=properties"[..]);

    let engine = ResolutionEngine::builder()
        .graph(Arc::clone(&fixture.registry) as Arc<dyn polyres::TypeGraph>)
        .provider(Arc::new(provider))
        .formats(Arc::new(FormatRegistry::new([
            Arc::new(JsonResourceLoader) as Arc<dyn polyres::FormatLoader>,
        ])))
        .build()
        .unwrap();

    let resources = engine.resolve(fixture.impl_ty, &Locale::root()).unwrap();
    assert_eq!(resources.get_string("source").unwrap(), "json");
    assert_eq!(resources.get_i32("count").unwrap(), 2);
}

#[test]
fn formatted_lookup_applies_arguments() {
    let fixture = five_level_fixture();
    let provider = MemoryProvider::new().with(
        "fixture/Impl.properties",
        &b"files.summary={0} of {1} files copied"[..],
    );
    let engine = engine_over(&fixture, provider);

    let resources = engine.resolve(fixture.impl_ty, &Locale::root()).unwrap();
    assert_eq!(
        resources
            .get_string_with("files.summary", &[&3, &12])
            .unwrap(),
        "3 of 12 files copied"
    );
}
