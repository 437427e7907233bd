//! Canned translation data

use std::sync::Arc;

use keyglot::{ErrorPolicy, LocaleId, MemoryBackend, ResolverOptions, SessionRegistry};

/// Parse a locale tag, panicking on malformed test input
pub fn locale(tag: &str) -> LocaleId {
    LocaleId::parse(tag).expect("test locale tag must be valid")
}

/// Backend seeded with the reference scenarios
///
/// - `de` has `greeting`; `de_DE` does not
/// - `Customer` includes `Parent;BaseData`
/// - `Cycle1` and `Cycle2` include each other
/// - `Customer.age` takes one positional argument
pub fn scenario_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    let root = LocaleId::root();
    let german = locale("de");

    backend.insert(&german, "greeting", "Hallo");
    backend.insert(&locale("de_DE"), "farewell", "Tschüss");
    backend.insert(&root, "greeting", "Hello");
    backend.insert(&root, "farewell", "Goodbye");

    backend.insert(&root, "Customer.@include", "Parent;BaseData");
    backend.insert(&root, "Parent.name", "Name (Parent)");
    backend.insert(&root, "BaseData.name", "Name (BaseData)");
    backend.insert(&root, "BaseData.id", "Id (BaseData)");
    backend.insert(&root, "Customer.age", "Age: {0}");
    backend.insert(&german, "Customer.age", "Alter: {0}");

    backend.insert(&root, "Cycle1.@include", "Cycle2");
    backend.insert(&root, "Cycle2.@include", "Cycle1");

    backend.insert(&root, "form.address.street", "Street");

    backend
}

/// Options suppressing every category, rendering placeholders as `[key]`
pub fn lenient_options() -> ResolverOptions {
    ResolverOptions::default()
        .with_escape_template("[{0}]")
        .expect("bracket template is valid")
        .with_policy(ErrorPolicy::all())
}

/// Registry over the scenario backend
pub fn scenario_registry(options: ResolverOptions) -> (Arc<MemoryBackend>, SessionRegistry) {
    let backend = scenario_backend();
    let registry = SessionRegistry::new(options, backend.clone());
    (backend, registry)
}
