//! Process-wide adapter registry: name/alias resolution plus factories.
//!
//! Read-mostly after initialization, safe to call from multiple parse
//! threads concurrently. Each call to a factory returns a brand new adapter
//! instance — the parse scheduler constructs one per file (§4.6/§5).

use std::sync::OnceLock;

use dashmap::DashMap;

use super::{
    bash::BashAdapter, c_lang::CAdapter, cpp::CppAdapter, csharp::CSharpAdapter, go_lang::GoAdapter,
    java::JavaAdapter, javascript::JavaScriptAdapter, python::PythonAdapter, ruby::RubyAdapter,
    rust_lang::RustAdapter, typescript::TypeScriptAdapter, LanguageAdapter,
};
use crate::error::EngineResult;

type Factory = fn() -> Box<dyn LanguageAdapter>;

pub struct AdapterRegistry {
    factories: DashMap<&'static str, Factory>,
    aliases: DashMap<&'static str, &'static str>,
}

impl AdapterRegistry {
    fn new() -> Self {
        let registry = AdapterRegistry {
            factories: DashMap::new(),
            aliases: DashMap::new(),
        };
        registry.register("python", || Box::new(PythonAdapter));
        registry.register("javascript", || Box::new(JavaScriptAdapter));
        registry.register("typescript", || Box::new(TypeScriptAdapter));
        registry.register("rust", || Box::new(RustAdapter));
        registry.register("java", || Box::new(JavaAdapter));
        registry.register("c", || Box::new(CAdapter));
        registry.register("cpp", || Box::new(CppAdapter));
        registry.register("csharp", || Box::new(CSharpAdapter));
        registry.register("go", || Box::new(GoAdapter));
        registry.register("ruby", || Box::new(RubyAdapter));
        registry.register("bash", || Box::new(BashAdapter));
        registry
    }

    fn register(&self, canonical: &'static str, factory: Factory) {
        self.factories.insert(canonical, factory);
        for alias in factory().aliases() {
            self.aliases.insert(alias, canonical);
        }
        self.aliases.insert(canonical, canonical);
    }

    pub fn resolve_alias(&self, name: &str) -> Option<&'static str> {
        self.aliases.get(name).map(|entry| *entry.value())
    }

    pub fn create_adapter(&self, language: &str) -> EngineResult<Box<dyn LanguageAdapter>> {
        let canonical = self
            .resolve_alias(language)
            .ok_or_else(|| super::unsupported_language(language))?;
        let factory = *self
            .factories
            .get(canonical)
            .ok_or_else(|| super::unsupported_language(language))?
            .value();
        Ok(factory())
    }

    pub fn is_registered(&self, language: &str) -> bool {
        self.resolve_alias(language).is_some()
    }

    /// Every language with a full parsing adapter, for `ast_supported_languages()`.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.factories.iter().map(|entry| *entry.key()).collect();
        names.sort_unstable();
        names
    }
}

pub static REGISTRY: OnceLock<AdapterRegistry> = OnceLock::new();

fn registry() -> &'static AdapterRegistry {
    REGISTRY.get_or_init(AdapterRegistry::new)
}

impl AdapterRegistry {
    pub fn get() -> &'static AdapterRegistry {
        registry()
    }
}
