//! Namespace-import registry and markup type resolution.
//!
//! Markup references types by simple name. Resolution only succeeds for names
//! whose XML namespace is both declared by a loaded module and explicitly
//! imported. Modules publish their type tables statically (see
//! [`Module::builder`]); resolution is a flat scan over registered mappings in
//! insertion order, first match wins.
//!
//! [`Module::builder`]: crate::app::module::Module::builder

use std::any::Any;
use std::sync::{Arc, Mutex};

use crate::app::module::{ComponentEntry, Module};
use crate::defaults;

/// An XML namespace mapped to a (module-namespace, module) pair.
#[derive(Debug, Clone)]
pub struct NamespaceMapping {
    pub xml_namespace: String,
    pub module_namespace: String,
    pub module: Arc<Module>,
}

/// A resolved component type: owning module plus its table entry.
#[derive(Debug, Clone)]
pub struct ComponentType {
    module: Arc<Module>,
    entry: ComponentEntry,
}

impl ComponentType {
    pub fn full_name(&self) -> String {
        self.entry.full_name()
    }

    pub fn module(&self) -> &Arc<Module> {
        &self.module
    }

    /// Default-construct an instance through the entry's factory.
    pub fn instantiate(&self) -> Box<dyn Any> {
        (self.entry.factory)()
    }
}

#[derive(Default)]
struct RegistryState {
    imported: Vec<String>,
    mappings: Vec<NamespaceMapping>,
}

/// Registry of imported XML namespaces and module-declared mappings.
pub struct NamespaceRegistry {
    state: Mutex<RegistryState>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceRegistry {
    /// Create a registry with the framework's own namespaces pre-imported.
    pub fn new() -> Self {
        let registry = Self {
            state: Mutex::new(RegistryState::default()),
        };
        registry.import_namespace(defaults::FRAMEWORK_XMLNS);
        registry.import_namespace(defaults::CONTROLS_XMLNS);
        registry
    }

    /// Bring an XML namespace into scope for type lookup.
    pub fn import_namespace(&self, xml_namespace: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.imported.push(xml_namespace.to_string());
    }

    /// Record every namespace mapping a module declares.
    ///
    /// Re-registering the same declaration overwrites its mapping in place;
    /// distinct declarations accumulate. Safe to call again after a module
    /// reload.
    pub fn register_module(&self, module: &Arc<Module>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for definition in module.xmlns_definitions() {
            let existing = state.mappings.iter_mut().find(|mapping| {
                mapping.module.name() == module.name()
                    && mapping.xml_namespace == definition.xml_namespace
                    && mapping.module_namespace == definition.module_namespace
            });
            match existing {
                Some(mapping) => mapping.module = module.clone(),
                None => state.mappings.push(NamespaceMapping {
                    xml_namespace: definition.xml_namespace.clone(),
                    module_namespace: definition.module_namespace.clone(),
                    module: module.clone(),
                }),
            }
        }
    }

    /// Resolve a simple type name against the imported mappings.
    ///
    /// Scans mappings in registration order and returns the first entry whose
    /// module namespace and simple name match. Identically-named types under
    /// distinct imported mappings resolve to whichever mapping registered first.
    pub fn resolve_type(&self, name: &str) -> Option<ComponentType> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for mapping in &state.mappings {
            if !state.imported.iter().any(|ns| ns == &mapping.xml_namespace) {
                continue;
            }
            let found = mapping.module.components().iter().find(|entry| {
                entry.module_namespace == mapping.module_namespace && entry.name == name
            });
            if let Some(entry) = found {
                return Some(ComponentType {
                    module: mapping.module.clone(),
                    entry: entry.clone(),
                });
            }
        }
        None
    }

    /// Resolve a type name and default-construct it.
    ///
    /// A failed resolution is logged and yields `None` rather than an error;
    /// markup instantiation continues without the component.
    pub fn create_component(&self, name: &str) -> Option<Box<dyn Any>> {
        match self.resolve_type(name) {
            Some(component) => Some(component.instantiate()),
            None => {
                log::error!("create_component: could not find type '{}'", name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::module::Module;

    const WIDGETS_XMLNS: &str = "urn:test:widgets";

    fn widgets_module() -> Arc<Module> {
        Module::builder("Widgets")
            .xmlns(WIDGETS_XMLNS, "Widgets.Controls")
            .component("Widgets.Controls", "Button", || Box::new(42u32))
            .component("Widgets.Controls", "Slider", || Box::new(0u32))
            .build()
    }

    #[test]
    fn test_unimported_namespace_does_not_resolve() {
        let registry = NamespaceRegistry::new();
        registry.register_module(&widgets_module());

        assert!(registry.resolve_type("Button").is_none());
    }

    #[test]
    fn test_import_plus_mapping_resolves() {
        let registry = NamespaceRegistry::new();
        registry.register_module(&widgets_module());
        registry.import_namespace(WIDGETS_XMLNS);

        let component = registry.resolve_type("Button").expect("type should resolve");
        assert_eq!(component.full_name(), "Widgets.Controls.Button");
        assert_eq!(component.module().name(), "Widgets");
    }

    #[test]
    fn test_first_registered_mapping_wins() {
        let other = Module::builder("Other")
            .xmlns("urn:test:other", "Other.Ns")
            .component("Other.Ns", "Button", || Box::new(7u32))
            .build();

        let registry = NamespaceRegistry::new();
        registry.register_module(&widgets_module());
        registry.register_module(&other);
        registry.import_namespace(WIDGETS_XMLNS);
        registry.import_namespace("urn:test:other");

        let component = registry.resolve_type("Button").unwrap();
        assert_eq!(component.module().name(), "Widgets");
    }

    #[test]
    fn test_reregistering_module_overwrites_mapping() {
        let registry = NamespaceRegistry::new();
        let module = widgets_module();
        registry.register_module(&module);
        registry.register_module(&module);

        let state = registry.state.lock().unwrap();
        assert_eq!(state.mappings.len(), 1);
    }

    #[test]
    fn test_create_component_instantiates() {
        let registry = NamespaceRegistry::new();
        registry.register_module(&widgets_module());
        registry.import_namespace(WIDGETS_XMLNS);

        let instance = registry.create_component("Button").unwrap();
        assert_eq!(instance.downcast_ref::<u32>(), Some(&42));
    }

    #[test]
    fn test_create_component_unknown_name_is_none() {
        let registry = NamespaceRegistry::new();
        assert!(registry.create_component("Nonexistent").is_none());
    }
}
