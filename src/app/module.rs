//! Loadable package modules and their published metadata.
//!
//! A module is the unit of packaging: a name, the resources embedded at build
//! time, the XML namespaces it declares, and a static table of the component
//! types it exports. Modules publish everything up front through the builder;
//! nothing is discovered by scanning at resolution time.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Factory producing a default-constructed component instance.
pub type ComponentFactory = fn() -> Box<dyn Any>;

/// Associates an XML namespace with a module namespace, as declared by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlnsDefinition {
    pub xml_namespace: String,
    pub module_namespace: String,
}

/// One exported component type: namespace, simple name, and factory.
#[derive(Clone)]
pub struct ComponentEntry {
    pub module_namespace: String,
    pub name: String,
    pub factory: ComponentFactory,
}

impl ComponentEntry {
    /// Fully-qualified type name, `<module-namespace>.<name>`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.module_namespace, self.name)
    }
}

impl fmt::Debug for ComponentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentEntry")
            .field("module_namespace", &self.module_namespace)
            .field("name", &self.name)
            .finish()
    }
}

/// A loaded module of the running application.
#[derive(Debug)]
pub struct Module {
    name: String,
    // Keys are lowercased; embedded resource lookup is case-insensitive.
    resources: HashMap<String, Arc<[u8]>>,
    xmlns_definitions: Vec<XmlnsDefinition>,
    components: Vec<ComponentEntry>,
}

impl Module {
    pub fn builder(name: impl Into<String>) -> ModuleBuilder {
        ModuleBuilder {
            name: name.into(),
            resources: HashMap::new(),
            xmlns_definitions: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// An embedded resource by package-relative path, case-insensitive.
    pub fn resource(&self, path: &str) -> Option<Arc<[u8]>> {
        self.resources.get(&path.to_lowercase()).cloned()
    }

    pub fn xmlns_definitions(&self) -> &[XmlnsDefinition] {
        &self.xmlns_definitions
    }

    pub fn components(&self) -> &[ComponentEntry] {
        &self.components
    }

    /// An exported component by fully-qualified type name.
    pub fn component_by_full_name(&self, full_name: &str) -> Option<&ComponentEntry> {
        self.components
            .iter()
            .find(|entry| entry.full_name() == full_name)
    }
}

/// Builder through which a module publishes its resources and type table.
pub struct ModuleBuilder {
    name: String,
    resources: HashMap<String, Arc<[u8]>>,
    xmlns_definitions: Vec<XmlnsDefinition>,
    components: Vec<ComponentEntry>,
}

impl ModuleBuilder {
    /// Embed a build-time resource under a package-relative path.
    pub fn resource(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.resources
            .insert(path.into().to_lowercase(), Arc::from(bytes));
        self
    }

    /// Declare an XML-namespace to module-namespace mapping.
    pub fn xmlns(
        mut self,
        xml_namespace: impl Into<String>,
        module_namespace: impl Into<String>,
    ) -> Self {
        self.xmlns_definitions.push(XmlnsDefinition {
            xml_namespace: xml_namespace.into(),
            module_namespace: module_namespace.into(),
        });
        self
    }

    /// Export a component type.
    pub fn component(
        mut self,
        module_namespace: impl Into<String>,
        name: impl Into<String>,
        factory: ComponentFactory,
    ) -> Self {
        self.components.push(ComponentEntry {
            module_namespace: module_namespace.into(),
            name: name.into(),
            factory,
        });
        self
    }

    pub fn build(self) -> Arc<Module> {
        Arc::new(Module {
            name: self.name,
            resources: self.resources,
            xmlns_definitions: self.xmlns_definitions,
            components: self.components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_lookup_is_case_insensitive() {
        let module = Module::builder("App")
            .resource("Themes/Generic.xml", b"x".to_vec())
            .build();

        assert!(module.resource("themes/generic.xml").is_some());
        assert!(module.resource("THEMES/GENERIC.XML").is_some());
        assert!(module.resource("themes/other.xml").is_none());
    }

    #[test]
    fn test_component_full_name() {
        let module = Module::builder("Controls")
            .component("Controls.Primitives", "Button", || Box::new(()))
            .build();

        let entry = module
            .component_by_full_name("Controls.Primitives.Button")
            .expect("component should be declared");
        assert_eq!(entry.name, "Button");
        assert_eq!(entry.full_name(), "Controls.Primitives.Button");
    }
}
