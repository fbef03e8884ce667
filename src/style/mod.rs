//! Default styles and the per-module style cache.
//!
//! Each module may ship a conventional `themes/generic.xml` document whose root
//! is a style dictionary. The cache memoizes one dictionary per module: the
//! first lookup to finish resolving and parsing the document installs it, and
//! both success and failure are memoized (a module with no usable document gets
//! an empty dictionary so resolution is never retried).

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::app::deployment::Deployment;
use crate::app::module::Module;
use crate::defaults;
use crate::markup::MarkupLoader;
use crate::resource;

/// A setter value, either resolved at parse time or deferred until the style is
/// attached to a context that can resolve it.
#[derive(Debug, Clone, PartialEq)]
pub enum SetterValue {
    Literal(Value),
    Deferred(String),
}

/// One property assignment inside a style.
#[derive(Debug, Clone, PartialEq)]
pub struct Setter {
    pub property: String,
    pub value: SetterValue,
}

/// A reusable bundle of property setters targeting one type.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub target_type: String,
    pub setters: Vec<Setter>,
}

/// Capability of elements that accept a default style.
pub trait Styleable: Send + Sync {
    fn set_style(&self, style: Style);
}

/// Capability of parsed style objects holding deferred setter values.
pub trait DeferredStyle: Send + Sync {
    /// Convert any setter values that were deferred at parse time.
    fn convert_setter_values(&self);
}

/// Mapping from fully-qualified type name to style, one per module.
#[derive(Debug, Clone, Default)]
pub struct StyleDictionary {
    styles: HashMap<String, Style>,
}

impl StyleDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, full_type_name: impl Into<String>, style: Style) {
        self.styles.insert(full_type_name.into(), style);
    }

    pub fn get(&self, full_type_name: &str) -> Option<&Style> {
        self.styles.get(full_type_name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl FromIterator<(String, Style)> for StyleDictionary {
    fn from_iter<I: IntoIterator<Item = (String, Style)>>(iter: I) -> Self {
        Self {
            styles: iter.into_iter().collect(),
        }
    }
}

/// Per-module cache of lazily built default-style dictionaries.
#[derive(Default)]
pub struct StyleCache {
    dictionaries: Mutex<HashMap<String, Arc<StyleDictionary>>>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default style for `full_type_name`, owned by `module`.
    ///
    /// Builds the module's dictionary on first use and memoizes it for the
    /// process lifetime. The build runs outside the cache lock: the loader may
    /// re-enter this cache mid-parse when markup instantiation triggers another
    /// default-style request. Concurrent first lookups may build the same
    /// dictionary, but the first writer wins and everyone observes its result.
    pub fn style_for(
        &self,
        deployment: &Deployment,
        loader: &dyn MarkupLoader,
        module: &Arc<Module>,
        full_type_name: &str,
    ) -> Option<Style> {
        {
            let dictionaries = self.dictionaries.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(dictionary) = dictionaries.get(module.name()) {
                return dictionary.get(full_type_name).cloned();
            }
        }

        let built = Arc::new(load_generic_styles(deployment, loader, module));

        let mut dictionaries = self.dictionaries.lock().unwrap_or_else(|e| e.into_inner());
        let dictionary = dictionaries
            .entry(module.name().to_string())
            .or_insert(built);
        dictionary.get(full_type_name).cloned()
    }
}

/// Resolve and parse a module's generic style document.
///
/// Missing documents and parse faults degrade to an empty dictionary; both
/// outcomes are cached by the caller so the attempt is never repeated.
fn load_generic_styles(
    deployment: &Deployment,
    loader: &dyn MarkupLoader,
    module: &Module,
) -> StyleDictionary {
    let locator = defaults::generic_theme_locator(module.name());
    log::debug!("loading default styles from {}", locator);

    let stream = match resource::resolve(deployment, &locator) {
        Ok(Some(stream)) => stream,
        Ok(None) => {
            log::debug!("no default style document for module '{}'", module.name());
            return StyleDictionary::new();
        }
        Err(err) => {
            log::warn!(
                "failed to resolve default styles for module '{}': {}",
                module.name(),
                err
            );
            return StyleDictionary::new();
        }
    };

    let mut markup = String::new();
    let mut stream = stream;
    if let Err(err) = stream.read_to_string(&mut markup) {
        log::warn!(
            "failed to read default style document for module '{}': {}",
            module.name(),
            err
        );
        return StyleDictionary::new();
    }

    match loader.parse_style_dictionary(module, &markup) {
        Ok(dictionary) => dictionary,
        Err(err) => {
            log::warn!(
                "failed to parse default styles for module '{}': {}",
                module.name(),
                err
            );
            StyleDictionary::new()
        }
    }
}
