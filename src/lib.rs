//! Trellis - bootstrap and resource-resolution layer for a rich-client UI runtime.
//!
//! The native rendering engine owns layout and drawing; this crate owns everything the
//! engine calls back into the managed side for:
//!
//! - resolving symbolic resource locators against a packaged application (`resource`)
//! - lazily loading and memoizing per-module default styles (`style`)
//! - mapping opaque native handles to managed wrapper objects (`bridge`)
//! - resolving markup type names through imported namespace mappings (`registry`)
//! - application lifetime and the native callback surface (`app`, `engine`)
//!
//! The markup parser and the engine itself are external collaborators, reached through
//! the `MarkupLoader` and `NativeEngine` traits.

mod defaults;
pub mod error;

pub mod app;
pub mod bridge;
pub mod engine;
pub mod markup;
pub mod registry;
pub mod resource;
pub mod style;

pub use error::{Error, Result};

pub use app::deployment::{Deployment, PackageManifest};
pub use app::module::{ComponentEntry, ComponentFactory, Module, ModuleBuilder, XmlnsDefinition};
pub use app::{AppError, Application};

pub use bridge::properties::PropertyOps;
pub use bridge::{BridgeError, HandleCell, IdentityBridge, NativeHandle, NativeWrapper};

pub use engine::callbacks::{EngineCallbacks, TypeDescriptor};
pub use engine::native::{EngineError, NativeEngine, PropertyDescriptor};

pub use markup::{MarkupError, MarkupLoader};

pub use registry::{ComponentType, NamespaceMapping, NamespaceRegistry};

pub use resource::locator::ResourceLocator;
pub use resource::resolver::ResourceStream;
pub use resource::ResourceError;

pub use style::{DeferredStyle, Setter, SetterValue, Style, StyleCache, StyleDictionary, Styleable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
