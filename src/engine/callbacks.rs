//! Managed callback surface registered with the native engine.
//!
//! The engine invokes these mid-layout and mid-parse; nothing may propagate across
//! the boundary. The internal entry points return `Result` and the boxed adapters
//! convert every failure into a logged no-op (or a `None` buffer for resource
//! fetches).

use std::io::Read;
use std::sync::{Arc, Weak};

use thiserror::Error;

use crate::app::Application;
use crate::bridge::NativeHandle;
use crate::resource::ResourceError;

/// Module name plus full type name, as reported by the engine's type info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub module: String,
    pub full_name: String,
}

impl TypeDescriptor {
    pub fn new(module: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            full_name: full_name.into(),
        }
    }
}

/// Failures inside callback handling. Logged at the boundary, never raised across it.
#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("module '{0}' is not loaded")]
    UnknownModule(String),

    #[error("type '{0}' is not declared by module '{1}'")]
    UnknownType(String, String),

    #[error("native handle {0} has no managed wrapper")]
    UnknownHandle(NativeHandle),

    #[error("wrapper for native handle {0} does not accept styles")]
    NotStyleable(NativeHandle),
}

/// Callback bundle handed to [`NativeEngine::register_callbacks`].
///
/// Holds a weak application reference so the engine-owned bundle never keeps the
/// managed side alive (no native/managed reference cycle).
///
/// [`NativeEngine::register_callbacks`]: crate::engine::native::NativeEngine::register_callbacks
pub struct EngineCallbacks {
    /// Apply the default style to an element that has no explicit style.
    pub apply_default_style: Box<dyn Fn(NativeHandle, &TypeDescriptor) + Send + Sync>,
    /// Convert deferred setter values once a parsed style is attached.
    pub apply_style: Box<dyn Fn(NativeHandle) + Send + Sync>,
    /// Resolve a relative locator and expose the resource bytes, or `None`.
    pub fetch_resource: Box<dyn Fn(&str) -> Option<Vec<u8>> + Send + Sync>,
    /// Native teardown notification; drops the identity-bridge mapping.
    pub release_wrapper: Box<dyn Fn(NativeHandle) + Send + Sync>,
}

impl EngineCallbacks {
    /// Build the callback bundle for an application instance.
    pub fn for_application(app: &Arc<Application>) -> Self {
        let weak = Arc::downgrade(app);

        let style_app = weak.clone();
        let apply_default_style = Box::new(move |element: NativeHandle, ty: &TypeDescriptor| {
            let Some(app) = Weak::upgrade(&style_app) else {
                return;
            };
            if let Err(err) = apply_default_style(&app, element, ty) {
                log::warn!("apply_default_style({}, {}): {}", element, ty.full_name, err);
            }
        });

        let deferred_app = weak.clone();
        let apply_style = Box::new(move |style: NativeHandle| {
            if let Some(app) = Weak::upgrade(&deferred_app) {
                apply_deferred_setters(&app, style);
            }
        });

        let fetch_app = weak.clone();
        let fetch_resource = Box::new(move |name: &str| -> Option<Vec<u8>> {
            let app = Weak::upgrade(&fetch_app)?;
            match fetch_resource(&app, name) {
                Ok(bytes) => bytes,
                Err(err) => {
                    log::debug!("fetch_resource('{}'): {}", name, err);
                    None
                }
            }
        });

        let release_app = weak;
        let release_wrapper = Box::new(move |handle: NativeHandle| {
            if let Some(app) = Weak::upgrade(&release_app) {
                app.bridge().unbind(handle);
            }
        });

        Self {
            apply_default_style,
            apply_style,
            fetch_resource,
            release_wrapper,
        }
    }
}

/// Look up the default style for `ty` and assign it onto the element wrapper.
///
/// A type with no default style is a successful no-op.
pub(crate) fn apply_default_style(
    app: &Application,
    element: NativeHandle,
    ty: &TypeDescriptor,
) -> Result<(), CallbackError> {
    let module = app
        .deployment()
        .module(&ty.module)
        .ok_or_else(|| CallbackError::UnknownModule(ty.module.clone()))?
        .clone();

    if module.component_by_full_name(&ty.full_name).is_none() {
        return Err(CallbackError::UnknownType(
            ty.full_name.clone(),
            ty.module.clone(),
        ));
    }

    let Some(style) = app.generic_style_for(&module, &ty.full_name) else {
        return Ok(());
    };

    let wrapper = app
        .bridge()
        .lookup(element)
        .ok_or(CallbackError::UnknownHandle(element))?;
    let styleable = wrapper
        .as_styleable()
        .ok_or(CallbackError::NotStyleable(element))?;
    styleable.set_style(style);
    Ok(())
}

/// Trigger deferred-setter conversion on a parsed style, if it has a wrapper.
pub(crate) fn apply_deferred_setters(app: &Application, style: NativeHandle) {
    let Some(wrapper) = app.bridge().lookup(style) else {
        return;
    };
    if let Some(style) = wrapper.as_deferred_style() {
        style.convert_setter_values();
    }
}

/// Resolve a relative locator and read the resource fully into memory.
pub(crate) fn fetch_resource(
    app: &Application,
    name: &str,
) -> Result<Option<Vec<u8>>, ResourceError> {
    let Some(mut stream) = app.resolve_resource(name)? else {
        return Ok(None);
    };
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}
