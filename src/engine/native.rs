//! Contract of the native rendering/layout engine.
//!
//! The engine is an external collaborator: opaque except for application-object
//! construction, callback registration, and the dependency-property store. Property
//! values cross the boundary as JSON values.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::bridge::NativeHandle;
use crate::engine::callbacks::EngineCallbacks;

/// Errors surfaced by native engine calls.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The wrapper has no native handle bound yet
    #[error("wrapper has no bound native handle")]
    Unbound,

    /// The property is unknown to the engine
    #[error("unknown property {0}")]
    UnknownProperty(String),

    /// The engine rejected the call
    #[error("engine call failed: {0}")]
    Call(String),
}

/// Identifies a dependency property by owner type and property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    pub owner: String,
    pub name: String,
}

impl PropertyDescriptor {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// Native rendering engine surface used by the managed core.
///
/// All operations are synchronous; the engine may invoke the registered callbacks
/// re-entrantly on its own call stack.
pub trait NativeEngine: Send + Sync {
    /// Allocate the native application object and return its handle.
    fn create_application(&self) -> NativeHandle;

    /// Register the managed callback surface for an application instance.
    ///
    /// Called once per application; the engine invokes these during layout and
    /// parsing, possibly from a non-UI context.
    fn register_callbacks(&self, application: NativeHandle, callbacks: EngineCallbacks);

    /// Effective value of `property` on the object behind `handle`.
    fn get_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
    ) -> Result<Value, EngineError>;

    /// Set the local value of `property`.
    fn set_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
        value: Value,
    ) -> Result<(), EngineError>;

    /// Clear the local value of `property`.
    fn clear_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
    ) -> Result<(), EngineError>;

    /// Local value of `property`, or `None` if only defaults/inherited apply.
    fn read_local_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
    ) -> Result<Option<Value>, EngineError>;

    /// Value of `property` with animation effects excluded.
    fn animation_base_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
    ) -> Result<Value, EngineError>;
}
