//! Typed property operations backed by native engine calls.
//!
//! Every bound wrapper reads and writes dependency properties through the engine,
//! keyed by `(handle, property-descriptor)`. The blanket impl keeps the surface on
//! the wrapper itself while the engine stays an explicit collaborator.

use serde_json::Value;

use crate::bridge::NativeWrapper;
use crate::engine::native::{EngineError, NativeEngine, PropertyDescriptor};

/// Property get/set/clear surface available on every [`NativeWrapper`].
pub trait PropertyOps: NativeWrapper {
    /// Effective value of `property`.
    fn get_value(
        &self,
        engine: &dyn NativeEngine,
        property: &PropertyDescriptor,
    ) -> Result<Value, EngineError> {
        let handle = self.native_handle().ok_or(EngineError::Unbound)?;
        engine.get_value(handle, property)
    }

    /// Set the local value of `property`.
    fn set_value(
        &self,
        engine: &dyn NativeEngine,
        property: &PropertyDescriptor,
        value: Value,
    ) -> Result<(), EngineError> {
        let handle = self.native_handle().ok_or(EngineError::Unbound)?;
        engine.set_value(handle, property, value)
    }

    /// Clear the local value of `property`.
    fn clear_value(
        &self,
        engine: &dyn NativeEngine,
        property: &PropertyDescriptor,
    ) -> Result<(), EngineError> {
        let handle = self.native_handle().ok_or(EngineError::Unbound)?;
        engine.clear_value(handle, property)
    }

    /// Local value of `property`, if one was explicitly set.
    fn read_local_value(
        &self,
        engine: &dyn NativeEngine,
        property: &PropertyDescriptor,
    ) -> Result<Option<Value>, EngineError> {
        let handle = self.native_handle().ok_or(EngineError::Unbound)?;
        engine.read_local_value(handle, property)
    }

    /// Value of `property` with animations excluded.
    fn animation_base_value(
        &self,
        engine: &dyn NativeEngine,
        property: &PropertyDescriptor,
    ) -> Result<Value, EngineError> {
        let handle = self.native_handle().ok_or(EngineError::Unbound)?;
        engine.animation_base_value(handle, property)
    }
}

impl<T: NativeWrapper + ?Sized> PropertyOps for T {}
