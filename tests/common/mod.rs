//! Shared fixtures: an in-process fake engine, a line-oriented markup loader,
//! and wrapper types exercising the styling capabilities.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use serde_json::Value;
use trellis::{
    DeferredStyle, EngineCallbacks, EngineError, HandleCell, MarkupError, MarkupLoader, Module,
    NativeEngine, NativeHandle, NativeWrapper, PropertyDescriptor, Setter, SetterValue, Style,
    StyleDictionary, Styleable, TypeDescriptor,
};

/// Serializes tests that touch the process-wide current-application slot.
pub fn serial() -> MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// In-process stand-in for the native engine.
///
/// Stores registered callbacks so tests can drive them the way the real engine
/// would, and backs the property store with a hash map.
pub struct FakeEngine {
    next_handle: AtomicU64,
    callbacks: Mutex<Option<EngineCallbacks>>,
    values: Mutex<HashMap<(NativeHandle, String), Value>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_handle: AtomicU64::new(1),
            callbacks: Mutex::new(None),
            values: Mutex::new(HashMap::new()),
        })
    }

    /// Allocate a handle for a native-side object.
    pub fn allocate(&self) -> NativeHandle {
        NativeHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }

    pub fn invoke_apply_default_style(&self, element: NativeHandle, ty: &TypeDescriptor) {
        let callbacks = self.callbacks.lock().unwrap();
        let callbacks = callbacks.as_ref().expect("callbacks registered");
        (callbacks.apply_default_style)(element, ty);
    }

    pub fn invoke_apply_style(&self, style: NativeHandle) {
        let callbacks = self.callbacks.lock().unwrap();
        let callbacks = callbacks.as_ref().expect("callbacks registered");
        (callbacks.apply_style)(style);
    }

    pub fn invoke_fetch_resource(&self, name: &str) -> Option<Vec<u8>> {
        let callbacks = self.callbacks.lock().unwrap();
        let callbacks = callbacks.as_ref().expect("callbacks registered");
        (callbacks.fetch_resource)(name)
    }

    pub fn invoke_release_wrapper(&self, handle: NativeHandle) {
        let callbacks = self.callbacks.lock().unwrap();
        let callbacks = callbacks.as_ref().expect("callbacks registered");
        (callbacks.release_wrapper)(handle);
    }
}

impl NativeEngine for FakeEngine {
    fn create_application(&self) -> NativeHandle {
        self.allocate()
    }

    fn register_callbacks(&self, _application: NativeHandle, callbacks: EngineCallbacks) {
        *self.callbacks.lock().unwrap() = Some(callbacks);
    }

    fn get_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
    ) -> Result<Value, EngineError> {
        Ok(self
            .values
            .lock()
            .unwrap()
            .get(&(handle, property.to_string()))
            .cloned()
            .unwrap_or(Value::Null))
    }

    fn set_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
        value: Value,
    ) -> Result<(), EngineError> {
        self.values
            .lock()
            .unwrap()
            .insert((handle, property.to_string()), value);
        Ok(())
    }

    fn clear_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
    ) -> Result<(), EngineError> {
        self.values
            .lock()
            .unwrap()
            .remove(&(handle, property.to_string()));
        Ok(())
    }

    fn read_local_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
    ) -> Result<Option<Value>, EngineError> {
        Ok(self
            .values
            .lock()
            .unwrap()
            .get(&(handle, property.to_string()))
            .cloned())
    }

    fn animation_base_value(
        &self,
        handle: NativeHandle,
        property: &PropertyDescriptor,
    ) -> Result<Value, EngineError> {
        self.get_value(handle, property)
    }
}

/// Markup loader over a trivial line format:
/// `Full.Type.Name property=value ...` per line, `!!bad` anywhere fails the
/// parse. Hydrations are recorded for assertions.
pub struct RecordingLoader {
    pub parse_calls: AtomicUsize,
    pub hydrated: Mutex<Vec<(NativeHandle, String)>>,
}

impl RecordingLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            parse_calls: AtomicUsize::new(0),
            hydrated: Mutex::new(Vec::new()),
        })
    }
}

impl MarkupLoader for RecordingLoader {
    fn parse_style_dictionary(
        &self,
        _module: &Module,
        markup: &str,
    ) -> Result<StyleDictionary, MarkupError> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        if markup.contains("!!bad") {
            return Err(MarkupError::Parse("unexpected token".into()));
        }
        let mut dictionary = StyleDictionary::new();
        for line in markup.lines().filter(|l| !l.trim().is_empty()) {
            let mut parts = line.split_whitespace();
            let full_name = parts.next().unwrap_or_default().to_string();
            let setters = parts
                .map(|assignment| {
                    let (property, value) = assignment.split_once('=').unwrap_or((assignment, ""));
                    Setter {
                        property: property.to_string(),
                        value: SetterValue::Literal(Value::from(value)),
                    }
                })
                .collect();
            dictionary.insert(
                full_name.clone(),
                Style {
                    target_type: full_name,
                    setters,
                },
            );
        }
        Ok(dictionary)
    }

    fn hydrate(
        &self,
        target: NativeHandle,
        _module: &Module,
        markup: &str,
    ) -> Result<(), MarkupError> {
        self.hydrated
            .lock()
            .unwrap()
            .push((target, markup.to_string()));
        Ok(())
    }
}

/// Element wrapper that accepts a default style.
pub struct FakeElement {
    cell: HandleCell,
    pub style: Mutex<Option<Style>>,
}

impl FakeElement {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            cell: HandleCell::new(),
            style: Mutex::new(None),
        })
    }
}

impl NativeWrapper for FakeElement {
    fn handle_cell(&self) -> &HandleCell {
        &self.cell
    }

    fn as_styleable(&self) -> Option<&dyn Styleable> {
        Some(self)
    }
}

impl Styleable for FakeElement {
    fn set_style(&self, style: Style) {
        *self.style.lock().unwrap() = Some(style);
    }
}

/// Parsed-style wrapper holding deferred setter values.
pub struct FakeStyleObject {
    cell: HandleCell,
    pub converted: AtomicBool,
}

impl FakeStyleObject {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            cell: HandleCell::new(),
            converted: AtomicBool::new(false),
        })
    }
}

impl NativeWrapper for FakeStyleObject {
    fn handle_cell(&self) -> &HandleCell {
        &self.cell
    }

    fn as_deferred_style(&self) -> Option<&dyn DeferredStyle> {
        Some(self)
    }
}

impl DeferredStyle for FakeStyleObject {
    fn convert_setter_values(&self) {
        self.converted.store(true, Ordering::SeqCst);
    }
}

/// Wrapper with no styling capabilities.
pub struct PlainWrapper {
    cell: HandleCell,
}

impl PlainWrapper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            cell: HandleCell::new(),
        })
    }
}

impl NativeWrapper for PlainWrapper {
    fn handle_cell(&self) -> &HandleCell {
        &self.cell
    }
}
