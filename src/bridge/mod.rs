//! Native/managed identity bridge.
//!
//! Every managed object that participates in native interop registers its engine
//! handle here at construction. The bridge guarantees object identity: one live
//! wrapper per handle, with explicit removal driven by native teardown notification.

pub mod properties;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use thiserror::Error;

use crate::style::{DeferredStyle, Styleable};

/// Errors raised by identity-bridge contract violations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The wrapper was already assigned a native handle.
    #[error("wrapper is already bound to native handle {0}")]
    AlreadyBound(NativeHandle),

    /// The handle is already mapped to a live wrapper.
    #[error("native handle {0} is already mapped to a live wrapper")]
    HandleInUse(NativeHandle),
}

/// Opaque identifier into the native engine's object graph.
///
/// Not independently meaningful without an associated managed wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(u64);

impl NativeHandle {
    /// Wrap a raw engine identifier. Called by engine implementations only.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Once-settable native handle slot owned by a wrapper.
///
/// Handles are assigned exactly once, at construction; a second assignment is a
/// state error.
#[derive(Debug, Default)]
pub struct HandleCell(OnceLock<NativeHandle>);

impl HandleCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<NativeHandle> {
        self.0.get().copied()
    }

    fn set(&self, handle: NativeHandle) -> Result<(), BridgeError> {
        self.0
            .set(handle)
            .map_err(|_| BridgeError::AlreadyBound(self.get().unwrap_or(handle)))
    }
}

/// A managed object backed by a native engine object.
///
/// Implementors store a [`HandleCell`] and register themselves with the
/// [`IdentityBridge`] at construction. The capability probes let boundary
/// callbacks discover styling support without knowing concrete types.
pub trait NativeWrapper: Send + Sync {
    fn handle_cell(&self) -> &HandleCell;

    /// The wrapper's native handle, if one has been bound.
    fn native_handle(&self) -> Option<NativeHandle> {
        self.handle_cell().get()
    }

    /// Styling capability, for elements that accept a default style.
    fn as_styleable(&self) -> Option<&dyn Styleable> {
        None
    }

    /// Deferred-setter capability, for style objects parsed from markup.
    fn as_deferred_style(&self) -> Option<&dyn DeferredStyle> {
        None
    }
}

/// Bidirectional identity map between native handles and managed wrappers.
#[derive(Default)]
pub struct IdentityBridge {
    map: RwLock<HashMap<NativeHandle, Arc<dyn NativeWrapper>>>,
}

impl IdentityBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle -> wrapper` and assign the handle to the wrapper.
    ///
    /// Fails without mutating the existing mapping if the handle is already
    /// mapped, or if the wrapper already carries a handle.
    pub fn bind(&self, handle: NativeHandle, wrapper: Arc<dyn NativeWrapper>) -> Result<(), BridgeError> {
        let mut map = self.map.write().unwrap_or_else(|e| e.into_inner());
        if map.contains_key(&handle) {
            return Err(BridgeError::HandleInUse(handle));
        }
        wrapper.handle_cell().set(handle)?;
        map.insert(handle, wrapper);
        Ok(())
    }

    /// The wrapper previously bound for `handle`, or `None` for a purely native
    /// object never surfaced to managed code.
    pub fn lookup(&self, handle: NativeHandle) -> Option<Arc<dyn NativeWrapper>> {
        let map = self.map.read().unwrap_or_else(|e| e.into_inner());
        map.get(&handle).cloned()
    }

    /// Drop the mapping for `handle`.
    ///
    /// Invoked from the engine's teardown notification so the bridge never keeps
    /// a wrapper alive past its native object.
    pub fn unbind(&self, handle: NativeHandle) -> Option<Arc<dyn NativeWrapper>> {
        let mut map = self.map.write().unwrap_or_else(|e| e.into_inner());
        map.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
