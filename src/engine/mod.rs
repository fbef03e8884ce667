//! Native engine boundary.
//!
//! This module provides:
//! - The engine contract the runtime calls into (`native`)
//! - The callback surface the engine calls back through (`callbacks`)

pub mod callbacks;
pub mod native;

pub use callbacks::{EngineCallbacks, TypeDescriptor};
pub use native::{EngineError, NativeEngine, PropertyDescriptor};
