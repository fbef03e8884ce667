//! Application shell and deployment state.
//!
//! This module provides:
//! - The application lifetime root and native callback wiring (`application`)
//! - The unpacked package, manifest, and loaded-module list (`deployment`)
//! - Loadable modules and their published metadata (`module`)

pub mod application;
pub mod deployment;
pub mod module;

use thiserror::Error;

pub use application::Application;
pub use deployment::{Deployment, PackageManifest};
pub use module::{ComponentEntry, ComponentFactory, Module, ModuleBuilder, XmlnsDefinition};

/// Errors raised by the application shell.
#[derive(Error, Debug)]
pub enum AppError {
    /// The package manifest is missing or unreadable
    #[error("package manifest is invalid: {0}")]
    InvalidManifest(String),

    /// The manifest names an entry module nothing registered
    #[error("entry module '{0}' is not registered")]
    MissingEntryModule(String),

    /// A hydration target was never bound to a native handle
    #[error("hydration target has no native handle")]
    TargetNotBound,
}
