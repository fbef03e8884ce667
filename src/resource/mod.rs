//! Resource resolution for packaged applications.
//!
//! Locators take the form `[/][<module>;component/]<path>` and resolve in a fixed
//! order: embedded module resources first, then files unpacked into the package
//! directory. Lookup misses are `Ok(None)`, never errors.

pub mod locator;
pub mod resolver;

use thiserror::Error;

pub use locator::ResourceLocator;
pub use resolver::{resolve, resolve_nested, ResourceStream};

/// Errors raised by resource-locator contract violations.
///
/// Lookup misses do not surface here; they are `Ok(None)` results.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The locator string was empty
    #[error("resource locator is empty")]
    EmptyLocator,

    /// The locator carried a non-local URI scheme
    #[error("absolute '{0}' locator is not supported")]
    AbsoluteLocator(String),

    /// The inner path for nested-archive extraction was empty
    #[error("inner archive path is empty")]
    EmptyArchivePath,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
