//! Error types for Trellis.

use thiserror::Error;

/// Trellis error type.
///
/// Contract violations on the public surface (empty locators, disallowed schemes,
/// re-binding a bound handle) surface here and are never swallowed. Environmental
/// faults (missing resources, malformed style documents) do not reach this type;
/// they degrade to `None`/empty results at the call site.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource locator or resolution error
    #[error("resource error: {0}")]
    Resource(#[from] crate::resource::ResourceError),

    /// Identity bridge error
    #[error("bridge error: {0}")]
    Bridge(#[from] crate::bridge::BridgeError),

    /// Native engine call error
    #[error("engine error: {0}")]
    Engine(#[from] crate::engine::native::EngineError),

    /// Markup loader error
    #[error("markup error: {0}")]
    Markup(#[from] crate::markup::MarkupError),

    /// Application shell error
    #[error("application error: {0}")]
    App(#[from] crate::app::AppError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
