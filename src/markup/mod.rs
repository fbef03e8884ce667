//! Markup loader collaborator contract.
//!
//! The declarative-markup parser/instantiator is external to this crate. It
//! consumes byte streams produced by the resource resolver and hands object
//! graphs back through the identity bridge; this module only defines the seam.

use thiserror::Error;

use crate::app::module::Module;
use crate::bridge::NativeHandle;
use crate::style::StyleDictionary;

/// Errors reported by the markup loader.
#[derive(Error, Debug)]
pub enum MarkupError {
    /// The document failed to parse
    #[error("markup parse error: {0}")]
    Parse(String),

    /// The document parsed, but its root is not a style dictionary
    #[error("markup root is not a style dictionary")]
    NotAStyleDictionary,

    /// Hydration of an existing object failed
    #[error("hydration failed: {0}")]
    Hydrate(String),
}

/// Parser/instantiator for declarative UI documents.
///
/// Both operations are scoped to the module whose markup is being processed, so
/// the loader can resolve relative resource references and type names against
/// it.
pub trait MarkupLoader: Send + Sync {
    /// Parse a document whose root must be a style dictionary.
    fn parse_style_dictionary(
        &self,
        module: &Module,
        markup: &str,
    ) -> Result<StyleDictionary, MarkupError>;

    /// Populate the property graph of an existing native-backed object.
    fn hydrate(
        &self,
        target: NativeHandle,
        module: &Module,
        markup: &str,
    ) -> Result<(), MarkupError>;
}
