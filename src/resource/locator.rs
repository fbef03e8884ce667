//! Symbolic resource locator parsing.

use std::fmt;

use crate::resource::ResourceError;

/// Separator between a module name and its component-relative path.
pub const COMPONENT_MARKER: &str = ";component/";

/// A parsed resource locator.
///
/// `module` is `None` when the locator names no source module, in which case
/// resolution falls back to the application's entry module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    pub module: Option<String>,
    pub path: String,
}

impl ResourceLocator {
    /// Parse `[/][<module>;component/]<path>`.
    ///
    /// The leading separator is optional in both forms. Absolute locators with a
    /// non-local scheme are rejected; everything else is accepted and resolved
    /// against the package.
    pub fn parse(raw: &str) -> Result<Self, ResourceError> {
        if raw.is_empty() {
            return Err(ResourceError::EmptyLocator);
        }

        if let Some(scheme) = uri_scheme(raw) {
            if !scheme.eq_ignore_ascii_case("file") {
                return Err(ResourceError::AbsoluteLocator(scheme.to_string()));
            }
        }

        let rest = raw.strip_prefix('/').unwrap_or(raw);
        match rest.find(COMPONENT_MARKER) {
            // An empty module name is preserved; no module is ever loaded under
            // it, so resolution treats the locator as a miss.
            Some(at) => Ok(Self {
                module: Some(rest[..at].to_string()),
                path: rest[at + COMPONENT_MARKER.len()..].to_string(),
            }),
            None => Ok(Self {
                module: None,
                path: rest.to_string(),
            }),
        }
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "/{}{}{}", module, COMPONENT_MARKER, self.path),
            None => write!(f, "{}", self.path),
        }
    }
}

/// The URI scheme of `raw`, if it plausibly carries one.
///
/// Single-character prefixes are not treated as schemes so Windows drive paths
/// stay resolvable.
fn uri_scheme(raw: &str) -> Option<&str> {
    let colon = raw.find(':')?;
    if colon < 2 {
        return None;
    }
    if let Some(slash) = raw.find('/') {
        if slash < colon {
            return None;
        }
    }
    let candidate = &raw[..colon];
    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')) {
        Some(candidate)
    } else {
        None
    }
}
