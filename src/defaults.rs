//! Well-known names and locations used across the runtime.

use std::path::PathBuf;

/// XML namespace of the framework's core types, imported for every application.
pub const FRAMEWORK_XMLNS: &str = "urn:trellis:framework";

/// XML namespace of the built-in control set, imported for every application.
pub const CONTROLS_XMLNS: &str = "urn:trellis:controls";

/// Package-relative path of a module's default-style document.
pub const GENERIC_THEME_PATH: &str = "themes/generic.xml";

/// File name of the package manifest inside an unpacked application package.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Root directory under which application packages are unpacked by default.
pub fn package_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("trellis")
        .join("packages")
}

/// Conventional locator of a module's default-style document.
pub fn generic_theme_locator(module_name: &str) -> String {
    format!("/{};component/{}", module_name, GENERIC_THEME_PATH)
}
