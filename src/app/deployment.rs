//! Deployment state: the unpacked package, its manifest, and loaded modules.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::app::module::Module;
use crate::app::AppError;
use crate::defaults;

/// Package manifest, `manifest.json` at the package root.
///
/// Names the entry module and the package parts expected to register themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManifest {
    pub entry_module: String,
    #[serde(default)]
    pub parts: Vec<String>,
}

impl PackageManifest {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(bytes).map_err(|e| AppError::InvalidManifest(e.to_string()))
    }
}

/// The running application's package: entry module, loaded modules, and the
/// directory the package was unpacked into.
#[derive(Debug)]
pub struct Deployment {
    entry_module: Arc<Module>,
    modules: Vec<Arc<Module>>,
    package_dir: PathBuf,
}

impl Deployment {
    /// Assemble a deployment directly from pre-built modules.
    ///
    /// The entry module is always part of the loaded-module list.
    pub fn new(entry_module: Arc<Module>, mut modules: Vec<Arc<Module>>, package_dir: PathBuf) -> Self {
        if !modules
            .iter()
            .any(|m| m.name() == entry_module.name())
        {
            modules.insert(0, entry_module.clone());
        }
        Self {
            entry_module,
            modules,
            package_dir,
        }
    }

    /// Assemble a deployment from an unpacked package directory.
    ///
    /// Reads `manifest.json`, picks the entry module out of the registered
    /// modules, and warns about manifest parts nothing registered for.
    pub fn from_package(package_dir: PathBuf, modules: Vec<Arc<Module>>) -> Result<Self, AppError> {
        let manifest_path = package_dir.join(defaults::MANIFEST_FILE);
        let bytes = std::fs::read(&manifest_path)
            .map_err(|e| AppError::InvalidManifest(format!("{:?}: {}", manifest_path, e)))?;
        let manifest = PackageManifest::from_slice(&bytes)?;

        for part in &manifest.parts {
            if !modules.iter().any(|m| m.name() == *part) {
                log::warn!("package part '{}' has no registered module", part);
            }
        }

        let entry_module = modules
            .iter()
            .find(|m| m.name() == manifest.entry_module)
            .cloned()
            .ok_or(AppError::MissingEntryModule(manifest.entry_module))?;

        Ok(Self {
            entry_module,
            modules,
            package_dir,
        })
    }

    /// Default directory a package named `name` is unpacked into.
    pub fn default_package_dir(name: &str) -> PathBuf {
        defaults::package_root().join(name)
    }

    /// The module that owns unqualified resource locators.
    pub fn entry_module(&self) -> &Arc<Module> {
        &self.entry_module
    }

    /// A loaded module by name.
    pub fn module(&self, name: &str) -> Option<&Arc<Module>> {
        self.modules.iter().find(|m| m.name() == name)
    }

    pub fn modules(&self) -> &[Arc<Module>] {
        &self.modules
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_module_joins_module_list() {
        let entry = Module::builder("App").build();
        let deployment = Deployment::new(entry, Vec::new(), PathBuf::from("/tmp/pkg"));

        assert!(deployment.module("App").is_some());
        assert!(deployment.module("Other").is_none());
    }

    #[test]
    fn test_default_package_dir_is_per_package() {
        let dir = Deployment::default_package_dir("App");
        assert!(dir.ends_with("packages/App"));
        assert_ne!(dir, Deployment::default_package_dir("Other"));
    }

    #[test]
    fn test_from_package_reads_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("manifest.json"),
            br#"{ "entry_module": "App", "parts": ["App", "Controls"] }"#,
        )
        .unwrap();

        let modules = vec![
            Module::builder("App").build(),
            Module::builder("Controls").build(),
        ];
        let deployment = Deployment::from_package(dir.path().to_path_buf(), modules).unwrap();
        assert_eq!(deployment.entry_module().name(), "App");
        assert_eq!(deployment.modules().len(), 2);
    }

    #[test]
    fn test_from_package_missing_entry_module_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("manifest.json"),
            br#"{ "entry_module": "Gone" }"#,
        )
        .unwrap();

        let err =
            Deployment::from_package(dir.path().to_path_buf(), vec![Module::builder("App").build()])
                .unwrap_err();
        assert!(matches!(err, AppError::MissingEntryModule(name) if name == "Gone"));
    }

    #[test]
    fn test_from_package_rejects_bad_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manifest.json"), b"not json").unwrap();

        let err = Deployment::from_package(dir.path().to_path_buf(), Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::InvalidManifest(_)));
    }
}
