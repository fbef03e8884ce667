//! Resource stream resolution and nested-archive extraction.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use zip::ZipArchive;

use crate::app::deployment::Deployment;
use crate::resource::locator::ResourceLocator;
use crate::resource::ResourceError;

/// An opened, seekable resource byte source.
///
/// Owned by the caller; the resolver does not cache stream contents.
pub struct ResourceStream {
    source: StreamSource,
    source_path: Option<PathBuf>,
}

enum StreamSource {
    Memory(Cursor<Arc<[u8]>>),
    File(File),
}

impl ResourceStream {
    /// Stream over shared in-memory bytes (embedded module resources).
    pub fn from_bytes(bytes: Arc<[u8]>) -> Self {
        Self {
            source: StreamSource::Memory(Cursor::new(bytes)),
            source_path: None,
        }
    }

    /// Stream over an owned buffer (nested-archive extraction).
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self::from_bytes(Arc::from(bytes))
    }

    /// Stream over a file in the package directory, tagged with its path.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            source: StreamSource::File(File::open(path)?),
            source_path: Some(path.to_path_buf()),
        })
    }

    /// Original file path for package-directory hits, `None` otherwise.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Total stream length in bytes.
    pub fn len(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }

    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Read for ResourceStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.source {
            StreamSource::Memory(cursor) => cursor.read(buf),
            StreamSource::File(file) => file.read(buf),
        }
    }
}

impl Seek for ResourceStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.source {
            StreamSource::Memory(cursor) => cursor.seek(pos),
            StreamSource::File(file) => file.seek(pos),
        }
    }
}

/// Resolve a symbolic locator against the deployment.
///
/// Precedence is fixed:
/// 1. A module-qualified locator names a loaded module, or resolution is a miss.
/// 2. Embedded module resources (case-insensitive), entry module by default.
/// 3. A file under the package directory.
///
/// Misses are `Ok(None)`; only contract violations in the locator itself error.
pub fn resolve(
    deployment: &Deployment,
    locator: &str,
) -> Result<Option<ResourceStream>, ResourceError> {
    let locator = ResourceLocator::parse(locator)?;

    let module = match &locator.module {
        Some(name) => match deployment.module(name) {
            Some(module) => module,
            None => return Ok(None),
        },
        None => deployment.entry_module(),
    };

    if let Some(bytes) = module.resource(&locator.path) {
        return Ok(Some(ResourceStream::from_bytes(bytes)));
    }

    let candidate = deployment.package_dir().join(&locator.path);
    if candidate.is_file() {
        match ResourceStream::from_file(&candidate) {
            Ok(stream) => return Ok(Some(stream)),
            Err(err) => {
                log::debug!("failed to open package file {:?}: {}", candidate, err);
            }
        }
    }

    Ok(None)
}

/// Extract `inner_path` from a zip container stream into memory.
///
/// The returned stream is positioned at offset 0. Extraction faults of any kind
/// (unreadable container, not a zip, missing entry) resolve to `Ok(None)`.
pub fn resolve_nested<R: Read>(
    mut container: R,
    inner_path: &str,
) -> Result<Option<ResourceStream>, ResourceError> {
    if inner_path.is_empty() {
        return Err(ResourceError::EmptyArchivePath);
    }

    let mut buffer = Vec::new();
    if let Err(err) = container.read_to_end(&mut buffer) {
        log::debug!("failed to read container stream: {}", err);
        return Ok(None);
    }

    let mut archive = match ZipArchive::new(Cursor::new(buffer)) {
        Ok(archive) => archive,
        Err(err) => {
            log::debug!("container is not a readable archive: {}", err);
            return Ok(None);
        }
    };

    let name = inner_path.strip_prefix('/').unwrap_or(inner_path);
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(err) => {
            log::debug!("archive entry '{}' not found: {}", name, err);
            return Ok(None);
        }
    };

    let mut bytes = Vec::new();
    if let Err(err) = entry.read_to_end(&mut bytes) {
        log::debug!("failed to extract archive entry '{}': {}", name, err);
        return Ok(None);
    }

    Ok(Some(ResourceStream::from_vec(bytes)))
}
