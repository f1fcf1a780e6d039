//! Local file persistence for session photos and album exports.

use crate::capability::{FileStore, Gallery, ImageHandle};
use crate::errors::BoothError;
use crate::permissions::PermissionStatus;
use std::fs;
use std::path::{Path, PathBuf};

/// Copies captures out of the camera's scratch space into a directory the
/// session owns.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    dir: PathBuf,
    prefix: String,
}

impl LocalFileStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(&self, index: usize, extension: &str) -> String {
        format!(
            "{}_{}_{}_{}.{}",
            self.prefix,
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple(),
            index,
            extension
        )
    }
}

impl FileStore for LocalFileStore {
    fn copy_to_app_storage(&self, image: &ImageHandle, index: usize) -> Result<String, BoothError> {
        // Content URIs and other non-file handles are already durable.
        let Some(source) = image.local_path() else {
            log::debug!("Keeping non-file handle {} as-is", image.uri);
            return Ok(image.uri.clone());
        };

        fs::create_dir_all(&self.dir)?;
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();
        let destination = self.dir.join(self.file_name(index, &extension));
        fs::copy(&source, &destination).map_err(|e| {
            BoothError::Io(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                destination.display(),
                e
            ))
        })?;

        log::debug!("Stored photo {} at {}", index, destination.display());
        Ok(ImageHandle::from_path(&destination).uri)
    }
}

/// Album export onto the local file system: one folder per album.
#[derive(Debug, Clone)]
pub struct DirectoryGallery {
    root: PathBuf,
}

impl DirectoryGallery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn album_dir(&self, album: &str) -> PathBuf {
        self.root.join(album)
    }

    fn unique_destination(dir: &Path, file: &Path) -> PathBuf {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.png", uuid::Uuid::new_v4().simple()));
        let candidate = dir.join(&name);
        if !candidate.exists() {
            return candidate;
        }
        let stem = Path::new(&name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = Path::new(&name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        dir.join(format!("{}_{}{}", stem, uuid::Uuid::new_v4().simple(), ext))
    }
}

impl Gallery for DirectoryGallery {
    fn request_permission(&self) -> PermissionStatus {
        match fs::create_dir_all(&self.root) {
            Ok(()) => PermissionStatus::Granted,
            Err(e) => {
                log::warn!("Gallery root {} not writable: {}", self.root.display(), e);
                PermissionStatus::Denied
            }
        }
    }

    fn save_to_album(&self, files: &[PathBuf], album: &str) -> Result<(), BoothError> {
        let dir = self.album_dir(album);
        fs::create_dir_all(&dir)?;
        for file in files {
            let destination = Self::unique_destination(&dir, file);
            fs::copy(file, &destination).map_err(|e| {
                BoothError::Io(format!("Failed to save {}: {}", file.display(), e))
            })?;
        }
        log::info!("Saved {} file(s) to album '{}'", files.len(), album);
        Ok(())
    }
}
