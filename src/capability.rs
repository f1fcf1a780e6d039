//! Platform capabilities the booth depends on.
//!
//! Each seam is a trait so the session and export flows can run against
//! real hardware in the app and against scripted fakes in tests.

use crate::compositor::CompositionScene;
use crate::errors::BoothError;
use crate::permissions::PermissionStatus;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Opaque reference to a captured or stored image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle {
    pub uri: String,
}

impl ImageHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(format!("file://{}", path.display()))
    }

    /// Local path for `file://` URIs and bare paths; `None` for anything else.
    pub fn local_path(&self) -> Option<PathBuf> {
        if let Some(rest) = self.uri.strip_prefix("file://") {
            return Some(PathBuf::from(rest));
        }
        if self.uri.contains("://") {
            return None;
        }
        Some(PathBuf::from(&self.uri))
    }
}

pub trait Camera: Send {
    fn permission_status(&self) -> PermissionStatus;

    fn request_permission(&mut self) -> PermissionStatus;

    /// Takes one still at the camera's quality setting.
    fn capture_photo(&mut self) -> Result<ImageHandle, BoothError>;
}

pub trait FileStore: Send + Sync {
    /// Copies a captured image into durable app storage and returns the new
    /// URI. `index` is the slot the photo fills.
    fn copy_to_app_storage(&self, image: &ImageHandle, index: usize) -> Result<String, BoothError>;
}

pub trait Gallery: Send + Sync {
    fn request_permission(&self) -> PermissionStatus;

    fn save_to_album(&self, files: &[PathBuf], album: &str) -> Result<(), BoothError>;
}

pub trait Rasterizer: Send + Sync {
    /// Renders the scene at exactly `width` x `height` pixels.
    fn rasterize(
        &self,
        scene: &CompositionScene,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, BoothError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SharePayload {
    Url { url: String },
    Text { text: String },
}

pub trait Sharer: Send + Sync {
    fn share(&self, payload: &SharePayload) -> Result<(), BoothError>;
}

/// Desktop sharer: there is no native sheet, so the payload is logged and
/// left for the shell to pick up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSharer;

impl Sharer for LogSharer {
    fn share(&self, payload: &SharePayload) -> Result<(), BoothError> {
        match payload {
            SharePayload::Url { url } => log::info!("Share requested for {}", url),
            SharePayload::Text { text } => log::info!("Share requested: {}", text),
        }
        Ok(())
    }
}
