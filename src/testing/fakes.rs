//! In-process stand-ins for the capability traits.

use super::synthetic_data::synthetic_photo;
use crate::capability::{Camera, FileStore, Gallery, ImageHandle, Rasterizer};
use crate::compositor::CompositionScene;
use crate::errors::BoothError;
use crate::permissions::PermissionStatus;
use image::{Rgba, RgbaImage};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutterOutcome {
    Photo,
    Failure(String),
}

/// Camera that replays a script of shutter outcomes, then keeps succeeding.
#[derive(Debug)]
pub struct ScriptedCamera {
    dir: PathBuf,
    permission: PermissionStatus,
    grant_on_request: bool,
    script: VecDeque<ShutterOutcome>,
    shots: Arc<AtomicUsize>,
    permission_requests: Arc<AtomicUsize>,
}

impl ScriptedCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            permission: PermissionStatus::Granted,
            grant_on_request: true,
            script: VecDeque::new(),
            shots: Arc::new(AtomicUsize::new(0)),
            permission_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_permission(mut self, status: PermissionStatus, grant_on_request: bool) -> Self {
        self.permission = status;
        self.grant_on_request = grant_on_request;
        self
    }

    pub fn with_script(mut self, script: impl IntoIterator<Item = ShutterOutcome>) -> Self {
        self.script = script.into_iter().collect();
        self
    }

    /// Shutter presses so far, successful or not.
    pub fn shot_counter(&self) -> Arc<AtomicUsize> {
        self.shots.clone()
    }

    pub fn permission_request_counter(&self) -> Arc<AtomicUsize> {
        self.permission_requests.clone()
    }
}

impl Camera for ScriptedCamera {
    fn permission_status(&self) -> PermissionStatus {
        self.permission
    }

    fn request_permission(&mut self) -> PermissionStatus {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        if self.grant_on_request {
            self.permission = PermissionStatus::Granted;
        } else {
            self.permission = PermissionStatus::Denied;
        }
        self.permission
    }

    fn capture_photo(&mut self) -> Result<ImageHandle, BoothError> {
        let shot = self.shots.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front().unwrap_or(ShutterOutcome::Photo) {
            ShutterOutcome::Photo => synthetic_photo(&self.dir, shot).map(ImageHandle::new),
            ShutterOutcome::Failure(reason) => Err(BoothError::Capture(reason)),
        }
    }
}

/// File store whose copies always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingFileStore;

impl FileStore for FailingFileStore {
    fn copy_to_app_storage(&self, image: &ImageHandle, _index: usize) -> Result<String, BoothError> {
        Err(BoothError::Io(format!("disk full while copying {}", image.uri)))
    }
}

/// Gallery that records album writes in memory.
#[derive(Debug)]
pub struct MemoryGallery {
    permission: PermissionStatus,
    albums: Mutex<HashMap<String, Vec<PathBuf>>>,
}

impl Default for MemoryGallery {
    fn default() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            albums: Mutex::new(HashMap::new()),
        }
    }
}

impl MemoryGallery {
    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            ..Self::default()
        }
    }

    pub fn saved(&self, album: &str) -> Vec<PathBuf> {
        self.albums
            .lock()
            .map(|albums| albums.get(album).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

impl Gallery for MemoryGallery {
    fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    fn save_to_album(&self, files: &[PathBuf], album: &str) -> Result<(), BoothError> {
        let mut albums = self
            .albums
            .lock()
            .map_err(|_| BoothError::Io("gallery lock poisoned".to_string()))?;
        albums
            .entry(album.to_string())
            .or_default()
            .extend(files.iter().cloned());
        Ok(())
    }
}

/// Gallery that grants access but whose album writes always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingGallery;

impl Gallery for FailingGallery {
    fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn save_to_album(&self, _files: &[PathBuf], _album: &str) -> Result<(), BoothError> {
        Err(BoothError::Io("album is read-only".to_string()))
    }
}

/// Rasterizer that paints a flat image of the requested size without
/// touching any files.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryRasterizer;

impl Rasterizer for MemoryRasterizer {
    fn rasterize(
        &self,
        _scene: &CompositionScene,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, BoothError> {
        Ok(RgbaImage::from_pixel(width, height, Rgba([200, 200, 200, 255])))
    }
}
