use crate::capability::{Camera, ImageHandle};
use crate::errors::BoothError;
use crate::permissions::{self, PermissionStatus};
use image::codecs::jpeg::JpegEncoder;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
    CallbackCamera,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

const PERMISSION_PROMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Frames discarded after opening the stream so auto exposure can settle.
const WARMUP_FRAMES: usize = 3;

/// Physical camera driven through nokhwa. Stills are written as JPEG into
/// a scratch directory; the file store moves them somewhere durable.
pub struct NokhwaCamera {
    device_index: u32,
    jpeg_quality: u8,
    scratch_dir: PathBuf,
    camera: Option<CallbackCamera>,
}

impl NokhwaCamera {
    pub fn new(device_index: u32, jpeg_quality: u8) -> Self {
        Self {
            device_index,
            jpeg_quality,
            scratch_dir: std::env::temp_dir().join("printbooth"),
            camera: None,
        }
    }

    pub fn with_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.scratch_dir = dir;
        self
    }

    fn open(&mut self) -> Result<&mut CallbackCamera, BoothError> {
        if self.camera.is_none() {
            log::info!("Opening camera {}", self.device_index);
            let requested =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
            let mut camera =
                CallbackCamera::new(CameraIndex::Index(self.device_index), requested, |_| {})
                    .map_err(|e| BoothError::Capture(format!("Failed to open camera: {}", e)))?;
            camera
                .open_stream()
                .map_err(|e| BoothError::Capture(format!("Failed to start stream: {}", e)))?;
            for _ in 0..WARMUP_FRAMES {
                let _ = camera.poll_frame();
            }
            self.camera = Some(camera);
        }
        self.camera
            .as_mut()
            .ok_or_else(|| BoothError::Capture("Camera not initialized".to_string()))
    }
}

impl Camera for NokhwaCamera {
    fn permission_status(&self) -> PermissionStatus {
        permissions::check_permission()
    }

    fn request_permission(&mut self) -> PermissionStatus {
        permissions::request_permission(PERMISSION_PROMPT_TIMEOUT).status
    }

    fn capture_photo(&mut self) -> Result<ImageHandle, BoothError> {
        let quality = self.jpeg_quality;
        let scratch_dir = self.scratch_dir.clone();

        let frame = self
            .open()?
            .poll_frame()
            .map_err(|e| BoothError::Capture(format!("Failed to capture frame: {}", e)))?;
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| BoothError::Capture(format!("Failed to decode frame: {}", e)))?;

        std::fs::create_dir_all(&scratch_dir)?;
        let path = scratch_dir.join(format!("capture_{}.jpg", uuid::Uuid::new_v4()));
        let mut writer = BufWriter::new(File::create(&path)?);
        JpegEncoder::new_with_quality(&mut writer, quality).encode_image(&rgb)?;

        log::debug!(
            "Captured {}x{} still to {}",
            rgb.width(),
            rgb.height(),
            path.display()
        );
        Ok(ImageHandle::from_path(&path))
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        if let Some(camera) = self.camera.as_mut() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera stream: {}", e);
            }
        }
    }
}
