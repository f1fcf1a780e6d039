//! Saving and sharing the finished session.

use crate::capability::{Gallery, ImageHandle, Rasterizer, SharePayload, Sharer};
use crate::compositor::{render_to_file, CompositionScene};
use crate::config::ExportConfig;
use crate::errors::BoothError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clears the downloading flag when the export finishes, however it ends.
struct DownloadGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for DownloadGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub struct Exporter {
    gallery: Arc<dyn Gallery>,
    rasterizer: Arc<dyn Rasterizer>,
    sharer: Arc<dyn Sharer>,
    config: ExportConfig,
    work_dir: PathBuf,
    is_downloading: Arc<AtomicBool>,
}

impl Exporter {
    pub fn new(
        gallery: Arc<dyn Gallery>,
        rasterizer: Arc<dyn Rasterizer>,
        sharer: Arc<dyn Sharer>,
        config: ExportConfig,
    ) -> Self {
        Self {
            gallery,
            rasterizer,
            sharer,
            config,
            work_dir: std::env::temp_dir().join("printbooth").join("exports"),
            is_downloading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares the downloading flag with other exporters, so exporters built
    /// per request still refuse overlapping downloads.
    pub fn with_busy_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.is_downloading = flag;
        self
    }

    pub fn with_work_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = dir;
        self
    }

    pub fn is_downloading(&self) -> bool {
        self.is_downloading.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<DownloadGuard<'_>, BoothError> {
        self.is_downloading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| BoothError::Busy("A download is already in progress".to_string()))?;
        Ok(DownloadGuard {
            flag: &self.is_downloading,
        })
    }

    fn ensure_gallery_access(&self) -> Result<(), BoothError> {
        let status = self.gallery.request_permission();
        if status.is_granted() {
            Ok(())
        } else {
            Err(BoothError::gallery_denied(format!("gallery access {}", status)))
        }
    }

    /// Rasterizes the strip at print size and saves it to the strip album.
    pub fn download_strip(&self, scene: &CompositionScene) -> Result<PathBuf, BoothError> {
        let _guard = self.begin()?;
        self.ensure_gallery_access()?;

        if !scene.is_complete() {
            return Err(BoothError::MalformedParams(format!(
                "{} still has empty slots",
                scene.template_id
            )));
        }

        let format = self.config.image_format();
        let extension = format.extensions_str().first().copied().unwrap_or("png");
        let path = self.work_dir.join(format!(
            "{}_{}.{}",
            scene.template_id,
            chrono::Utc::now().format("%Y%m%d_%H%M%S"),
            extension
        ));

        let rendered = render_to_file(self.rasterizer.as_ref(), scene, &path, format)?;
        self.gallery
            .save_to_album(std::slice::from_ref(&rendered), &self.config.strip_album)?;
        log::info!("Photo strip saved to '{}'", self.config.strip_album);
        Ok(rendered)
    }

    /// Saves every captured photo to the individual-photos album.
    pub fn download_individual_photos(&self, photo_uris: &[String]) -> Result<usize, BoothError> {
        let _guard = self.begin()?;
        self.ensure_gallery_access()?;

        let files = photo_uris
            .iter()
            .map(|uri| {
                ImageHandle::new(uri.as_str())
                    .local_path()
                    .ok_or_else(|| BoothError::Io(format!("{} is not a local file", uri)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.gallery
            .save_to_album(&files, &self.config.individual_album)?;
        log::info!(
            "{} individual photo(s) saved to '{}'",
            files.len(),
            self.config.individual_album
        );
        Ok(files.len())
    }

    pub fn share(&self, payload: &SharePayload) -> Result<(), BoothError> {
        self.sharer.share(payload)
    }
}
