use super::{CaptureSession, CaptureState, CapturedPhoto, StartOutcome};
use crate::capability::{Camera, FileStore, ImageHandle};
use crate::config::CaptureConfig;
use crate::errors::BoothError;
use crate::permissions::PermissionStatus;
use crate::templates::Template;
use serde::Serialize;
use std::sync::{Arc, Mutex as SyncMutex};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    pub countdown_seconds: u32,
    pub tick_interval: Duration,
    pub auto_advance_delay: Duration,
    pub max_capture_attempts: u32,
}

impl DriverOptions {
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self {
            countdown_seconds: config.countdown_seconds,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            auto_advance_delay: Duration::from_millis(config.auto_advance_delay_ms),
            max_capture_attempts: config.max_capture_attempts.max(1),
        }
    }
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            countdown_seconds: 3,
            tick_interval: Duration::from_secs(1),
            auto_advance_delay: Duration::from_millis(1500),
            max_capture_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CaptureOutcome {
    Captured { photo: CapturedPhoto },
    Skipped { reason: StartOutcome },
}

/// Runs a [`CaptureSession`] against a camera and a file store.
///
/// Camera and store calls block, so they run on the blocking pool; the
/// countdown runs on the tokio timer. Every state change is published on a
/// watch channel for the preview to follow.
pub struct CaptureDriver<C: Camera + 'static, S: FileStore + 'static> {
    session: CaptureSession,
    camera: Arc<SyncMutex<C>>,
    store: Arc<S>,
    options: DriverOptions,
    state_tx: watch::Sender<CaptureState>,
}

impl<C: Camera + 'static, S: FileStore + 'static> CaptureDriver<C, S> {
    pub fn new(template: &Template, camera: C, store: S, options: DriverOptions) -> Self {
        let session = CaptureSession::new(template, options.countdown_seconds);
        let (state_tx, _rx) = watch::channel(session.state());
        Self {
            session,
            camera: Arc::new(SyncMutex::new(camera)),
            store: Arc::new(store),
            options,
            state_tx,
        }
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    pub fn subscribe(&self) -> watch::Receiver<CaptureState> {
        self.state_tx.subscribe()
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.session.state());
    }

    async fn with_camera<T, F>(&self, f: F) -> Result<T, BoothError>
    where
        T: Send + 'static,
        F: FnOnce(&mut C) -> Result<T, BoothError> + Send + 'static,
    {
        let camera = self.camera.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = camera
                .lock()
                .map_err(|_| BoothError::Capture("Camera mutex poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| BoothError::Capture(format!("Task join error: {}", e)))?
    }

    pub async fn permission_status(&self) -> Result<PermissionStatus, BoothError> {
        self.with_camera(|camera| Ok(camera.permission_status())).await
    }

    pub async fn request_permission(&self) -> Result<PermissionStatus, BoothError> {
        let status = self
            .with_camera(|camera| Ok(camera.request_permission()))
            .await?;
        log::info!("Camera permission after request: {}", status);
        Ok(status)
    }

    /// Counts down, fires the shutter and commits one photo.
    ///
    /// Requests that arrive while the session is busy or complete are
    /// skipped. Missing permission is requested once; a refusal is returned
    /// as [`BoothError::PermissionDenied`] with the session still idle.
    pub async fn capture_next(&mut self) -> Result<CaptureOutcome, BoothError> {
        let granted = self.permission_status().await?.is_granted();
        let mut outcome = self.session.start(granted);

        if outcome == StartOutcome::PermissionRequired {
            if !self.request_permission().await?.is_granted() {
                return Err(BoothError::camera_denied(
                    "Camera access is required to take photos",
                ));
            }
            outcome = self.session.start(true);
        }
        if outcome != StartOutcome::Started {
            return Ok(CaptureOutcome::Skipped { reason: outcome });
        }
        self.publish();

        let slot = loop {
            tokio::time::sleep(self.options.tick_interval).await;
            let state = self.session.tick();
            self.publish();
            if let CaptureState::Capturing { slot } = state {
                break slot;
            }
        };

        let handle = match self.with_camera(|camera| camera.capture_photo()).await {
            Ok(handle) => handle,
            Err(e) => {
                let err = self.session.shutter_failed(e.to_string());
                self.publish();
                return Err(err);
            }
        };

        let uri = self.persist(handle, slot).await;
        let photo = self.session.shutter_succeeded(uri)?.clone();
        self.publish();
        log::info!(
            "Captured photo {}/{} for {}",
            slot + 1,
            self.session.photo_count(),
            self.session.template_id()
        );

        if slot + 1 == self.session.photo_count() {
            tokio::time::sleep(self.options.auto_advance_delay).await;
        }
        self.session.advance();
        self.publish();

        Ok(CaptureOutcome::Captured { photo })
    }

    /// Copies into app storage; on failure keeps the camera's own URI.
    async fn persist(&self, handle: ImageHandle, slot: usize) -> String {
        let store = self.store.clone();
        let source = handle.clone();
        let copied = tokio::task::spawn_blocking(move || store.copy_to_app_storage(&source, slot))
            .await
            .map_err(|e| BoothError::Io(format!("Task join error: {}", e)))
            .and_then(|r| r);

        match copied {
            Ok(uri) => uri,
            Err(e) => {
                log::warn!(
                    "Keeping transient URI {} for slot {}: {}",
                    handle.uri,
                    slot,
                    e
                );
                handle.uri
            }
        }
    }

    /// Captures every remaining slot, retrying failed shutters up to
    /// `max_capture_attempts` times per slot. Returns the photo URIs in slot
    /// order.
    pub async fn run_to_completion(&mut self) -> Result<Vec<String>, BoothError> {
        while !self.session.is_complete() {
            let slot = self.session.current_index();
            let mut attempt = 1;
            loop {
                match self.capture_next().await {
                    Ok(_) => break,
                    Err(BoothError::Capture(reason))
                        if attempt < self.options.max_capture_attempts =>
                    {
                        log::warn!(
                            "Slot {} attempt {}/{} failed: {}",
                            slot + 1,
                            attempt,
                            self.options.max_capture_attempts,
                            reason
                        );
                        attempt += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(self.session.photo_uris())
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.publish();
    }
}
