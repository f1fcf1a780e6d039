use super::config::current_config;
use crate::camera::NokhwaCamera;
use crate::session::driver::CaptureOutcome;
use crate::session::{CaptureDriver, CaptureState, DriverOptions, StartOutcome};
use crate::storage::LocalFileStore;
use crate::templates;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tauri::command;
use tokio::sync::{watch, Mutex};

type BoothDriver = CaptureDriver<NokhwaCamera, LocalFileStore>;

lazy_static::lazy_static! {
    // Held for the whole of a capture; a second request finds it locked.
    static ref DRIVER: Arc<Mutex<Option<BoothDriver>>> = Arc::new(Mutex::new(None));
    static ref STATE: RwLock<Option<watch::Receiver<CaptureState>>> = RwLock::new(None);
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub template_id: String,
    pub state: CaptureState,
    pub current_index: usize,
    pub photo_uris: Vec<String>,
}

impl SessionSnapshot {
    fn of(driver: &BoothDriver) -> Self {
        let session = driver.session();
        Self {
            template_id: session.template_id().to_string(),
            state: session.state(),
            current_index: session.current_index(),
            photo_uris: session.photo_uris(),
        }
    }
}

/// Start a fresh capture session for a template, replacing any previous one
#[command]
pub async fn start_capture_session(template_id: String) -> Result<SessionSnapshot, String> {
    let template = templates::get_template(&template_id).map_err(|e| e.to_string())?;
    let config = current_config()?;

    let mut guard = DRIVER
        .try_lock()
        .map_err(|_| "A capture is in progress".to_string())?;

    let camera = NokhwaCamera::new(config.capture.device_index, config.storage.jpeg_quality);
    let store = LocalFileStore::new(&config.storage.app_storage_dir, &config.storage.file_prefix);
    let driver = CaptureDriver::new(
        template,
        camera,
        store,
        DriverOptions::from_config(&config.capture),
    );

    {
        let mut state = STATE.write().map_err(|e| e.to_string())?;
        *state = Some(driver.subscribe());
    }
    let snapshot = SessionSnapshot::of(&driver);
    *guard = Some(driver);

    log::info!("Capture session started for {}", template_id);
    Ok(snapshot)
}

/// Count down and take the next photo. Ignored while another capture is
/// in flight.
#[command]
pub async fn capture_next_photo() -> Result<CaptureOutcome, String> {
    let Ok(mut guard) = DRIVER.try_lock() else {
        log::debug!("Capture request ignored, one already in flight");
        return Ok(CaptureOutcome::Skipped {
            reason: StartOutcome::Ignored,
        });
    };
    let driver = guard
        .as_mut()
        .ok_or_else(|| "No capture session started".to_string())?;

    driver.capture_next().await.map_err(|e| {
        log::error!("Capture failed: {}", e);
        e.to_string()
    })
}

/// Latest published session state, readable during a capture
#[command]
pub async fn get_capture_state() -> Result<Option<CaptureState>, String> {
    let state = STATE.read().map_err(|e| e.to_string())?;
    Ok(state.as_ref().map(|rx| *rx.borrow()))
}

#[command]
pub async fn get_session_snapshot() -> Result<Option<SessionSnapshot>, String> {
    let guard = DRIVER
        .try_lock()
        .map_err(|_| "A capture is in progress".to_string())?;
    Ok(guard.as_ref().map(SessionSnapshot::of))
}

/// Back to template selection: drops the session and its camera
#[command]
pub async fn end_capture_session() -> Result<(), String> {
    let mut guard = DRIVER
        .try_lock()
        .map_err(|_| "A capture is in progress".to_string())?;
    *guard = None;
    let mut state = STATE.write().map_err(|e| e.to_string())?;
    *state = None;
    log::info!("Capture session ended");
    Ok(())
}

/// Discard captured photos and start again at slot one
#[command]
pub async fn reset_capture_session() -> Result<Option<SessionSnapshot>, String> {
    let mut guard = DRIVER
        .try_lock()
        .map_err(|_| "A capture is in progress".to_string())?;
    Ok(guard.as_mut().map(|driver| {
        driver.reset();
        SessionSnapshot::of(driver)
    }))
}
