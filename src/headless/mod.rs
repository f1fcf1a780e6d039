//! Headless booth runs: geometry queries, composition from existing photos,
//! and unattended capture sessions, without a webview.

use crate::background::BackgroundChoice;
use crate::capability::Camera;
use crate::compositor::{render_to_file, CompositionScene, ImageCompositor};
use crate::config::BoothConfig;
use crate::errors::BoothError;
use crate::layout::{layout_slots, SlotPlacement};
use crate::params::FlowParams;
use crate::session::{CaptureDriver, DriverOptions};
use crate::sizing::{compute_canvas_display_size_with, DisplayGeometry, Viewport};
use crate::storage::LocalFileStore;
use crate::templates::TemplateRegistry;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeReport {
    pub template_id: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Final-preview canvas geometry for a viewport, in its own orientation.
pub fn geometry(
    registry: &TemplateRegistry,
    config: &BoothConfig,
    template_id: &str,
    viewport: Viewport,
) -> Result<DisplayGeometry, BoothError> {
    let template = registry.get(template_id)?;
    compute_canvas_display_size_with(
        template,
        viewport,
        viewport.orientation(),
        &config.sizing.final_preview,
    )
}

pub fn layout(
    registry: &TemplateRegistry,
    template_id: &str,
    scale: f64,
) -> Result<Vec<SlotPlacement>, BoothError> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(BoothError::MalformedParams(format!("scale {}", scale)));
    }
    Ok(layout_slots(registry.get(template_id)?, scale))
}

/// Composes a complete set of photos onto a background and writes the
/// print-size result to `out`.
pub fn compose(
    registry: &TemplateRegistry,
    config: &BoothConfig,
    template_id: &str,
    background: &str,
    photo_uris: Vec<String>,
    out: &Path,
) -> Result<ComposeReport, BoothError> {
    let params = FlowParams::new(template_id)
        .with_photos(photo_uris)
        .with_background(BackgroundChoice::from_param(background)?);
    let (template, background) = params.ready_for_composition(registry)?;

    let scene = CompositionScene::build(template, &params.photo_uris, background, &config.branding)?;
    let format = image::ImageFormat::from_path(out).unwrap_or(image::ImageFormat::Png);
    let path = render_to_file(&ImageCompositor::default(), &scene, out, format)?;
    let (width, height) = scene.print_size();

    Ok(ComposeReport {
        template_id: template.id.clone(),
        path,
        width,
        height,
    })
}

/// Runs a full capture session against `camera`, storing photos under the
/// configured storage directory. Failed shutters are retried per slot.
pub async fn capture<C: Camera + 'static>(
    registry: &TemplateRegistry,
    config: &BoothConfig,
    template_id: &str,
    camera: C,
) -> Result<Vec<String>, BoothError> {
    let template = registry.get(template_id)?;
    let store = LocalFileStore::new(&config.storage.app_storage_dir, &config.storage.file_prefix);
    let mut driver = CaptureDriver::new(
        template,
        camera,
        store,
        DriverOptions::from_config(&config.capture),
    );

    let mut states = driver.subscribe();
    let watcher = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            log::info!("Session state: {}", *states.borrow());
        }
    });

    let result = driver.run_to_completion().await;
    drop(driver);
    let _ = watcher.await;
    result
}
