use super::config::current_config;
use crate::background::{BackgroundSelection, HexColor};
use crate::errors::UserNotice;
use crate::layout::{fill_slots, layout_slots, RenderedSlot};
use crate::params::FlowParams;
use crate::sizing::{DisplayGeometry, Viewport, ViewportObserver};
use crate::templates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;
use tauri::command;

lazy_static::lazy_static! {
    // Phone-sized until the window reports its real size.
    static ref VIEWPORT: ViewportObserver = ViewportObserver::new(Viewport::new(390.0, 844.0));
    static ref BACKGROUND: RwLock<BackgroundSelection> = RwLock::new(BackgroundSelection::default());
}

pub(crate) fn current_viewport() -> Viewport {
    VIEWPORT.current()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewScreen {
    /// Live preview next to the camera.
    Capture,
    /// Finished strip before download.
    Final,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasPreview {
    pub geometry: DisplayGeometry,
    pub slots: Vec<RenderedSlot>,
}

/// Called by the window owner on every resize or rotation. Returns whether
/// the viewport actually changed.
#[command]
pub async fn update_viewport(width: f64, height: f64) -> Result<bool, String> {
    VIEWPORT
        .publish(Viewport::new(width, height))
        .map_err(|e| e.to_string())
}

/// Display geometry and rendered slots for one screen at the current
/// viewport. Placements are identical however many photos are present.
#[command]
pub async fn get_canvas_preview(
    template_id: String,
    photo_uris: Vec<String>,
    screen: PreviewScreen,
) -> Result<CanvasPreview, String> {
    let template = templates::get_template(&template_id).map_err(|e| e.to_string())?;
    if photo_uris.len() > template.photo_count {
        return Err(format!(
            "{} photos for template {} with {} slots",
            photo_uris.len(),
            template.id,
            template.photo_count
        ));
    }

    let config = current_config()?;
    let profile = match screen {
        PreviewScreen::Capture => config.sizing.capture_preview,
        PreviewScreen::Final => config.sizing.final_preview,
    };
    let geometry = VIEWPORT
        .canvas_geometry(template, &profile)
        .map_err(|e| e.to_string())?;
    let placements = layout_slots(template, geometry.scale);

    Ok(CanvasPreview {
        geometry,
        slots: fill_slots(&placements, &photo_uris),
    })
}

/// Validates the router parameter bag; failures redirect to template
/// selection.
#[command]
pub async fn parse_flow_params(params: BTreeMap<String, String>) -> Result<FlowParams, String> {
    let parsed = FlowParams::from_route_params(&params).map_err(|e| {
        log::warn!("Rejected flow parameters: {}", e);
        e.to_string()
    })?;
    parsed
        .template(templates::registry())
        .map_err(|e| e.to_string())?;
    Ok(parsed)
}

#[command]
pub async fn select_background_preset(key: String) -> Result<String, String> {
    let mut selection = BACKGROUND.write().map_err(|e| e.to_string())?;
    selection.select_preset(&key).map_err(|e| e.to_string())?;
    Ok(key)
}

/// Applies a typed custom colour. Invalid input leaves the previous choice
/// and returns the notice to show.
#[command]
pub async fn apply_custom_color(input: String) -> Result<String, UserNotice> {
    let mut selection = BACKGROUND.write().map_err(|e| UserNotice {
        title: "Error".to_string(),
        message: e.to_string(),
        offers_retry: false,
    })?;
    selection
        .apply_custom_color(&input)
        .map_err(|e| e.user_notice())?;
    Ok(selection.custom_color().to_string())
}

/// The chosen background in parameter form, if any
#[command]
pub async fn get_background_choice() -> Result<Option<String>, String> {
    let selection = BACKGROUND.read().map_err(|e| e.to_string())?;
    Ok(selection.choice().map(|c| c.to_param()))
}

#[command]
pub async fn validate_hex_color(input: String) -> Result<String, String> {
    HexColor::parse(input.trim())
        .map(|c| c.to_string())
        .map_err(|e| e.to_string())
}
