use super::layout::current_viewport;
use crate::background::{background_presets, BackgroundPreset};
use crate::sizing::{thumbnail_size, ThumbnailGrid, ThumbnailSize};
use crate::templates::{self, Template};
use tauri::command;

/// All templates in picker order
#[command]
pub async fn list_templates() -> Result<Vec<Template>, String> {
    Ok(templates::list_templates().to_vec())
}

#[command]
pub async fn get_template(template_id: String) -> Result<Template, String> {
    templates::get_template(&template_id)
        .cloned()
        .map_err(|e| {
            log::error!("Template lookup failed: {}", e);
            e.to_string()
        })
}

/// Thumbnail size for the template picker at the current viewport
#[command]
pub async fn get_template_thumbnail_size() -> Result<ThumbnailSize, String> {
    let viewport = current_viewport();
    thumbnail_size(viewport, viewport.orientation(), ThumbnailGrid::TEMPLATES)
        .map_err(|e| e.to_string())
}

#[command]
pub async fn list_backgrounds() -> Result<Vec<BackgroundPreset>, String> {
    Ok(background_presets())
}

/// Swatch size for the background picker at the current viewport
#[command]
pub async fn get_background_swatch_size() -> Result<ThumbnailSize, String> {
    let viewport = current_viewport();
    thumbnail_size(viewport, viewport.orientation(), ThumbnailGrid::BACKGROUNDS)
        .map_err(|e| e.to_string())
}
