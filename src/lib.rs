//! Printbooth: print-accurate photo booth layout and composition for Tauri applications
//!
//! A booth run picks a template, captures a fixed number of photos, picks a
//! background and exports a composited strip at 300 DPI. Every placement on
//! screen and on paper comes from one layout law, so the live preview and the
//! printed strip are the same geometry at different scales.
//!
//! # Features
//! - Fixed physical templates (grid, collage, strip, landscape)
//! - Responsive canvas and thumbnail sizing for any viewport and orientation
//! - Countdown capture sessions over the desktop camera
//! - Print-resolution composition and album export
//! - Headless CLI behind the `headless` feature
//!
//! # Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! printbooth = "0.1"
//! tauri = { version = "2.0", features = ["protocol-asset"] }
//! ```
//!
//! Then in your Tauri app:
//! ```rust,ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(printbooth::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
pub mod background;
pub mod camera;
pub mod capability;
pub mod commands;
pub mod compositor;
pub mod config;
pub mod errors;
pub mod export;
pub mod invariant_ppt;
pub mod layout;
pub mod params;
pub mod permissions;
pub mod session;
pub mod sizing;
pub mod storage;
pub mod templates;
pub mod units;

#[cfg(feature = "headless")]
pub mod headless;

// Testing utilities - synthetic photos and capability fakes for offline testing
pub mod testing;

// Re-exports for convenience
pub use background::{BackgroundChoice, HexColor};
pub use capability::{Camera, FileStore, Gallery, ImageHandle, Rasterizer, Sharer};
pub use compositor::{CompositionScene, ImageCompositor};
pub use config::BoothConfig;
pub use errors::BoothError;
pub use layout::{fill_slots, layout_slots, SlotPlacement, SlotRole};
pub use params::FlowParams;
pub use session::{CaptureSession, CaptureState, CapturedPhoto};
pub use sizing::{compute_canvas_display_size, DisplayGeometry, Orientation, Viewport};
pub use templates::{get_template, list_templates, Template, TemplateRegistry};
pub use units::cm_to_px;

use tauri::{
    plugin::{Builder, TauriPlugin},
    Runtime,
};

/// Initialize the Printbooth plugin with all commands
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    // Fit checks run here, not on the first template request.
    let catalog = templates::registry();
    log::info!("Printbooth serving {} template(s)", catalog.list().len());

    Builder::new("printbooth")
        .invoke_handler(tauri::generate_handler![
            // Template and picker commands
            commands::templates::list_templates,
            commands::templates::get_template,
            commands::templates::get_template_thumbnail_size,
            commands::templates::list_backgrounds,
            commands::templates::get_background_swatch_size,
            // Layout and flow commands
            commands::layout::update_viewport,
            commands::layout::get_canvas_preview,
            commands::layout::parse_flow_params,
            commands::layout::select_background_preset,
            commands::layout::apply_custom_color,
            commands::layout::get_background_choice,
            commands::layout::validate_hex_color,
            // Permission commands
            commands::permissions::request_camera_permission,
            commands::permissions::check_camera_permission_status,
            // Capture session commands
            commands::session::start_capture_session,
            commands::session::capture_next_photo,
            commands::session::get_capture_state,
            commands::session::get_session_snapshot,
            commands::session::end_capture_session,
            commands::session::reset_capture_session,
            // Export commands
            commands::export::download_photo_strip,
            commands::export::download_individual_photos,
            commands::export::is_downloading,
            commands::export::share_result,
            // Configuration commands
            commands::config::get_config,
            commands::config::update_config,
            commands::config::reset_config,
            commands::config::get_branding,
        ])
        .build()
}

/// Initialize logging for the booth
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "printbooth=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
        templates: templates::list_templates()
            .iter()
            .map(|t| t.id.clone())
            .collect(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub templates: Vec<String>,
}
