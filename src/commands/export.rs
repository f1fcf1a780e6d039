use super::config::current_config;
use crate::capability::{LogSharer, SharePayload};
use crate::compositor::{CompositionScene, ImageCompositor};
use crate::config::BoothConfig;
use crate::export::Exporter;
use crate::params::FlowParams;
use crate::storage::DirectoryGallery;
use crate::templates;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tauri::command;

lazy_static::lazy_static! {
    static ref DOWNLOADING: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
}

/// Exporter for the live configuration. Only the downloading flag outlives
/// the call.
fn exporter_for(config: &BoothConfig) -> Exporter {
    Exporter::new(
        Arc::new(DirectoryGallery::new(&config.export.gallery_root)),
        Arc::new(ImageCompositor::default()),
        Arc::new(LogSharer),
        config.export.clone(),
    )
    .with_busy_flag(DOWNLOADING.clone())
}

/// Render the finished strip at print resolution and save it to the strip album
#[command]
pub async fn download_photo_strip(params: FlowParams) -> Result<String, String> {
    let registry = templates::registry();
    let (template, background) = params
        .ready_for_composition(registry)
        .map_err(|e| e.to_string())?;
    let config = current_config()?;
    let scene = CompositionScene::build(template, &params.photo_uris, background, &config.branding)
        .map_err(|e| e.to_string())?;

    let exporter = exporter_for(&config);
    let path = tokio::task::spawn_blocking(move || exporter.download_strip(&scene))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
        .map_err(|e| {
            log::error!("Strip download failed: {}", e);
            e.to_string()
        })?;

    Ok(path.display().to_string())
}

/// Save every captured photo to the individual-photos album
#[command]
pub async fn download_individual_photos(photo_uris: Vec<String>) -> Result<usize, String> {
    let exporter = exporter_for(&current_config()?);
    tokio::task::spawn_blocking(move || exporter.download_individual_photos(&photo_uris))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
        .map_err(|e| {
            log::error!("Individual photo download failed: {}", e);
            e.to_string()
        })
}

/// Whether a download is running; the download buttons stay disabled until
/// it clears
#[command]
pub async fn is_downloading() -> Result<bool, String> {
    Ok(DOWNLOADING.load(Ordering::SeqCst))
}

#[command]
pub async fn share_result(payload: SharePayload) -> Result<(), String> {
    exporter_for(&current_config()?)
        .share(&payload)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_photo;

    #[test]
    fn test_exporter_follows_updated_config() {
        let dir = tempfile::tempdir().unwrap();
        let uris = vec![synthetic_photo(dir.path(), 0).unwrap()];

        let mut config = BoothConfig::default();
        config.export.gallery_root = dir.path().join("first").display().to_string();
        exporter_for(&config).download_individual_photos(&uris).unwrap();

        config.export.gallery_root = dir.path().join("second").display().to_string();
        config.export.individual_album = "Guests".to_string();
        exporter_for(&config).download_individual_photos(&uris).unwrap();

        assert!(dir.path().join("first").join("JR Studio Individual Photos").is_dir());
        assert_eq!(
            std::fs::read_dir(dir.path().join("second").join("Guests"))
                .unwrap()
                .count(),
            1
        );
        assert!(!DOWNLOADING.load(Ordering::SeqCst));
    }
}
