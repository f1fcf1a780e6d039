use crate::permissions::{check_permission_detailed, request_permission, PermissionInfo};
use std::time::Duration;
use tauri::command;

/// Request camera permission (platform-specific)
#[command]
pub async fn request_camera_permission() -> Result<PermissionInfo, String> {
    log::info!("Requesting camera permission");

    // The macOS prompt blocks until the user answers.
    let info = tokio::task::spawn_blocking(|| request_permission(Duration::from_secs(60)))
        .await
        .map_err(|e| format!("Task join error: {}", e))?;

    if !info.status.is_granted() {
        log::warn!("Camera permission not granted: {}", info.message);
    }
    Ok(info)
}

/// Check current camera permission status
#[command]
pub async fn check_camera_permission_status() -> Result<PermissionInfo, String> {
    Ok(check_permission_detailed())
}
