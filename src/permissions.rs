//! Desktop camera permission probing.
//!
//! Mobile shells answer these questions natively; on desktop the booth asks
//! the OS directly before arming a capture.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet.
    NotDetermined,
    /// Blocked by policy (parental controls, MDM).
    Restricted,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::NotDetermined => write!(f, "not_determined"),
            PermissionStatus::Restricted => write!(f, "restricted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PermissionInfo {
    pub status: PermissionStatus,
    pub message: String,
    /// Whether asking again can change the answer.
    pub can_request: bool,
}

impl PermissionInfo {
    fn new(status: PermissionStatus, message: impl Into<String>, can_request: bool) -> Self {
        Self {
            status,
            message: message.into(),
            can_request,
        }
    }
}

pub fn check_permission() -> PermissionStatus {
    check_permission_detailed().status
}

pub fn check_permission_detailed() -> PermissionInfo {
    #[cfg(target_os = "windows")]
    {
        check_windows()
    }

    #[cfg(target_os = "macos")]
    {
        check_macos()
    }

    #[cfg(target_os = "linux")]
    {
        check_linux()
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        PermissionInfo::new(
            PermissionStatus::NotDetermined,
            "Platform not supported",
            false,
        )
    }
}

/// Asks the OS for camera access where it can be asked; elsewhere returns
/// the current status with instructions for the user.
pub fn request_permission(timeout: Duration) -> PermissionInfo {
    let current = check_permission_detailed();
    if current.status.is_granted() || !current.can_request {
        return current;
    }

    log::info!("Requesting camera permission");

    #[cfg(target_os = "macos")]
    {
        request_macos(timeout)
    }

    #[cfg(target_os = "windows")]
    {
        let _ = timeout;
        PermissionInfo::new(
            PermissionStatus::NotDetermined,
            "Enable camera access in Windows Settings > Privacy > Camera",
            false,
        )
    }

    #[cfg(target_os = "linux")]
    {
        let _ = timeout;
        PermissionInfo::new(
            current.status,
            "Run: sudo usermod -a -G video $USER && newgrp video",
            false,
        )
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        let _ = timeout;
        current
    }
}

#[cfg(target_os = "windows")]
fn check_windows() -> PermissionInfo {
    // Device enumeration only succeeds when Privacy settings allow the app.
    match nokhwa::query(nokhwa::utils::ApiBackend::Auto) {
        Ok(devices) if !devices.is_empty() => {
            PermissionInfo::new(PermissionStatus::Granted, "Camera access granted", false)
        }
        Ok(_) => PermissionInfo::new(
            PermissionStatus::NotDetermined,
            "No cameras found; access may be disabled",
            true,
        ),
        Err(e) => PermissionInfo::new(
            PermissionStatus::Denied,
            format!("Camera access denied: {}", e),
            true,
        ),
    }
}

#[cfg(target_os = "macos")]
fn check_macos() -> PermissionInfo {
    use objc::runtime::{Class, Object};
    use objc::{msg_send, sel, sel_impl};

    let Some(device_class) = Class::get("AVCaptureDevice") else {
        return PermissionInfo::new(
            PermissionStatus::NotDetermined,
            "AVFoundation not available",
            false,
        );
    };

    // AVAuthorizationStatus: 0 not determined, 1 restricted, 2 denied, 3 authorized.
    let status: i64 = unsafe {
        let ns_string = match Class::get("NSString") {
            Some(c) => c,
            None => {
                return PermissionInfo::new(
                    PermissionStatus::NotDetermined,
                    "Foundation not available",
                    false,
                )
            }
        };
        let media_type: *mut Object =
            msg_send![ns_string, stringWithUTF8String: b"vide\0".as_ptr()];
        msg_send![device_class, authorizationStatusForMediaType: media_type]
    };

    match status {
        3 => PermissionInfo::new(PermissionStatus::Granted, "Camera access authorized", false),
        2 => PermissionInfo::new(
            PermissionStatus::Denied,
            "Camera access denied; enable it in System Settings > Privacy & Security > Camera",
            false,
        ),
        1 => PermissionInfo::new(
            PermissionStatus::Restricted,
            "Camera access restricted by system policy",
            false,
        ),
        _ => PermissionInfo::new(
            PermissionStatus::NotDetermined,
            "Camera permission not yet requested",
            true,
        ),
    }
}

#[cfg(target_os = "macos")]
fn request_macos(timeout: Duration) -> PermissionInfo {
    let (tx, rx) = std::sync::mpsc::channel();
    nokhwa::nokhwa_initialize(move |granted| {
        let _ = tx.send(granted);
    });

    match rx.recv_timeout(timeout) {
        Ok(true) => PermissionInfo::new(PermissionStatus::Granted, "Camera access authorized", false),
        Ok(false) => PermissionInfo::new(
            PermissionStatus::Denied,
            "Camera access denied by user",
            false,
        ),
        Err(_) => {
            log::warn!("Camera permission prompt timed out");
            PermissionInfo::new(
                PermissionStatus::NotDetermined,
                "Permission request timed out",
                true,
            )
        }
    }
}

#[cfg(target_os = "linux")]
fn check_linux() -> PermissionInfo {
    let devices: Vec<String> = (0..10)
        .map(|i| format!("/dev/video{}", i))
        .filter(|path| std::path::Path::new(path).exists())
        .collect();

    let Some(first) = devices.first() else {
        return PermissionInfo::new(
            PermissionStatus::NotDetermined,
            "No video devices found at /dev/video*",
            false,
        );
    };

    match std::fs::File::open(first) {
        Ok(_) => PermissionInfo::new(
            PermissionStatus::Granted,
            format!("Camera access granted ({} readable)", first),
            false,
        ),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => PermissionInfo::new(
            PermissionStatus::Denied,
            format!("{} exists but is not readable; add the user to the video group", first),
            true,
        ),
        // Busy or otherwise unavailable devices still prove access rights.
        Err(e) => PermissionInfo::new(
            PermissionStatus::Granted,
            format!("{} present ({})", first, e),
            false,
        ),
    }
}
