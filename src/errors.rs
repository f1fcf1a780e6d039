use thiserror::Error;

/// Which capability a permission failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PermissionResource {
    Camera,
    Gallery,
}

impl std::fmt::Display for PermissionResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionResource::Camera => write!(f, "camera"),
            PermissionResource::Gallery => write!(f, "gallery"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoothError {
    #[error("Permission denied ({resource}): {message}")]
    PermissionDenied {
        resource: PermissionResource,
        message: String,
    },
    #[error("Capture error: {0}")]
    Capture(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
    #[error("Malformed parameters: {0}")]
    MalformedParams(String),
    #[error("Invalid custom color: {0}")]
    InvalidCustomColor(String),
    #[error("Invalid viewport: {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("Template {template} does not fit its canvas: {detail}")]
    TemplateOverflow { template: String, detail: String },
    #[error("Busy: {0}")]
    Busy(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Dismissable notice shown to the user for a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserNotice {
    pub title: String,
    pub message: String,
    pub offers_retry: bool,
}

impl BoothError {
    pub fn camera_denied(message: impl Into<String>) -> Self {
        BoothError::PermissionDenied {
            resource: PermissionResource::Camera,
            message: message.into(),
        }
    }

    pub fn gallery_denied(message: impl Into<String>) -> Self {
        BoothError::PermissionDenied {
            resource: PermissionResource::Gallery,
            message: message.into(),
        }
    }

    /// Recoverable errors leave the flow where it is; the rest must fail the
    /// screen closed and send the user back to template selection.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            BoothError::UnknownTemplate(_)
                | BoothError::MalformedParams(_)
                | BoothError::TemplateOverflow { .. }
        )
    }

    pub fn user_notice(&self) -> UserNotice {
        let (title, message, offers_retry) = match self {
            BoothError::PermissionDenied { resource, .. } => (
                "Permission Required",
                match resource {
                    PermissionResource::Camera => {
                        "We need access to your camera to take photos for your photo booth session."
                    }
                    PermissionResource::Gallery => {
                        "Please grant permission to save photos to your gallery."
                    }
                }
                .to_string(),
                true,
            ),
            BoothError::Capture(_) => (
                "Error",
                "Failed to take picture. Please try again.".to_string(),
                true,
            ),
            BoothError::Io(msg) | BoothError::Render(msg) => {
                ("Error", format!("Failed to save to gallery: {msg}"), false)
            }
            BoothError::InvalidCustomColor(input) => (
                "Invalid Color",
                format!("\"{input}\" is not a #RRGGBB color."),
                false,
            ),
            BoothError::Busy(msg) => ("Please Wait", msg.clone(), false),
            other => ("Error", other.to_string(), false),
        };

        UserNotice {
            title: title.to_string(),
            message,
            offers_retry,
        }
    }
}

impl From<std::io::Error> for BoothError {
    fn from(e: std::io::Error) -> Self {
        BoothError::Io(e.to_string())
    }
}

impl From<image::ImageError> for BoothError {
    fn from(e: image::ImageError) -> Self {
        BoothError::Render(e.to_string())
    }
}
