//! Configuration management for the photo booth
//!
//! Provides loading, saving and validation of capture timing, screen budgets,
//! storage locations, export albums and studio branding.

use crate::errors::BoothError;
use crate::sizing::SizingProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoothConfig {
    pub capture: CaptureConfig,
    pub sizing: SizingConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub branding: BrandingConfig,
    pub layout: LayoutConfig,
}

/// Countdown and shutter timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Countdown length before each shutter
    pub countdown_seconds: u32,
    /// Interval between countdown ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Pause after the last photo before moving on to background selection
    pub auto_advance_delay_ms: u64,
    /// Shutter attempts per slot in unattended runs
    pub max_capture_attempts: u32,
    /// Camera index passed to the capture backend
    pub device_index: u32,
}

/// Canvas screen budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    pub final_preview: SizingProfile,
    pub capture_preview: SizingProfile,
}

/// Session photo storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory captured photos are copied into
    pub app_storage_dir: String,
    /// File name prefix for stored photos
    pub file_prefix: String,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

/// Gallery export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub strip_album: String,
    pub individual_album: String,
    /// Root directory albums are created under
    pub gallery_root: String,
    /// Output image format (png, jpeg)
    pub format: String,
}

/// Studio branding shown in the landscape footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingConfig {
    pub tagline: String,
    pub phone: String,
    pub social_handle: String,
    /// Logo image drawn into logo slots, if any
    pub logo_path: Option<String>,
    /// TrueType font for the printed contact block
    #[serde(default)]
    pub font_path: Option<String>,
    /// Directory holding image background assets
    pub assets_dir: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Reject templates whose cells do not fit the canvas
    pub strict_fit: bool,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig {
                countdown_seconds: 3,
                tick_interval_ms: 1000,
                auto_advance_delay_ms: 1500,
                max_capture_attempts: 3,
                device_index: 0,
            },
            sizing: SizingConfig {
                final_preview: SizingProfile::final_preview(),
                capture_preview: SizingProfile::capture_preview(),
            },
            storage: StorageConfig {
                app_storage_dir: "./booth-photos".to_string(),
                file_prefix: "photo".to_string(),
                jpeg_quality: 95,
            },
            export: ExportConfig {
                strip_album: "JR Studio Photo Booth".to_string(),
                individual_album: "JR Studio Individual Photos".to_string(),
                gallery_root: "./gallery".to_string(),
                format: "png".to_string(),
            },
            branding: BrandingConfig {
                tagline: "Talk to us".to_string(),
                phone: "+1 (555) 010-0199".to_string(),
                social_handle: "@jrstudio".to_string(),
                logo_path: None,
                font_path: Some("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string()),
                assets_dir: "./assets".to_string(),
            },
            layout: LayoutConfig::default(),
        }
    }
}

impl BoothConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, BoothError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| BoothError::Config(format!("Failed to read config file: {}", e)))?;

        let config: BoothConfig = toml::from_str(&contents)
            .map_err(|e| BoothError::Config(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), BoothError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BoothError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| BoothError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| BoothError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from("printbooth.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.capture.countdown_seconds == 0 || self.capture.countdown_seconds > 10 {
            return Err("Countdown must be between 1 and 10 seconds".to_string());
        }
        if self.capture.tick_interval_ms == 0 {
            return Err("Tick interval must be positive".to_string());
        }
        if self.capture.max_capture_attempts == 0 {
            return Err("At least one capture attempt is required".to_string());
        }

        if self.storage.jpeg_quality == 0 || self.storage.jpeg_quality > 100 {
            return Err("JPEG quality must be between 1 and 100".to_string());
        }
        if self.storage.file_prefix.is_empty() {
            return Err("File prefix must not be empty".to_string());
        }

        if self.export.strip_album.trim().is_empty()
            || self.export.individual_album.trim().is_empty()
        {
            return Err("Album names must not be empty".to_string());
        }
        if !matches!(self.export.format.as_str(), "png" | "jpeg" | "jpg") {
            return Err(format!("Unsupported export format: {}", self.export.format));
        }

        for (name, profile) in [
            ("final_preview", &self.sizing.final_preview),
            ("capture_preview", &self.sizing.capture_preview),
        ] {
            for budget in [profile.portrait, profile.landscape] {
                for extent in [budget.width, budget.height] {
                    if let crate::sizing::Extent::Fraction(f) = extent {
                        if !(f > 0.0 && f <= 1.0) {
                            return Err(format!(
                                "{} budget fraction must be in (0, 1], got {}",
                                name, f
                            ));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl ExportConfig {
    pub fn image_format(&self) -> image::ImageFormat {
        match self.format.as_str() {
            "jpeg" | "jpg" => image::ImageFormat::Jpeg,
            _ => image::ImageFormat::Png,
        }
    }
}
