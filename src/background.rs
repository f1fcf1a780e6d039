//! Background choices: named presets or a validated custom colour.

use crate::errors::BoothError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Custom colour shown before the user types anything.
pub const DEFAULT_CUSTOM_COLOR: &str = "#FF0000";

/// An opaque sRGB colour parsed from exactly `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(input: &str) -> Result<Self, BoothError> {
        let invalid = || BoothError::InvalidCustomColor(input.to_string());
        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = BoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HexColor::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        HexColor::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PresetKind {
    /// File name inside the configured assets directory.
    Image { asset: String },
    Color { color: HexColor },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackgroundPreset {
    pub id: String,
    pub name: String,
    pub kind: PresetKind,
}

/// Preset catalog in picker order: images first, then colours.
pub fn background_presets() -> Vec<BackgroundPreset> {
    let image = |id: &str, name: &str, asset: &str| BackgroundPreset {
        id: id.to_string(),
        name: name.to_string(),
        kind: PresetKind::Image {
            asset: asset.to_string(),
        },
    };
    let color = |id: &str, name: &str, color: HexColor| BackgroundPreset {
        id: id.to_string(),
        name: name.to_string(),
        kind: PresetKind::Color { color },
    };

    vec![
        image("nature1", "Background 1", "bg1.png"),
        image("nature2", "Background 2", "bg2.png"),
        image("beach", "Background 3", "bg3.png"),
        color("blue", "Ocean Blue", HexColor::rgb(0x4A, 0x90, 0xE2)),
        color("pink", "Soft Pink", HexColor::rgb(0xF5, 0xA9, 0xB8)),
        color("green", "Forest Green", HexColor::rgb(0x5C, 0xB8, 0x5C)),
        color("purple", "Royal Purple", HexColor::rgb(0x9B, 0x59, 0xB6)),
        color("orange", "Sunset Orange", HexColor::rgb(0xFF, 0x8C, 0x42)),
        color("teal", "Tropical Teal", HexColor::rgb(0x1A, 0xBC, 0x9C)),
    ]
}

pub fn find_preset(key: &str) -> Option<BackgroundPreset> {
    background_presets().into_iter().find(|p| p.id == key)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundChoice {
    Preset(String),
    Custom(HexColor),
}

impl BackgroundChoice {
    /// Parses the navigation form: a preset key, or a literal `#RRGGBB`.
    pub fn from_param(value: &str) -> Result<Self, BoothError> {
        if value.starts_with('#') {
            return HexColor::parse(value).map(BackgroundChoice::Custom);
        }
        match find_preset(value) {
            Some(preset) => Ok(BackgroundChoice::Preset(preset.id)),
            None => Err(BoothError::MalformedParams(format!(
                "unknown background: {value}"
            ))),
        }
    }

    pub fn to_param(&self) -> String {
        match self {
            BackgroundChoice::Preset(key) => key.clone(),
            BackgroundChoice::Custom(color) => color.to_string(),
        }
    }

    /// What the compositor paints. Image presets resolve against `assets_dir`.
    pub fn resolve(&self, assets_dir: &Path) -> Result<ResolvedBackground, BoothError> {
        match self {
            BackgroundChoice::Custom(color) => Ok(ResolvedBackground::Color(*color)),
            BackgroundChoice::Preset(key) => {
                let preset = find_preset(key).ok_or_else(|| {
                    BoothError::MalformedParams(format!("unknown background: {key}"))
                })?;
                Ok(match preset.kind {
                    PresetKind::Color { color } => ResolvedBackground::Color(color),
                    PresetKind::Image { asset } => ResolvedBackground::Image(assets_dir.join(asset)),
                })
            }
        }
    }
}

impl Serialize for BackgroundChoice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_param())
    }
}

impl<'de> Deserialize<'de> for BackgroundChoice {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BackgroundChoice::from_param(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedBackground {
    Color(HexColor),
    Image(PathBuf),
}

/// Background picker state. A rejected custom colour leaves the previous
/// choice in place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSelection {
    choice: Option<BackgroundChoice>,
    custom_color: HexColor,
}

impl Default for BackgroundSelection {
    fn default() -> Self {
        Self {
            choice: None,
            custom_color: HexColor::rgb(0xFF, 0x00, 0x00),
        }
    }
}

impl BackgroundSelection {
    pub fn choice(&self) -> Option<&BackgroundChoice> {
        self.choice.as_ref()
    }

    pub fn custom_color(&self) -> HexColor {
        self.custom_color
    }

    pub fn select_preset(&mut self, key: &str) -> Result<(), BoothError> {
        let preset = find_preset(key)
            .ok_or_else(|| BoothError::MalformedParams(format!("unknown background: {key}")))?;
        log::debug!("Background preset selected: {}", preset.id);
        self.choice = Some(BackgroundChoice::Preset(preset.id));
        Ok(())
    }

    pub fn apply_custom_color(&mut self, input: &str) -> Result<(), BoothError> {
        let color = HexColor::parse(input.trim()).inspect_err(|_| {
            log::debug!("Rejected custom color {:?}", input);
        })?;
        self.custom_color = color;
        self.choice = Some(BackgroundChoice::Custom(color));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(HexColor::parse("#112233").unwrap(), HexColor::rgb(0x11, 0x22, 0x33));
        assert_eq!(HexColor::parse("#aBcDeF").unwrap().to_string(), "#ABCDEF");
        for bad in ["#12", "112233", "#1122334", "#GG2233", "", "#", "#11 233"] {
            assert!(
                matches!(HexColor::parse(bad), Err(BoothError::InvalidCustomColor(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_custom_color_keeps_previous_choice() {
        let mut selection = BackgroundSelection::default();
        selection.select_preset("teal").unwrap();

        let err = selection.apply_custom_color("#12").unwrap_err();
        assert_eq!(err, BoothError::InvalidCustomColor("#12".to_string()));
        assert_eq!(selection.choice(), Some(&BackgroundChoice::Preset("teal".into())));

        selection.apply_custom_color("#112233").unwrap();
        assert_eq!(
            selection.choice(),
            Some(&BackgroundChoice::Custom(HexColor::rgb(0x11, 0x22, 0x33)))
        );
        assert_eq!(selection.custom_color().to_string(), "#112233");
    }

    #[test]
    fn test_param_forms() {
        assert_eq!(
            BackgroundChoice::from_param("beach").unwrap(),
            BackgroundChoice::Preset("beach".into())
        );
        assert_eq!(BackgroundChoice::from_param("#4a90e2").unwrap().to_param(), "#4A90E2");
        assert!(matches!(
            BackgroundChoice::from_param("sunset"),
            Err(BoothError::MalformedParams(_))
        ));
        assert!(matches!(
            BackgroundChoice::from_param("#4a90"),
            Err(BoothError::InvalidCustomColor(_))
        ));
    }

    #[test]
    fn test_resolve_presets() {
        let assets = Path::new("/assets");
        assert_eq!(
            BackgroundChoice::Preset("nature2".into()).resolve(assets).unwrap(),
            ResolvedBackground::Image(PathBuf::from("/assets/bg2.png"))
        );
        assert_eq!(
            BackgroundChoice::Preset("blue".into()).resolve(assets).unwrap(),
            ResolvedBackground::Color(HexColor::rgb(0x4A, 0x90, 0xE2))
        );
    }

    #[test]
    fn test_default_custom_color() {
        assert_eq!(
            BackgroundSelection::default().custom_color().to_string(),
            DEFAULT_CUSTOM_COLOR
        );
    }
}
