//! Print-resolution composition of a finished (or partially filled) canvas.
//!
//! A [`CompositionScene`] is the visual tree the preview shows, expressed at
//! print scale: background, one rendered slot per placement, and the branding
//! details for the footer. [`ImageCompositor`] rasterizes it with the `image`
//! crate at any target size; placements are rescaled, never recomputed.

use crate::background::{BackgroundChoice, ResolvedBackground};
use crate::capability::{ImageHandle, Rasterizer};
use crate::config::BrandingConfig;
use crate::errors::BoothError;
use crate::layout::{
    fill_slots, layout_slots, ContactTypography, RenderedSlot, SlotContent, SlotPlacement, SlotRole,
};
use crate::templates::Template;
use crate::units::PRINT_DPI;
use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut};
use serde::Serialize;
use std::path::{Path, PathBuf};

const EXPORT_JPEG_QUALITY: u8 = 95;

/// Text shown in the landscape contact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub tagline: String,
    pub phone: String,
    pub social_handle: String,
}

impl From<&BrandingConfig> for ContactDetails {
    fn from(branding: &BrandingConfig) -> Self {
        Self {
            tagline: branding.tagline.clone(),
            phone: branding.phone.clone(),
            social_handle: branding.social_handle.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionScene {
    pub template_id: String,
    /// Canvas size in print pixels.
    pub width: f64,
    pub height: f64,
    #[serde(skip)]
    pub background: ResolvedBackground,
    pub slots: Vec<RenderedSlot>,
    pub contact: ContactDetails,
    #[serde(skip)]
    pub logo: Option<PathBuf>,
    /// TrueType font for the contact block text.
    #[serde(skip)]
    pub font: Option<PathBuf>,
}

impl CompositionScene {
    /// Builds the print-scale scene. Unfilled slots keep their placeholders,
    /// so the same scene type backs the live preview and the export.
    pub fn build(
        template: &Template,
        photo_uris: &[String],
        background: &BackgroundChoice,
        branding: &BrandingConfig,
    ) -> Result<Self, BoothError> {
        if photo_uris.len() > template.photo_count {
            return Err(BoothError::MalformedParams(format!(
                "{} photos for {} slots",
                photo_uris.len(),
                template.photo_count
            )));
        }

        let placements = layout_slots(template, 1.0);
        Ok(Self {
            template_id: template.id.clone(),
            width: template.canvas_physical_size.width_px(),
            height: template.canvas_physical_size.height_px(),
            background: background.resolve(Path::new(&branding.assets_dir))?,
            slots: fill_slots(&placements, photo_uris),
            contact: ContactDetails::from(branding),
            logo: branding.logo_path.as_ref().map(PathBuf::from),
            font: branding.font_path.as_ref().map(PathBuf::from),
        })
    }

    /// Whole-pixel print size.
    pub fn print_size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }

    pub fn is_complete(&self) -> bool {
        !self.slots.iter().any(|s| {
            matches!(
                s.content,
                SlotContent::CaptureNext | SlotContent::Numbered { .. }
            )
        })
    }
}

/// Integer pixel rectangle, clipped to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl PixelRect {
    fn from_placement(p: &SlotPlacement, fx: f64, fy: f64, canvas: &RgbaImage) -> Option<Self> {
        let left = (p.x * fx).round().max(0.0);
        let top = (p.y * fy).round().max(0.0);
        let right = ((p.x + p.width) * fx).round().min(canvas.width() as f64);
        let bottom = ((p.y + p.height) * fy).round().min(canvas.height() as f64);
        if right - left < 1.0 || bottom - top < 1.0 {
            return None;
        }
        Some(Self {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

pub struct ImageCompositor {
    pub placeholder: Rgba<u8>,
    pub contact_panel: Rgba<u8>,
    pub contact_ink: Rgba<u8>,
    pub filter: FilterType,
}

impl Default for ImageCompositor {
    fn default() -> Self {
        Self {
            placeholder: Rgba([224, 224, 224, 255]),
            contact_panel: Rgba([255, 255, 255, 217]),
            contact_ink: Rgba([51, 51, 51, 255]),
            filter: FilterType::Triangle,
        }
    }
}

impl ImageCompositor {
    fn paint_background(
        &self,
        canvas: &mut RgbaImage,
        background: &ResolvedBackground,
    ) -> Result<(), BoothError> {
        match background {
            ResolvedBackground::Color(color) => {
                let fill = Rgba(color.to_rgba());
                for pixel in canvas.pixels_mut() {
                    *pixel = fill;
                }
            }
            ResolvedBackground::Image(path) => {
                let source = image::open(path).map_err(|e| {
                    BoothError::Render(format!("background {}: {}", path.display(), e))
                })?;
                let filled = source
                    .resize_to_fill(canvas.width(), canvas.height(), self.filter)
                    .to_rgba8();
                imageops::replace(canvas, &filled, 0, 0);
            }
        }
        Ok(())
    }

    fn paint_photo(&self, canvas: &mut RgbaImage, rect: PixelRect, uri: &str) -> Result<(), BoothError> {
        let path = ImageHandle::new(uri)
            .local_path()
            .ok_or_else(|| BoothError::Render(format!("photo {} is not a local file", uri)))?;
        let photo = image::open(&path)
            .map_err(|e| BoothError::Render(format!("photo {}: {}", path.display(), e)))?;
        // Cover fit: crop to the cell aspect ratio, never letterbox.
        let cell = photo
            .resize_to_fill(rect.width, rect.height, self.filter)
            .to_rgba8();
        imageops::replace(canvas, &cell, rect.x as i64, rect.y as i64);
        Ok(())
    }

    fn paint_logo(&self, canvas: &mut RgbaImage, rect: PixelRect, logo: &Path) -> Result<(), BoothError> {
        let source = image::open(logo)
            .map_err(|e| BoothError::Render(format!("logo {}: {}", logo.display(), e)))?;
        // Contain fit, centred in the slot.
        let fitted = source.resize(rect.width, rect.height, self.filter).to_rgba8();
        let x = rect.x + (rect.width - fitted.width()) / 2;
        let y = rect.y + (rect.height - fitted.height()) / 2;
        imageops::overlay(canvas, &fitted, x as i64, y as i64);
        Ok(())
    }

    /// Panel with the tagline over two icon rows (phone, social handle).
    /// Typography keeps its proportions and is fitted to the panel height.
    fn paint_contact(
        &self,
        canvas: &mut RgbaImage,
        rect: PixelRect,
        typography: &ContactTypography,
        contact: &ContactDetails,
        font: Option<&FontVec>,
    ) {
        fill_rect(canvas, rect, self.contact_panel);

        let stack = typography.tagline_font_px + 2.0 * typography.icon_px;
        let unit = rect.height as f64 * 0.8 / stack;
        let pad = (rect.height as f64 * 0.1).round() as i32;
        let tagline_px = typography.tagline_font_px * unit;
        let text_px = typography.text_font_px * unit;
        let icon_px = typography.icon_px * unit;

        let x = rect.x as i32 + pad;
        let mut y = rect.y as i32 + pad;
        if let Some(font) = font {
            draw_text_mut(
                canvas,
                self.contact_ink,
                x,
                y,
                PxScale::from(tagline_px as f32),
                font,
                &contact.tagline,
            );
        }
        y += tagline_px.round() as i32;

        let radius = (icon_px * 0.4).round().max(1.0) as i32;
        for line in [&contact.phone, &contact.social_handle] {
            let centre_y = y + (icon_px / 2.0).round() as i32;
            draw_filled_circle_mut(canvas, (x + radius, centre_y), radius, self.contact_ink);
            if let Some(font) = font {
                draw_text_mut(
                    canvas,
                    self.contact_ink,
                    x + 2 * radius + (icon_px * 0.3).round() as i32,
                    centre_y - (text_px / 2.0).round() as i32,
                    PxScale::from(text_px as f32),
                    font,
                    line,
                );
            }
            y += icon_px.round() as i32;
        }
    }
}

/// Reads the contact font. A missing or unreadable font leaves the panel
/// without text.
fn load_font(path: &Path) -> Option<FontVec> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Contact font {} not readable, skipping text: {}", path.display(), e);
            return None;
        }
    };
    FontVec::try_from_vec(data)
        .inspect_err(|e| log::warn!("Contact font {} invalid, skipping text: {}", path.display(), e))
        .ok()
}

fn fill_rect(canvas: &mut RgbaImage, rect: PixelRect, color: Rgba<u8>) {
    let alpha = color.0[3] as u32;
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let pixel = canvas.get_pixel_mut(x, y);
            for c in 0..3 {
                let blended =
                    (color.0[c] as u32 * alpha + pixel.0[c] as u32 * (255 - alpha)) / 255;
                pixel.0[c] = blended as u8;
            }
            pixel.0[3] = 255;
        }
    }
}

impl Rasterizer for ImageCompositor {
    fn rasterize(
        &self,
        scene: &CompositionScene,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, BoothError> {
        if width == 0 || height == 0 {
            return Err(BoothError::Render(format!(
                "target size {}x{} is empty",
                width, height
            )));
        }

        let fx = width as f64 / scene.width;
        let fy = height as f64 / scene.height;
        log::debug!(
            "Rasterizing {} at {}x{} (x{:.3})",
            scene.template_id,
            width,
            height,
            fx
        );

        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        self.paint_background(&mut canvas, &scene.background)?;
        let has_contact = scene
            .slots
            .iter()
            .any(|s| matches!(s.placement.role, SlotRole::ContactBlock { .. }));
        let font = if has_contact {
            scene.font.as_deref().and_then(load_font)
        } else {
            None
        };

        for slot in &scene.slots {
            let Some(rect) = PixelRect::from_placement(&slot.placement, fx, fy, &canvas) else {
                continue;
            };
            match (&slot.content, slot.placement.role) {
                (SlotContent::Photo { uri }, _) => self.paint_photo(&mut canvas, rect, uri)?,
                (SlotContent::CaptureNext | SlotContent::Numbered { .. }, _) => {
                    fill_rect(&mut canvas, rect, self.placeholder)
                }
                (SlotContent::Decoration, SlotRole::Logo) => {
                    if let Some(logo) = &scene.logo {
                        self.paint_logo(&mut canvas, rect, logo)?;
                    }
                }
                (SlotContent::Decoration, SlotRole::ContactBlock { typography }) => self
                    .paint_contact(&mut canvas, rect, &typography, &scene.contact, font.as_ref()),
                (SlotContent::Decoration, _) => fill_rect(&mut canvas, rect, self.contact_panel),
            }
        }

        Ok(canvas)
    }
}

/// Rasterizes at full print size and writes the result to `path`.
pub fn render_to_file(
    rasterizer: &dyn Rasterizer,
    scene: &CompositionScene,
    path: &Path,
    format: image::ImageFormat,
) -> Result<PathBuf, BoothError> {
    let (width, height) = scene.print_size();
    let rendered = rasterizer.rasterize(scene, width, height)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match format {
        // JPEG has no alpha channel; density tags the print resolution.
        image::ImageFormat::Jpeg => {
            let file = std::io::BufWriter::new(std::fs::File::create(path)?);
            let mut encoder = JpegEncoder::new_with_quality(file, EXPORT_JPEG_QUALITY);
            encoder.set_pixel_density(PixelDensity::dpi(PRINT_DPI as u16));
            encoder.encode_image(&image::DynamicImage::ImageRgba8(rendered).to_rgb8())?;
        }
        _ => rendered.save_with_format(path, format)?,
    }
    log::info!("Wrote {}x{} composite to {}", width, height, path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::HexColor;
    use crate::config::BoothConfig;
    use crate::templates::TemplateRegistry;

    fn branding() -> BrandingConfig {
        BoothConfig::default().branding
    }

    #[test]
    fn test_scene_uses_print_geometry() {
        let registry = TemplateRegistry::builtin();
        let strip = registry.get("4-strip").unwrap();
        let scene = CompositionScene::build(
            strip,
            &[],
            &BackgroundChoice::Preset("pink".into()),
            &branding(),
        )
        .unwrap();
        assert_eq!(scene.print_size(), (945, 2480));
        assert_eq!(scene.slots, fill_slots(&layout_slots(strip, 1.0), &[]));
        assert!(!scene.is_complete());
    }

    #[test]
    fn test_too_many_photos_rejected() {
        let registry = TemplateRegistry::builtin();
        let strip = registry.get("4-strip").unwrap();
        let uris: Vec<String> = (0..5).map(|i| format!("{i}.jpg")).collect();
        assert!(CompositionScene::build(
            strip,
            &uris,
            &BackgroundChoice::Preset("blue".into()),
            &branding()
        )
        .is_err());
    }

    #[test]
    fn test_placeholders_and_background_painted() {
        let registry = TemplateRegistry::builtin();
        let grid = registry.get("4-grid").unwrap();
        let blue = HexColor::rgb(0x4A, 0x90, 0xE2);
        let scene =
            CompositionScene::build(grid, &[], &BackgroundChoice::Custom(blue), &branding())
                .unwrap();

        let compositor = ImageCompositor::default();
        let image = compositor.rasterize(&scene, 140, 150).unwrap();
        assert_eq!(image.dimensions(), (140, 150));
        assert_eq!(image.get_pixel(0, 0), &Rgba(blue.to_rgba()));

        let first = &scene.slots[0].placement;
        let fx = 140.0 / scene.width;
        let fy = 150.0 / scene.height;
        let cx = ((first.x + first.width / 2.0) * fx) as u32;
        let cy = ((first.y + first.height / 2.0) * fy) as u32;
        assert_eq!(image.get_pixel(cx, cy), &compositor.placeholder);
    }

    #[test]
    fn test_empty_target_rejected() {
        let registry = TemplateRegistry::builtin();
        let grid = registry.get("4-grid").unwrap();
        let scene = CompositionScene::build(
            grid,
            &[],
            &BackgroundChoice::Preset("teal".into()),
            &branding(),
        )
        .unwrap();
        assert!(matches!(
            ImageCompositor::default().rasterize(&scene, 0, 10),
            Err(BoothError::Render(_))
        ));
    }

    fn contact_pixels(font_path: Option<&str>) -> (Vec<Rgba<u8>>, Rgba<u8>) {
        let registry = TemplateRegistry::builtin();
        let landscape = registry.get("4-landscape").unwrap();
        let mut branding = branding();
        branding.font_path = font_path.map(str::to_string);
        let scene = CompositionScene::build(
            landscape,
            &[],
            &BackgroundChoice::Custom(HexColor::rgb(0, 0, 0)),
            &branding,
        )
        .unwrap();

        let compositor = ImageCompositor::default();
        let (w, h) = scene.print_size();
        let image = compositor.rasterize(&scene, w, h).unwrap();
        let block = scene
            .slots
            .iter()
            .find(|s| matches!(s.placement.role, SlotRole::ContactBlock { .. }))
            .unwrap();
        let rect = PixelRect::from_placement(&block.placement, 1.0, 1.0, &image).unwrap();
        let pixels = (rect.y..rect.y + rect.height)
            .flat_map(|y| (rect.x..rect.x + rect.width).map(move |x| (x, y)))
            .map(|(x, y)| *image.get_pixel(x, y))
            .collect();
        (pixels, compositor.contact_ink)
    }

    #[test]
    fn test_contact_block_draws_icons_over_panel() {
        let (pixels, ink) = contact_pixels(None);
        let first = pixels[0];
        assert!(pixels.iter().any(|p| *p != first));
        assert!(pixels.contains(&ink));
    }

    #[test]
    fn test_contact_block_draws_text_with_font() {
        let font = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
        if !Path::new(font).exists() {
            eprintln!("{} not installed, skipping", font);
            return;
        }
        let dark = |pixels: &[Rgba<u8>]| pixels.iter().filter(|p| p.0[0] < 128).count();
        let (without, _) = contact_pixels(None);
        let (with, _) = contact_pixels(Some(font));
        assert!(dark(&with) > dark(&without));
    }

    #[test]
    fn test_missing_font_still_renders() {
        let (pixels, ink) = contact_pixels(Some("/nonexistent/font.ttf"));
        assert!(pixels.contains(&ink));
    }

    #[test]
    fn test_jpeg_export_tagged_at_print_dpi() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::builtin();
        let strip = registry.get("4-strip").unwrap();
        let scene = CompositionScene::build(
            strip,
            &[],
            &BackgroundChoice::Preset("teal".into()),
            &branding(),
        )
        .unwrap();

        let path = dir.path().join("strip.jpg");
        render_to_file(&ImageCompositor::default(), &scene, &path, image::ImageFormat::Jpeg)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[6..11], b"JFIF\0");
        assert_eq!(bytes[13], 1);
        assert_eq!(u16::from_be_bytes([bytes[14], bytes[15]]), PRINT_DPI as u16);
        assert_eq!(image::open(&path).unwrap().width(), 945);
    }
}
