//! Template registry: the static catalog of print layouts.
//!
//! Physical sizes here are the print contract. They are never derived from
//! screen size, and photo count is an explicit field, never read out of the id.

use crate::config::LayoutConfig;
use crate::errors::BoothError;
use crate::layout::{layout_slots, SlotPlacement};
use crate::units::{cm_to_px, format_cm};
use serde::{Deserialize, Serialize};

/// Photo counts a template may declare.
pub const SUPPORTED_PHOTO_COUNTS: [usize; 6] = [2, 3, 4, 5, 6, 8];

const FIT_EPSILON_PX: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Grid,
    Strip,
    Collage,
    Landscape,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Grid => "grid",
            LayoutKind::Strip => "strip",
            LayoutKind::Collage => "collage",
            LayoutKind::Landscape => "landscape",
        }
    }
}

/// A physical rectangle in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl PhysicalSize {
    pub const fn new(width_cm: f64, height_cm: f64) -> Self {
        Self {
            width_cm,
            height_cm,
        }
    }

    pub fn width_px(&self) -> f64 {
        cm_to_px(self.width_cm)
    }

    pub fn height_px(&self) -> f64 {
        cm_to_px(self.height_cm)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width_px() / self.height_px()
    }
}

/// Fixed spacing of a template, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    /// Inset from the canvas edge to photos and decorations.
    pub margin_cm: f64,
    /// Gap between stacked cells.
    pub gap_cm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub layout_kind: LayoutKind,
    pub photo_count: usize,
    pub canvas_physical_size: PhysicalSize,
    pub cell_physical_size: PhysicalSize,
    pub spacing: Spacing,
    pub logo_physical_size: PhysicalSize,
    /// Share of canvas height given to photos; the rest is footer.
    pub photo_area_fraction: f64,
}

impl Template {
    /// e.g. `8.0cm × 21.0cm (Each photo: 3.35cm × 2.3cm)`
    pub fn dimensions_label(&self) -> String {
        format!(
            "{}cm × {}cm (Each photo: {}cm × {}cm)",
            format_cm(self.canvas_physical_size.width_cm),
            format_cm(self.canvas_physical_size.height_cm),
            format_cm(self.cell_physical_size.width_cm),
            format_cm(self.cell_physical_size.height_cm),
        )
    }

    /// Print resolution of the whole canvas, rounded to whole pixels.
    pub fn print_size_px(&self) -> (u32, u32) {
        (
            self.canvas_physical_size.width_px().round() as u32,
            self.canvas_physical_size.height_px().round() as u32,
        )
    }

    /// Lays the template out at print scale and reports every placement
    /// leaving the canvas and every pair of overlapping photo cells.
    pub fn fit_violations(&self) -> Vec<String> {
        let placements = layout_slots(self, 1.0);
        let canvas_w = self.canvas_physical_size.width_px();
        let canvas_h = self.canvas_physical_size.height_px();
        let mut violations = Vec::new();

        for p in &placements {
            if p.x < -FIT_EPSILON_PX
                || p.y < -FIT_EPSILON_PX
                || p.right() > canvas_w + FIT_EPSILON_PX
                || p.bottom() > canvas_h + FIT_EPSILON_PX
            {
                violations.push(format!(
                    "{} at ({:.1}, {:.1}) size {:.1}x{:.1}px exceeds canvas {:.1}x{:.1}px",
                    p.role, p.x, p.y, p.width, p.height, canvas_w, canvas_h
                ));
            }
        }

        let photos: Vec<&SlotPlacement> = placements.iter().filter(|p| p.is_photo()).collect();
        for (i, a) in photos.iter().enumerate() {
            for b in &photos[i + 1..] {
                if a.overlaps(b) {
                    violations.push(format!("{} overlaps {}", a.role, b.role));
                }
            }
        }

        violations
    }

    fn check_shape(&self) -> Result<(), BoothError> {
        if !SUPPORTED_PHOTO_COUNTS.contains(&self.photo_count) {
            return Err(BoothError::TemplateOverflow {
                template: self.id.clone(),
                detail: format!("unsupported photo count {}", self.photo_count),
            });
        }
        let sizes = [
            self.canvas_physical_size,
            self.cell_physical_size,
            self.logo_physical_size,
        ];
        if sizes.iter().any(|s| s.width_cm <= 0.0 || s.height_cm <= 0.0) {
            return Err(BoothError::TemplateOverflow {
                template: self.id.clone(),
                detail: "physical sizes must be positive".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.photo_area_fraction) || self.photo_area_fraction == 0.0 {
            return Err(BoothError::TemplateOverflow {
                template: self.id.clone(),
                detail: "photo area fraction must be in (0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// Canonical templates, in display order.
pub fn builtin_templates() -> Vec<Template> {
    let grid_spacing = Spacing {
        margin_cm: 0.3,
        gap_cm: 0.2,
    };

    vec![
        Template {
            id: "4-grid".to_string(),
            name: "4 Photos Grid".to_string(),
            description: "Classic 2x2 grid layout".to_string(),
            layout_kind: LayoutKind::Grid,
            photo_count: 4,
            canvas_physical_size: PhysicalSize::new(14.0, 15.0),
            cell_physical_size: PhysicalSize::new(6.0, 4.5),
            spacing: grid_spacing,
            logo_physical_size: PhysicalSize::new(3.0, 3.0),
            photo_area_fraction: 1.0,
        },
        Template {
            id: "5-collage".to_string(),
            name: "5 Photos Collage".to_string(),
            description: "Creative collage style".to_string(),
            layout_kind: LayoutKind::Collage,
            photo_count: 5,
            canvas_physical_size: PhysicalSize::new(14.0, 15.0),
            cell_physical_size: PhysicalSize::new(6.0, 4.5),
            spacing: grid_spacing,
            logo_physical_size: PhysicalSize::new(3.0, 3.0),
            photo_area_fraction: 1.0,
        },
        Template {
            id: "4-strip".to_string(),
            name: "4 Photos Strip".to_string(),
            description: "Vertical photo strip".to_string(),
            layout_kind: LayoutKind::Strip,
            photo_count: 4,
            canvas_physical_size: PhysicalSize::new(8.0, 21.0),
            cell_physical_size: PhysicalSize::new(3.35, 2.3),
            spacing: Spacing {
                margin_cm: 0.5,
                gap_cm: 0.2,
            },
            logo_physical_size: PhysicalSize::new(4.0, 4.0),
            photo_area_fraction: 1.0,
        },
        Template {
            id: "4-landscape".to_string(),
            name: "4 Photos Landscape".to_string(),
            description: "Horizontal landscape layout".to_string(),
            layout_kind: LayoutKind::Landscape,
            photo_count: 4,
            canvas_physical_size: PhysicalSize::new(15.0, 11.3),
            cell_physical_size: PhysicalSize::new(7.78, 4.59),
            spacing: Spacing {
                margin_cm: 0.3,
                gap_cm: 0.0,
            },
            logo_physical_size: PhysicalSize::new(2.4, 2.4),
            photo_area_fraction: 0.75,
        },
    ]
}

/// Immutable catalog, built once.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

impl TemplateRegistry {
    /// Validates every template. Fit violations are logged, or returned as
    /// [`BoothError::TemplateOverflow`] when `strict_fit` is set.
    pub fn new(templates: Vec<Template>, strict_fit: bool) -> Result<Self, BoothError> {
        for (i, template) in templates.iter().enumerate() {
            template.check_shape()?;

            if templates[..i].iter().any(|t| t.id == template.id) {
                return Err(BoothError::Config(format!(
                    "duplicate template id {}",
                    template.id
                )));
            }

            let violations = template.fit_violations();
            if violations.is_empty() {
                continue;
            }
            if strict_fit {
                return Err(BoothError::TemplateOverflow {
                    template: template.id.clone(),
                    detail: violations.join("; "),
                });
            }
            for v in &violations {
                log::warn!("Template {} overflows its canvas: {}", template.id, v);
            }
        }

        log::debug!("Template registry loaded with {} templates", templates.len());
        Ok(Self { templates })
    }

    /// Built-in catalog under `layout`. In strict mode a template that does
    /// not fit its canvas is withdrawn, so lookups for it fail closed.
    pub fn from_layout_config(layout: &LayoutConfig) -> Self {
        match Self::new(builtin_templates(), layout.strict_fit) {
            Ok(registry) => registry,
            Err(e) => {
                log::error!("Template registry rejected: {}", e);
                Self::fitting(builtin_templates())
            }
        }
    }

    fn fitting(templates: Vec<Template>) -> Self {
        let templates = templates
            .into_iter()
            .filter(|t| {
                if let Err(e) = t.check_shape() {
                    log::error!("Withdrawing template {}: {}", t.id, e);
                    return false;
                }
                let violations = t.fit_violations();
                if !violations.is_empty() {
                    log::error!("Withdrawing template {}: {}", t.id, violations.join("; "));
                    return false;
                }
                true
            })
            .collect();
        Self { templates }
    }

    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    pub fn list(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Result<&Template, BoothError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| BoothError::UnknownTemplate(id.to_string()))
    }
}

lazy_static::lazy_static! {
    static ref REGISTRY: TemplateRegistry =
        TemplateRegistry::from_layout_config(&crate::config::BoothConfig::load_or_default().layout);
}

/// Process-wide registry. [`crate::init`] loads it at plugin start.
pub fn registry() -> &'static TemplateRegistry {
    &REGISTRY
}

pub fn list_templates() -> &'static [Template] {
    registry().list()
}

pub fn get_template(id: &str) -> Result<&'static Template, BoothError> {
    registry().get(id)
}
