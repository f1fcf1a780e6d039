//! Responsive sizing: fitting print-proportioned canvases and thumbnails
//! into whatever viewport the device currently reports.
//!
//! The viewport itself is published once, by whoever owns the window, through
//! a [`ViewportObserver`]; screens subscribe instead of installing their own
//! listeners.

use crate::errors::BoothError;
use crate::templates::Template;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

const BUDGET_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Landscape when strictly wider than tall.
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    fn ensure_valid(&self) -> Result<(), BoothError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if positive(self.width) && positive(self.height) {
            Ok(())
        } else {
            Err(BoothError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// How much of one viewport axis a budget may use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extent {
    /// Share of the axis, e.g. `0.6`.
    Fraction(f64),
    /// Whole axis minus a fixed amount of pixels.
    Inset(f64),
}

impl Extent {
    pub fn resolve(&self, axis: f64) -> f64 {
        match *self {
            Extent::Fraction(f) => axis * f,
            Extent::Inset(px) => axis - px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBudget {
    pub width: Extent,
    pub height: Extent,
}

/// Canvas budgets for both orientations on one screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingProfile {
    pub portrait: ScreenBudget,
    pub landscape: ScreenBudget,
}

impl SizingProfile {
    /// Final preview: portrait gives the canvas most of the width, landscape
    /// shares the width with the action column.
    pub fn final_preview() -> Self {
        Self {
            portrait: ScreenBudget {
                width: Extent::Inset(100.0),
                height: Extent::Fraction(0.6),
            },
            landscape: ScreenBudget {
                width: Extent::Fraction(0.6),
                height: Extent::Fraction(0.8),
            },
        }
    }

    /// Live capture preview, where the canvas may use the full height.
    pub fn capture_preview() -> Self {
        Self {
            portrait: ScreenBudget {
                width: Extent::Inset(100.0),
                height: Extent::Fraction(1.0),
            },
            landscape: ScreenBudget {
                width: Extent::Fraction(0.6),
                height: Extent::Fraction(1.0),
            },
        }
    }

    pub fn budget(&self, orientation: Orientation) -> ScreenBudget {
        match orientation {
            Orientation::Portrait => self.portrait,
            Orientation::Landscape => self.landscape,
        }
    }
}

impl Default for SizingProfile {
    fn default() -> Self {
        Self::final_preview()
    }
}

/// On-screen size of a canvas and its ratio to print resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGeometry {
    pub display_width: f64,
    pub display_height: f64,
    pub scale: f64,
    pub print_width: f64,
    pub print_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl DisplayGeometry {
    pub fn aspect_ratio(&self) -> f64 {
        self.print_width / self.print_height
    }
}

/// Canvas geometry under the final-preview budgets.
pub fn compute_canvas_display_size(
    template: &Template,
    viewport: Viewport,
    orientation: Orientation,
) -> Result<DisplayGeometry, BoothError> {
    compute_canvas_display_size_with(template, viewport, orientation, &SizingProfile::final_preview())
}

/// Width-first fit with a height-constrained fallback. The result never
/// exceeds either budget and keeps the print aspect ratio exactly.
pub fn compute_canvas_display_size_with(
    template: &Template,
    viewport: Viewport,
    orientation: Orientation,
    profile: &SizingProfile,
) -> Result<DisplayGeometry, BoothError> {
    viewport.ensure_valid()?;

    let print_width = template.canvas_physical_size.width_px();
    let print_height = template.canvas_physical_size.height_px();

    let budget = profile.budget(orientation);
    let max_width = budget.width.resolve(viewport.width);
    let max_height = budget.height.resolve(viewport.height);
    if !(max_width > 0.0 && max_height > 0.0) {
        return Err(BoothError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let aspect_ratio = print_width / print_height;
    let mut display_width = max_width;
    let mut display_height = display_width / aspect_ratio;
    if display_height > max_height {
        display_height = max_height;
        display_width = display_height * aspect_ratio;
    }

    crate::assert_invariant!(
        display_width <= max_width * (1.0 + BUDGET_EPSILON)
            && display_height <= max_height * (1.0 + BUDGET_EPSILON),
        "Canvas display size fits the screen budget",
        "sizing"
    );
    crate::assert_invariant!(
        ((display_width / display_height) - aspect_ratio).abs() <= aspect_ratio * BUDGET_EPSILON,
        "Canvas display size keeps the print aspect ratio",
        "sizing"
    );

    log::trace!(
        "Canvas {} in {}x{} ({:?}): {:.1}x{:.1}",
        template.id,
        viewport.width,
        viewport.height,
        orientation,
        display_width,
        display_height
    );

    Ok(DisplayGeometry {
        display_width,
        display_height,
        scale: display_width / print_width,
        print_width,
        print_height,
        max_width,
        max_height,
    })
}

/// Column grid used by the template and background pickers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailGrid {
    pub padding: f64,
    pub gap: f64,
    /// Thumbnail height as a multiple of its width.
    pub aspect_multiplier: f64,
}

impl ThumbnailGrid {
    pub const TEMPLATES: ThumbnailGrid = ThumbnailGrid {
        padding: 40.0,
        gap: 20.0,
        aspect_multiplier: 1.3,
    };

    pub const BACKGROUNDS: ThumbnailGrid = ThumbnailGrid {
        padding: 40.0,
        gap: 15.0,
        aspect_multiplier: 0.8,
    };

    pub fn columns(orientation: Orientation) -> usize {
        match orientation {
            Orientation::Portrait => 2,
            Orientation::Landscape => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSize {
    pub width: f64,
    pub height: f64,
    pub columns: usize,
}

/// Splits the available width evenly across the orientation's columns.
pub fn thumbnail_size(
    viewport: Viewport,
    orientation: Orientation,
    grid: ThumbnailGrid,
) -> Result<ThumbnailSize, BoothError> {
    viewport.ensure_valid()?;

    let columns = ThumbnailGrid::columns(orientation);
    let available = viewport.width - grid.padding - grid.gap * (columns - 1) as f64;
    if available <= 0.0 {
        return Err(BoothError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let width = available / columns as f64;
    Ok(ThumbnailSize {
        width,
        height: width * grid.aspect_multiplier,
        columns,
    })
}

/// Single owner of the current viewport; screens hold receivers.
#[derive(Debug)]
pub struct ViewportObserver {
    tx: watch::Sender<Viewport>,
}

impl ViewportObserver {
    pub fn new(initial: Viewport) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Publishes a new viewport. Returns whether subscribers were notified;
    /// repeats of the current value are swallowed.
    pub fn publish(&self, viewport: Viewport) -> Result<bool, BoothError> {
        viewport.ensure_valid()?;
        Ok(self.tx.send_if_modified(|current| {
            if *current == viewport {
                false
            } else {
                *current = viewport;
                true
            }
        }))
    }

    pub fn current(&self) -> Viewport {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Viewport> {
        self.tx.subscribe()
    }

    /// Canvas geometry for the current viewport and its own orientation.
    pub fn canvas_geometry(
        &self,
        template: &Template,
        profile: &SizingProfile,
    ) -> Result<DisplayGeometry, BoothError> {
        let viewport = self.current();
        compute_canvas_display_size_with(template, viewport, viewport.orientation(), profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateRegistry;

    #[test]
    fn test_strip_on_portrait_phone() {
        let registry = TemplateRegistry::builtin();
        let strip = registry.get("4-strip").unwrap();
        let g = compute_canvas_display_size(strip, Viewport::new(390.0, 844.0), Orientation::Portrait)
            .unwrap();

        assert!((g.print_width - 944.88).abs() < 1e-9);
        assert!((g.print_height - 2480.31).abs() < 1e-9);
        assert!((g.aspect_ratio() - 0.381).abs() < 1e-3);
        assert_eq!(g.max_width, 290.0);
        assert!(g.display_width <= 290.0);
        // Height-bound: 60% of 844.
        assert!((g.display_height - 506.4).abs() < 1e-9);
        assert!((g.scale - g.display_width / g.print_width).abs() < 1e-12);
    }

    #[test]
    fn test_width_bound_fit() {
        let registry = TemplateRegistry::builtin();
        let grid = registry.get("4-grid").unwrap();
        let g = compute_canvas_display_size(grid, Viewport::new(390.0, 844.0), Orientation::Portrait)
            .unwrap();
        assert_eq!(g.display_width, 290.0);
        assert!((g.display_height - 290.0 * 15.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_landscape_budget() {
        let registry = TemplateRegistry::builtin();
        let landscape = registry.get("4-landscape").unwrap();
        let g = compute_canvas_display_size(
            landscape,
            Viewport::new(844.0, 390.0),
            Orientation::Landscape,
        )
        .unwrap();
        assert!((g.max_width - 506.4).abs() < 1e-9);
        assert!((g.max_height - 312.0).abs() < 1e-9);
        assert!(g.display_height <= 312.0 + 1e-9);
    }

    #[test]
    fn test_degenerate_viewport_rejected() {
        let registry = TemplateRegistry::builtin();
        let grid = registry.get("4-grid").unwrap();
        for (w, h) in [(0.0, 800.0), (400.0, 0.0), (-1.0, 5.0), (f64::NAN, 10.0), (80.0, 600.0)] {
            assert!(matches!(
                compute_canvas_display_size(grid, Viewport::new(w, h), Orientation::Portrait),
                Err(BoothError::InvalidViewport { .. })
            ));
        }
    }

    #[test]
    fn test_template_thumbnails() {
        let portrait = thumbnail_size(
            Viewport::new(390.0, 844.0),
            Orientation::Portrait,
            ThumbnailGrid::TEMPLATES,
        )
        .unwrap();
        assert_eq!(portrait.columns, 2);
        assert!((portrait.width - 165.0).abs() < 1e-9);
        assert!((portrait.height - 214.5).abs() < 1e-9);

        let landscape = thumbnail_size(
            Viewport::new(844.0, 390.0),
            Orientation::Landscape,
            ThumbnailGrid::TEMPLATES,
        )
        .unwrap();
        assert_eq!(landscape.columns, 3);
        assert!((landscape.width - 764.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_background_swatches() {
        let s = thumbnail_size(
            Viewport::new(390.0, 844.0),
            Orientation::Portrait,
            ThumbnailGrid::BACKGROUNDS,
        )
        .unwrap();
        assert!((s.width - 167.5).abs() < 1e-9);
        assert!((s.height - 134.0).abs() < 1e-9);
    }

    #[test]
    fn test_observer_swallows_repeats() {
        let observer = ViewportObserver::new(Viewport::new(390.0, 844.0));
        let mut rx = observer.subscribe();
        assert!(!observer.publish(Viewport::new(390.0, 844.0)).unwrap());
        assert!(!rx.has_changed().unwrap());

        assert!(observer.publish(Viewport::new(844.0, 390.0)).unwrap());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().orientation(), Orientation::Landscape);
        assert!(observer.publish(Viewport::new(0.0, 390.0)).is_err());
        assert_eq!(observer.current(), Viewport::new(844.0, 390.0));
    }
}
