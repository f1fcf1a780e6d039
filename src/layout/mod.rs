//! Slot layout: where every photo cell and decoration sits inside a canvas.
//!
//! [`layout_slots`] is a pure function of `(template, scale)`. Every offset is
//! `cm_to_px(cm) * scale`, so the live preview (scale < 1) and the print
//! export (scale = 1) are the same geometry at different magnifications.
//! Slot contents never feed back into placement.

mod grid;
mod landscape;
mod slots;
mod strip;

pub use slots::{fill_slots, RenderedSlot, SlotContent};

use crate::templates::{LayoutKind, Template};
use serde::Serialize;
use std::fmt;

/// Typography of the landscape contact block, already scaled for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactTypography {
    pub tagline_font_px: f64,
    pub text_font_px: f64,
    pub icon_px: f64,
}

impl ContactTypography {
    /// Sizes follow the scale but never drop below a legible floor.
    pub fn for_scale(scale: f64) -> Self {
        Self {
            tagline_font_px: (scale * 10.0).max(8.0),
            text_font_px: (scale * 8.0).max(6.0),
            icon_px: (scale * 12.0).max(10.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SlotRole {
    Photo { index: usize },
    Logo,
    ContactBlock { typography: ContactTypography },
}

impl fmt::Display for SlotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRole::Photo { index } => write!(f, "photo #{}", index + 1),
            SlotRole::Logo => write!(f, "logo"),
            SlotRole::ContactBlock { .. } => write!(f, "contact block"),
        }
    }
}

/// One positioned rectangle, in pixels relative to the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub role: SlotRole,
}

impl SlotPlacement {
    pub(crate) fn photo(index: usize, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            role: SlotRole::Photo { index },
        }
    }

    pub(crate) fn logo(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            role: SlotRole::Logo,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_photo(&self) -> bool {
        matches!(self.role, SlotRole::Photo { .. })
    }

    pub fn photo_index(&self) -> Option<usize> {
        match self.role {
            SlotRole::Photo { index } => Some(index),
            _ => None,
        }
    }

    /// Strict overlap; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &SlotPlacement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Same rectangle magnified by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
            role: self.role,
        }
    }
}

/// Photo placements in index order, followed by decorations.
pub fn layout_slots(template: &Template, scale: f64) -> Vec<SlotPlacement> {
    let placements = match template.layout_kind {
        LayoutKind::Grid | LayoutKind::Collage => grid::two_column(template, scale),
        LayoutKind::Strip => strip::single_column(template, scale),
        LayoutKind::Landscape => landscape::two_by_two_with_footer(template, scale),
    };

    let photo_count = placements.iter().filter(|p| p.is_photo()).count();
    crate::assert_invariant!(
        photo_count == template.photo_count,
        "Layout yields one photo placement per template photo",
        "layout"
    );

    placements
}

/// Scales a print-scale dimension by `scale`, shared by the layout variants.
#[inline]
pub(crate) fn scaled_px(cm: f64, scale: f64) -> f64 {
    crate::units::cm_to_px(cm) * scale
}
