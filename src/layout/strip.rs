use super::{scaled_px, SlotPlacement};
use crate::templates::Template;

/// All cells in one centred column above a bottom-centred logo.
pub(super) fn single_column(template: &Template, scale: f64) -> Vec<SlotPlacement> {
    let margin = scaled_px(template.spacing.margin_cm, scale);
    let gap = scaled_px(template.spacing.gap_cm, scale);
    let cell_w = scaled_px(template.cell_physical_size.width_cm, scale);
    let cell_h = scaled_px(template.cell_physical_size.height_cm, scale);
    let canvas_w = scaled_px(template.canvas_physical_size.width_cm, scale);
    let canvas_h = scaled_px(template.canvas_physical_size.height_cm, scale);
    let logo_w = scaled_px(template.logo_physical_size.width_cm, scale);
    let logo_h = scaled_px(template.logo_physical_size.height_cm, scale);

    let count = template.photo_count as f64;
    let logo_y = canvas_h - margin - logo_h;
    let stack_h = count * cell_h + (count - 1.0).max(0.0) * gap;
    let top = (logo_y - stack_h) / 2.0;
    let x = (canvas_w - cell_w) / 2.0;

    let mut placements: Vec<SlotPlacement> = (0..template.photo_count)
        .map(|index| SlotPlacement::photo(index, x, top + index as f64 * (cell_h + gap), cell_w, cell_h))
        .collect();

    placements.push(SlotPlacement::logo(
        (canvas_w - logo_w) / 2.0,
        logo_y,
        logo_w,
        logo_h,
    ));

    placements
}
