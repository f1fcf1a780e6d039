use super::{scaled_px, ContactTypography, SlotPlacement, SlotRole};
use crate::templates::Template;

const COLUMNS: usize = 2;

/// Photo block in the top `photo_area_fraction` of the canvas, centred with
/// equal before/between/after gaps; footer below holds the contact block on
/// the left and the logo on the right.
///
/// Gaps clamp at zero, so cells larger than their area still never overlap;
/// the block then stays centred and overflows evenly on both sides.
pub(super) fn two_by_two_with_footer(template: &Template, scale: f64) -> Vec<SlotPlacement> {
    let margin = scaled_px(template.spacing.margin_cm, scale);
    let cell_w = scaled_px(template.cell_physical_size.width_cm, scale);
    let cell_h = scaled_px(template.cell_physical_size.height_cm, scale);
    let canvas_w = scaled_px(template.canvas_physical_size.width_cm, scale);
    let canvas_h = scaled_px(template.canvas_physical_size.height_cm, scale);
    let logo_w = scaled_px(template.logo_physical_size.width_cm, scale);
    let logo_h = scaled_px(template.logo_physical_size.height_cm, scale);

    let photo_area_h = canvas_h * template.photo_area_fraction;
    let rows = template.photo_count.div_ceil(COLUMNS);
    let (cols_f, rows_f) = (COLUMNS as f64, rows as f64);

    let h_gap = ((canvas_w - cols_f * cell_w) / (cols_f + 1.0)).max(0.0);
    let v_gap = ((photo_area_h - rows_f * cell_h) / (rows_f + 1.0)).max(0.0);
    let block_w = cols_f * cell_w + (cols_f - 1.0) * h_gap;
    let block_h = rows_f * cell_h + (rows_f - 1.0).max(0.0) * v_gap;
    let left = (canvas_w - block_w) / 2.0;
    let top = (photo_area_h - block_h) / 2.0;

    let mut placements: Vec<SlotPlacement> = (0..template.photo_count)
        .map(|index| {
            let (row, column) = (index / COLUMNS, index % COLUMNS);
            SlotPlacement::photo(
                index,
                left + column as f64 * (cell_w + h_gap),
                top + row as f64 * (cell_h + v_gap),
                cell_w,
                cell_h,
            )
        })
        .collect();

    let footer_y = photo_area_h;
    let footer_inner_h = (canvas_h - photo_area_h - 2.0 * margin).max(0.0);

    placements.push(SlotPlacement {
        x: margin,
        y: footer_y + margin,
        width: (canvas_w / 2.0 - margin).max(0.0),
        height: footer_inner_h,
        role: SlotRole::ContactBlock {
            typography: ContactTypography::for_scale(scale),
        },
    });

    // Logo shrinks to the footer height, keeping its aspect ratio.
    let shrink = if logo_h > 0.0 {
        (footer_inner_h / logo_h).min(1.0)
    } else {
        1.0
    };
    let (fitted_w, fitted_h) = (logo_w * shrink, logo_h * shrink);
    placements.push(SlotPlacement::logo(
        canvas_w - margin - fitted_w,
        footer_y + (canvas_h - photo_area_h - fitted_h) / 2.0,
        fitted_w,
        fitted_h,
    ));

    placements
}
