use super::{scaled_px, SlotPlacement};
use crate::templates::{LayoutKind, Template};

/// Cells in the first column before the rest spill into the second.
const FIRST_COLUMN_CELLS: usize = 3;

/// Grid logo clearance above the bottom margin.
const GRID_LOGO_LIFT_CM: f64 = 1.5;

/// Grid and collage share this skeleton: column one stacks up to three cells,
/// column two stacks the remainder top-aligned and keeps the space below for
/// branding.
pub(super) fn two_column(template: &Template, scale: f64) -> Vec<SlotPlacement> {
    let margin = scaled_px(template.spacing.margin_cm, scale);
    let gap = scaled_px(template.spacing.gap_cm, scale);
    let cell_w = scaled_px(template.cell_physical_size.width_cm, scale);
    let cell_h = scaled_px(template.cell_physical_size.height_cm, scale);
    let canvas_w = scaled_px(template.canvas_physical_size.width_cm, scale);
    let canvas_h = scaled_px(template.canvas_physical_size.height_cm, scale);
    let logo_w = scaled_px(template.logo_physical_size.width_cm, scale);
    let logo_h = scaled_px(template.logo_physical_size.height_cm, scale);

    let first_column = template.photo_count.min(FIRST_COLUMN_CELLS);
    let second_column = template.photo_count - first_column;
    
    let mut placements = Vec::with_capacity(template.photo_count + 1);
    for index in 0..template.photo_count {
        let (column, row) = if index < first_column {
            (0, index)
        } else {
            (1, index - first_column)
        };
        placements.push(SlotPlacement::photo(
            index,
            margin + column as f64 * (cell_w + gap),
            margin + row as f64 * (cell_h + gap),
            cell_w,
            cell_h,
        ));
    }

    // Both logos share the right edge. The grid logo sits bottom-right, lifted
    // off the margin; the collage logo is centred in the band under its taller
    // second column, which puts it lower than the grid one.
    let logo_x = canvas_w - margin - logo_w;
    let logo = match template.layout_kind {
        LayoutKind::Collage => {
            let stack_bottom = if second_column == 0 {
                margin
            } else {
                margin + second_column as f64 * (cell_h + gap) - gap
            };
            let free = canvas_h - margin - stack_bottom;
            SlotPlacement::logo(logo_x, stack_bottom + (free - logo_h) / 2.0, logo_w, logo_h)
        }
        _ => SlotPlacement::logo(
            logo_x,
            canvas_h - margin - scaled_px(GRID_LOGO_LIFT_CM, scale) - logo_h,
            logo_w,
            logo_h,
        ),
    };
    placements.push(logo);

    placements
}
