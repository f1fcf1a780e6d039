//! Property tests for sizing and layout geometry

use printbooth::layout::{fill_slots, layout_slots};
use printbooth::sizing::{
    compute_canvas_display_size, compute_canvas_display_size_with, Orientation, SizingProfile,
    Viewport,
};
use printbooth::templates::TemplateRegistry;
use printbooth::units::{cm_to_px, PX_PER_CM};
use proptest::prelude::*;

fn template_ids() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["4-grid", "5-collage", "4-strip", "4-landscape"])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The canvas never exceeds either budget and keeps the print aspect ratio.
    #[test]
    fn canvas_fits_budget_and_keeps_aspect(
        id in template_ids(),
        width in 101.0f64..4000.0,
        height in 1.0f64..4000.0,
        landscape in any::<bool>(),
        capture_screen in any::<bool>(),
    ) {
        let registry = TemplateRegistry::builtin();
        let template = registry.get(id).unwrap();
        let orientation = if landscape { Orientation::Landscape } else { Orientation::Portrait };
        let profile = if capture_screen {
            SizingProfile::capture_preview()
        } else {
            SizingProfile::final_preview()
        };

        let g = compute_canvas_display_size_with(
            template,
            Viewport::new(width, height),
            orientation,
            &profile,
        ).unwrap();

        prop_assert!(g.display_width <= g.max_width * (1.0 + 1e-9));
        prop_assert!(g.display_height <= g.max_height * (1.0 + 1e-9));
        let print_aspect = g.print_width / g.print_height;
        prop_assert!((g.display_width / g.display_height - print_aspect).abs() < 1e-9);
        prop_assert!((g.scale - g.display_width / g.print_width).abs() < 1e-12);
    }

    /// Placements at any scale are the print placements magnified.
    #[test]
    fn layout_is_linear_in_scale(id in template_ids(), scale in 0.01f64..2.0) {
        let registry = TemplateRegistry::builtin();
        let template = registry.get(id).unwrap();
        let print = layout_slots(template, 1.0);
        let scaled = layout_slots(template, scale);
        prop_assert_eq!(print.len(), scaled.len());
        for (p, s) in print.iter().zip(&scaled) {
            let expected = p.scaled(scale);
            prop_assert!((expected.x - s.x).abs() < 1e-6);
            prop_assert!((expected.y - s.y).abs() < 1e-6);
            prop_assert!((expected.width - s.width).abs() < 1e-6);
            prop_assert!((expected.height - s.height).abs() < 1e-6);
        }
    }

    /// Photo content never moves a slot.
    #[test]
    fn preview_and_final_geometry_identical(
        id in template_ids(),
        scale in 0.05f64..1.5,
        captured in 0usize..=5,
    ) {
        let registry = TemplateRegistry::builtin();
        let template = registry.get(id).unwrap();
        let placements = layout_slots(template, scale);
        let all: Vec<String> = (0..template.photo_count).map(|i| format!("p{i}.jpg")).collect();
        let partial = &all[..captured.min(template.photo_count)];

        let preview = fill_slots(&placements, partial);
        let final_render = fill_slots(&layout_slots(template, scale), &all);
        for (a, b) in preview.iter().zip(&final_render) {
            prop_assert_eq!(a.placement, b.placement);
        }
    }

    /// Photo cells never overlap, whatever the scale.
    #[test]
    fn photo_cells_never_overlap(id in template_ids(), scale in 0.05f64..2.0) {
        let registry = TemplateRegistry::builtin();
        let template = registry.get(id).unwrap();
        let photos: Vec<_> = layout_slots(template, scale)
            .into_iter()
            .filter(|p| p.is_photo())
            .collect();
        for (i, a) in photos.iter().enumerate() {
            for b in &photos[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }
}

#[test]
fn cm_round_trip() {
    for x in [1.0, 6.0, 14.0, 21.0, 118.11] {
        assert!((cm_to_px(x) / PX_PER_CM - x).abs() < 1e-9);
    }
}

#[test]
fn strip_on_portrait_phone() {
    let registry = TemplateRegistry::builtin();
    let strip = registry.get("4-strip").unwrap();
    let g = compute_canvas_display_size(strip, Viewport::new(390.0, 844.0), Orientation::Portrait)
        .unwrap();

    assert!((g.print_width - 944.88).abs() < 1e-9);
    assert!((g.print_height - 2480.31).abs() < 1e-9);
    assert!((g.aspect_ratio() - 0.381).abs() < 1e-3);
    assert!(g.display_width <= 290.0);
    assert!(g.display_height <= 844.0 * 0.6 + 1e-9);
    assert!((g.scale - g.display_width / g.print_width).abs() < 1e-12);
}

#[test]
fn degenerate_viewports_rejected() {
    let registry = TemplateRegistry::builtin();
    let grid = registry.get("4-grid").unwrap();
    for (w, h) in [(0.0, 800.0), (400.0, 0.0), (-1.0, 10.0), (f64::NAN, 10.0)] {
        assert!(compute_canvas_display_size(grid, Viewport::new(w, h), Orientation::Portrait).is_err());
    }
    // Portrait budget is width - 100; a 90px window leaves nothing.
    assert!(compute_canvas_display_size(grid, Viewport::new(90.0, 800.0), Orientation::Portrait).is_err());
}
