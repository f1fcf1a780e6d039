use super::{SlotPlacement, SlotRole};
use serde::Serialize;

/// What a placement shows. Content never changes a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SlotContent {
    Photo { uri: String },
    /// The slot the next shutter will fill.
    CaptureNext,
    /// A not-yet-reachable slot, labelled with its 1-based number.
    Numbered { number: usize },
    Decoration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSlot {
    pub placement: SlotPlacement,
    pub content: SlotContent,
}

/// Pairs placements with captured photo URIs by index. Slot `i` shows
/// `photo_uris[i]` when present, otherwise a placeholder.
pub fn fill_slots(placements: &[SlotPlacement], photo_uris: &[String]) -> Vec<RenderedSlot> {
    let next_index = photo_uris.len();
    placements
        .iter()
        .map(|placement| {
            let content = match placement.role {
                SlotRole::Photo { index } => match photo_uris.get(index) {
                    Some(uri) => SlotContent::Photo { uri: uri.clone() },
                    None if index == next_index => SlotContent::CaptureNext,
                    None => SlotContent::Numbered { number: index + 1 },
                },
                SlotRole::Logo | SlotRole::ContactBlock { .. } => SlotContent::Decoration,
            };
            RenderedSlot {
                placement: *placement,
                content,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_slots;
    use crate::templates::TemplateRegistry;

    #[test]
    fn test_mid_capture_geometry_matches_final() {
        let registry = TemplateRegistry::builtin();
        for template in registry.list() {
            let placements = layout_slots(template, 0.42);
            let all: Vec<String> = (0..template.photo_count)
                .map(|i| format!("file:///photos/{i}.jpg"))
                .collect();
            let partial = &all[..template.photo_count / 2];

            let preview = fill_slots(&placements, partial);
            let final_render = fill_slots(&placements, &all);
            assert_eq!(preview.len(), final_render.len());
            for (a, b) in preview.iter().zip(&final_render) {
                assert_eq!(a.placement, b.placement);
            }
        }
    }

    #[test]
    fn test_placeholder_kinds() {
        let registry = TemplateRegistry::builtin();
        let grid = registry.get("4-grid").unwrap();
        let placements = layout_slots(grid, 1.0);
        let uris = vec!["a.jpg".to_string()];
        let rendered = fill_slots(&placements, &uris);

        assert_eq!(rendered[0].content, SlotContent::Photo { uri: "a.jpg".into() });
        assert_eq!(rendered[1].content, SlotContent::CaptureNext);
        assert_eq!(rendered[2].content, SlotContent::Numbered { number: 3 });
        assert_eq!(rendered[3].content, SlotContent::Numbered { number: 4 });
        assert_eq!(rendered[4].content, SlotContent::Decoration);
    }
}
