//! Parameter bag carried forward between screens.
//!
//! On the wire every value is a string: `templateId`, `photos` (a JSON array
//! of URI strings) and `background` (preset key or `#RRGGBB`). Parsing fails
//! closed; downstream geometry needs an exact template and photo count.

use crate::background::BackgroundChoice;
use crate::errors::BoothError;
use crate::templates::{Template, TemplateRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TEMPLATE_ID_KEY: &str = "templateId";
pub const PHOTOS_KEY: &str = "photos";
pub const BACKGROUND_KEY: &str = "background";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowParams {
    pub template_id: String,
    #[serde(default)]
    pub photo_uris: Vec<String>,
    #[serde(default)]
    pub background: Option<BackgroundChoice>,
}

impl FlowParams {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            photo_uris: Vec::new(),
            background: None,
        }
    }

    pub fn with_photos(mut self, photo_uris: Vec<String>) -> Self {
        self.photo_uris = photo_uris;
        self
    }

    pub fn with_background(mut self, background: BackgroundChoice) -> Self {
        self.background = Some(background);
        self
    }

    /// String-valued form handed to the router.
    pub fn to_route_params(&self) -> Result<BTreeMap<String, String>, BoothError> {
        let mut params = BTreeMap::new();
        params.insert(TEMPLATE_ID_KEY.to_string(), self.template_id.clone());
        if !self.photo_uris.is_empty() {
            let photos = serde_json::to_string(&self.photo_uris)
                .map_err(|e| BoothError::MalformedParams(format!("photos: {e}")))?;
            params.insert(PHOTOS_KEY.to_string(), photos);
        }
        if let Some(background) = &self.background {
            params.insert(BACKGROUND_KEY.to_string(), background.to_param());
        }
        Ok(params)
    }

    pub fn from_route_params(params: &BTreeMap<String, String>) -> Result<Self, BoothError> {
        let template_id = params
            .get(TEMPLATE_ID_KEY)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BoothError::MalformedParams("missing templateId".to_string()))?
            .clone();

        let photo_uris = match params.get(PHOTOS_KEY) {
            Some(raw) => serde_json::from_str::<Vec<String>>(raw)
                .map_err(|e| BoothError::MalformedParams(format!("photos: {e}")))?,
            None => Vec::new(),
        };

        let background = params
            .get(BACKGROUND_KEY)
            .map(|raw| BackgroundChoice::from_param(raw))
            .transpose()
            .map_err(|e| match e {
                BoothError::InvalidCustomColor(c) => {
                    BoothError::MalformedParams(format!("background color {c}"))
                }
                other => other,
            })?;

        Ok(Self {
            template_id,
            photo_uris,
            background,
        })
    }

    /// Resolves the template, rejecting more photos than it has slots.
    pub fn template<'r>(&self, registry: &'r TemplateRegistry) -> Result<&'r Template, BoothError> {
        let template = registry.get(&self.template_id)?;
        if self.photo_uris.len() > template.photo_count {
            return Err(BoothError::MalformedParams(format!(
                "{} photos for template {} with {} slots",
                self.photo_uris.len(),
                template.id,
                template.photo_count
            )));
        }
        Ok(template)
    }

    /// Composition needs every slot filled and a background.
    pub fn ready_for_composition<'r>(
        &self,
        registry: &'r TemplateRegistry,
    ) -> Result<(&'r Template, &BackgroundChoice), BoothError> {
        let template = self.template(registry)?;
        if self.photo_uris.len() != template.photo_count {
            return Err(BoothError::MalformedParams(format!(
                "template {} needs {} photos, got {}",
                template.id,
                template.photo_count,
                self.photo_uris.len()
            )));
        }
        let background = self
            .background
            .as_ref()
            .ok_or_else(|| BoothError::MalformedParams("missing background".to_string()))?;
        Ok((template, background))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::HexColor;

    fn route(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_route_params_wire_format() {
        let params = FlowParams::new("4-strip")
            .with_photos(vec!["file:///a.jpg".into(), "file:///b.jpg".into()])
            .with_background(BackgroundChoice::Custom(HexColor::rgb(1, 2, 3)));
        let wire = params.to_route_params().unwrap();
        assert_eq!(wire["templateId"], "4-strip");
        assert_eq!(wire["photos"], r#"["file:///a.jpg","file:///b.jpg"]"#);
        assert_eq!(wire["background"], "#010203");
        assert_eq!(FlowParams::from_route_params(&wire).unwrap(), params);
    }

    #[test]
    fn test_unparsable_photos_fail_closed() {
        let wire = route(&[("templateId", "4-grid"), ("photos", "[not json")]);
        assert!(matches!(
            FlowParams::from_route_params(&wire),
            Err(BoothError::MalformedParams(_))
        ));
    }

    #[test]
    fn test_unknown_template_fails_closed() {
        let registry = TemplateRegistry::builtin();
        let params = FlowParams::new("9-mosaic");
        assert!(matches!(
            params.template(&registry),
            Err(BoothError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_composition_requires_exact_count_and_background() {
        let registry = TemplateRegistry::builtin();
        let three: Vec<String> = (0..3).map(|i| format!("{i}.jpg")).collect();
        let four: Vec<String> = (0..4).map(|i| format!("{i}.jpg")).collect();

        let short = FlowParams::new("4-grid")
            .with_photos(three)
            .with_background(BackgroundChoice::Preset("blue".into()));
        assert!(short.ready_for_composition(&registry).is_err());

        let no_background = FlowParams::new("4-grid").with_photos(four.clone());
        assert!(no_background.ready_for_composition(&registry).is_err());

        let ready = FlowParams::new("4-grid")
            .with_photos(four)
            .with_background(BackgroundChoice::Preset("blue".into()));
        let (template, _) = ready.ready_for_composition(&registry).unwrap();
        assert_eq!(template.id, "4-grid");
    }

    #[test]
    fn test_bad_background_in_route_fails_closed() {
        let wire = route(&[("templateId", "4-grid"), ("background", "#12")]);
        assert!(matches!(
            FlowParams::from_route_params(&wire),
            Err(BoothError::MalformedParams(_))
        ));
    }
}
