use std::fmt;

use crate::domain::{
    entities::coordinate::{SourceKind, TemplateCoordinate},
    error::DomainError,
};

/// Position of a layer in the standard plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerRole {
    GlobalShared,
    LanguageShared,
    ResourceShared,
    Template,
}

impl LayerRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalShared => "global-shared",
            Self::LanguageShared => "language-shared",
            Self::ResourceShared => "resource-shared",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a [`LayerPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub role: LayerRole,
    pub coordinate: TemplateCoordinate,
}

impl Layer {
    pub fn new(role: LayerRole, coordinate: TemplateCoordinate) -> Self {
        Self { role, coordinate }
    }

    /// Shared layers may legitimately be absent; the chosen template may not.
    pub fn is_required(&self) -> bool {
        self.role == LayerRole::Template
    }
}

/// Ordered layers, lowest precedence first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPlan {
    layers: Vec<Layer>,
}

impl LayerPlan {
    /// The fixed four-layer plan used for every generation request:
    /// global shared, language shared, resource shared, chosen template.
    pub fn standard(
        source: SourceKind,
        language: &str,
        item: &str,
        template: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            layers: vec![
                Layer::new(
                    LayerRole::GlobalShared,
                    TemplateCoordinate::global_shared(source),
                ),
                Layer::new(
                    LayerRole::LanguageShared,
                    TemplateCoordinate::language_shared(source, language)?,
                ),
                Layer::new(
                    LayerRole::ResourceShared,
                    TemplateCoordinate::resource_shared(source, language, item)?,
                ),
                Layer::new(
                    LayerRole::Template,
                    TemplateCoordinate::template(source, language, item, template)?,
                ),
            ],
        })
    }

    /// A plan from explicit layers, kept in the given order.
    ///
    /// Roles must not decrease; the given order is the precedence order.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, DomainError> {
        if layers.windows(2).any(|w| w[0].role > w[1].role) {
            return Err(DomainError::InvalidLayerPlan(
                "layers must be ordered from global shared to template".into(),
            ));
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// The top-precedence coordinate, if the plan has one.
    pub fn template(&self) -> Option<&TemplateCoordinate> {
        self.layers
            .iter()
            .rev()
            .find(|l| l.role == LayerRole::Template)
            .map(|l| &l.coordinate)
    }
}

impl<'a> IntoIterator for &'a LayerPlan {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_plan_has_fixed_shape() {
        let plan = LayerPlan::standard(SourceKind::Local, "rust", "cli", "basic").unwrap();
        let roles: Vec<_> = plan.iter().map(|l| l.role).collect();

        assert_eq!(
            roles,
            vec![
                LayerRole::GlobalShared,
                LayerRole::LanguageShared,
                LayerRole::ResourceShared,
                LayerRole::Template,
            ]
        );
        assert_eq!(
            plan.template().unwrap().relative_path().to_slash_string(),
            "rust/cli/basic"
        );
    }

    #[test]
    fn only_template_layer_is_required() {
        let plan = LayerPlan::standard(SourceKind::Local, "rust", "cli", "basic").unwrap();
        let required: Vec<_> = plan.iter().filter(|l| l.is_required()).collect();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].role, LayerRole::Template);
    }

    #[test]
    fn from_layers_rejects_inverted_order() {
        let layers = vec![
            Layer::new(
                LayerRole::LanguageShared,
                TemplateCoordinate::language_shared(SourceKind::Local, "rust").unwrap(),
            ),
            Layer::new(
                LayerRole::GlobalShared,
                TemplateCoordinate::global_shared(SourceKind::Local),
            ),
        ];
        assert!(LayerPlan::from_layers(layers).is_err());
    }

    #[test]
    fn partial_plan_has_no_template() {
        let plan = LayerPlan::from_layers(vec![Layer::new(
            LayerRole::GlobalShared,
            TemplateCoordinate::global_shared(SourceKind::Local),
        )])
        .unwrap();
        assert_eq!(plan.len(), 1);
        assert!(plan.template().is_none());
    }
}
