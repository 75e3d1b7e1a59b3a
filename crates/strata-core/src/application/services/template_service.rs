//! Template Service - catalogue queries.
//!
//! Answers "what can I generate?" one level at a time: languages, the kinds
//! under a language, the templates under a kind.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    application::ports::TemplateSource,
    domain::{SourceKind, TemplateCoordinate},
    error::StrataResult,
};

/// Which level of the catalogue a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogLevel {
    Languages,
    Kinds,
    Templates,
}

impl CatalogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Languages => "languages",
            Self::Kinds => "kinds",
            Self::Templates => "templates",
        }
    }
}

/// Service for catalogue operations.
pub struct TemplateService {
    source: Arc<dyn TemplateSource>,
}

impl TemplateService {
    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        Self { source }
    }

    /// List the level addressed by `language` and `kind`.
    pub async fn list(
        &self,
        source: SourceKind,
        language: Option<&str>,
        kind: Option<&str>,
    ) -> StrataResult<(CatalogLevel, BTreeSet<String>)> {
        let coordinate = TemplateCoordinate::listing(source, language, kind)?;
        let level = match (language, kind) {
            (None, _) => CatalogLevel::Languages,
            (Some(_), None) => CatalogLevel::Kinds,
            (Some(_), Some(_)) => CatalogLevel::Templates,
        };
        let names = self.source.list(&coordinate).await?;
        Ok((level, names))
    }
}
