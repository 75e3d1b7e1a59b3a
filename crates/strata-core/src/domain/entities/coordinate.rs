//! Template coordinates: the address of one directory's worth of fragments.
//!
//! ```text
//! <root>/shared                     global shared
//! <root>/<lang>/shared              language shared
//! <root>/<lang>/<item>/shared       resource shared
//! <root>/<lang>/<item>/<template>   chosen template
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Reserved directory name holding fragments applied regardless of the more
/// specific selection at that level.
pub const SHARED: &str = "shared";

/// Where a coordinate's fragments come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    Remote,
}

impl SourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one directory of template fragments.
///
/// Immutable once constructed. An `item` requires a `language`, and a
/// `template` requires an `item`; the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateCoordinate {
    source: SourceKind,
    language: Option<String>,
    item: Option<String>,
    template: Option<String>,
}

impl TemplateCoordinate {
    /// `<root>/shared`
    pub fn global_shared(source: SourceKind) -> Self {
        Self {
            source,
            language: None,
            item: None,
            template: None,
        }
    }

    /// `<root>/<language>/shared`
    pub fn language_shared(source: SourceKind, language: &str) -> Result<Self, DomainError> {
        Ok(Self {
            source,
            language: Some(segment("language", language)?),
            item: None,
            template: None,
        })
    }

    /// `<root>/<language>/<item>/shared`
    pub fn resource_shared(
        source: SourceKind,
        language: &str,
        item: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            source,
            language: Some(segment("language", language)?),
            item: Some(segment("item", item)?),
            template: None,
        })
    }

    /// `<root>/<language>/<item>/<template>`
    pub fn template(
        source: SourceKind,
        language: &str,
        item: &str,
        template: &str,
    ) -> Result<Self, DomainError> {
        let template = segment("template", template)?;
        if template.eq_ignore_ascii_case(SHARED) {
            return Err(DomainError::InvalidCoordinate(format!(
                "'{SHARED}' is reserved and cannot be chosen as a template"
            )));
        }
        Ok(Self {
            source,
            language: Some(segment("language", language)?),
            item: Some(segment("item", item)?),
            template: Some(template),
        })
    }

    /// A coordinate addressing a listing level: the root (no language), a
    /// language (its items), or an item (its templates).
    pub fn listing(
        source: SourceKind,
        language: Option<&str>,
        item: Option<&str>,
    ) -> Result<Self, DomainError> {
        match (language, item) {
            (None, None) => Ok(Self::global_shared(source)),
            (Some(l), None) => Self::language_shared(source, l),
            (Some(l), Some(i)) => Self::resource_shared(source, l, i),
            (None, Some(_)) => Err(DomainError::InvalidCoordinate(
                "an item requires a language".into(),
            )),
        }
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    pub fn template_name(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// `true` for the three `shared` levels.
    pub fn is_shared(&self) -> bool {
        self.template.is_none()
    }

    /// Path of the fragment directory relative to the source root. Missing
    /// template names are filled with [`SHARED`].
    pub fn relative_path(&self) -> RelativePath {
        let mut path = self.listing_path().into_path_buf();
        path.push(self.template.as_deref().unwrap_or(SHARED));
        RelativePath::new(path)
    }

    /// Path of the level holding this coordinate, relative to the source
    /// root: language and item only, no template and no `shared` fill.
    pub fn listing_path(&self) -> RelativePath {
        let path: PathBuf = [&self.language, &self.item]
            .into_iter()
            .flatten()
            .collect();
        RelativePath::new(path)
    }

    /// Canonical memoization key for a resolution of this coordinate.
    pub fn cache_key(&self) -> String {
        cache_key(self.source, &self.relative_path())
    }
}

/// Canonical key for any subpath of a source; shared by resolutions and
/// listing fallbacks so both hit the same cache entry.
pub fn cache_key(source: SourceKind, subpath: &RelativePath) -> String {
    format!("{}:{}", source, subpath)
}

fn segment(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::MissingRequiredField { field });
    }
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(DomainError::InvalidCoordinate(format!(
            "{field} '{value}' must be a single path segment"
        )));
    }
    Ok(value.to_string())
}

impl fmt::Display for TemplateCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.relative_path())
    }
}

/// A coordinate resolved to a readable directory.
///
/// Local directories belong to the template checkout; remote ones live in
/// temporary storage owned by the resolver that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplateDirectory {
    pub path: PathBuf,
    pub source: SourceKind,
}

impl ResolvedTemplateDirectory {
    pub fn new(path: impl Into<PathBuf>, source: SourceKind) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
