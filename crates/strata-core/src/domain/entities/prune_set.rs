use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Whether the generated artifact is meant for public release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn from_private_flag(private: bool) -> Self {
        if private { Self::Private } else { Self::Public }
    }

    pub const fn is_private(&self) -> bool {
        matches!(self, Self::Private)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Private => "private",
        })
    }
}

/// One prune rule.
///
/// A plain name matches that basename anywhere in the tree. A rule
/// containing `/` matches exactly one path relative to the tree root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PruneRule {
    Basename(String),
    Path(RelativePath),
}

impl PruneRule {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim().trim_end_matches('/');
        if raw.is_empty() {
            return Err(DomainError::InvalidPruneRule {
                rule: raw.to_string(),
                reason: "rule is empty".into(),
            });
        }
        if raw.contains('/') {
            let path = RelativePath::try_new(raw.trim_start_matches("./")).map_err(|_| {
                DomainError::InvalidPruneRule {
                    rule: raw.to_string(),
                    reason: "path rules must stay inside the project".into(),
                }
            })?;
            Ok(Self::Path(path))
        } else {
            Ok(Self::Basename(raw.to_string()))
        }
    }
}

impl fmt::Display for PruneRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basename(name) => f.write_str(name),
            Self::Path(path) => write!(f, "{path}"),
        }
    }
}

/// Names and paths removed from a composed tree when the artifact is private.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneSet {
    basenames: BTreeSet<String>,
    paths: BTreeSet<String>,
}

impl PruneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add every rule, typically shared rules followed by the
    /// language-specific ones.
    pub fn extend_rules<I, S>(&mut self, rules: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in rules {
            self.insert(PruneRule::parse(raw.as_ref())?);
        }
        Ok(())
    }

    pub fn with_rules<I, S>(mut self, rules: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend_rules(rules)?;
        Ok(self)
    }

    pub fn insert(&mut self, rule: PruneRule) {
        match rule {
            PruneRule::Basename(name) => {
                self.basenames.insert(name);
            }
            PruneRule::Path(path) => {
                self.paths.insert(path.to_slash_string());
            }
        }
    }

    /// `true` if the entry at `relative` (forward slashes, from the tree
    /// root) with the given basename must be removed.
    pub fn matches(&self, basename: &str, relative: &str) -> bool {
        self.basenames.contains(basename) || self.paths.contains(relative)
    }

    pub fn len(&self) -> usize {
        self.basenames.len() + self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basenames.is_empty() && self.paths.is_empty()
    }

    /// Basename rules first, then path rules, each sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.basenames
            .iter()
            .chain(self.paths.iter())
            .map(String::as_str)
    }
}
