//! Controlled vocabulary supplied by the host application
//!
//! The vocabulary is read-only once built. A session holds it behind an
//! `Arc`; refreshing it means building a new session around the new terms.

use crate::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One selectable term
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyTerm {
    pub id: String,
    pub name: String,
    /// Depth in the source hierarchy (1 = top level)
    #[serde(default = "default_level")]
    pub level: u8,
}

fn default_level() -> u8 {
    1
}

impl VocabularyTerm {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: default_level(),
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
}

/// Term lists per category
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    terms: BTreeMap<Category, Vec<VocabularyTerm>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, category: Category, term: VocabularyTerm) -> Self {
        self.terms.entry(category).or_default().push(term);
        self
    }

    pub fn terms(&self, category: Category) -> &[VocabularyTerm] {
        self.terms.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, category: Category, id: &str) -> Option<&VocabularyTerm> {
        self.terms(category).iter().find(|t| t.id == id)
    }

    /// Total number of terms across categories
    pub fn len(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
