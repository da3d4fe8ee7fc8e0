use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vaccine::NON_SPECIFIC_VACCINE;

pub const FALSE_POSITIVE: &str = "false positive";
pub const MISCLASSIFIED: &str = "misclassified";

/// One span produced by the entity extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(alias = "System_ID")]
    pub document_id: String,
    /// Source text the span came from, carried through to the output unchanged.
    #[serde(default, alias = "Doc")]
    pub document: Option<String>,
    #[serde(rename = "entity_text", alias = "Entity")]
    pub text: String,
    #[serde(alias = "Class")]
    pub coarse_class: String,
}

impl Entity {
    pub fn new(
        document_id: impl Into<String>,
        text: impl Into<String>,
        coarse_class: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            document: None,
            text: text.into(),
            coarse_class: coarse_class.into(),
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn taxonomy(&self) -> Option<Taxonomy> {
        Taxonomy::from_coarse_class(&self.coarse_class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taxonomy {
    Animal,
    Assay,
    Correlate,
    Vaccine,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 4] = [
        Taxonomy::Animal,
        Taxonomy::Assay,
        Taxonomy::Correlate,
        Taxonomy::Vaccine,
    ];

    /// Maps an extractor label to its taxonomy. Labels outside the four
    /// taxonomies are not categorized.
    pub fn from_coarse_class(class: &str) -> Option<Self> {
        match class {
            "animal" => Some(Taxonomy::Animal),
            "assay" => Some(Taxonomy::Assay),
            "correlate" => Some(Taxonomy::Correlate),
            "vaccine" => Some(Taxonomy::Vaccine),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Taxonomy::Animal => "animal",
            Taxonomy::Assay => "assay",
            Taxonomy::Correlate => "correlate",
            Taxonomy::Vaccine => "vaccine",
        }
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity with exactly one fine-grained category. Multi-label taxonomies
/// produce one of these per label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedEntity {
    pub document_id: String,
    pub document: Option<String>,
    pub entity_text: String,
    pub coarse_class: String,
    pub category: String,
    pub taxonomy: Taxonomy,
}

impl CategorizedEntity {
    pub fn new(entity: &Entity, taxonomy: Taxonomy, category: &str) -> Self {
        Self {
            document_id: entity.document_id.clone(),
            document: entity.document.clone(),
            entity_text: entity.text.clone(),
            coarse_class: entity.coarse_class.clone(),
            category: category.to_string(),
            taxonomy,
        }
    }

    /// True for the label a taxonomy assigns when nothing specific matched.
    pub fn is_fallback(&self) -> bool {
        match self.taxonomy {
            Taxonomy::Vaccine => {
                self.category == FALSE_POSITIVE || self.category == NON_SPECIFIC_VACCINE
            }
            _ => self.category == FALSE_POSITIVE,
        }
    }
}
