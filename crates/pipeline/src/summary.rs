use categorize::{CategorizationOutcome, Entity, Taxonomy};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::metrics::MetricsSnapshot;

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomySummary {
    pub taxonomy: Taxonomy,
    pub entities: usize,
    pub rows: usize,
    pub fallback_rows: usize,
    /// Share of this taxonomy's rows that carry the fallback label.
    pub fallback_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub taxonomy: Taxonomy,
    pub category: String,
    pub count: usize,
}

/// Written next to the categorized table after every run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub fuzzy_threshold: u8,
    pub taxonomies: Vec<TaxonomySummary>,
    pub categories: Vec<CategoryCount>,
    pub passthrough: usize,
    pub metrics: MetricsSnapshot,
}

impl RunSummary {
    pub fn build(
        entities: &[Entity],
        outcome: &CategorizationOutcome,
        fuzzy_threshold: u8,
        metrics: MetricsSnapshot,
    ) -> Self {
        let taxonomies = Taxonomy::ALL
            .iter()
            .map(|&taxonomy| {
                let input = entities
                    .iter()
                    .filter(|e| e.taxonomy() == Some(taxonomy))
                    .count();
                let rows = outcome.rows_for(taxonomy).count();
                let fallback_rows = outcome.fallback_rows(taxonomy);
                let fallback_rate = if rows == 0 {
                    0.0
                } else {
                    fallback_rows as f64 / rows as f64
                };

                TaxonomySummary {
                    taxonomy,
                    entities: input,
                    rows,
                    fallback_rows,
                    fallback_rate,
                }
            })
            .collect();

        let mut counts: BTreeMap<(Taxonomy, &str), usize> = BTreeMap::new();
        for row in &outcome.rows {
            *counts.entry((row.taxonomy, row.category.as_str())).or_insert(0) += 1;
        }
        let categories = counts
            .into_iter()
            .map(|((taxonomy, category), count)| CategoryCount {
                taxonomy,
                category: category.to_string(),
                count,
            })
            .collect();

        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            fuzzy_threshold,
            taxonomies,
            categories,
            passthrough: outcome.passthrough.len(),
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use categorize::vaccine::NON_SPECIFIC_VACCINE;
    use categorize::{CategorizedEntity, FALSE_POSITIVE};

    fn find(summary: &RunSummary, taxonomy: Taxonomy) -> &TaxonomySummary {
        summary
            .taxonomies
            .iter()
            .find(|t| t.taxonomy == taxonomy)
            .unwrap()
    }

    fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            load_time_ms: 1.0,
            categorize_time_ms: 2.0,
            export_time_ms: 0.5,
            entities_loaded: 4,
            rows_written: 4,
        }
    }

    #[test]
    fn test_counts_and_rates() {
        let entities = vec![
            Entity::new("1", "mice", "animal"),
            Entity::new("1", "xyz", "animal"),
            Entity::new("2", "serological ELISA", "assay"),
            Entity::new("3", "spike", "antigen"),
        ];
        let outcome = CategorizationOutcome {
            rows: vec![
                CategorizedEntity::new(&entities[0], Taxonomy::Animal, "mice"),
                CategorizedEntity::new(&entities[1], Taxonomy::Animal, FALSE_POSITIVE),
                CategorizedEntity::new(&entities[2], Taxonomy::Assay, "ELISA"),
                CategorizedEntity::new(&entities[2], Taxonomy::Assay, "serological assays"),
            ],
            passthrough: vec![entities[3].clone()],
        };

        let summary = RunSummary::build(&entities, &outcome, 65, snapshot());

        let animal = find(&summary, Taxonomy::Animal);
        assert_eq!(animal.entities, 2);
        assert_eq!(animal.rows, 2);
        assert_eq!(animal.fallback_rows, 1);
        assert_eq!(animal.fallback_rate, 0.5);

        let assay = find(&summary, Taxonomy::Assay);
        assert_eq!(assay.entities, 1);
        assert_eq!(assay.rows, 2);
        assert_eq!(assay.fallback_rate, 0.0);

        let vaccine = find(&summary, Taxonomy::Vaccine);
        assert_eq!(vaccine.rows, 0);
        assert_eq!(vaccine.fallback_rate, 0.0);

        assert_eq!(summary.categories.len(), 4);
        assert_eq!(summary.passthrough, 1);
    }

    #[test]
    fn test_non_specific_vaccines_raise_fallback_rate() {
        let entities = vec![
            Entity::new("1", "vaccines", "vaccine"),
            Entity::new("1", "xyz vaccine", "vaccine"),
            Entity::new("2", "mRNA-1273 vaccine", "vaccine"),
            Entity::new("2", "", "vaccine"),
        ];
        let outcome = CategorizationOutcome {
            rows: vec![
                CategorizedEntity::new(&entities[0], Taxonomy::Vaccine, NON_SPECIFIC_VACCINE),
                CategorizedEntity::new(&entities[1], Taxonomy::Vaccine, NON_SPECIFIC_VACCINE),
                CategorizedEntity::new(&entities[2], Taxonomy::Vaccine, "rna-based vaccine"),
                CategorizedEntity::new(&entities[3], Taxonomy::Vaccine, FALSE_POSITIVE),
            ],
            passthrough: Vec::new(),
        };

        let summary = RunSummary::build(&entities, &outcome, 65, snapshot());

        let vaccine = find(&summary, Taxonomy::Vaccine);
        assert_eq!(vaccine.rows, 4);
        assert_eq!(vaccine.fallback_rows, 3);
        assert_eq!(vaccine.fallback_rate, 0.75);
    }

    #[test]
    fn test_serializes_taxonomy_names() {
        let entities = vec![Entity::new("1", "mice", "animal")];
        let outcome = CategorizationOutcome {
            rows: vec![CategorizedEntity::new(&entities[0], Taxonomy::Animal, "mice")],
            passthrough: Vec::new(),
        };

        let summary = RunSummary::build(&entities, &outcome, 70, snapshot());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["fuzzy_threshold"], 70);
        assert_eq!(json["taxonomies"][0]["taxonomy"], "animal");
        assert_eq!(json["categories"][0]["category"], "mice");
        assert_eq!(json["metrics"]["rows_written"], 4);
    }
}
