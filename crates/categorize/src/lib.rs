pub mod animal;
pub mod assay;
pub mod catalog;
pub mod correlate;
pub mod fuzzy;
pub mod rules;
pub mod schema;
pub mod vaccine;

pub use animal::AnimalCategorizer;
pub use assay::AssayCategorizer;
pub use catalog::{Platform, VaccineCatalog};
pub use correlate::CorrelateCategorizer;
pub use fuzzy::{FuzzyCategoryMatcher, PlatformMatch, SimilarityScorer, TokenSetRatio};
pub use rules::{RuleCascade, RuleError};
pub use schema::{CategorizedEntity, Entity, Taxonomy, FALSE_POSITIVE, MISCLASSIFIED};
pub use vaccine::{VaccineAssignment, VaccineCategorizer, VaccineTier};

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::info;

/// Routes each extracted entity to its taxonomy pipeline.
pub struct EntityCategorizer<S = TokenSetRatio> {
    animal: AnimalCategorizer,
    assay: AssayCategorizer,
    correlate: CorrelateCategorizer,
    vaccine: VaccineCategorizer<S>,
}

/// Result of one categorization run.
#[derive(Debug, Clone, Default)]
pub struct CategorizationOutcome {
    /// One row per assigned category, in input order.
    pub rows: Vec<CategorizedEntity>,
    /// Entities whose coarse class belongs to no taxonomy.
    pub passthrough: Vec<Entity>,
}

impl CategorizationOutcome {
    pub fn rows_for(&self, taxonomy: Taxonomy) -> impl Iterator<Item = &CategorizedEntity> {
        self.rows.iter().filter(move |row| row.taxonomy == taxonomy)
    }

    pub fn fallback_rows(&self, taxonomy: Taxonomy) -> usize {
        self.rows_for(taxonomy).filter(|row| row.is_fallback()).count()
    }
}

impl EntityCategorizer<TokenSetRatio> {
    pub fn new(catalog: VaccineCatalog) -> Result<Self> {
        Self::with_vaccine_matcher(catalog, FuzzyCategoryMatcher::new())
    }

    pub fn with_threshold(catalog: VaccineCatalog, threshold: u8) -> Result<Self> {
        Self::with_vaccine_matcher(catalog, FuzzyCategoryMatcher::new().with_threshold(threshold))
    }
}

impl<S: SimilarityScorer> EntityCategorizer<S> {
    pub fn with_vaccine_matcher(
        catalog: VaccineCatalog,
        matcher: FuzzyCategoryMatcher<S>,
    ) -> Result<Self> {
        Ok(Self {
            animal: AnimalCategorizer::new().context("Failed to build animal rules")?,
            assay: AssayCategorizer::new().context("Failed to build assay rules")?,
            correlate: CorrelateCategorizer::new().context("Failed to build correlate rules")?,
            vaccine: VaccineCategorizer::with_matcher(catalog, matcher)
                .context("Failed to build vaccine rules")?,
        })
    }

    /// Categories for one span under the given taxonomy. Never empty.
    pub fn categorize_text(&self, taxonomy: Taxonomy, text: &str) -> Vec<&'static str> {
        match taxonomy {
            Taxonomy::Animal => self.animal.categorize(text),
            Taxonomy::Assay => self.assay.categorize(text),
            Taxonomy::Correlate => vec![self.correlate.categorize(text)],
            Taxonomy::Vaccine => vec![self.vaccine.categorize(text)],
        }
    }

    /// Output rows for one entity, or `None` when its coarse class is not
    /// categorized.
    pub fn categorize_entity(&self, entity: &Entity) -> Option<Vec<CategorizedEntity>> {
        let taxonomy = entity.taxonomy()?;
        let rows = self
            .categorize_text(taxonomy, &entity.text)
            .into_iter()
            .map(|category| CategorizedEntity::new(entity, taxonomy, category))
            .collect();
        Some(rows)
    }

    pub fn categorize(&self, entities: &[Entity]) -> CategorizationOutcome {
        let per_entity: Vec<_> = entities.iter().map(|e| self.categorize_entity(e)).collect();
        self.collect_outcome(entities, per_entity)
    }

    /// Same output as [`categorize`](Self::categorize), with rows computed
    /// across threads.
    pub fn categorize_parallel(&self, entities: &[Entity]) -> CategorizationOutcome {
        let per_entity: Vec<_> = entities
            .par_iter()
            .map(|e| self.categorize_entity(e))
            .collect();
        self.collect_outcome(entities, per_entity)
    }

    fn collect_outcome(
        &self,
        entities: &[Entity],
        per_entity: Vec<Option<Vec<CategorizedEntity>>>,
    ) -> CategorizationOutcome {
        let mut outcome = CategorizationOutcome::default();

        for (entity, rows) in entities.iter().zip(per_entity) {
            match rows {
                Some(rows) => outcome.rows.extend(rows),
                None => outcome.passthrough.push(entity.clone()),
            }
        }

        let mut inputs: BTreeMap<Taxonomy, usize> = BTreeMap::new();
        for taxonomy in entities.iter().filter_map(Entity::taxonomy) {
            *inputs.entry(taxonomy).or_insert(0) += 1;
        }
        for taxonomy in Taxonomy::ALL {
            info!(
                taxonomy = %taxonomy,
                entities = inputs.get(&taxonomy).copied().unwrap_or(0),
                rows = outcome.rows_for(taxonomy).count(),
                fallback = outcome.fallback_rows(taxonomy),
                "Entities categorized"
            );
        }
        if !outcome.passthrough.is_empty() {
            info!(
                count = outcome.passthrough.len(),
                "Entities with other coarse classes passed through"
            );
        }

        outcome
    }

    pub fn catalog(&self) -> &VaccineCatalog {
        self.vaccine.catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn categorizer() -> EntityCategorizer {
        let catalog = VaccineCatalog::from_records([
            ("Non-replicating viral vector", "Adenovirus Type 5 Vector"),
            ("RNA-based vaccine", "mRNA-1273"),
            ("Inactivated virus", "CoronaVac"),
        ]);
        EntityCategorizer::new(catalog).unwrap()
    }

    fn scenario() -> Vec<Entity> {
        vec![
            Entity::new("D1", "mouse model", "animal"),
            Entity::new("D1", "recombinant vaccine candidate", "vaccine"),
            Entity::new("D2", "flow cytometry assay", "assay"),
            Entity::new("D2", "IgG antibody", "correlate"),
        ]
    }

    #[test]
    fn test_end_to_end_scenario() {
        let outcome = categorizer().categorize(&scenario());
        let categories: Vec<(&str, &str)> = outcome
            .rows
            .iter()
            .map(|row| (row.entity_text.as_str(), row.category.as_str()))
            .collect();

        assert_eq!(
            categories,
            vec![
                ("mouse model", "mouse"),
                ("recombinant vaccine candidate", "general covid-19 vaccine"),
                ("flow cytometry assay", "flow cytometry"),
                ("IgG antibody", "IgG"),
            ]
        );
        assert_eq!(outcome.rows[0].taxonomy, Taxonomy::Animal);
        assert_eq!(outcome.rows[3].document_id, "D2");
        assert!(outcome.passthrough.is_empty());
    }

    #[test]
    fn test_every_entity_appears_at_least_once() {
        let entities = vec![
            Entity::new("D1", "rats and other rodents", "animal"),
            Entity::new("D1", "patients", "animal"),
            Entity::new("D2", "serological ELISA", "assay"),
            Entity::new("D2", "RT-PCR", "assay"),
            Entity::new("D3", "viral load", "correlate"),
            Entity::new("D3", "anti-IgG response", "correlate"),
            Entity::new("D4", "", "vaccine"),
            Entity::new("D4", "mRNA-1273 vaccine", "vaccine"),
        ];
        let outcome = categorizer().categorize(&entities);

        let seen: HashSet<(&str, &str)> = outcome
            .rows
            .iter()
            .map(|row| (row.document_id.as_str(), row.entity_text.as_str()))
            .collect();
        for entity in &entities {
            assert!(seen.contains(&(entity.document_id.as_str(), entity.text.as_str())));
        }

        // animal and assay fan out, correlate and vaccine never do
        assert_eq!(outcome.rows_for(Taxonomy::Animal).count(), 3);
        assert_eq!(outcome.rows_for(Taxonomy::Assay).count(), 3);
        assert_eq!(outcome.rows_for(Taxonomy::Correlate).count(), 2);
        assert_eq!(outcome.rows_for(Taxonomy::Vaccine).count(), 2);

        assert_eq!(outcome.fallback_rows(Taxonomy::Animal), 1);
        assert_eq!(outcome.fallback_rows(Taxonomy::Vaccine), 1);
    }

    #[test]
    fn test_non_specific_vaccines_count_as_fallback() {
        let entities = vec![
            Entity::new("D1", "vaccines", "vaccine"),
            Entity::new("D1", "xyz vaccine", "vaccine"),
            Entity::new("D2", "mRNA-1273 vaccine candidate", "vaccine"),
        ];
        let outcome = categorizer().categorize(&entities);

        let categories: Vec<&str> = outcome.rows.iter().map(|row| row.category.as_str()).collect();
        assert_eq!(
            categories,
            vec!["non-specific vaccine", "non-specific vaccine", "rna-based vaccine"]
        );
        assert_eq!(outcome.fallback_rows(Taxonomy::Vaccine), 2);
    }

    #[test]
    fn test_other_coarse_classes_pass_through() {
        let entities = vec![
            Entity::new("D1", "spike protein", "protein"),
            Entity::new("D1", "ferrets", "animal"),
        ];
        let outcome = categorizer().categorize(&entities);

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.passthrough, vec![Entity::new("D1", "spike protein", "protein")]);
    }

    #[test]
    fn test_results_do_not_depend_on_row_order() {
        let categorizer = categorizer();
        let entities = scenario();
        let mut reversed = entities.clone();
        reversed.reverse();

        let labels = |outcome: CategorizationOutcome| -> HashSet<(String, String)> {
            outcome
                .rows
                .into_iter()
                .map(|row| (row.entity_text, row.category))
                .collect()
        };

        assert_eq!(
            labels(categorizer.categorize(&entities)),
            labels(categorizer.categorize(&reversed))
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let categorizer = categorizer();
        let mut entities = scenario();
        entities.push(Entity::new("D3", "rats and other rodents", "animal"));
        entities.push(Entity::new("D3", "ELISpot", "other"));

        let sequential = categorizer.categorize(&entities);
        let parallel = categorizer.categorize_parallel(&entities);

        assert_eq!(sequential.rows, parallel.rows);
        assert_eq!(sequential.passthrough, parallel.passthrough);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let catalog = VaccineCatalog::from_records([(
            "Non-replicating viral vector",
            "Adenovirus Type 5 Vector",
        )]);
        let strict = EntityCategorizer::with_threshold(catalog.clone(), 90).unwrap();
        let default = EntityCategorizer::new(catalog).unwrap();

        assert_eq!(
            strict.categorize_text(Taxonomy::Vaccine, "chimpanzee adenovirus"),
            vec![FALSE_POSITIVE]
        );
        assert_eq!(
            default.categorize_text(Taxonomy::Vaccine, "chimpanzee adenovirus"),
            vec!["non-replicating viral vector"]
        );
    }
}
