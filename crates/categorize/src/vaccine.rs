use regex::Regex;
use tracing::debug;

use crate::catalog::VaccineCatalog;
use crate::fuzzy::{FuzzyCategoryMatcher, PlatformMatch, SimilarityScorer, TokenSetRatio};
use crate::rules::RuleError;
use crate::schema::FALSE_POSITIVE;

/// Spans that only say "COVID-19 vaccine" or "vaccine candidate".
pub const GENERAL_COVID_VACCINE: &str = "general covid-19 vaccine";
/// Spans with no usable product prefix that still mention the virus.
pub const GENERAL_COVID_VACCINE_ALIAS: &str = "general COVID-19 vaccine";
pub const NON_SPECIFIC_VACCINE: &str = "non-specific vaccine";

const VACCINE_TERM: &str = r"(?i)vaccin|candidat";
const COVID_VACCINE: &str = r"(?i)^(?:.*coronavirus|covid-19|sars-cov-2|sars)\svaccin*";
// at most one plain word may precede "vaccine candidate"; named products go to prefix matching
const GENERIC_CANDIDATE: &str = r"(?i)^(?:[a-z]+\s+)?vaccin\S*\s+candidat|^candidat";
// applied to lowercased text; greedy, so the last vaccine/candidate token is stripped
const PRODUCT_PREFIX: &str = r"^(.*)[\s-](?:vaccin|candida)";

const COVID_ALIASES: [&str; 8] = [
    "ncov19",
    "nco-19",
    "covid19",
    "covid-19",
    "sars-cov-2",
    "cov2",
    "cov",
    "sars-cov",
];

/// Which branch of the vaccine decision tree handled a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaccineTier {
    /// Mentions a vaccine generically: COVID-19 vaccine, vaccine candidate.
    GeneralCovid,
    /// Mentions a vaccine after some other words; the words are matched.
    ProductPrefix,
    /// No vaccine wording at all; the whole span is matched.
    ProductName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaccineAssignment {
    pub tier: VaccineTier,
    pub category: &'static str,
    /// Fuzzy score of the accepted platform.
    pub score: Option<u8>,
}

pub struct VaccineCategorizer<S = TokenSetRatio> {
    vaccine_term: Regex,
    covid_vaccine: Regex,
    generic_candidate: Regex,
    product_prefix: Regex,
    matcher: FuzzyCategoryMatcher<S>,
    catalog: VaccineCatalog,
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::RoutingPatternFailed {
        name,
        pattern: pattern.to_string(),
        source,
    })
}

impl VaccineCategorizer<TokenSetRatio> {
    pub fn new(catalog: VaccineCatalog) -> Result<Self, RuleError> {
        Self::with_matcher(catalog, FuzzyCategoryMatcher::new())
    }
}

impl<S: SimilarityScorer> VaccineCategorizer<S> {
    pub fn with_matcher(
        catalog: VaccineCatalog,
        matcher: FuzzyCategoryMatcher<S>,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            vaccine_term: compile("vaccine term", VACCINE_TERM)?,
            covid_vaccine: compile("covid vaccine", COVID_VACCINE)?,
            generic_candidate: compile("generic candidate", GENERIC_CANDIDATE)?,
            product_prefix: compile("product prefix", PRODUCT_PREFIX)?,
            matcher,
            catalog,
        })
    }

    pub fn catalog(&self) -> &VaccineCatalog {
        &self.catalog
    }

    pub fn categorize(&self, text: &str) -> &'static str {
        self.classify(text).category
    }

    pub fn classify(&self, text: &str) -> VaccineAssignment {
        let assignment = if self.vaccine_term.is_match(text) {
            self.classify_vaccine_mention(text)
        } else {
            self.classify_product_name(text)
        };

        debug!(
            entity = text,
            tier = ?assignment.tier,
            category = assignment.category,
            score = ?assignment.score,
            threshold = self.matcher.threshold(),
            "Vaccine entity categorized"
        );

        assignment
    }

    fn classify_vaccine_mention(&self, text: &str) -> VaccineAssignment {
        if self.covid_vaccine.is_match(text) || self.generic_candidate.is_match(text) {
            return VaccineAssignment {
                tier: VaccineTier::GeneralCovid,
                category: GENERAL_COVID_VACCINE,
                score: None,
            };
        }

        let lower = text.to_lowercase();
        let prefix = self
            .product_prefix
            .captures(&lower)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|prefix| !prefix.trim().is_empty());

        let Some(prefix) = prefix else {
            let category = if COVID_ALIASES.iter().any(|alias| lower.contains(alias)) {
                GENERAL_COVID_VACCINE_ALIAS
            } else {
                NON_SPECIFIC_VACCINE
            };
            return VaccineAssignment {
                tier: VaccineTier::ProductPrefix,
                category,
                score: None,
            };
        };

        Self::platform_or(
            VaccineTier::ProductPrefix,
            self.matcher.best_category(prefix, &self.catalog),
            NON_SPECIFIC_VACCINE,
        )
    }

    fn classify_product_name(&self, text: &str) -> VaccineAssignment {
        Self::platform_or(
            VaccineTier::ProductName,
            self.matcher.best_category(text, &self.catalog),
            FALSE_POSITIVE,
        )
    }

    fn platform_or(
        tier: VaccineTier,
        hit: Option<PlatformMatch>,
        fallback: &'static str,
    ) -> VaccineAssignment {
        match hit {
            Some(hit) => VaccineAssignment {
                tier,
                category: hit.platform.label(),
                score: Some(hit.score),
            },
            None => VaccineAssignment {
                tier,
                category: fallback,
                score: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorizer() -> VaccineCategorizer {
        let catalog = VaccineCatalog::from_records([
            ("Non-replicating viral vector", "Adenovirus Type 5 Vector"),
            ("RNA-based vaccine", "mRNA-1273"),
            ("RNA-based vaccine", "BNT162b2"),
            ("Inactivated virus", "CoronaVac"),
        ]);
        VaccineCategorizer::new(catalog).unwrap()
    }

    #[test]
    fn test_general_covid_vaccine_bypasses_catalog() {
        let vaccines = categorizer();

        for text in [
            "SARS-CoV-2 vaccine",
            "COVID-19 vaccines",
            "inactivated coronavirus vaccine",
            "vaccine candidate",
            "candidate vaccines",
            "recombinant vaccine candidate",
        ] {
            let assignment = vaccines.classify(text);
            assert_eq!(assignment.tier, VaccineTier::GeneralCovid, "{text}");
            assert_eq!(assignment.category, GENERAL_COVID_VACCINE, "{text}");
            assert_eq!(assignment.score, None);
        }
    }

    #[test]
    fn test_prefix_is_matched_against_catalog() {
        let vaccines = categorizer();

        let assignment = vaccines.classify("mRNA-1273 vaccine");
        assert_eq!(assignment.tier, VaccineTier::ProductPrefix);
        assert_eq!(assignment.category, "rna-based vaccine");
        assert_eq!(assignment.score, Some(100));
    }

    #[test]
    fn test_named_product_candidates_keep_their_platform() {
        let vaccines = categorizer();

        let assignment = vaccines.classify("mRNA-1273 vaccine candidate");
        assert_eq!(assignment.tier, VaccineTier::ProductPrefix);
        assert_eq!(assignment.category, "rna-based vaccine");

        let catalog = VaccineCatalog::from_records([
            ("Non-replicating viral vector", "ChAdOx1 nCoV-19"),
            ("RNA-based vaccine", "mRNA-1273"),
        ]);
        let vaccines = VaccineCategorizer::new(catalog).unwrap();
        assert_eq!(
            vaccines.categorize("ChAdOx1 nCoV-19 candidate vaccine"),
            "non-replicating viral vector"
        );
        assert_eq!(
            vaccines.categorize("ChAdOx1 nCoV-19 vaccine"),
            "non-replicating viral vector"
        );
    }

    #[test]
    fn test_prefix_threshold_boundary() {
        let vaccines = categorizer();

        assert_eq!(
            vaccines.categorize("chimpanzee adenovirus vaccine"),
            "non-replicating viral vector"
        );
        let below = vaccines.classify("replication-defective adenovirus vaccine");
        assert_eq!(below.category, NON_SPECIFIC_VACCINE);
        assert_eq!(below.score, None);
    }

    #[test]
    fn test_missing_prefix_falls_back_to_alias_check() {
        let vaccines = categorizer();

        assert_eq!(vaccines.categorize("COVID19vaccine"), GENERAL_COVID_VACCINE_ALIAS);
        assert_eq!(
            vaccines.categorize("vaccine for SARS-CoV-2"),
            GENERAL_COVID_VACCINE_ALIAS
        );
        assert_eq!(vaccines.categorize("vaccines"), NON_SPECIFIC_VACCINE);
        assert_eq!(vaccines.categorize(" vaccination"), NON_SPECIFIC_VACCINE);
    }

    #[test]
    fn test_no_vaccine_term_uses_whole_span() {
        let vaccines = categorizer();

        let hit = vaccines.classify("BNT162b2");
        assert_eq!(hit.tier, VaccineTier::ProductName);
        assert_eq!(hit.category, "rna-based vaccine");

        assert_eq!(
            vaccines.categorize("chimpanzee adenovirus"),
            "non-replicating viral vector"
        );
        // below threshold without vaccine wording is a false positive, not non-specific
        assert_eq!(
            vaccines.categorize("replication-defective adenovirus"),
            FALSE_POSITIVE
        );
        assert_eq!(vaccines.categorize(""), FALSE_POSITIVE);
    }

    #[test]
    fn test_empty_catalog_never_matches() {
        let vaccines = VaccineCategorizer::new(VaccineCatalog::default()).unwrap();

        assert_eq!(vaccines.categorize("CoronaVac"), FALSE_POSITIVE);
        assert_eq!(vaccines.categorize("CoronaVac vaccine"), NON_SPECIFIC_VACCINE);
    }
}
