use std::collections::BTreeSet;

use crate::catalog::{Platform, VaccineCatalog};

pub const DEFAULT_THRESHOLD: u8 = 65;

/// String similarity on a 0-100 scale.
///
/// Implementations must be symmetric and insensitive to token order.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Token-set ratio.
///
/// Both strings are reduced to lowercase ASCII words. The sorted token
/// intersection is compared against each side's "intersection + remainder"
/// string and the two remainders against each other; the best of the three
/// indel similarities wins. A string whose tokens are a subset of the other
/// scores 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetRatio;

impl SimilarityScorer for TokenSetRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        let a = full_process(a);
        let b = full_process(b);
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
        let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

        let sect = join(tokens_a.intersection(&tokens_b));
        let diff_ab = join(tokens_a.difference(&tokens_b));
        let diff_ba = join(tokens_b.difference(&tokens_a));

        let combined_ab = format!("{} {}", sect, diff_ab).trim().to_string();
        let combined_ba = format!("{} {}", sect, diff_ba).trim().to_string();

        ratio(&sect, &combined_ab)
            .max(ratio(&sect, &combined_ba))
            .max(ratio(&combined_ab, &combined_ba))
    }
}

/// Drop non-ASCII characters, turn everything but `[A-Za-z0-9_]` into
/// spaces, lowercase and trim.
fn full_process(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    cleaned.trim().to_string()
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

/// Indel similarity scaled to 0-100, rounded half to even.
fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let total = a.len() + b.len();
    let similarity = (2 * lcs_len(a.as_bytes(), b.as_bytes())) as f64 / total as f64;
    (100.0 * similarity).round_ties_even() as u8
}

fn lcs_len(a: &[u8], b: &[u8]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformMatch {
    pub platform: Platform,
    pub score: u8,
}

/// Resolves free text to a vaccine platform by best product-name similarity.
pub struct FuzzyCategoryMatcher<S = TokenSetRatio> {
    scorer: S,
    threshold: u8,
}

impl FuzzyCategoryMatcher<TokenSetRatio> {
    pub fn new() -> Self {
        Self::with_scorer(TokenSetRatio, DEFAULT_THRESHOLD)
    }
}

impl Default for FuzzyCategoryMatcher<TokenSetRatio> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SimilarityScorer> FuzzyCategoryMatcher<S> {
    pub fn with_scorer(scorer: S, threshold: u8) -> Self {
        Self { scorer, threshold }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Highest-scoring platform, regardless of threshold.
    ///
    /// A platform with no products scores 0. Ties go to the platform seen
    /// first in catalog order.
    pub fn best_match(&self, text: &str, catalog: &VaccineCatalog) -> PlatformMatch {
        // the catalog always iterates from Platform::ALL[0]
        let mut best = PlatformMatch {
            platform: Platform::ALL[0],
            score: 0,
        };

        for (platform, products) in catalog.iter() {
            let score = products
                .iter()
                .map(|product| self.scorer.score(text, product))
                .max()
                .unwrap_or(0);

            if score > best.score {
                best = PlatformMatch { platform, score };
            }
        }

        best
    }

    /// The winning platform when its score reaches the threshold.
    pub fn best_category(&self, text: &str, catalog: &VaccineCatalog) -> Option<PlatformMatch> {
        let best = self.best_match(text, catalog);
        (best.score >= self.threshold).then_some(best)
    }
}
