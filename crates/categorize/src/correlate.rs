use crate::rules::{RuleCascade, RuleError, RuleTable};
use crate::schema::{FALSE_POSITIVE, MISCLASSIFIED};

/// Immune correlate categories, most specific first. Only the first match
/// is kept, so reordering rules changes results for ambiguous spans: an
/// isotype must stay ahead of "immunoglobulins" and "antibodies", and the
/// T/B cell subsets ahead of "cellular immunity".
pub const CORRELATE_RULES: &RuleTable = &[
    ("Memory response", r"[Mm]emory"),
    ("CD4 cells", r"[Cc][Dd]4|[Cc][Dd]4+|[Hh]elper|[Tt][Hh]1|[Tt][Hh]2|[Tt][Ff][Hh]"),
    (
        "CD8 cells",
        r"[Cc][Dd]8|[Cc][Dd]8+|[Cc]ytotoxic|(?<![A-Za-z])[Tt][Cc](?![A-Za-z])|(?<![A-Za-z])[Cc][Tt][Ll](s)?(?![A-Za-z])",
    ),
    ("neutralizing response", r"[Nn]eutrali[zs]ing|[Nn]eutrali[zs]ation|[Nn][Aa][bB](s)?"),
    ("IgA", r"[Ii][Gg][Aa]|[Ii][Gg] [Aa]"),
    ("IgG", r"[Ii][Gg][Gg]|[Ii][Gg] [Gg]"),
    ("IgE", r"[Ii][Gg][Ee]|[Ii][Gg] [Ee]"),
    ("IgM", r"[Ii][Gg][Mm]|[Ii][Gg] [Mm]"),
    (
        "immunoglobulins",
        r"[Ii]mmunoglobulin(s)?|(?<![A-Za-z])[Ii][Gg](s)?(?![A-Za-z])|(?<![A-Za-z])[Ii][Gg][a-zA-Z]{1}(?![A-Za-z])|(?<![A-Za-z])Ig(?![A-Za-z])",
    ),
    ("humoral immunity", r"[Hh]umoral"),
    (
        "cellular immunity",
        r"[Cc]ellular immunity|[Cc]ell-mediated|[Cc]ellular [Ii]mmune|[Cc]ellular|[Cc]ell [Ii]mmune|[Cc]ell [Rr]esponse",
    ),
    (
        "T cells",
        r"(?<![A-Za-z])T(?![A-Za-z])|[Tt]-cell(s)?|(?<![A-Za-z])[Tt](?![A-Za-z]) cell(s)?(?![Ll]ines)|[Cc][Dd]3+|(?<![A-Za-z])[Tt][Hh](s)?(?![A-Za-z])|(?<![A-Za-z])[Tt][Cc][Rr](s)?(?![A-Za-z])",
    ),
    (
        "B cells",
        r"(?<![A-Za-z])B(?![A-Za-z])|[Bb]-cell(s)?|[Bb] cell(s)?|(?<![A-Za-z])[Bb][Cc][Rr](s)?(?![A-Za-z])",
    ),
    (
        MISCLASSIFIED,
        r"[Vv]accine|[Vv]accination|[Aa]ssay(s)?|[Mm]ice|[Mm]ouse|[Hh]amster(s)|ELISA|[Ff]low-[Cc]ytometry|[Ff]low [Cc]ytometry|SARS-CoV/macaque",
    ),
    (
        "antibodies",
        r"[Aa]ntibodies|[Aa]ntibody|[Aa][Bb](s)?|CR\d|CD\d|CV\d|CD107a|H\d{1}|H-2|[Aa]nti-[A-Za-z]{0,3}\d{0,2}(?![Ii]nflammatory)",
    ),
    ("lymphocytes", r"[Ll]ymphocyte(s)?"),
    (
        "other cells",
        r"NK cell(s)?|NK-cell(s)?|NK|[Cc]yotokine(s)?|[Ee]ffector [Cc]ell(s)?|[Pp]eripheral [Mm]yeloid [Cc]ells|(?<![Cc]ell-)[Cc]ell(s)?(?!-cell)|[Bb]asophil",
    ),
    (
        "other immune titers",
        r"[Tt]iter(s)?|[Gg]eometric [Mm]ean [Tt]iter(s)?|[Gg][Mm][Tt](s)?|[Tt]itre(s)?|[Rr]eciprocal [Tt]iter(s)?|[Bb]inding [Ll]evels",
    ),
    (
        "other immune responses",
        r"[Pp]rotective [Ii]mmunity|[Ii]mmune [Rr]esponse|[Ii]mmunity|[Ii]mmune [Pp]rotection|[Pp]olyclonal|[Rr]esponse(s)?",
    ),
    (
        FALSE_POSITIVE,
        r"[Ii]nflammation|SARS-CoV-2 infection|SARS-C[Oo]V-2|SARS-CoV2|SARS-C[Oo]V",
    ),
];

pub struct CorrelateCategorizer {
    cascade: RuleCascade,
}

impl CorrelateCategorizer {
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self {
            cascade: RuleCascade::new(CORRELATE_RULES)?,
        })
    }

    /// Every rule is evaluated, then multiplicity collapses to the earliest
    /// declared label.
    pub fn categorize(&self, text: &str) -> &'static str {
        self.cascade
            .all_matches(text)
            .first()
            .copied()
            .unwrap_or(FALSE_POSITIVE)
    }
}
