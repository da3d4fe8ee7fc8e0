use crate::rules::{RuleCascade, RuleError, RuleTable};
use crate::schema::{FALSE_POSITIVE, MISCLASSIFIED};

/// Animal model categories. Every matching rule contributes a label.
pub const ANIMAL_RULES: &RuleTable = &[
    ("human", r"(?<![Nn]on[- ])[Hh]uman(s)?$(?! [Pp]rimate(s)?)"),
    ("mouse", r"[Mm]ouse|[Mm]ice|[Rr]at(s)?|murine|BALB/c"),
    ("hamster", r"[Hh]amster[s]?"),
    (
        "non-human primate",
        r"rhesus|[Mm]acaques?|[Pp]rimate[s]?(?! [Mm]ammal(s)?)|Macaca|chimpanzee[s]?|marmoset[s]?|[Mm]onkey|[Bb]aboon(s)?|NHP(s)?|ape(s)?|[Gg]orilla(s)?|fascicularis",
    ),
    ("ferret", r"[Ff]erret(s)?"),
    ("guinea pig", r"[Gg]uinea"),
    ("pig", r"(?<![Gg]uinea )[Pp]ig[s]?|piglet"),
    ("bat", r"[Bb]at[s]?"),
    ("cat", r"[Cc]at[s]?(?!tle)"),
    ("dog", r"[Dd]og[s]?|puppy|puppies"),
    ("cow", r"[Cc]ow[s]?|calve[s]?|[Cc]attle"),
    ("rabbit", r"[Rr]abbit[s]?|[Hh]are(s)?"),
    ("llama", r"[Ll]lama[s]?"),
    ("camel", r"[Cc]amel[s]?|[Dd]romedaries|[Dd]romedary"),
    ("porcupine", r"porcupine[s]?|porcine"),
    ("chicken", r"chick[s]?|bird[s]?"),
    (
        "other",
        r"non-rodent(s)|rodent(s)?|mammal(s)?|zebrafish[es]?|[Tt]ortoise(s)?|[Mm]armot(s)?",
    ),
    (
        MISCLASSIFIED,
        r"humanized”\) antibodies|non-competing mAb|NtAb assay|non-functional T cells|non-standardized neutralizing assays|non-functional ELISA assays|CoV2pp",
    ),
];

pub struct AnimalCategorizer {
    cascade: RuleCascade,
}

impl AnimalCategorizer {
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self {
            cascade: RuleCascade::new(ANIMAL_RULES)?,
        })
    }

    /// All matching animal labels, or a lone "false positive".
    ///
    /// Overlapping labels are kept: "rat" and "other" can both fire on the
    /// same span and each produces its own output row.
    pub fn categorize(&self, text: &str) -> Vec<&'static str> {
        let labels = self.cascade.all_matches(text);
        if labels.is_empty() {
            vec![FALSE_POSITIVE]
        } else {
            labels
        }
    }
}
