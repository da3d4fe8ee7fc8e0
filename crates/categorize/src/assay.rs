use crate::rules::{RuleCascade, RuleError, RuleTable};
use crate::schema::{FALSE_POSITIVE, MISCLASSIFIED};

/// First pass: named assay platforms. Every matching rule contributes a label.
pub const ASSAY_RULES: &RuleTable = &[
    (
        "flow cytometry",
        r"^(?!\D*(?:[Ll]ateral( - )?))[Ff]low [Cc]ytomet(ry)?|[Ff]low-[Cc]ytometry|[Ff]low [Cc]ytometry|Flowcytometric|[Ff]low [Cc]ytometer|[Ff]low [Cc]ytometric|flowcytometry",
    ),
    (
        "ELISA",
        r"ELISA|enzyme-linked immunosorbent assay(s)?|enzyme linked immunosorbent assay(s)?|EUROIMMUN|EIA(s)?|EDI(s)?",
    ),
    (
        "neutralization assays",
        r"^(?!\D*(?:PRNT(50)? |[Pp]laque [Rr]eduction ))[Nn]eutrali[zs]ation(s)?|(?<!in vitro )[Mm]icroneutrali[zs]ation|nAb RVPN assay|nAb assays",
    ),
    (
        "immunoassays",
        r"^(?!\D*(?:([Ll]ateral( -)?)?[Ff]low|[Cc]hemiluminescence ))[Ii]mmunoassay(s)?|[Mm]ultiplex (immuno)?[Aa]ssay(s)?|(?<![Cc]hemiluminescence )[Ee]nzyme [Ii]mmunoassay(s)?|microsphere-based immunoassay|Luminex-based microsphere immunoassay",
    ),
    (
        "lateral flow assays",
        r"[Ll]ateral [Ff]low|[Ll]ateral-[Ff]low|[Ff]low [Ii]mmunoassay|immunochromatographic assay",
    ),
    (
        "serological assays",
        r"[Ss]erology|(?<![Cc]hemiluminescent )[Ss]erological(?! [Cc]hemiluminescence)|[Ss]erologic(al)? assays",
    ),
    (
        "PRNT",
        r"PRNT|PRNT50|(?<![Cc]hemiluminescence )[Rr]eduction [Nn]eutrali[sz]ation|[Pp]laque [Rr]eduction [Nn]eutrali[sz]ation|[Pp]laque [Rr]eduction( [Nn]eutrali[sz]ing)?|reduction assay",
    ),
    ("lentiviral pseudotype assays", r"[Ll]entiviral|[Pp]seudotype(d)?"),
    (
        "ELISpot",
        r"enzyme-linked immunospot|[Ee][Ll][Ii][Ss][Pp][Oo][Tt]|enzyme-linked immunosorbent spot",
    ),
    ("chemiluminescent assays", r"[Cc]hemiluminescence|[Cc]hemiluminescent"),
    (
        "pseudovirus assays",
        r"[Pp]seudovirus [Aa]ssay(s)?|[Pp]seudovirus|pseudovirus neutrali[zs]ation assay(s)?|pseudovirion neutralization assay",
    ),
    ("immunofluorescence assays", r"[Ii]mmunofluorescence"),
    ("in vitro assays", r"[Ii]n vitro|Vitros assay"),
    ("luciferase assays", r"[Ll]uciferase"),
    (
        "other assays",
        r"(?<![Ss]erological )[Ww]estern [Bb]lot(s)?|LFRET|IgG assay|microarray assay|High sensitivity assays|in silico immunization assays|in vivo assays|IgG avidity assay|Diasorin assay|Molecular assays|multicolor FluoroSpot assay|inhibition assay|immunity assays|Antibody assays|PK assay|competition assay|laboratory cell infection assay|parallel diagnostic assay|plaque assay|Western immunoblot tests|qSAT assays|quantitative assay|bead-based assay|Luminex-bead based assay|Plaque assay|sVNT assay|MN assay(s)?|secretion assays|SPR assay|multiplex bead assay|microwell assay|Microsphere-Based Inhibition Assay|life virus assay|vaccine protection assay|bAb assay|interferon-γ-based assays|inhibitory assay|IFA assays|ADE assay|[Mm]icrosphere-[Bb]ased [Aa]ntibody [Aa]ssay|bimolecular fluorescence complementation assay|cytopathic assays|microarray-based assays|live SARS-CoV-2 infection assay|live SARS-CoV-2 virus assay|microsphere-based( antibody)? assay|cell-free assay|multicolor FluoroSpot Assay",
    ),
    (
        MISCLASSIFIED,
        r"gamma interferon \(IFN-γ\)|camel/human|interferon γ-producing CD4+|in silico sorting CD4+ T-cells|(?<!flow cytometryTotal )[Ll]ymphocyte|virus-like particle (VLP) vaccine",
    ),
    (
        FALSE_POSITIVE,
        r"LDH|lactate dehydrogenase|interferon-gamma(?! ELISpot)|interferon gamma",
    ),
];

/// Second pass, only for spans the first pass left uncategorized.
pub const ASSAY_RESIDUAL_RULES: &RuleTable = &[
    ("neutralization assays", r"[Nn]eutrali[sz]ation|[Nn]eutrali[sz]ing"),
    ("binding assays", r"[Bb]inding"),
];

/// Two-pass assay categorizer.
///
/// The broad "neutralizing"/"binding" wording overlaps almost every named
/// assay, so those rules only run over the residual of the first pass.
/// A "false positive" trigger in the first pass counts as a match and keeps
/// the span out of the second pass.
pub struct AssayCategorizer {
    primary: RuleCascade,
    residual: RuleCascade,
}

impl AssayCategorizer {
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self {
            primary: RuleCascade::new(ASSAY_RULES)?,
            residual: RuleCascade::new(ASSAY_RESIDUAL_RULES)?,
        })
    }

    pub fn categorize(&self, text: &str) -> Vec<&'static str> {
        let labels = self.primary.all_matches(text);
        if !labels.is_empty() {
            return labels;
        }

        let labels = self.residual.all_matches(text);
        if labels.is_empty() {
            vec![FALSE_POSITIVE]
        } else {
            labels
        }
    }
}
