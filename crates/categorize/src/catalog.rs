use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Vaccine technology platforms used as fuzzy-matching targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    ReplicatingBacterialVector,
    LiveAttenuatedVirus,
    DnaBased,
    RnaBased,
    InactivatedVirus,
    VirusLikeParticle,
    ProteinSubunit,
    ReplicatingViralVector,
    NonReplicatingViralVector,
    NotClassified,
}

impl Platform {
    /// Catalog iteration order. Equal fuzzy scores resolve to the earlier entry.
    pub const ALL: [Platform; 10] = [
        Platform::ReplicatingBacterialVector,
        Platform::LiveAttenuatedVirus,
        Platform::DnaBased,
        Platform::RnaBased,
        Platform::InactivatedVirus,
        Platform::VirusLikeParticle,
        Platform::ProteinSubunit,
        Platform::ReplicatingViralVector,
        Platform::NonReplicatingViralVector,
        Platform::NotClassified,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::ReplicatingBacterialVector => "replicating bacterial vector",
            Platform::LiveAttenuatedVirus => "live-attenuated virus",
            Platform::DnaBased => "dna-based vaccine",
            Platform::RnaBased => "rna-based vaccine",
            Platform::InactivatedVirus => "inactivated virus",
            Platform::VirusLikeParticle => "virus-like particle",
            Platform::ProteinSubunit => "protein subunit",
            Platform::ReplicatingViralVector => "replicating viral vector",
            Platform::NonReplicatingViralVector => "non-replicating viral vector",
            Platform::NotClassified => "not classified",
        }
    }

    /// Maps a "Product Category" value from the reference tracker.
    pub fn from_source_category(category: &str) -> Option<Self> {
        match category.trim() {
            "Replicating bacterial vector" => Some(Platform::ReplicatingBacterialVector),
            "Live attenuated virus" => Some(Platform::LiveAttenuatedVirus),
            "DNA-based" => Some(Platform::DnaBased),
            "RNA-based vaccine" => Some(Platform::RnaBased),
            "Inactivated virus" => Some(Platform::InactivatedVirus),
            "Virus-like particle" => Some(Platform::VirusLikeParticle),
            "Protein subunit" => Some(Platform::ProteinSubunit),
            "Replicating viral vector" => Some(Platform::ReplicatingViralVector),
            "Non-replicating viral vector" => Some(Platform::NonReplicatingViralVector),
            "Unknown" => Some(Platform::NotClassified),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Known product names per platform, built once per run and read-only after.
#[derive(Debug, Clone)]
pub struct VaccineCatalog {
    products: Vec<(Platform, Vec<String>)>,
}

impl Default for VaccineCatalog {
    fn default() -> Self {
        Self {
            products: Platform::ALL.iter().map(|p| (*p, Vec::new())).collect(),
        }
    }
}

impl VaccineCatalog {
    /// Groups `(category, product)` pairs by platform. Exact duplicate pairs
    /// are kept once, blank products and unknown categories are skipped.
    pub fn from_records<I, C, P>(records: I) -> Self
    where
        I: IntoIterator<Item = (C, P)>,
        C: AsRef<str>,
        P: AsRef<str>,
    {
        let mut catalog = Self::default();
        let mut seen: HashSet<(Platform, String)> = HashSet::new();
        let mut skipped = 0usize;

        for (category, product) in records {
            let (category, product) = (category.as_ref(), product.as_ref());
            if product.trim().is_empty() {
                continue;
            }
            let Some(platform) = Platform::from_source_category(category) else {
                skipped += 1;
                continue;
            };
            if seen.insert((platform, product.to_string())) {
                catalog.slot_mut(platform).push(product.to_string());
            }
        }

        if skipped > 0 {
            warn!(skipped, "Catalog rows with unrecognised product category were ignored");
        }

        catalog
    }

    // variants are declared in `Platform::ALL` order
    fn slot_mut(&mut self, platform: Platform) -> &mut Vec<String> {
        &mut self.products[platform as usize].1
    }

    /// Platforms and their products in declared order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &[String])> {
        self.products.iter().map(|(p, names)| (*p, names.as_slice()))
    }

    pub fn products(&self, platform: Platform) -> &[String] {
        &self.products[platform as usize].1
    }

    pub fn product_count(&self) -> usize {
        self.products.iter().map(|(_, names)| names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.product_count() == 0
    }
}
