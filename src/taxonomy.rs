//! Species to taxonomic family mapping for the sticky-trap label set.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Family reported for species missing from the mapping.
pub const UNKNOWN_FAMILY: &str = "Unknown";

static SPECIES_TO_FAMILY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Hemiptera
        ("Aphids", "Hemiptera"),
        ("Cicadellidae", "Hemiptera"),
        ("Bugs", "Hemiptera"),
        ("Whitefly", "Hemiptera"),
        // Coleoptera
        ("Beetle", "Coleoptera"),
        ("FleaBeetle", "Coleoptera"),
        ("Weevil", "Coleoptera"),
        // Lepidoptera
        ("Cutworm", "Lepidoptera"),
        // Orthoptera
        ("Grasshopper", "Orthoptera"),
        ("FieldCricket", "Orthoptera"),
        // Thysanoptera
        ("Thrips", "Thysanoptera"),
        // Acari
        ("Mites", "Acari"),
        ("RedSpider", "Acari"),
        // Non-insect trap catches
        ("Earwig", "Other"),
        ("Snail", "Other"),
        ("Slug", "Other"),
        // Diptera
        ("FruitFlies", "Diptera"),
        ("FliesGeneral", "Diptera"),
        ("MedFruitFly", "Diptera"),
        ("Psychodidae", "Diptera"),
        // Hymenoptera
        ("Ants", "Hymenoptera"),
        ("Bees", "Hymenoptera"),
    ])
});

/// Look up the taxonomic family for a species label.
///
/// Labels outside the known set map to [`UNKNOWN_FAMILY`] rather than
/// failing, so a model with extra classes still produces a full tally.
pub fn family_for(species: &str) -> &'static str {
    SPECIES_TO_FAMILY
        .get(species)
        .copied()
        .unwrap_or(UNKNOWN_FAMILY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_species_map_to_families() {
        assert_eq!(family_for("Aphids"), "Hemiptera");
        assert_eq!(family_for("FleaBeetle"), "Coleoptera");
        assert_eq!(family_for("Cutworm"), "Lepidoptera");
        assert_eq!(family_for("Thrips"), "Thysanoptera");
        assert_eq!(family_for("RedSpider"), "Acari");
        assert_eq!(family_for("Slug"), "Other");
        assert_eq!(family_for("Psychodidae"), "Diptera");
        assert_eq!(family_for("Bees"), "Hymenoptera");
    }

    #[test]
    fn test_unknown_species_fall_back() {
        assert_eq!(family_for("UnknownBug"), UNKNOWN_FAMILY);
        assert_eq!(family_for(""), UNKNOWN_FAMILY);
        // Lookups are case sensitive, matching the model's label casing.
        assert_eq!(family_for("aphids"), UNKNOWN_FAMILY);
    }

    #[test]
    fn test_mapping_covers_full_label_set() {
        assert_eq!(SPECIES_TO_FAMILY.len(), 22);
    }
}
