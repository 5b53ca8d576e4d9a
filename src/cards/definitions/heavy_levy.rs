use crate::card::CardDefinition;
use crate::types::CardType;

/// Heavy Levy - claim 2.
pub fn heavy_levy() -> CardDefinition {
    CardDefinition::builder("heavy-levy", "Heavy Levy", CardType::Plot)
        .traits(&["Edict"])
        .plot_stats(2, 2, 5, 6)
        .build()
}
