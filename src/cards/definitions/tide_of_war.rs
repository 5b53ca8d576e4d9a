use crate::card::CardDefinition;
use crate::types::CardType;

pub fn tide_of_war() -> CardDefinition {
    CardDefinition::builder("tide-of-war", "Tide of War", CardType::Plot)
        .traits(&["War"])
        .plot_stats(5, 1, 6, 4)
        .build()
}
