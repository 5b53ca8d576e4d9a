use crate::card::CardDefinition;
use crate::types::CardType;

pub fn a_feast_for_crows() -> CardDefinition {
    CardDefinition::builder("a-feast-for-crows", "A Feast for Crows", CardType::Plot)
        .traits(&["Omen"])
        .plot_stats(3, 1, 6, 5)
        .build()
}
