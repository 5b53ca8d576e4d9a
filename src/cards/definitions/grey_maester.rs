use crate::card::CardDefinition;
use crate::types::CardType;

/// Grey Maester - Insight.
pub fn grey_maester() -> CardDefinition {
    CardDefinition::builder("grey-maester", "Grey Maester", CardType::Character)
        .faction("north")
        .traits(&["Maester"])
        .text("Insight.")
        .cost(3)
        .strength(2)
        .icons(false, true, false)
        .build()
}
