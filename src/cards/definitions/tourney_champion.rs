use crate::card::CardDefinition;
use crate::types::CardType;

/// Tourney Champion - Renown.
pub fn tourney_champion() -> CardDefinition {
    CardDefinition::builder("tourney-champion", "Tourney Champion", CardType::Character)
        .faction("west")
        .traits(&["Knight"])
        .text("Renown.")
        .cost(4)
        .strength(4)
        .icons(true, false, true)
        .build()
}
