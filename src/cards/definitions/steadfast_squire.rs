use crate::card::CardDefinition;
use crate::types::CardType;

/// Steadfast Squire - 2 cost, 2 STR, military and power.
pub fn steadfast_squire() -> CardDefinition {
    CardDefinition::builder("steadfast-squire", "Steadfast Squire", CardType::Character)
        .faction("north")
        .traits(&["Knight"])
        .cost(2)
        .strength(2)
        .icons(true, false, true)
        .build()
}
