use crate::card::CardDefinition;
use crate::types::CardType;

/// Salt Raider - Pillage.
pub fn salt_raider() -> CardDefinition {
    CardDefinition::builder("salt-raider", "Salt Raider", CardType::Character)
        .faction("isles")
        .traits(&["Ironborn", "Raider"])
        .text("Pillage.")
        .cost(3)
        .strength(3)
        .icons(true, false, false)
        .build()
}
