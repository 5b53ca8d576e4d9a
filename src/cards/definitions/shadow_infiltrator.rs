use crate::card::CardDefinition;
use crate::types::CardType;

/// Shadow Infiltrator - Stealth. Intrigue only.
pub fn shadow_infiltrator() -> CardDefinition {
    CardDefinition::builder("shadow-infiltrator", "Shadow Infiltrator", CardType::Character)
        .faction("south")
        .traits(&["Spy"])
        .text("Stealth.")
        .cost(3)
        .strength(2)
        .icons(false, true, false)
        .build()
}
