use crate::ability::Ability;
use crate::card::CardDefinition;
use crate::effect::GameAction;
use crate::target::{PlayerRef, TargetDescriptor};
use crate::types::CardType;

/// Eager Recruit - when played, draw 1 card.
pub fn eager_recruit() -> CardDefinition {
    CardDefinition::builder("eager-recruit", "Eager Recruit", CardType::Character)
        .faction("north")
        .traits(&["Soldier"])
        .text("When you marshal Eager Recruit, draw 1 card.")
        .cost(2)
        .strength(1)
        .icons(true, false, false)
        .ability(Ability::when_played(
            "Draw 1 card",
            TargetDescriptor::player(PlayerRef::You, GameAction::Draw(1)),
        ))
        .build()
}
