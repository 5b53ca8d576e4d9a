use crate::ability::Ability;
use crate::card::CardDefinition;
use crate::effect::GameAction;
use crate::events::{EventKind, EventScope};
use crate::target::{PlayerRef, TargetDescriptor};
use crate::types::CardType;

/// Ravenkeeper - reaction: after you win a challenge as the attacker, draw 1 card.
pub fn ravenkeeper() -> CardDefinition {
    CardDefinition::builder("ravenkeeper", "Ravenkeeper", CardType::Character)
        .faction("north")
        .traits(&["Steward"])
        .text("Reaction: After you win a challenge as the attacker, draw 1 card.")
        .cost(2)
        .strength(1)
        .icons(false, true, false)
        .ability(Ability::reaction(
            EventKind::AfterClaim,
            EventScope::You,
            "Draw 1 card",
            TargetDescriptor::player(PlayerRef::You, GameAction::Draw(1)),
        ))
        .build()
}
