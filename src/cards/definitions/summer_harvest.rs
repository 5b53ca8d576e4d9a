use crate::ability::Ability;
use crate::card::CardDefinition;
use crate::effect::GameAction;
use crate::target::{PlayerRef, TargetDescriptor};
use crate::types::CardType;

/// Summer Harvest
/// When Revealed: Draw 2 cards.
pub fn summer_harvest() -> CardDefinition {
    CardDefinition::builder("summer-harvest", "Summer Harvest", CardType::Plot)
        .traits(&["Season"])
        .text("When Revealed: Draw 2 cards.")
        .plot_stats(0, 1, 7, 3)
        .ability(Ability::when_revealed(
            "Draw 2 cards",
            TargetDescriptor::player(PlayerRef::You, GameAction::Draw(2)),
        ))
        .build()
}
