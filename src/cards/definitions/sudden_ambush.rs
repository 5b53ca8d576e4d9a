use crate::ability::Ability;
use crate::card::CardDefinition;
use crate::effect::GameAction;
use crate::filter::CardFilter;
use crate::target::TargetDescriptor;
use crate::types::CardType;

/// Sudden Ambush - event: kill a kneeling character an opponent controls.
pub fn sudden_ambush() -> CardDefinition {
    CardDefinition::builder("sudden-ambush", "Sudden Ambush", CardType::Event)
        .faction("isles")
        .text("Kill a kneeling character an opponent controls.")
        .cost(2)
        .ability(Ability::when_played(
            "Kill a kneeling character",
            TargetDescriptor::cards(
                CardFilter::character().opponent_controls().kneeling(),
                GameAction::Kill,
            ),
        ))
        .build()
}
