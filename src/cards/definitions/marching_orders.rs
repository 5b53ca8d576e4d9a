use crate::ability::Ability;
use crate::card::CardDefinition;
use crate::effect::GameAction;
use crate::filter::CardFilter;
use crate::target::TargetDescriptor;
use crate::types::CardType;

/// Marching Orders
/// When Revealed: Kneel a standing character.
pub fn marching_orders() -> CardDefinition {
    CardDefinition::builder("marching-orders", "Marching Orders", CardType::Plot)
        .traits(&["Edict"])
        .text("When Revealed: Kneel a standing character.")
        .plot_stats(4, 1, 6, 3)
        .ability(Ability::when_revealed(
            "Kneel a standing character",
            TargetDescriptor::cards(CardFilter::character().standing(), GameAction::Kneel),
        ))
        .build()
}
