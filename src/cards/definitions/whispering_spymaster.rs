//! Whispering Spymaster card definition.

use crate::ability::Ability;
use crate::card::CardDefinition;
use crate::effect::GameAction;
use crate::filter::CardFilter;
use crate::target::TargetDescriptor;
use crate::types::CardType;

/// Whispering Spymaster
/// Action: Kneel another South character you control. If you do, kneel up to
/// 3 characters or locations.
pub fn whispering_spymaster() -> CardDefinition {
    let kneel_ally = CardFilter::character()
        .you_control()
        .faction("south")
        .standing()
        .other();
    let kneel_many = CardFilter::character().or_type(CardType::Location);

    CardDefinition::builder("whispering-spymaster", "Whispering Spymaster", CardType::Character)
        .faction("south")
        .traits(&["Spy", "Lord"])
        .text(
            "Action: Kneel another South character you control. \
             If you do, kneel up to 3 characters or locations.",
        )
        .cost(5)
        .strength(3)
        .icons(false, true, true)
        .ability(Ability::action(
            "kneel up to 3 characters or locations",
            TargetDescriptor::cards(kneel_ally, GameAction::Kneel)
                .then(TargetDescriptor::cards(kneel_many, GameAction::Kneel).up_to(3)),
        ))
        .build()
}
