use crate::card::CardDefinition;
use crate::events::{EventKind, EventScope, GameEvent, ListenerDefinition};
use crate::types::CardType;

/// Tourney Blade - Knight only.
pub fn tourney_blade() -> CardDefinition {
    CardDefinition::builder("tourney-blade", "Tourney Blade", CardType::Attachment)
        .faction("west")
        .traits(&["Weapon"])
        .text("Knight character only.")
        .cost(1)
        .listener(
            ListenerDefinition::handler(EventKind::BeforeAttach, |game, event, ctx| {
                let GameEvent::BeforeAttach { host, .. } = event else {
                    return;
                };
                let knight = game
                    .object(*host)
                    .is_some_and(|h| h.definition.has_trait("Knight"));
                if !knight {
                    game.can_attach = false;
                    game.add_message(format!(
                        "{} can only be attached to a Knight",
                        game.card_label(ctx.source)
                    ));
                }
            })
            .scoped(EventScope::ThisCard),
        )
        .build()
}
