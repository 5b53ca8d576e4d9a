use crate::card::CardDefinition;
use crate::events::{EventKind, GameEvent, ListenerDefinition};
use crate::types::CardType;

/// Harbor Keep
/// Reduce the claim of challenges you lose by 1.
pub fn harbor_keep() -> CardDefinition {
    CardDefinition::builder("harbor-keep", "Harbor Keep", CardType::Location)
        .faction("isles")
        .traits(&["Stronghold"])
        .text("Reduce the claim value of challenges you lose by 1.")
        .cost(2)
        .listener(ListenerDefinition::handler(
            EventKind::BeforeClaim,
            |game, event, ctx| {
                let GameEvent::BeforeClaim { loser, .. } = event else {
                    return;
                };
                if *loser != ctx.controller {
                    return;
                }
                let Some(challenge) = game.challenge.as_mut() else {
                    return;
                };
                if challenge.claim == 0 {
                    return;
                }
                challenge.claim -= 1;
                let claim = challenge.claim;
                game.add_message(format!(
                    "{} uses {} to reduce the claim to {}",
                    game.player_name(ctx.controller),
                    game.card_label(ctx.source),
                    claim
                ));
            },
        ))
        .build()
}
