//! Council of War card definition.

use log::debug;

use crate::card::CardDefinition;
use crate::events::{EventKind, EventScope, GameEvent, ListenerDefinition};
use crate::player::Button;
use crate::turn;
use crate::types::CardType;

/// Argument of the button that accepts the draw.
pub const COUNCIL_DRAW: &str = "council-draw";

/// Council of War
/// When Revealed: You may draw 1 card. Marshalling waits for the choice.
pub fn council_of_war() -> CardDefinition {
    CardDefinition::builder("council-of-war", "Council of War", CardType::Plot)
        .traits(&["Scheme"])
        .text("When Revealed: You may draw 1 card.")
        .plot_stats(1, 1, 7, 4)
        .listener(
            ListenerDefinition::handler(EventKind::PlotRevealed, |game, _, ctx| {
                game.pause_for_plot = true;
                if let Some(p) = game.player_mut(ctx.controller) {
                    p.set_prompt(
                        "Council of War: draw 1 card?",
                        vec![
                            Button::new("custom_command", "Draw").with_arg(COUNCIL_DRAW),
                            Button::new("begin_marshal", "Decline"),
                        ],
                    );
                }
            })
            .scoped(EventScope::ThisCard),
        )
        .listener(
            ListenerDefinition::handler(EventKind::CustomCommand, |game, event, ctx| {
                let GameEvent::CustomCommand { arg, .. } = event else {
                    return;
                };
                let revealing = game.paused_reveal == Some(ctx.controller)
                    && game
                        .player(ctx.controller)
                        .is_some_and(|p| p.active_plot == Some(ctx.source));
                if arg != COUNCIL_DRAW || !revealing {
                    return;
                }
                game.draw_cards(ctx.controller, 1);
                game.add_message(format!(
                    "{} uses {} to draw 1 card",
                    game.player_name(ctx.controller),
                    game.card_label(ctx.source)
                ));
                if let Some(p) = game.player_mut(ctx.controller) {
                    p.clear_prompt();
                }
                if let Err(e) = turn::resume_reveal(game, ctx.controller) {
                    debug!("council of war could not resume: {}", e);
                }
            })
            .scoped(EventScope::You),
        )
        .build()
}
