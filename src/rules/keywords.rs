//! Keyword resolution for the winning side of a challenge.

use crate::game_state::Game;
use crate::ids::PlayerId;
use crate::rules::victory::check_victory;
use crate::types::Keyword;

/// Resolves Insight, Pillage and Renown on each of the winner's participants
/// in participation order. The win condition is checked after each card.
pub fn apply_keywords(game: &mut Game, winner: PlayerId, loser: PlayerId) {
    let participants = game
        .challenge
        .as_ref()
        .map(|c| c.participants(winner).to_vec())
        .unwrap_or_default();
    let winner_name = game.player_name(winner);
    let loser_name = game.player_name(loser);

    for card in participants {
        if game.is_over() {
            return;
        }
        let Some(instance) = game.object(card) else {
            continue;
        };
        let label = instance.label().to_string();
        let insight = instance.has_keyword(Keyword::Insight);
        let pillage = instance.has_keyword(Keyword::Pillage);
        let renown = instance.has_keyword(Keyword::Renown);

        if insight {
            game.draw_cards(winner, 1);
            game.add_message(format!(
                "{} draws a card from Insight on {}",
                winner_name, label
            ));
        }
        if pillage {
            game.discard_from_deck(loser, 1);
            game.add_message(format!(
                "{} discards a card from the top of their deck from Pillage on {}",
                loser_name, label
            ));
        }
        if renown && let Some(instance) = game.object_mut(card) {
            instance.power += 1;
            game.add_message(format!(
                "{} gains 1 power on {} from Renown",
                winner_name, label
            ));
        }
        check_victory(game, winner);
    }
}
