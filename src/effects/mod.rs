//! Action primitives applied by resolved abilities.
//!
//! ```text
//! effects/
//!   mod.rs          - dispatch from GameAction to the implementations
//!   permanents.rs   - kneel, stand, card power and strength
//!   zones.rs        - kill, sacrifice, discard, return to hand, move
//!   player.rs       - draw, discards from hand or deck, faction power, gold
//! ```
//!
//! Every primitive reports an [`EffectResult`]; `something_happened()` on it
//! decides whether a target counts as affected for `then` chaining.

pub mod permanents;
pub mod player;
pub mod zones;

use crate::ability::AbilityContext;
use crate::effect::{EffectResult, GameAction};
use crate::game_state::Game;
use crate::ids::{ObjectId, PlayerId};

/// Applies a card-level action to one chosen card.
pub fn apply_to_card(
    game: &mut Game,
    ctx: &AbilityContext,
    card: ObjectId,
    action: &GameAction,
) -> EffectResult {
    if game.object(card).is_none() {
        return EffectResult::Nothing;
    }
    let result = match action {
        GameAction::Kneel => permanents::kneel(game, card),
        GameAction::Stand => permanents::stand(game, card),
        GameAction::ModifyPower(delta) => permanents::modify_power(game, card, *delta),
        GameAction::ModifyStrength(delta) => permanents::modify_strength(game, card, *delta),
        GameAction::Kill => zones::kill(game, card),
        GameAction::Sacrifice => zones::sacrifice(game, card),
        GameAction::ReturnToHand => zones::return_to_hand(game, card),
        GameAction::Discard => zones::discard(game, card),
        GameAction::MoveTo(zone) => zones::move_to(game, card, *zone),
        // Player actions aimed at a card act on its controller.
        other => {
            let controller = game.object(card).map(|c| c.controller);
            return match controller {
                Some(controller) => apply_to_player(game, ctx, controller, other),
                None => EffectResult::Nothing,
            };
        }
    };
    if result.something_happened() {
        let label = game.card_label(card);
        log_effect(game, ctx, &format!("{} {}", action.verb(), label));
    }
    result
}

/// Applies a player-level action.
pub fn apply_to_player(
    game: &mut Game,
    ctx: &AbilityContext,
    player: PlayerId,
    action: &GameAction,
) -> EffectResult {
    if game.player(player).is_none() {
        return EffectResult::Nothing;
    }
    let result = match action {
        GameAction::Draw(count) => player::draw(game, player, *count),
        GameAction::DiscardAtRandom(count) => player::discard_at_random(game, player, *count),
        GameAction::DiscardFromDeck(count) => player::discard_from_deck(game, player, *count),
        GameAction::GainPower(delta) => player::gain_power(game, player, *delta),
        GameAction::GainGold(delta) => player::gain_gold(game, player, *delta),
        _ => EffectResult::Nothing,
    };
    if let EffectResult::Count(n) = result
        && n > 0
    {
        let what = if player == ctx.player {
            format!("{} {}", action.verb(), n)
        } else {
            format!("make {} {} {}", game.player_name(player), action.verb(), n)
        };
        log_effect(game, ctx, &what);
    }
    result
}

fn log_effect(game: &mut Game, ctx: &AbilityContext, what: &str) {
    let player = game.player_name(ctx.player);
    let message = match ctx.source {
        Some(source) => format!("{} uses {} to {}", player, game.card_label(source), what),
        None => format!("{} chooses to {}", player, what),
    };
    game.add_message(message);
}
