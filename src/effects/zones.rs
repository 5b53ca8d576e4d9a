//! Effects that move cards between zones.

use crate::effect::EffectResult;
use crate::game_state::Game;
use crate::ids::ObjectId;
use crate::zone::Zone;

fn moved(game: &mut Game, card: ObjectId, to: Zone) -> EffectResult {
    if game.move_card(card, to) {
        EffectResult::Resolved
    } else {
        EffectResult::Nothing
    }
}

/// Kills a character in play: it goes to its owner's dead pile.
pub fn kill(game: &mut Game, card: ObjectId) -> EffectResult {
    match game.object(card) {
        Some(instance) if instance.is_in_play() && instance.is_character() => {
            moved(game, card, Zone::DeadPile)
        }
        _ => EffectResult::Nothing,
    }
}

pub fn sacrifice(game: &mut Game, card: ObjectId) -> EffectResult {
    match game.object(card) {
        Some(instance) if instance.is_in_play() => moved(game, card, Zone::Discard),
        _ => EffectResult::Nothing,
    }
}

pub fn return_to_hand(game: &mut Game, card: ObjectId) -> EffectResult {
    moved(game, card, Zone::Hand)
}

/// Discards a card from hand or play.
pub fn discard(game: &mut Game, card: ObjectId) -> EffectResult {
    match game.object(card).map(|c| c.zone) {
        Some(Zone::Hand | Zone::PlayArea) => moved(game, card, Zone::Discard),
        _ => EffectResult::Nothing,
    }
}

/// Moves a card to one of its owner's droppable zones.
pub fn move_to(game: &mut Game, card: ObjectId, zone: Zone) -> EffectResult {
    if !zone.is_droppable() {
        return EffectResult::Nothing;
    }
    moved(game, card, zone)
}
