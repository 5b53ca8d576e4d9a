//! Effects on cards in play: kneel, stand, power tokens and strength.

use crate::effect::EffectResult;
use crate::game_state::Game;
use crate::ids::ObjectId;
use crate::rules::victory;

/// Kneels a card in play. A card that is already kneeling still counts.
pub fn kneel(game: &mut Game, card: ObjectId) -> EffectResult {
    match game.object_mut(card) {
        Some(instance) if instance.is_in_play() => {
            instance.kneeled = true;
            EffectResult::Resolved
        }
        _ => EffectResult::Nothing,
    }
}

/// Stands a kneeling card in play.
pub fn stand(game: &mut Game, card: ObjectId) -> EffectResult {
    match game.object_mut(card) {
        Some(instance) if instance.is_in_play() && instance.kneeled => {
            instance.kneeled = false;
            EffectResult::Resolved
        }
        _ => EffectResult::Nothing,
    }
}

/// Adds or removes power tokens. Power never drops below zero; the result
/// counts the tokens actually moved.
pub fn modify_power(game: &mut Game, card: ObjectId, delta: i32) -> EffectResult {
    let Some(instance) = game.object_mut(card) else {
        return EffectResult::Nothing;
    };
    if !instance.is_in_play() {
        return EffectResult::Nothing;
    }
    let before = instance.power;
    instance.power = (before as i64 + delta as i64).max(0) as u32;
    let after = instance.power;
    let controller = instance.controller;
    if after > before {
        victory::check_victory(game, controller);
    }
    EffectResult::Count(before.abs_diff(after))
}

/// Adjusts strength until the end of the round.
pub fn modify_strength(game: &mut Game, card: ObjectId, delta: i32) -> EffectResult {
    match game.object_mut(card) {
        Some(instance) if instance.is_in_play() && instance.is_character() => {
            instance.strength_modifier += delta;
        }
        _ => return EffectResult::Nothing,
    }
    game.refresh_challenge_strengths();
    EffectResult::Resolved
}
