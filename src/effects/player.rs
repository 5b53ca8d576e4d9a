//! Player-level effects.

use crate::effect::EffectResult;
use crate::game_state::Game;
use crate::ids::PlayerId;
use crate::rules::victory;

pub fn draw(game: &mut Game, player: PlayerId, count: u32) -> EffectResult {
    EffectResult::Count(game.draw_cards(player, count as usize))
}

pub fn discard_at_random(game: &mut Game, player: PlayerId, count: u32) -> EffectResult {
    EffectResult::Count(game.discard_at_random(player, count as usize).len() as u32)
}

pub fn discard_from_deck(game: &mut Game, player: PlayerId, count: u32) -> EffectResult {
    EffectResult::Count(game.discard_from_deck(player, count as usize))
}

/// Changes faction power, clamped at zero. Counts the power actually gained
/// or lost.
pub fn gain_power(game: &mut Game, player: PlayerId, delta: i32) -> EffectResult {
    let Some(p) = game.player_mut(player) else {
        return EffectResult::Nothing;
    };
    let before = p.power;
    p.power = (before as i64 + delta as i64).max(0) as u32;
    let after = p.power;
    if after > before {
        victory::check_victory(game, player);
    }
    EffectResult::Count(before.abs_diff(after))
}

pub fn gain_gold(game: &mut Game, player: PlayerId, delta: i32) -> EffectResult {
    let Some(p) = game.player_mut(player) else {
        return EffectResult::Nothing;
    };
    let before = p.gold;
    p.gold = (before as i64 + delta as i64).max(0) as u32;
    EffectResult::Count(before.abs_diff(p.gold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{ALICE, BOB, empty_game, put_in_deck, put_in_hand};

    #[test]
    fn test_draw_counts_cards_drawn() {
        let mut game = empty_game();
        put_in_deck(&mut game, ALICE, "steadfast-squire");
        assert_eq!(draw(&mut game, ALICE, 2), EffectResult::Count(1));
        assert_eq!(draw(&mut game, ALICE, 1), EffectResult::Count(0));
        assert!(!draw(&mut game, ALICE, 1).something_happened());
    }

    #[test]
    fn test_random_discard_bounded_by_hand() {
        let mut game = empty_game();
        put_in_hand(&mut game, BOB, "steadfast-squire");
        put_in_hand(&mut game, BOB, "steadfast-squire");
        assert_eq!(discard_at_random(&mut game, BOB, 3), EffectResult::Count(2));
        assert!(game.player(BOB).unwrap().hand.is_empty());
    }

    #[test]
    fn test_power_clamped_at_zero() {
        let mut game = empty_game();
        game.player_mut(ALICE).unwrap().power = 1;
        assert_eq!(gain_power(&mut game, ALICE, -3), EffectResult::Count(1));
        assert_eq!(game.player(ALICE).unwrap().power, 0);
        assert_eq!(gain_power(&mut game, ALICE, -1), EffectResult::Count(0));
    }

    #[test]
    fn test_gain_power_checks_victory() {
        let mut game = empty_game();
        game.player_mut(BOB).unwrap().power = 15;
        gain_power(&mut game, BOB, 1);
        assert_eq!(game.winner, Some(BOB));
    }

    #[test]
    fn test_gain_gold() {
        let mut game = empty_game();
        assert_eq!(gain_gold(&mut game, ALICE, 2), EffectResult::Count(2));
        assert_eq!(game.player(ALICE).unwrap().gold, 2);
    }
}
