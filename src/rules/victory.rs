//! The win condition.

use log::info;

use crate::game_state::Game;
use crate::ids::PlayerId;
use crate::player::Phase;

/// Ends the game if `player`'s total power exceeds the win threshold.
///
/// Call after every step that can raise power. Returns true if `player` has
/// won (now or earlier).
pub fn check_victory(game: &mut Game, player: PlayerId) -> bool {
    if let Some(winner) = game.winner {
        return winner == player;
    }
    if game.total_power(player) <= game.config.win_power {
        return false;
    }

    let name = game.player_name(player);
    info!("game {}: {} wins with {} power", game.id, name, game.total_power(player));
    game.winner = Some(player);
    game.add_message(format!("{} has won the game", name));
    game.set_phase_all(Phase::GameOver);
    game.pending = None;
    game.ability_queue.clear();
    game.paused_reveal = None;
    game.active_player = None;
    for p in &mut game.players {
        p.clear_prompt();
        p.select_card = false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{ALICE, BOB, empty_game, put_in_play};

    #[test]
    fn test_exactly_threshold_does_not_win() {
        let mut game = empty_game();
        game.player_mut(ALICE).unwrap().power = 15;
        assert!(!check_victory(&mut game, ALICE));
        assert!(!game.is_over());
    }

    #[test]
    fn test_exceeding_threshold_ends_game() {
        let mut game = empty_game();
        game.player_mut(ALICE).unwrap().power = 16;
        assert!(check_victory(&mut game, ALICE));
        assert_eq!(game.winner, Some(ALICE));
        assert!(game.players.iter().all(|p| p.phase == Phase::GameOver));
        assert_eq!(game.last_message(), Some("Alice has won the game"));
    }

    #[test]
    fn test_card_power_counts() {
        let mut game = empty_game();
        let squire = put_in_play(&mut game, BOB, "steadfast-squire");
        game.object_mut(squire).unwrap().power = 4;
        game.player_mut(BOB).unwrap().power = 12;
        assert!(check_victory(&mut game, BOB));
    }

    #[test]
    fn test_first_winner_stands() {
        let mut game = empty_game();
        game.player_mut(ALICE).unwrap().power = 16;
        game.player_mut(BOB).unwrap().power = 16;
        assert!(check_victory(&mut game, ALICE));
        assert!(!check_victory(&mut game, BOB));
        assert_eq!(game.winner, Some(ALICE));
    }
}
