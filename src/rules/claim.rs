//! Claim: what the loser of a won challenge pays.
//!
//! - military: the loser kills characters, one click at a time
//! - intrigue: cards discarded at random from the loser's hand
//! - power: power moves from the loser to the winner

use crate::challenge::ChallengeStep;
use crate::commands::CommandError;
use crate::events::{GameEvent, fire_event};
use crate::game_state::Game;
use crate::ids::{ObjectId, PlayerId};
use crate::player::Phase;
use crate::rules::victory::check_victory;
use crate::turn;
use crate::types::ChallengeType;
use crate::zone::Zone;

/// Applies claim after the challenger won.
///
/// The claim is read from the winner's active plot and stored on the
/// challenge before `before_claim` fires, so listeners can adjust it.
pub fn apply_claim(game: &mut Game, winner: PlayerId, loser: PlayerId) {
    let Some(challenge_type) = game.challenge.as_ref().map(|c| c.challenge_type) else {
        return;
    };
    let printed = game
        .player(winner)
        .and_then(|p| p.active_plot)
        .and_then(|plot| game.object(plot))
        .map_or(0, |plot| plot.definition.claim());
    if let Some(challenge) = game.challenge.as_mut() {
        challenge.claim = printed;
        challenge.step = ChallengeStep::Claim;
    }

    fire_event(
        game,
        GameEvent::BeforeClaim {
            challenge_type,
            winner,
            loser,
        },
    );
    if game.is_over() {
        return;
    }
    let claim = game.challenge.as_ref().map_or(0, |c| c.claim);
    let winner_name = game.player_name(winner);
    let loser_name = game.player_name(loser);

    if claim == 0 {
        game.add_message(format!(
            "The claim value for {} is 0, no claim occurs",
            challenge_type
        ));
        complete_claim(game, winner, loser);
        return;
    }

    match challenge_type {
        ChallengeType::Military => {
            let characters = game
                .cards_in_play(loser)
                .iter()
                .filter(|c| c.is_character())
                .count() as u32;
            let to_kill = claim.min(characters);
            if to_kill == 0 {
                game.add_message(format!("{} has no characters to kill", loser_name));
            } else {
                if let Some(p) = game.player_mut(winner) {
                    p.wait("Waiting for opponent to apply claim effects");
                }
                if let Some(p) = game.player_mut(loser) {
                    p.claim_to_do = to_kill;
                    p.phase = Phase::Claim;
                    p.select_card = true;
                    p.wait(format!("Select {} character(s) to kill", to_kill));
                }
                return;
            }
        }
        ChallengeType::Intrigue => {
            let discarded = game.discard_at_random(loser, claim as usize);
            game.add_message(format!(
                "{} discards {} card(s) at random from intrigue claim",
                loser_name,
                discarded.len()
            ));
        }
        ChallengeType::Power => {
            let available = game.player(loser).map_or(0, |p| p.power);
            if available > 0 {
                let moved = claim.min(available);
                if let Some(p) = game.player_mut(loser) {
                    p.power -= moved;
                }
                if let Some(p) = game.player_mut(winner) {
                    p.power += moved;
                }
                game.add_message(format!(
                    "{} takes {} power from {} from power claim",
                    winner_name, moved, loser_name
                ));
                check_victory(game, winner);
                if game.is_over() {
                    return;
                }
            }
        }
    }

    complete_claim(game, winner, loser);
}

/// Kills one of the loser's characters while a military claim is being paid.
pub fn kill_for_claim(game: &mut Game, player: PlayerId, card: ObjectId) -> Result<(), CommandError> {
    let p = game.player(player).ok_or(CommandError::PlayerNotFound(player))?;
    if p.phase != Phase::Claim || p.claim_to_do == 0 {
        return Err(CommandError::WrongPhase(p.phase));
    }
    let instance = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    if instance.controller != player {
        return Err(CommandError::NotYourCard(card));
    }
    if !instance.is_in_play() || !instance.is_character() {
        return Err(CommandError::Illegal("only characters in play can be killed for claim"));
    }
    let winner = game
        .opponent_of(player)
        .ok_or(CommandError::PlayerNotFound(player))?;

    let label = instance.label().to_string();
    game.move_card(card, Zone::DeadPile);
    game.add_message(format!(
        "{} kills {} for claim",
        game.player_name(player),
        label
    ));

    let remaining_characters = game
        .cards_in_play(player)
        .iter()
        .filter(|c| c.is_character())
        .count();
    let done = match game.player_mut(player) {
        Some(p) => {
            p.claim_to_do -= 1;
            p.claim_to_do == 0 || remaining_characters == 0
        }
        None => true,
    };
    if done {
        complete_claim(game, winner, player);
    }
    Ok(())
}

/// Fires `after_claim` and hands the challenge turn back to the winner.
pub fn complete_claim(game: &mut Game, winner: PlayerId, loser: PlayerId) {
    let Some(challenge_type) = game.challenge.as_ref().map(|c| c.challenge_type) else {
        return;
    };
    if let Some(p) = game.player_mut(loser) {
        p.claim_to_do = 0;
        p.phase = Phase::Challenge;
        p.select_card = false;
    }
    if let Some(challenge) = game.challenge.as_mut() {
        challenge.step = ChallengeStep::Resolved;
    }
    fire_event(
        game,
        GameEvent::AfterClaim {
            challenge_type,
            winner,
            loser,
        },
    );
    if game.is_over() {
        return;
    }
    turn::begin_challenge(game, winner);
}
