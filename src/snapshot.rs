//! Per-viewer projections of a game.
//!
//! A [`GameView`] is what one player is allowed to see: their own hand and
//! prompt, public zones for both sides, and counts in place of hidden zones.
//! The opponent's hand, plot deck and unrevealed plot choice, and both draw
//! decks (unless the viewer is looking at their own), are reduced to sizes or
//! flags.

use crate::challenge::Challenge;
use crate::game_state::{Game, GameMessage};
use crate::ids::{ObjectId, PlayerId};
use crate::object::CardInstance;
use crate::player::{Button, ChallengeCounters, Phase, Player};
use crate::types::{CardType, ChallengeType};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct CardView {
    pub id: ObjectId,
    pub code: String,
    pub label: String,
    pub card_type: CardType,
    pub kneeled: bool,
    pub power: u32,
    pub strength: u32,
    pub selected: bool,
    pub stealth_target: bool,
    pub attachments: Vec<CardView>,
}

impl CardView {
    pub fn from_card(card: &CardInstance, game: &Game) -> Self {
        Self {
            id: card.id,
            code: card.code().to_string(),
            label: card.label().to_string(),
            card_type: card.card_type(),
            kneeled: card.kneeled,
            power: card.power,
            strength: card.strength(),
            selected: card.selected,
            stealth_target: card.stealth_target,
            attachments: card
                .attachments
                .iter()
                .filter_map(|a| game.object(*a))
                .map(|a| CardView::from_card(a, game))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub power: u32,
    pub total_power: u32,
    pub gold: u32,
    pub phase: Phase,
    pub first_player: bool,
    pub current_challenge: Option<ChallengeType>,
    pub challenge_strength: u32,
    pub challenges: ChallengeCounters,
    pub claim_to_do: u32,
    pub disconnected: bool,

    /// `None` when hidden from the viewer.
    pub hand: Option<Vec<CardView>>,
    pub hand_size: usize,
    pub draw_deck: Option<Vec<CardView>>,
    pub draw_deck_size: usize,
    pub plot_deck: Option<Vec<CardView>>,
    pub plot_deck_size: usize,
    /// Attachments appear under their host.
    pub play_area: Vec<CardView>,
    pub discard: Vec<CardView>,
    pub dead_pile: Vec<CardView>,
    pub used_plots: Vec<CardView>,
    pub active_plot: Option<CardView>,
    pub selected_plot: Option<CardView>,
    pub has_selected_plot: bool,

    /// Prompt fields are only filled in for the viewer.
    pub menu_title: String,
    pub buttons: Vec<Button>,
    pub select_card: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct PendingView {
    pub prompt: String,
    pub candidates: Vec<ObjectId>,
    pub min: usize,
    pub max: usize,
    pub chosen: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct GameView {
    pub id: String,
    pub name: String,
    pub round: u32,
    pub viewer: PlayerId,
    pub players: Vec<PlayerView>,
    pub messages: Vec<GameMessage>,
    pub challenge: Option<Challenge>,
    /// Only shown to the player making the selection.
    pub pending: Option<PendingView>,
    pub winner: Option<PlayerId>,
}

fn cards(game: &Game, ids: &[ObjectId]) -> Vec<CardView> {
    ids.iter()
        .filter_map(|id| game.object(*id))
        .map(|card| CardView::from_card(card, game))
        .collect()
}

fn card(game: &Game, id: Option<ObjectId>) -> Option<CardView> {
    id.and_then(|id| game.object(id))
        .map(|card| CardView::from_card(card, game))
}

fn player_view(game: &Game, player: &Player, viewer: PlayerId) -> PlayerView {
    let own = player.id == viewer;
    let play_area: Vec<ObjectId> = player
        .play_area
        .iter()
        .copied()
        .filter(|id| game.object(*id).is_some_and(|c| c.attached_to.is_none()))
        .collect();

    PlayerView {
        id: player.id,
        name: player.name.clone(),
        power: player.power,
        total_power: game.total_power(player.id),
        gold: player.gold,
        phase: player.phase,
        first_player: player.first_player,
        current_challenge: player.current_challenge,
        challenge_strength: player.challenge_strength,
        challenges: player.challenges.clone(),
        claim_to_do: player.claim_to_do,
        disconnected: player.disconnected,
        hand: own.then(|| cards(game, &player.hand)),
        hand_size: player.hand.len(),
        draw_deck: (own && player.deck_visible).then(|| cards(game, &player.draw_deck)),
        draw_deck_size: player.draw_deck.len(),
        plot_deck: own.then(|| cards(game, &player.plot_deck)),
        plot_deck_size: player.plot_deck.len(),
        play_area: cards(game, &play_area),
        discard: cards(game, &player.discard),
        dead_pile: cards(game, &player.dead_pile),
        used_plots: cards(game, &player.used_plots),
        active_plot: card(game, player.active_plot),
        selected_plot: if own { card(game, player.selected_plot) } else { None },
        has_selected_plot: player.selected_plot.is_some(),
        menu_title: if own { player.menu_title.clone() } else { String::new() },
        buttons: if own { player.buttons.clone() } else { Vec::new() },
        select_card: own && player.select_card,
    }
}

/// Builds the view of `game` visible to `viewer`.
pub fn view_for(game: &Game, viewer: PlayerId) -> GameView {
    let pending = game
        .pending
        .as_ref()
        .filter(|p| p.player == viewer)
        .map(|p| PendingView {
            prompt: p.prompt(),
            candidates: p.candidates.clone(),
            min: p.min,
            max: p.max,
            chosen: p.chosen.clone(),
        });

    GameView {
        id: game.id.clone(),
        name: game.name.clone(),
        round: game.round,
        viewer,
        players: game
            .players
            .iter()
            .map(|p| player_view(game, p, viewer))
            .collect(),
        messages: game.messages.clone(),
        challenge: game.challenge.clone(),
        pending,
        winner: game.winner,
    }
}

impl GameView {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{ALICE, BOB, empty_game, put_in_deck, put_in_hand, put_in_play};

    #[test]
    fn test_opponent_hand_and_decks_are_redacted() {
        let mut game = empty_game();
        put_in_hand(&mut game, BOB, "steadfast-squire");
        put_in_deck(&mut game, BOB, "salt-raider");
        put_in_hand(&mut game, ALICE, "grey-maester");

        let view = view_for(&game, ALICE);
        let bob = view.player(BOB).unwrap();
        assert!(bob.hand.is_none());
        assert_eq!(bob.hand_size, 1);
        assert!(bob.draw_deck.is_none());
        assert_eq!(bob.draw_deck_size, 1);
        assert!(bob.plot_deck.is_none());

        let alice = view.player(ALICE).unwrap();
        assert_eq!(alice.hand.as_ref().map(Vec::len), Some(1));
        assert!(alice.draw_deck.is_none());
    }

    #[test]
    fn test_attachments_nest_under_host() {
        let mut game = empty_game();
        let squire = put_in_play(&mut game, ALICE, "steadfast-squire");
        let blade = put_in_play(&mut game, ALICE, "tourney-blade");
        assert!(game.attach(blade, squire));

        let view = view_for(&game, BOB);
        let alice = view.player(ALICE).unwrap();
        assert_eq!(alice.play_area.len(), 1);
        assert_eq!(alice.play_area[0].attachments[0].id, blade);
        assert!(alice.buttons.is_empty());
    }
}
