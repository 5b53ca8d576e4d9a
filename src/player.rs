use std::fmt;

use crate::config::GameConfig;
use crate::ids::{ObjectId, PlayerId};
use crate::types::ChallengeType;
use crate::zone::Zone;

/// Where a player is in the round. Each player carries their own phase; the
/// phase machine gates joint transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Phase {
    Setup,
    PlotSelection,
    FirstPlayerSelection,
    PlotReveal,
    Marshal,
    Challenge,
    /// Military claim: the loser chooses characters to kill.
    Claim,
    Dominance,
    RoundEnd,
    GameOver,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::PlotSelection => "plot",
            Phase::FirstPlayerSelection => "first player",
            Phase::PlotReveal => "plot reveal",
            Phase::Marshal => "marshal",
            Phase::Challenge => "challenge",
            Phase::Claim => "claim",
            Phase::Dominance => "dominance",
            Phase::RoundEnd => "round end",
            Phase::GameOver => "game over",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct ChallengeCounter {
    pub performed: u32,
    pub max: u32,
}

/// Challenges declared this round, per type and overall.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct ChallengeCounters {
    pub military: ChallengeCounter,
    pub intrigue: ChallengeCounter,
    pub power: ChallengeCounter,
    pub complete: u32,
    pub max_total: u32,
}

impl ChallengeCounters {
    pub fn new(config: &GameConfig) -> Self {
        let counter = ChallengeCounter {
            performed: 0,
            max: config.max_challenges_per_type,
        };
        Self {
            military: counter,
            intrigue: counter,
            power: counter,
            complete: 0,
            max_total: config.max_challenges_total,
        }
    }

    pub fn get(&self, challenge_type: ChallengeType) -> &ChallengeCounter {
        match challenge_type {
            ChallengeType::Military => &self.military,
            ChallengeType::Intrigue => &self.intrigue,
            ChallengeType::Power => &self.power,
        }
    }

    fn get_mut(&mut self, challenge_type: ChallengeType) -> &mut ChallengeCounter {
        match challenge_type {
            ChallengeType::Military => &mut self.military,
            ChallengeType::Intrigue => &mut self.intrigue,
            ChallengeType::Power => &mut self.power,
        }
    }

    pub fn can_start(&self, challenge_type: ChallengeType) -> bool {
        self.complete < self.max_total && self.get(challenge_type).performed < self.get(challenge_type).max
    }

    pub fn record(&mut self, challenge_type: ChallengeType) {
        self.get_mut(challenge_type).performed += 1;
        self.complete += 1;
    }

    pub fn reset(&mut self) {
        for challenge_type in ChallengeType::ALL {
            self.get_mut(challenge_type).performed = 0;
        }
        self.complete = 0;
    }
}

/// A prompt button. Output only: the engine never reads buttons back.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct Button {
    pub command: String,
    pub text: String,
    #[cfg_attr(feature = "serialization", serde(skip_serializing_if = "Option::is_none"))]
    pub arg: Option<String>,
}

impl Button {
    pub fn new(command: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            text: text.into(),
            arg: None,
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn done(command: impl Into<String>) -> Self {
        Self::new(command, "Done")
    }
}

/// Complete player state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,

    // Zones (stored as object IDs; the top of the draw deck is the last entry)
    pub draw_deck: Vec<ObjectId>,
    pub hand: Vec<ObjectId>,
    pub discard: Vec<ObjectId>,
    pub dead_pile: Vec<ObjectId>,
    pub play_area: Vec<ObjectId>,
    pub plot_deck: Vec<ObjectId>,
    pub used_plots: Vec<ObjectId>,
    pub active_plot: Option<ObjectId>,
    /// Chosen this round; stays in the plot deck until revealed.
    pub selected_plot: Option<ObjectId>,

    // Resources
    pub power: u32,
    pub gold: u32,

    // Phase and challenge tracking
    pub phase: Phase,
    pub current_challenge: Option<ChallengeType>,
    pub challenge_strength: u32,
    pub challenges: ChallengeCounters,
    pub first_player: bool,
    pub claim_to_do: u32,

    // Round flags
    pub kept: bool,
    pub mulliganed: bool,
    pub setup_done: bool,
    pub waiting_for_attachments: bool,
    pub plot_revealed: bool,
    pub marshalled: bool,
    pub done_challenges: bool,
    pub round_done: bool,

    // Interaction state
    pub selected_attachment: Option<ObjectId>,
    pub select_card: bool,
    pub deck_visible: bool,
    pub disconnected: bool,

    // UI affordances
    pub menu_title: String,
    pub buttons: Vec<Button>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, config: &GameConfig) -> Self {
        Self {
            id,
            name: name.into(),
            draw_deck: Vec::new(),
            hand: Vec::new(),
            discard: Vec::new(),
            dead_pile: Vec::new(),
            play_area: Vec::new(),
            plot_deck: Vec::new(),
            used_plots: Vec::new(),
            active_plot: None,
            selected_plot: None,
            power: 0,
            gold: 0,
            phase: Phase::Setup,
            current_challenge: None,
            challenge_strength: 0,
            challenges: ChallengeCounters::new(config),
            first_player: false,
            claim_to_do: 0,
            kept: false,
            mulliganed: false,
            setup_done: false,
            waiting_for_attachments: false,
            plot_revealed: false,
            marshalled: false,
            done_challenges: false,
            round_done: false,
            selected_attachment: None,
            select_card: false,
            deck_visible: false,
            disconnected: false,
            menu_title: String::new(),
            buttons: Vec::new(),
        }
    }

    /// The id list backing a zone. The active plot slot is not a list.
    pub fn zone(&self, zone: Zone) -> Option<&Vec<ObjectId>> {
        match zone {
            Zone::DrawDeck => Some(&self.draw_deck),
            Zone::Hand => Some(&self.hand),
            Zone::PlayArea => Some(&self.play_area),
            Zone::Discard => Some(&self.discard),
            Zone::DeadPile => Some(&self.dead_pile),
            Zone::PlotDeck => Some(&self.plot_deck),
            Zone::UsedPlots => Some(&self.used_plots),
            Zone::ActivePlot => None,
        }
    }

    pub fn zone_mut(&mut self, zone: Zone) -> Option<&mut Vec<ObjectId>> {
        match zone {
            Zone::DrawDeck => Some(&mut self.draw_deck),
            Zone::Hand => Some(&mut self.hand),
            Zone::PlayArea => Some(&mut self.play_area),
            Zone::Discard => Some(&mut self.discard),
            Zone::DeadPile => Some(&mut self.dead_pile),
            Zone::PlotDeck => Some(&mut self.plot_deck),
            Zone::UsedPlots => Some(&mut self.used_plots),
            Zone::ActivePlot => None,
        }
    }

    /// Ids in `zone`, including the active plot slot.
    pub fn cards_in(&self, zone: Zone) -> Vec<ObjectId> {
        match zone {
            Zone::ActivePlot => self.active_plot.into_iter().collect(),
            other => self.zone(other).cloned().unwrap_or_default(),
        }
    }

    /// Removes `id` from whichever list holds it. Returns false if absent.
    pub fn remove_from(&mut self, zone: Zone, id: ObjectId) -> bool {
        if zone == Zone::ActivePlot {
            if self.active_plot == Some(id) {
                self.active_plot = None;
                return true;
            }
            return false;
        }
        let Some(list) = self.zone_mut(zone) else {
            return false;
        };
        match list.iter().position(|c| *c == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn draw_deck_size(&self) -> usize {
        self.draw_deck.len()
    }

    pub fn set_prompt(&mut self, title: impl Into<String>, buttons: Vec<Button>) {
        self.menu_title = title.into();
        self.buttons = buttons;
    }

    /// Shows a waiting message with no buttons.
    pub fn wait(&mut self, title: impl Into<String>) {
        self.set_prompt(title, Vec::new());
    }

    pub fn clear_prompt(&mut self) {
        self.menu_title.clear();
        self.buttons.clear();
    }

    /// Clears per-round state at the start of plot selection.
    pub fn start_round(&mut self) {
        self.phase = Phase::PlotSelection;
        self.selected_plot = None;
        self.plot_revealed = false;
        self.marshalled = false;
        self.done_challenges = false;
        self.round_done = false;
        self.first_player = false;
        self.current_challenge = None;
        self.challenge_strength = 0;
        self.claim_to_do = 0;
        self.selected_attachment = None;
        self.select_card = false;
        self.challenges.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(PlayerId::from_index(0), "Alice", &GameConfig::default())
    }

    #[test]
    fn test_player_creation() {
        let player = player();
        assert_eq!(player.name, "Alice");
        assert_eq!(player.phase, Phase::Setup);
        assert_eq!(player.power, 0);
        assert!(!player.first_player);
    }

    #[test]
    fn test_challenge_counters() {
        let mut counters = ChallengeCounters::new(&GameConfig::default());
        assert!(counters.can_start(ChallengeType::Military));
        counters.record(ChallengeType::Military);
        assert!(!counters.can_start(ChallengeType::Military));
        counters.record(ChallengeType::Intrigue);
        counters.record(ChallengeType::Power);
        assert_eq!(counters.complete, 3);
        assert!(!counters.can_start(ChallengeType::Power));

        counters.reset();
        assert!(counters.can_start(ChallengeType::Military));
        assert_eq!(counters.complete, 0);
    }

    #[test]
    fn test_total_limit_caps_per_type() {
        let config = GameConfig {
            max_challenges_per_type: 2,
            max_challenges_total: 2,
            ..GameConfig::default()
        };
        let mut counters = ChallengeCounters::new(&config);
        counters.record(ChallengeType::Power);
        counters.record(ChallengeType::Power);
        assert!(!counters.can_start(ChallengeType::Military));
    }

    #[test]
    fn test_remove_from_zone() {
        let mut player = player();
        let a = ObjectId::from_raw(1);
        let b = ObjectId::from_raw(2);
        player.hand.extend([a, b]);
        assert!(player.remove_from(Zone::Hand, a));
        assert!(!player.remove_from(Zone::Hand, a));
        assert_eq!(player.hand, vec![b]);

        player.active_plot = Some(a);
        assert_eq!(player.cards_in(Zone::ActivePlot), vec![a]);
        assert!(player.remove_from(Zone::ActivePlot, a));
        assert!(player.active_plot.is_none());
    }

    #[test]
    fn test_start_round_resets_flags() {
        let mut player = player();
        player.marshalled = true;
        player.round_done = true;
        player.first_player = true;
        player.challenges.record(ChallengeType::Power);
        player.start_round();
        assert_eq!(player.phase, Phase::PlotSelection);
        assert!(!player.marshalled);
        assert!(!player.round_done);
        assert!(!player.first_player);
        assert_eq!(player.challenges.complete, 0);
    }
}
