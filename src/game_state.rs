use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, trace};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::ability::{AbilityTrigger, PendingSelection, QueuedAbility};
use crate::card::CardDefinition;
use crate::cards::CardRegistry;
use crate::challenge::Challenge;
use crate::config::GameConfig;
use crate::events::{EventBus, ListenerDefinition};
use crate::filter::FilterContext;
use crate::ids::{IdAllocator, ObjectId, PlayerId};
use crate::object::CardInstance;
use crate::player::{Phase, Player};
use crate::types::CardType;
use crate::zone::Zone;

/// One entry of the player-visible game log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct GameMessage {
    /// Milliseconds since the Unix epoch.
    pub date: u64,
    pub message: String,
}

/// A seat at the table: display name and the card codes of the deck.
///
/// Plot cards in the deck list go to the plot deck.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Deserialize))]
pub struct Seat {
    pub name: String,
    pub deck: Vec<String>,
}

impl Seat {
    pub fn new(name: impl Into<String>, deck: Vec<String>) -> Self {
        Self {
            name: name.into(),
            deck,
        }
    }
}

/// Errors constructing a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The engine runs two-player games only.
    WrongPlayerCount(usize),
    UnknownCard(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::WrongPlayerCount(count) => {
                write!(f, "a game needs exactly 2 players, got {}", count)
            }
            GameError::UnknownCard(code) => write!(f, "unknown card code '{}'", code),
        }
    }
}

impl std::error::Error for GameError {}

/// Complete state of one match.
#[derive(Debug, Clone)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub round: u32,

    /// In seat order; `PlayerId` is the index.
    pub players: Vec<Player>,
    pub objects: BTreeMap<ObjectId, CardInstance>,
    pub messages: Vec<GameMessage>,

    // Transient interaction flags, reset before the event that reads them
    pub pause_for_plot: bool,
    pub click_handled: bool,
    pub can_attach: bool,

    pub challenge: Option<Challenge>,
    pub pending: Option<PendingSelection>,
    pub ability_queue: VecDeque<QueuedAbility>,
    /// Player whose plot reveal is suspended, if any.
    pub paused_reveal: Option<PlayerId>,
    /// Player currently marshalling or taking their challenges.
    pub active_player: Option<PlayerId>,

    pub events: EventBus,
    pub config: GameConfig,
    pub winner: Option<PlayerId>,

    rng: StdRng,
    ids: IdAllocator,
}

impl Game {
    /// Builds a game with every card in its starting zone. Call
    /// [`crate::turn::initialise`] to shuffle and deal.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        seats: Vec<Seat>,
        config: GameConfig,
        registry: &CardRegistry,
    ) -> Result<Game, GameError> {
        if seats.len() != 2 {
            return Err(GameError::WrongPlayerCount(seats.len()));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut game = Game {
            id: id.into(),
            name: name.into(),
            round: 0,
            players: Vec::with_capacity(seats.len()),
            objects: BTreeMap::new(),
            messages: Vec::new(),
            pause_for_plot: false,
            click_handled: false,
            can_attach: false,
            challenge: None,
            pending: None,
            ability_queue: VecDeque::new(),
            paused_reveal: None,
            active_player: None,
            events: EventBus::new(),
            config,
            winner: None,
            rng,
            ids: IdAllocator::new(),
        };

        for (index, seat) in seats.into_iter().enumerate() {
            let player_id = PlayerId::from_index(index as u8);
            game.players
                .push(Player::new(player_id, seat.name, &game.config));
            for code in &seat.deck {
                let definition = registry
                    .get(code)
                    .ok_or_else(|| GameError::UnknownCard(code.clone()))?;
                let zone = if definition.is_plot() {
                    Zone::PlotDeck
                } else {
                    Zone::DrawDeck
                };
                game.create_card(definition, player_id, zone);
            }
        }

        Ok(game)
    }

    /// Creates a card instance in `zone` and returns its id.
    pub fn create_card(
        &mut self,
        definition: Arc<CardDefinition>,
        owner: PlayerId,
        zone: Zone,
    ) -> ObjectId {
        let id = self.ids.next_object_id();
        self.objects
            .insert(id, CardInstance::new(id, definition, owner, zone));
        if let Some(player) = self.player_mut(owner) {
            match zone {
                Zone::ActivePlot => player.active_plot = Some(id),
                other => {
                    if let Some(list) = player.zone_mut(other) {
                        list.push(id);
                    }
                }
            }
        }
        if zone == Zone::PlayArea {
            self.register_listeners(id);
        }
        id
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        if self.player(id).is_none() {
            return None;
        }
        self.players.iter().map(|p| p.id).find(|p| *p != id)
    }

    pub fn first_player(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.first_player).map(|p| p.id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&CardInstance> {
        self.objects.get(&id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut CardInstance> {
        self.objects.get_mut(&id)
    }

    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn card_label(&self, id: ObjectId) -> String {
        self.object(id)
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Cards `player` controls in the play area, in play order.
    pub fn cards_in_play(&self, player: PlayerId) -> Vec<&CardInstance> {
        self.player(player)
            .map(|p| {
                p.play_area
                    .iter()
                    .filter_map(|id| self.objects.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn filter_context(&self, you: PlayerId, source: Option<ObjectId>) -> Option<FilterContext> {
        let opponent = self.opponent_of(you)?;
        Some(FilterContext {
            you,
            opponent,
            source,
        })
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Faction power plus power on cards in play.
    pub fn total_power(&self, player: PlayerId) -> u32 {
        let on_cards: u32 = self.cards_in_play(player).iter().map(|c| c.power).sum();
        self.player(player).map_or(0, |p| p.power) + on_cards
    }

    /// Standing characters' strength plus unspent gold.
    pub fn dominance(&self, player: PlayerId) -> u32 {
        let strength: u32 = self
            .cards_in_play(player)
            .iter()
            .filter(|c| c.is_character() && !c.kneeled)
            .map(|c| c.strength())
            .sum();
        strength + self.player(player).map_or(0, |p| p.gold)
    }

    // =========================================================================
    // Log
    // =========================================================================

    pub fn add_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        trace!("game {}: {}", self.id, message);
        let date = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.messages.push(GameMessage { date, message });
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(|m| m.message.as_str())
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.message.contains(needle))
    }

    // =========================================================================
    // Zone changes
    // =========================================================================

    /// Moves a card to `to` in its owner's zones.
    ///
    /// Leaving play deregisters the card's listeners, discards its
    /// attachments, detaches it from its host, drops it from the current
    /// challenge and resets its in-play state. Entering play registers its
    /// listeners. Returns false if the card is unknown or already there.
    pub fn move_card(&mut self, id: ObjectId, to: Zone) -> bool {
        let Some(card) = self.objects.get(&id) else {
            return false;
        };
        let from = card.zone;
        let owner = card.owner;
        if from == to {
            return false;
        }
        if let Some(player) = self.player_mut(owner) {
            player.remove_from(from, id);
            if player.selected_attachment == Some(id) {
                player.selected_attachment = None;
            }
            if player.selected_plot == Some(id) && to != Zone::ActivePlot {
                player.selected_plot = None;
            }
        }

        if from == Zone::PlayArea {
            self.leave_play(id);
        }

        if let Some(card) = self.objects.get_mut(&id) {
            card.zone = to;
            card.controller = owner;
        }
        if let Some(player) = self.player_mut(owner) {
            match to {
                Zone::ActivePlot => player.active_plot = Some(id),
                other => {
                    if let Some(list) = player.zone_mut(other) {
                        list.push(id);
                    }
                }
            }
        }

        if to == Zone::PlayArea {
            self.register_listeners(id);
        }
        true
    }

    fn leave_play(&mut self, id: ObjectId) {
        self.events.unregister_source(id);

        let (host, attachments) = match self.objects.get(&id) {
            Some(card) => (card.attached_to, card.attachments.clone()),
            None => return,
        };
        if let Some(host) = host
            && let Some(host_card) = self.objects.get_mut(&host)
        {
            host_card.attachments.retain(|a| *a != id);
        }
        if let Some(card) = self.objects.get_mut(&id) {
            card.reset_in_play_state();
        }
        for attachment in attachments {
            if let Some(card) = self.objects.get_mut(&attachment) {
                card.attached_to = None;
            }
            self.move_card(attachment, Zone::Discard);
        }

        if let Some(challenge) = self.challenge.as_mut()
            && (challenge.is_participating(id) || challenge.is_stealth_target(id))
        {
            challenge.remove(id);
            self.refresh_challenge_strengths();
        }
    }

    /// Puts an attachment in play onto a host in play.
    pub fn attach(&mut self, attachment: ObjectId, host: ObjectId) -> bool {
        let host_ok = self.object(host).is_some_and(|h| h.is_in_play());
        let attachment_ok = self
            .object(attachment)
            .is_some_and(|a| a.card_type() == CardType::Attachment);
        if !host_ok || !attachment_ok || attachment == host {
            return false;
        }
        if self.object(attachment).is_some_and(|a| !a.is_in_play()) {
            self.move_card(attachment, Zone::PlayArea);
        }
        if let Some(old_host) = self.object(attachment).and_then(|a| a.attached_to)
            && let Some(old) = self.object_mut(old_host)
        {
            old.attachments.retain(|a| *a != attachment);
        }
        if let Some(card) = self.object_mut(attachment) {
            card.attached_to = Some(host);
        }
        if let Some(card) = self.object_mut(host) {
            card.attachments.push(attachment);
        }
        true
    }

    /// Registers the card's listeners and reaction abilities on the bus.
    pub fn register_listeners(&mut self, id: ObjectId) {
        let Some(card) = self.objects.get(&id) else {
            return;
        };
        let controller = card.controller;
        let mut definitions: Vec<ListenerDefinition> = card.definition.listeners.clone();
        definitions.extend(card.definition.abilities.iter().filter_map(|ability| {
            match ability.trigger {
                AbilityTrigger::Reaction { kind, scope } => Some(
                    ListenerDefinition::ability(kind, (*ability.effect).clone()).scoped(scope),
                ),
                _ => None,
            }
        }));
        for definition in definitions {
            let listener = self.ids.next_listener_id();
            self.events.register(listener, id, controller, definition);
        }
    }

    // =========================================================================
    // Deck operations
    // =========================================================================

    pub fn shuffle_draw_deck(&mut self, player: PlayerId) {
        let Some(p) = self.players.get_mut(player.index()) else {
            return;
        };
        p.draw_deck.shuffle(&mut self.rng);
    }

    /// Shuffles a player's hand back into their deck.
    pub fn shuffle_hand_into_deck(&mut self, player: PlayerId) {
        let hand = self.player(player).map(|p| p.hand.clone()).unwrap_or_default();
        for id in hand {
            self.move_card(id, Zone::DrawDeck);
        }
        self.shuffle_draw_deck(player);
    }

    /// Draws up to `count` cards. Returns how many were drawn.
    pub fn draw_cards(&mut self, player: PlayerId, count: usize) -> u32 {
        let mut drawn = 0;
        for _ in 0..count {
            let Some(top) = self.player(player).and_then(|p| p.draw_deck.last().copied()) else {
                break;
            };
            self.move_card(top, Zone::Hand);
            drawn += 1;
        }
        drawn
    }

    /// Puts the top `count` cards of the draw deck in the discard pile.
    pub fn discard_from_deck(&mut self, player: PlayerId, count: usize) -> u32 {
        let mut discarded = 0;
        for _ in 0..count {
            let Some(top) = self.player(player).and_then(|p| p.draw_deck.last().copied()) else {
                break;
            };
            self.move_card(top, Zone::Discard);
            discarded += 1;
        }
        discarded
    }

    /// Discards `count` cards chosen at random from the hand.
    pub fn discard_at_random(&mut self, player: PlayerId, count: usize) -> Vec<ObjectId> {
        let mut discarded = Vec::new();
        for _ in 0..count {
            let hand_size = self.player(player).map_or(0, |p| p.hand.len());
            if hand_size == 0 {
                break;
            }
            let index = self.rng.random_range(0..hand_size);
            let Some(id) = self.player(player).map(|p| p.hand[index]) else {
                break;
            };
            self.move_card(id, Zone::Discard);
            discarded.push(id);
        }
        discarded
    }

    /// Returns used plots to the plot deck.
    pub fn recycle_plots(&mut self, player: PlayerId) {
        let used = self
            .player(player)
            .map(|p| p.used_plots.clone())
            .unwrap_or_default();
        for id in used {
            self.move_card(id, Zone::PlotDeck);
        }
    }

    // =========================================================================
    // Challenge bookkeeping
    // =========================================================================

    /// Recomputes each player's challenge strength from the current
    /// participants. Kneeling does not remove a participant's strength.
    pub fn refresh_challenge_strengths(&mut self) {
        let totals: Vec<(PlayerId, u32)> = self
            .players
            .iter()
            .map(|p| {
                let strength = self.challenge.as_ref().map_or(0, |challenge| {
                    challenge
                        .participants(p.id)
                        .iter()
                        .filter_map(|id| self.objects.get(id))
                        .map(|c| c.strength())
                        .sum()
                });
                (p.id, strength)
            })
            .collect();
        for (id, strength) in totals {
            if let Some(player) = self.player_mut(id) {
                player.challenge_strength = strength;
            }
        }
    }

    /// Moves every player to `phase`.
    pub fn set_phase_all(&mut self, phase: Phase) {
        info!("game {}: entering {} phase", self.id, phase);
        for player in &mut self.players {
            player.phase = phase;
        }
    }
}
