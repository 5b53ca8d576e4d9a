//! Typed publish/subscribe bus for the fixed game event catalog.
//!
//! Card definitions declare [`ListenerDefinition`]s. While a card is in play
//! (or, for plots, while the plot is selected or active this round) its
//! listeners are registered on the game's [`EventBus`]; they are removed when
//! the card leaves play.
//!
//! Listeners run synchronously in registration order. A handler receives
//! `&mut Game` and may adjust transient state the phase machine reads back
//! after the event:
//!
//! - `card_clicked`: set `click_handled` to swallow the click
//! - `plot_revealed`: set `pause_for_plot` to suspend the reveal sequence
//! - `before_attach`: clear `can_attach` to veto the attachment
//! - `before_claim`: change the claim on the current challenge

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::ability::{self, AbilityContext};
use crate::game_state::Game;
use crate::ids::{ListenerId, ObjectId, PlayerId};
use crate::target::TargetDescriptor;
use crate::types::ChallengeType;

/// Fast dispatch enum for event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BeforeCardPlayed,
    AfterCardPlayed,
    BeforeClaim,
    AfterClaim,
    CardClicked,
    BeginMarshal,
    PlotRevealed,
    CardsStanding,
    CustomCommand,
    BeforeAttach,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::BeforeCardPlayed => "before_card_played",
            EventKind::AfterCardPlayed => "after_card_played",
            EventKind::BeforeClaim => "before_claim",
            EventKind::AfterClaim => "after_claim",
            EventKind::CardClicked => "card_clicked",
            EventKind::BeginMarshal => "begin_marshal",
            EventKind::PlotRevealed => "plot_revealed",
            EventKind::CardsStanding => "cards_standing",
            EventKind::CustomCommand => "custom_command",
            EventKind::BeforeAttach => "before_attach",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    BeforeCardPlayed {
        player: PlayerId,
        card: ObjectId,
    },
    AfterCardPlayed {
        player: PlayerId,
        card: ObjectId,
    },
    BeforeClaim {
        challenge_type: ChallengeType,
        winner: PlayerId,
        loser: PlayerId,
    },
    AfterClaim {
        challenge_type: ChallengeType,
        winner: PlayerId,
        loser: PlayerId,
    },
    CardClicked {
        player: PlayerId,
        card: ObjectId,
    },
    BeginMarshal {
        player: PlayerId,
    },
    PlotRevealed {
        player: PlayerId,
        plot: ObjectId,
    },
    CardsStanding,
    CustomCommand {
        player: PlayerId,
        arg: String,
    },
    BeforeAttach {
        player: PlayerId,
        attachment: ObjectId,
        host: ObjectId,
    },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::BeforeCardPlayed { .. } => EventKind::BeforeCardPlayed,
            GameEvent::AfterCardPlayed { .. } => EventKind::AfterCardPlayed,
            GameEvent::BeforeClaim { .. } => EventKind::BeforeClaim,
            GameEvent::AfterClaim { .. } => EventKind::AfterClaim,
            GameEvent::CardClicked { .. } => EventKind::CardClicked,
            GameEvent::BeginMarshal { .. } => EventKind::BeginMarshal,
            GameEvent::PlotRevealed { .. } => EventKind::PlotRevealed,
            GameEvent::CardsStanding => EventKind::CardsStanding,
            GameEvent::CustomCommand { .. } => EventKind::CustomCommand,
            GameEvent::BeforeAttach { .. } => EventKind::BeforeAttach,
        }
    }

    /// The player the event is about. Claim events report the winner.
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::BeforeCardPlayed { player, .. }
            | GameEvent::AfterCardPlayed { player, .. }
            | GameEvent::CardClicked { player, .. }
            | GameEvent::BeginMarshal { player }
            | GameEvent::PlotRevealed { player, .. }
            | GameEvent::CustomCommand { player, .. }
            | GameEvent::BeforeAttach { player, .. } => Some(*player),
            GameEvent::BeforeClaim { winner, .. } | GameEvent::AfterClaim { winner, .. } => {
                Some(*winner)
            }
            GameEvent::CardsStanding => None,
        }
    }

    /// The card the event is about, if any.
    pub fn card(&self) -> Option<ObjectId> {
        match self {
            GameEvent::BeforeCardPlayed { card, .. }
            | GameEvent::AfterCardPlayed { card, .. }
            | GameEvent::CardClicked { card, .. } => Some(*card),
            GameEvent::PlotRevealed { plot, .. } => Some(*plot),
            GameEvent::BeforeAttach { attachment, .. } => Some(*attachment),
            _ => None,
        }
    }
}

/// Which occurrences of an event a listener responds to, relative to the
/// listening card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventScope {
    #[default]
    Any,
    /// The event's player is the listener's controller.
    You,
    Opponent,
    /// The event is about the listening card itself.
    ThisCard,
}

/// Identity of a running listener, passed to its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerContext {
    pub listener: ListenerId,
    pub source: ObjectId,
    pub controller: PlayerId,
    pub opponent: PlayerId,
}

pub type EventHandler = Arc<dyn Fn(&mut Game, &GameEvent, &ListenerContext) + Send + Sync>;

#[derive(Clone)]
pub enum ListenerResponse {
    /// Direct access to game state.
    Handler(EventHandler),
    /// Resolve an ability tree controlled by the listening card's controller.
    Ability(Arc<TargetDescriptor>),
}

impl fmt::Debug for ListenerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerResponse::Handler(_) => write!(f, "Handler(..)"),
            ListenerResponse::Ability(descriptor) => {
                f.debug_tuple("Ability").field(descriptor).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListenerDefinition {
    pub kind: EventKind,
    pub scope: EventScope,
    pub response: ListenerResponse,
}

impl ListenerDefinition {
    pub fn handler(
        kind: EventKind,
        handler: impl Fn(&mut Game, &GameEvent, &ListenerContext) + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            scope: EventScope::Any,
            response: ListenerResponse::Handler(Arc::new(handler)),
        }
    }

    pub fn ability(kind: EventKind, descriptor: TargetDescriptor) -> Self {
        Self {
            kind,
            scope: EventScope::Any,
            response: ListenerResponse::Ability(Arc::new(descriptor)),
        }
    }

    pub fn scoped(mut self, scope: EventScope) -> Self {
        self.scope = scope;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RegisteredListener {
    pub id: ListenerId,
    pub source: ObjectId,
    pub controller: PlayerId,
    pub definition: ListenerDefinition,
}

impl RegisteredListener {
    fn in_scope(&self, event: &GameEvent) -> bool {
        match self.definition.scope {
            EventScope::Any => true,
            EventScope::You => event.player() == Some(self.controller),
            EventScope::Opponent => event.player().is_some_and(|p| p != self.controller),
            EventScope::ThisCard => event.card() == Some(self.source),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    listeners: Vec<RegisteredListener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: ListenerId,
        source: ObjectId,
        controller: PlayerId,
        definition: ListenerDefinition,
    ) {
        debug!("registering {} listener {} for {}", definition.kind, id, source);
        self.listeners.push(RegisteredListener {
            id,
            source,
            controller,
            definition,
        });
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Removes every listener registered by `source`, returning how many.
    pub fn unregister_source(&mut self, source: ObjectId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.source != source);
        before - self.listeners.len()
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    pub fn has_source(&self, source: ObjectId) -> bool {
        self.listeners.iter().any(|l| l.source == source)
    }

    /// Listeners for `kind`, in registration order.
    pub fn listeners_for(&self, kind: EventKind) -> Vec<RegisteredListener> {
        self.listeners
            .iter()
            .filter(|l| l.definition.kind == kind)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Dispatches `event` to its listeners.
///
/// Listeners removed by an earlier listener during the same dispatch are
/// skipped. Dispatch stops once the game is over.
pub fn fire_event(game: &mut Game, event: GameEvent) {
    let listeners = game.events.listeners_for(event.kind());
    trace!("firing {} to {} listener(s)", event.kind(), listeners.len());

    for listener in listeners {
        if game.is_over() {
            break;
        }
        if !game.events.is_registered(listener.id) || !listener.in_scope(&event) {
            continue;
        }
        let Some(opponent) = game.opponent_of(listener.controller) else {
            continue;
        };
        debug!("{} handled by listener {}", event.kind(), listener.id);
        match &listener.definition.response {
            ListenerResponse::Handler(handler) => {
                let ctx = ListenerContext {
                    listener: listener.id,
                    source: listener.source,
                    controller: listener.controller,
                    opponent,
                };
                handler(game, &event, &ctx);
            }
            ListenerResponse::Ability(descriptor) => {
                let ctx = AbilityContext::new(listener.controller, opponent, Some(listener.source));
                ability::resolve_ability(game, Arc::clone(descriptor), ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> ListenerDefinition {
        ListenerDefinition::handler(EventKind::CardsStanding, |_, _, _| {})
    }

    #[test]
    fn test_listeners_in_registration_order() {
        let mut bus = EventBus::new();
        let source = ObjectId::from_raw(7);
        let player = PlayerId::from_index(0);
        bus.register(ListenerId(2), source, player, noop());
        bus.register(
            ListenerId(1),
            source,
            player,
            ListenerDefinition::handler(EventKind::PlotRevealed, |_, _, _| {}),
        );
        bus.register(ListenerId(3), ObjectId::from_raw(8), player, noop());

        let ids: Vec<_> = bus
            .listeners_for(EventKind::CardsStanding)
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![ListenerId(2), ListenerId(3)]);
    }

    #[test]
    fn test_unregister_source() {
        let mut bus = EventBus::new();
        let player = PlayerId::from_index(0);
        bus.register(ListenerId(1), ObjectId::from_raw(1), player, noop());
        bus.register(ListenerId(2), ObjectId::from_raw(1), player, noop());
        bus.register(ListenerId(3), ObjectId::from_raw(2), player, noop());

        assert_eq!(bus.unregister_source(ObjectId::from_raw(1)), 2);
        assert!(!bus.has_source(ObjectId::from_raw(1)));
        assert!(bus.is_registered(ListenerId(3)));
        assert!(bus.unregister(ListenerId(3)));
        assert!(bus.is_empty());
    }

    #[test]
    fn test_scope() {
        let me = PlayerId::from_index(0);
        let them = PlayerId::from_index(1);
        let card = ObjectId::from_raw(5);
        let listener = |scope| RegisteredListener {
            id: ListenerId(1),
            source: card,
            controller: me,
            definition: noop().scoped(scope),
        };
        let mine = GameEvent::BeginMarshal { player: me };
        let theirs = GameEvent::CardClicked {
            player: them,
            card,
        };

        assert!(listener(EventScope::You).in_scope(&mine));
        assert!(!listener(EventScope::You).in_scope(&theirs));
        assert!(listener(EventScope::Opponent).in_scope(&theirs));
        assert!(listener(EventScope::ThisCard).in_scope(&theirs));
        assert!(!listener(EventScope::ThisCard).in_scope(&mine));
        assert!(!listener(EventScope::You).in_scope(&GameEvent::CardsStanding));
    }
}
