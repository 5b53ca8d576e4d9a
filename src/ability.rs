//! Card abilities and the descriptor resolver.
//!
//! An [`Ability`] is a descriptor tree plus a trigger binding. Resolution
//! walks the tree:
//!
//! - player targets apply immediately
//! - card targets compute the candidate set; a forced choice resolves at once,
//!   otherwise a [`PendingSelection`] is parked on the game and the
//!   controller's clicks or `choose_targets` fill it in until `done_targets`
//! - `then` runs only when the parent affected at least one target
//!
//! Resolutions that arise while a selection is pending queue behind it and
//! run in order once it finishes.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::commands::CommandError;
use crate::effects;
use crate::events::{EventKind, EventScope};
use crate::game_state::Game;
use crate::ids::{ObjectId, PlayerId};
use crate::player::{Button, Phase};
use crate::target::{TargetDescriptor, TargetSpec};

/// Stack headroom kept free while recursing through `then` chains.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbilityCost {
    /// Kneel the card the ability is printed on.
    pub kneel_self: bool,
    pub gold: u32,
}

impl AbilityCost {
    pub fn is_free(&self) -> bool {
        !self.kneel_self && self.gold == 0
    }
}

/// When an ability resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityTrigger {
    /// Used by its controller with `use_ability`, once per round.
    Action,
    /// After the card is marshalled or played.
    WhenPlayed,
    /// When the card is revealed as a plot.
    WhenRevealed,
    /// In response to an event while the card is in play.
    Reaction { kind: EventKind, scope: EventScope },
}

#[derive(Debug, Clone)]
pub struct Ability {
    pub text: String,
    pub trigger: AbilityTrigger,
    pub cost: AbilityCost,
    pub effect: Arc<TargetDescriptor>,
}

impl Ability {
    fn new(trigger: AbilityTrigger, text: impl Into<String>, effect: TargetDescriptor) -> Self {
        Self {
            text: text.into(),
            trigger,
            cost: AbilityCost::default(),
            effect: Arc::new(effect),
        }
    }

    pub fn action(text: impl Into<String>, effect: TargetDescriptor) -> Self {
        Self::new(AbilityTrigger::Action, text, effect)
    }

    pub fn when_played(text: impl Into<String>, effect: TargetDescriptor) -> Self {
        Self::new(AbilityTrigger::WhenPlayed, text, effect)
    }

    pub fn when_revealed(text: impl Into<String>, effect: TargetDescriptor) -> Self {
        Self::new(AbilityTrigger::WhenRevealed, text, effect)
    }

    pub fn reaction(
        kind: EventKind,
        scope: EventScope,
        text: impl Into<String>,
        effect: TargetDescriptor,
    ) -> Self {
        Self::new(AbilityTrigger::Reaction { kind, scope }, text, effect)
    }

    pub fn kneel_cost(mut self) -> Self {
        self.cost.kneel_self = true;
        self
    }

    pub fn gold_cost(mut self, gold: u32) -> Self {
        self.cost.gold = gold;
        self
    }

    pub fn is_action(&self) -> bool {
        self.trigger == AbilityTrigger::Action
    }
}

/// Who is resolving an ability, and from which card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct AbilityContext {
    pub player: PlayerId,
    pub opponent: PlayerId,
    pub source: Option<ObjectId>,
}

impl AbilityContext {
    pub fn new(player: PlayerId, opponent: PlayerId, source: Option<ObjectId>) -> Self {
        Self {
            player,
            opponent,
            source,
        }
    }

    pub fn for_player(game: &Game, player: PlayerId, source: Option<ObjectId>) -> Option<Self> {
        Some(Self::new(player, game.opponent_of(player)?, source))
    }
}

/// A target choice the engine is waiting on.
#[derive(Debug, Clone)]
pub struct PendingSelection {
    pub player: PlayerId,
    pub descriptor: Arc<TargetDescriptor>,
    pub context: AbilityContext,
    pub candidates: Vec<ObjectId>,
    pub min: usize,
    pub max: usize,
    /// In selection order.
    pub chosen: Vec<ObjectId>,
    /// Prompt to restore once the selection finishes.
    saved_prompt: (String, Vec<Button>),
}

impl PendingSelection {
    pub fn prompt(&self) -> String {
        self.descriptor.prompt()
    }

    pub fn is_candidate(&self, card: ObjectId) -> bool {
        self.candidates.contains(&card)
    }
}

/// A resolution waiting for the pending selection to finish.
#[derive(Debug, Clone)]
pub struct QueuedAbility {
    pub descriptor: Arc<TargetDescriptor>,
    pub context: AbilityContext,
}

/// Outcome of resolving (part of) an ability tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Fully resolved; `affected` counts targets the top-level action touched.
    Resolved { affected: usize },
    /// Waiting on a player's target selection.
    Pending,
    /// Waiting behind another ability's selection.
    Queued,
}

impl Resolution {
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }
}

/// Errors from target selection commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    NoPendingSelection,
    /// Another player owns the pending selection.
    NotChooser(PlayerId),
    NotACandidate(ObjectId),
    DuplicateTarget(ObjectId),
    WrongCount {
        chosen: usize,
        min: usize,
        max: usize,
    },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NoPendingSelection => write!(f, "no target selection is pending"),
            SelectionError::NotChooser(player) => {
                write!(f, "{} is not choosing targets", player)
            }
            SelectionError::NotACandidate(card) => write!(f, "{} is not a legal target", card),
            SelectionError::DuplicateTarget(card) => write!(f, "{} chosen twice", card),
            SelectionError::WrongCount { chosen, min, max } => write!(
                f,
                "chose {} target(s), must choose between {} and {}",
                chosen, min, max
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves an ability tree, queueing it if a selection is already pending.
pub fn resolve_ability(
    game: &mut Game,
    descriptor: Arc<TargetDescriptor>,
    context: AbilityContext,
) -> Resolution {
    if game.is_over() {
        return Resolution::Resolved { affected: 0 };
    }
    if game.pending.is_some() {
        debug!("queueing ability behind pending selection");
        game.ability_queue.push_back(QueuedAbility {
            descriptor,
            context,
        });
        return Resolution::Queued;
    }
    resolve_descriptor(game, descriptor, context)
}

fn resolve_descriptor(
    game: &mut Game,
    descriptor: Arc<TargetDescriptor>,
    context: AbilityContext,
) -> Resolution {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
        match &descriptor.target {
            TargetSpec::Player(player_ref) => {
                let target = player_ref.resolve(context.player, context.opponent);
                let result = effects::apply_to_player(game, &context, target, &descriptor.action);
                let affected = usize::from(result.something_happened());
                follow_up(game, &descriptor, context, affected)
            }
            TargetSpec::Cards { count, .. } => {
                let candidates = candidates(game, &descriptor, &context);
                if candidates.is_empty() {
                    let source = context
                        .source
                        .map(|s| game.card_label(s))
                        .unwrap_or_else(|| "ability".to_string());
                    game.add_message(format!("{} has no legal targets", source));
                    return Resolution::Resolved { affected: 0 };
                }
                if count.is_forced(candidates.len()) {
                    return apply_chosen(game, &descriptor, context, candidates);
                }
                let (min, max) = count.bounds(candidates.len());
                park_selection(game, descriptor.clone(), context, candidates, min, max);
                Resolution::Pending
            }
        }
    })
}

/// Legal card targets for a descriptor, in seat order then zone order.
pub fn candidates(
    game: &Game,
    descriptor: &TargetDescriptor,
    context: &AbilityContext,
) -> Vec<ObjectId> {
    let TargetSpec::Cards { filter, .. } = &descriptor.target else {
        return Vec::new();
    };
    let ctx = crate::filter::FilterContext {
        you: context.player,
        opponent: context.opponent,
        source: context.source,
    };
    let found: Vec<ObjectId> = filter
        .players(&ctx)
        .into_iter()
        .filter_map(|player| game.player(player))
        .flat_map(|player| player.cards_in(filter.zone))
        .filter(|id| {
            game.object(*id)
                .is_some_and(|card| filter.matches(card, game, &ctx))
        })
        .collect();
    trace!("{} candidate(s) for '{}'", found.len(), descriptor.prompt());
    found
}

fn park_selection(
    game: &mut Game,
    descriptor: Arc<TargetDescriptor>,
    context: AbilityContext,
    candidates: Vec<ObjectId>,
    min: usize,
    max: usize,
) {
    let Some(player) = game.player_mut(context.player) else {
        return;
    };
    let saved_prompt = (
        std::mem::take(&mut player.menu_title),
        std::mem::take(&mut player.buttons),
    );
    player.set_prompt(descriptor.prompt(), vec![Button::done("done_targets")]);
    player.select_card = true;
    game.pending = Some(PendingSelection {
        player: context.player,
        descriptor,
        context,
        candidates,
        min,
        max,
        chosen: Vec::new(),
        saved_prompt,
    });
}

fn apply_chosen(
    game: &mut Game,
    descriptor: &Arc<TargetDescriptor>,
    context: AbilityContext,
    chosen: Vec<ObjectId>,
) -> Resolution {
    let mut affected = 0;
    for card in chosen {
        if game.is_over() {
            break;
        }
        let result = effects::apply_to_card(game, &context, card, &descriptor.action);
        if result.something_happened() {
            affected += 1;
        }
    }
    follow_up(game, descriptor, context, affected)
}

/// Runs `then` if the parent affected something.
fn follow_up(
    game: &mut Game,
    descriptor: &TargetDescriptor,
    context: AbilityContext,
    affected: usize,
) -> Resolution {
    if affected == 0 || game.is_over() {
        return Resolution::Resolved { affected };
    }
    match &descriptor.then {
        Some(next) => match resolve_descriptor(game, Arc::clone(next), context) {
            Resolution::Pending => Resolution::Pending,
            _ => Resolution::Resolved { affected },
        },
        None => Resolution::Resolved { affected },
    }
}

// =============================================================================
// Interaction
// =============================================================================

fn pending_for(game: &Game, player: PlayerId) -> Result<&PendingSelection, SelectionError> {
    let pending = game
        .pending
        .as_ref()
        .ok_or(SelectionError::NoPendingSelection)?;
    if pending.player != player {
        return Err(SelectionError::NotChooser(player));
    }
    Ok(pending)
}

/// Adds or removes a candidate from the pending choice. Returns true if the
/// card is now chosen.
pub fn toggle_pending_target(
    game: &mut Game,
    player: PlayerId,
    card: ObjectId,
) -> Result<bool, SelectionError> {
    let pending = pending_for(game, player)?;
    if !pending.is_candidate(card) {
        return Err(SelectionError::NotACandidate(card));
    }
    if !pending.chosen.contains(&card) && pending.chosen.len() >= pending.max {
        return Err(SelectionError::WrongCount {
            chosen: pending.chosen.len() + 1,
            min: pending.min,
            max: pending.max,
        });
    }
    let Some(pending) = game.pending.as_mut() else {
        return Err(SelectionError::NoPendingSelection);
    };
    match pending.chosen.iter().position(|c| *c == card) {
        Some(index) => {
            pending.chosen.remove(index);
            Ok(false)
        }
        None => {
            pending.chosen.push(card);
            Ok(true)
        }
    }
}

/// Replaces the pending choice in one step.
pub fn choose_targets(
    game: &mut Game,
    player: PlayerId,
    cards: Vec<ObjectId>,
) -> Result<(), SelectionError> {
    let pending = pending_for(game, player)?;
    for (index, card) in cards.iter().enumerate() {
        if !pending.is_candidate(*card) {
            return Err(SelectionError::NotACandidate(*card));
        }
        if cards[..index].contains(card) {
            return Err(SelectionError::DuplicateTarget(*card));
        }
    }
    if cards.len() > pending.max {
        return Err(SelectionError::WrongCount {
            chosen: cards.len(),
            min: pending.min,
            max: pending.max,
        });
    }
    if let Some(pending) = game.pending.as_mut() {
        pending.chosen = cards;
    }
    Ok(())
}

/// Finalizes the pending selection and resolves the action on the choice.
///
/// Choices that are no longer legal are dropped first; the remaining count
/// must be within the bounds for the current candidates. Queued abilities run
/// afterwards, then any suspended plot reveal resumes.
pub fn finish_selection(game: &mut Game, player: PlayerId) -> Result<Resolution, SelectionError> {
    let pending = pending_for(game, player)?;
    let current = candidates(game, &pending.descriptor, &pending.context);
    let chosen: Vec<ObjectId> = pending
        .chosen
        .iter()
        .copied()
        .filter(|c| current.contains(c))
        .collect();
    let (min, max) = pending
        .descriptor
        .count()
        .map_or((0, 0), |count| count.bounds(current.len()));
    if chosen.len() < min || chosen.len() > max {
        return Err(SelectionError::WrongCount {
            chosen: chosen.len(),
            min,
            max,
        });
    }

    let Some(pending) = game.pending.take() else {
        return Err(SelectionError::NoPendingSelection);
    };
    if let Some(p) = game.player_mut(pending.player) {
        let (title, buttons) = pending.saved_prompt;
        p.set_prompt(title, buttons);
        p.select_card = false;
    }

    let resolution = apply_chosen(game, &pending.descriptor, pending.context, chosen);
    if !resolution.is_pending() {
        drain_queue(game);
    }
    if game.pending.is_none() {
        crate::turn::resume_after_selection(game);
    }
    Ok(resolution)
}

/// Resolves queued abilities until one parks a new selection.
pub fn drain_queue(game: &mut Game) {
    while game.pending.is_none() && !game.is_over() {
        let Some(queued) = game.ability_queue.pop_front() else {
            break;
        };
        resolve_descriptor(game, queued.descriptor, queued.context);
    }
}

// =============================================================================
// Activation
// =============================================================================

/// Uses the action ability at `index` on `card`.
///
/// Actions are usable by the card's controller during the marshal and
/// challenge phases, once per round each, after paying their cost.
pub fn activate(
    game: &mut Game,
    player: PlayerId,
    card: ObjectId,
    index: usize,
) -> Result<Resolution, CommandError> {
    let phase = game
        .player(player)
        .ok_or(CommandError::PlayerNotFound(player))?
        .phase;
    if !matches!(phase, Phase::Marshal | Phase::Challenge) {
        return Err(CommandError::WrongPhase(phase));
    }
    let instance = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    if instance.controller != player {
        return Err(CommandError::NotYourCard(card));
    }
    if !instance.is_in_play() {
        return Err(CommandError::NotInPlay(card));
    }
    let ability = instance
        .definition
        .abilities
        .get(index)
        .filter(|a| a.is_action())
        .cloned()
        .ok_or(CommandError::NoSuchAbility { card, index })?;
    if instance.used_actions.contains(&index) {
        return Err(CommandError::AbilityUsed { card, index });
    }
    if ability.cost.kneel_self && instance.kneeled {
        return Err(CommandError::Kneeling(card));
    }
    let gold = game.player(player).map_or(0, |p| p.gold);
    if gold < ability.cost.gold {
        return Err(CommandError::NotEnoughGold {
            needed: ability.cost.gold,
            available: gold,
        });
    }
    let context = AbilityContext::for_player(game, player, Some(card))
        .ok_or(CommandError::PlayerNotFound(player))?;

    if let Some(instance) = game.object_mut(card) {
        instance.used_actions.insert(index);
        if ability.cost.kneel_self {
            instance.kneeled = true;
        }
    }
    if let Some(p) = game.player_mut(player) {
        p.gold -= ability.cost.gold;
    }
    let message = format!(
        "{} uses {}: {}",
        game.player_name(player),
        game.card_label(card),
        ability.text
    );
    game.add_message(message);

    Ok(resolve_ability(game, ability.effect, context))
}
