//! Action vocabulary for card abilities.
//!
//! Card effects are data: a [`GameAction`] applied to each chosen target of a
//! [`TargetDescriptor`](crate::target::TargetDescriptor). The engine applies
//! the action (see `effects/`) and reports an [`EffectResult`] whose
//! `something_happened()` drives "if you do" chaining.

use crate::zone::Zone;

/// How many targets may or must be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceCount {
    /// Minimum number to choose (0 for "up to").
    pub min: usize,
    /// Maximum number to choose.
    pub max: usize,
}

impl Default for ChoiceCount {
    fn default() -> Self {
        Self::exactly(1)
    }
}

impl ChoiceCount {
    /// Exactly N (the default for most effects).
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    /// Up to N (0 to N).
    pub const fn up_to(n: usize) -> Self {
        Self { min: 0, max: n }
    }

    /// Returns true if this is exactly 1.
    pub fn is_single(&self) -> bool {
        self.min == 1 && self.max == 1
    }

    pub fn is_up_to(&self) -> bool {
        self.min == 0
    }

    /// Legal `(min, max)` choice counts given the number of candidates.
    ///
    /// With fewer candidates than required, every candidate must be chosen.
    pub fn bounds(&self, candidates: usize) -> (usize, usize) {
        let max = self.max.min(candidates);
        (self.min.min(max), max)
    }

    /// True when the count leaves no choice: every candidate is taken.
    pub fn is_forced(&self, candidates: usize) -> bool {
        !self.is_up_to() && candidates <= self.min
    }
}

impl From<usize> for ChoiceCount {
    fn from(value: usize) -> Self {
        ChoiceCount::exactly(value)
    }
}

/// Action primitives.
///
/// Card-level actions apply to each chosen card; player-level actions apply to
/// the targeted player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameAction {
    // === Card actions ===
    /// Kneel (exhaust) a card. Already-kneeling cards still count as affected.
    Kneel,
    /// Stand a kneeling card.
    Stand,
    /// Kill a character: it goes to its owner's dead pile.
    Kill,
    /// Put a card in play into its owner's discard pile.
    Sacrifice,
    /// Return a card to its owner's hand.
    ReturnToHand,
    /// Discard a chosen card (from hand or play) to its owner's discard pile.
    Discard,
    /// Move a card to another zone of its owner.
    MoveTo(Zone),
    /// Add (or remove) power tokens on a card.
    ModifyPower(i32),
    /// Adjust a card's strength until the end of the round.
    ModifyStrength(i32),

    // === Player actions ===
    Draw(u32),
    DiscardAtRandom(u32),
    DiscardFromDeck(u32),
    /// Gain (or lose) faction power.
    GainPower(i32),
    GainGold(i32),
}

impl GameAction {
    /// True for actions that take a player rather than cards as their target.
    pub fn targets_players(&self) -> bool {
        matches!(
            self,
            GameAction::Draw(_)
                | GameAction::DiscardAtRandom(_)
                | GameAction::DiscardFromDeck(_)
                | GameAction::GainPower(_)
                | GameAction::GainGold(_)
        )
    }

    /// Verb used in selection prompts ("Select a card to kneel").
    pub fn verb(&self) -> &'static str {
        match self {
            GameAction::Kneel => "kneel",
            GameAction::Stand => "stand",
            GameAction::Kill => "kill",
            GameAction::Sacrifice => "sacrifice",
            GameAction::ReturnToHand => "return to hand",
            GameAction::Discard => "discard",
            GameAction::MoveTo(_) => "move",
            GameAction::ModifyPower(_) => "modify power of",
            GameAction::ModifyStrength(_) => "modify strength of",
            GameAction::Draw(_) => "draw",
            GameAction::DiscardAtRandom(_) => "discard at random",
            GameAction::DiscardFromDeck(_) => "discard from deck",
            GameAction::GainPower(_) => "gain power",
            GameAction::GainGold(_) => "gain gold",
        }
    }
}

/// The result of applying one action to one target.
///
/// For "if you do" logic, use `something_happened()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectResult {
    /// Single-target action resolved (kneel, kill, move...).
    Resolved,
    /// Action produced a count (cards drawn, cards discarded, power moved).
    ///
    /// `Count(0)` executed but `something_happened()` is false for it.
    Count(u32),
    /// The target was not a legal object for the action.
    Nothing,
}

impl EffectResult {
    pub fn something_happened(&self) -> bool {
        match self {
            EffectResult::Resolved => true,
            EffectResult::Count(n) => *n > 0,
            EffectResult::Nothing => false,
        }
    }
}
