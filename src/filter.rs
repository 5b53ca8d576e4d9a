//! Card predicates used by target descriptors.
//!
//! A [`CardFilter`] combines static properties (card type, controller relation,
//! zone) with a list of [`CardCondition`]s. All conditions must hold.

use std::fmt;
use std::sync::Arc;

use crate::game_state::Game;
use crate::ids::{ObjectId, PlayerId};
use crate::object::CardInstance;
use crate::types::{CardType, Keyword};
use crate::zone::Zone;

/// Arbitrary predicate over a card and the current game.
pub type CardPredicate = Arc<dyn Fn(&CardInstance, &Game) -> bool + Send + Sync>;

/// Who must control a matching card, relative to the ability's controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerRelation {
    You,
    Opponent,
    #[default]
    Any,
}

#[derive(Clone)]
pub enum CardCondition {
    HasFaction(String),
    HasTrait(String),
    HasKeyword(Keyword),
    Kneeling,
    Standing,
    /// Participating in the current challenge.
    Participating,
    /// Anything other than the ability's own source card.
    NotSource,
    Custom(CardPredicate),
}

impl fmt::Debug for CardCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardCondition::HasFaction(faction) => f.debug_tuple("HasFaction").field(faction).finish(),
            CardCondition::HasTrait(name) => f.debug_tuple("HasTrait").field(name).finish(),
            CardCondition::HasKeyword(keyword) => {
                f.debug_tuple("HasKeyword").field(keyword).finish()
            }
            CardCondition::Kneeling => write!(f, "Kneeling"),
            CardCondition::Standing => write!(f, "Standing"),
            CardCondition::Participating => write!(f, "Participating"),
            CardCondition::NotSource => write!(f, "NotSource"),
            CardCondition::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl CardCondition {
    fn holds(&self, card: &CardInstance, game: &Game, ctx: &FilterContext) -> bool {
        match self {
            CardCondition::HasFaction(faction) => card.definition.has_faction(faction),
            CardCondition::HasTrait(name) => card.definition.has_trait(name),
            CardCondition::HasKeyword(keyword) => card.has_keyword(*keyword),
            CardCondition::Kneeling => card.kneeled,
            CardCondition::Standing => !card.kneeled,
            CardCondition::Participating => card.selected,
            CardCondition::NotSource => ctx.source != Some(card.id),
            CardCondition::Custom(predicate) => predicate(card, game),
        }
    }
}

/// Context for evaluating a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterContext {
    /// The controller of the source ability ("you").
    pub you: PlayerId,
    pub opponent: PlayerId,
    /// The source object of the ability, if any.
    pub source: Option<ObjectId>,
}

impl FilterContext {
    pub fn new(you: PlayerId, opponent: PlayerId) -> Self {
        Self {
            you,
            opponent,
            source: None,
        }
    }

    pub fn with_source(mut self, source: ObjectId) -> Self {
        self.source = Some(source);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CardFilter {
    /// Allowed card types; empty means any type.
    pub card_types: Vec<CardType>,
    pub controller: ControllerRelation,
    pub zone: Zone,
    pub conditions: Vec<CardCondition>,
}

impl Default for CardFilter {
    fn default() -> Self {
        Self {
            card_types: Vec::new(),
            controller: ControllerRelation::Any,
            zone: Zone::PlayArea,
            conditions: Vec::new(),
        }
    }
}

impl CardFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn character() -> Self {
        Self::default().with_type(CardType::Character)
    }

    pub fn location() -> Self {
        Self::default().with_type(CardType::Location)
    }

    pub fn with_type(mut self, card_type: CardType) -> Self {
        if !self.card_types.contains(&card_type) {
            self.card_types.push(card_type);
        }
        self
    }

    pub fn or_type(self, card_type: CardType) -> Self {
        self.with_type(card_type)
    }

    pub fn you_control(mut self) -> Self {
        self.controller = ControllerRelation::You;
        self
    }

    pub fn opponent_controls(mut self) -> Self {
        self.controller = ControllerRelation::Opponent;
        self
    }

    pub fn in_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_condition(mut self, condition: CardCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn faction(self, faction: impl Into<String>) -> Self {
        self.with_condition(CardCondition::HasFaction(faction.into()))
    }

    pub fn standing(self) -> Self {
        self.with_condition(CardCondition::Standing)
    }

    pub fn kneeling(self) -> Self {
        self.with_condition(CardCondition::Kneeling)
    }

    pub fn other(self) -> Self {
        self.with_condition(CardCondition::NotSource)
    }

    pub fn matching(
        self,
        predicate: impl Fn(&CardInstance, &Game) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.with_condition(CardCondition::Custom(Arc::new(predicate)))
    }

    /// Which players' zones can hold a matching card.
    pub fn players(&self, ctx: &FilterContext) -> Vec<PlayerId> {
        match self.controller {
            ControllerRelation::You => vec![ctx.you],
            ControllerRelation::Opponent => vec![ctx.opponent],
            ControllerRelation::Any => vec![ctx.you, ctx.opponent],
        }
    }

    pub fn matches(&self, card: &CardInstance, game: &Game, ctx: &FilterContext) -> bool {
        if card.zone != self.zone {
            return false;
        }
        if !self.card_types.is_empty() && !self.card_types.contains(&card.card_type()) {
            return false;
        }
        let controller_ok = match self.controller {
            ControllerRelation::You => card.controller == ctx.you,
            ControllerRelation::Opponent => card.controller == ctx.opponent,
            ControllerRelation::Any => true,
        };
        controller_ok && self.conditions.iter().all(|c| c.holds(card, game, ctx))
    }

    pub fn describe(&self) -> String {
        let noun = match self.card_types.as_slice() {
            [] => "card".to_string(),
            types => types
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(" or "),
        };
        match self.controller {
            ControllerRelation::You => format!("{noun} you control"),
            ControllerRelation::Opponent => format!("{noun} an opponent controls"),
            ControllerRelation::Any => noun,
        }
    }
}
