//! Throneworks - rules engine for a two-player plot and challenge card game.
//!
//! The engine tracks each player's phase, validates and applies player
//! commands, resolves challenges and claim, and runs card abilities built
//! from declarative target descriptors.
//!
//! Drive a game with [`turn::initialise`] followed by
//! [`commands::handle_command`]; every call returns the acting player's
//! [`snapshot::GameView`].

pub mod ability;
pub mod card;
pub mod cards;
pub mod challenge;
pub mod commands;
pub mod config;
pub mod effect;
pub mod effects;
pub mod events;
pub mod filter;
pub mod game_state;
pub mod ids;
pub mod object;
pub mod player;
pub mod rules;
pub mod snapshot;
pub mod target;
pub mod turn;
pub mod types;
pub mod zone;

#[cfg(test)]
mod tests;

pub use ability::{
    Ability, AbilityContext, AbilityCost, AbilityTrigger, PendingSelection, Resolution,
    SelectionError,
};
pub use card::{CardBuilder, CardDefinition, ChallengeIcons, PlotStats};
pub use cards::CardRegistry;
pub use challenge::{Challenge, ChallengeResult, ChallengeStep, determine_result};
pub use commands::{Command, CommandError, execute, handle_command};
pub use config::GameConfig;
pub use effect::{ChoiceCount, EffectResult, GameAction};
pub use events::{
    EventBus, EventHandler, EventKind, EventScope, GameEvent, ListenerContext, ListenerDefinition,
    fire_event,
};
pub use filter::{CardCondition, CardFilter, ControllerRelation, FilterContext};
pub use game_state::{Game, GameError, GameMessage, Seat};
pub use ids::{ListenerId, ObjectId, PlayerId};
pub use object::CardInstance;
pub use player::{Button, ChallengeCounters, Phase, Player};
pub use snapshot::{CardView, GameView, PlayerView, view_for};
pub use target::{PlayerRef, TargetDescriptor, TargetSpec};
pub use types::{CardType, ChallengeType, FirstPlayerChoice, Keyword, Stat};
pub use zone::Zone;
