//! Target descriptors: what an ability chooses and what it does to the choice.

use std::sync::Arc;

use crate::effect::{ChoiceCount, GameAction};
use crate::filter::CardFilter;
use crate::ids::PlayerId;

/// A player relative to the ability's controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerRef {
    You,
    Opponent,
}

impl PlayerRef {
    pub fn resolve(&self, you: PlayerId, opponent: PlayerId) -> PlayerId {
        match self {
            PlayerRef::You => you,
            PlayerRef::Opponent => opponent,
        }
    }
}

/// What a descriptor selects.
#[derive(Debug, Clone)]
pub enum TargetSpec {
    /// Cards matching a filter, chosen by the ability's controller.
    Cards { filter: CardFilter, count: ChoiceCount },
    /// A single player; no choice involved.
    Player(PlayerRef),
}

/// A node of an ability tree.
///
/// `then` runs with the same context only when `action` affected at least one
/// target ("if you do").
#[derive(Debug, Clone)]
pub struct TargetDescriptor {
    pub target: TargetSpec,
    pub action: GameAction,
    pub then: Option<Arc<TargetDescriptor>>,
}

impl TargetDescriptor {
    /// Choose exactly one card matching `filter` and apply `action` to it.
    pub fn cards(filter: CardFilter, action: GameAction) -> Self {
        Self {
            target: TargetSpec::Cards {
                filter,
                count: ChoiceCount::default(),
            },
            action,
            then: None,
        }
    }

    pub fn player(player: PlayerRef, action: GameAction) -> Self {
        Self {
            target: TargetSpec::Player(player),
            action,
            then: None,
        }
    }

    pub fn up_to(self, n: usize) -> Self {
        self.with_count(ChoiceCount::up_to(n))
    }

    pub fn exactly(self, n: usize) -> Self {
        self.with_count(ChoiceCount::exactly(n))
    }

    fn with_count(mut self, new_count: ChoiceCount) -> Self {
        if let TargetSpec::Cards { count, .. } = &mut self.target {
            *count = new_count;
        }
        self
    }

    pub fn then(mut self, next: TargetDescriptor) -> Self {
        self.then = Some(Arc::new(next));
        self
    }

    pub fn count(&self) -> Option<ChoiceCount> {
        match &self.target {
            TargetSpec::Cards { count, .. } => Some(*count),
            TargetSpec::Player(_) => None,
        }
    }

    /// Number of descriptors in this chain.
    pub fn depth(&self) -> usize {
        1 + self.then.as_ref().map_or(0, |next| next.depth())
    }

    /// Menu title shown while the controller chooses targets.
    pub fn prompt(&self) -> String {
        match &self.target {
            TargetSpec::Cards { filter, count } => {
                let noun = filter.describe();
                let verb = self.action.verb();
                if count.is_up_to() {
                    format!("Select up to {} {noun} to {verb}", count.max)
                } else if count.is_single() {
                    format!("Select a {noun} to {verb}")
                } else {
                    format!("Select {} {noun} to {verb}", count.max)
                }
            }
            TargetSpec::Player(_) => format!("Resolve {}", self.action.verb()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardType;

    #[test]
    fn test_default_count_is_exactly_one() {
        let descriptor = TargetDescriptor::cards(CardFilter::character(), GameAction::Kneel);
        assert_eq!(descriptor.count(), Some(ChoiceCount::exactly(1)));
        assert_eq!(descriptor.prompt(), "Select a character to kneel");
    }

    #[test]
    fn test_then_chain() {
        let descriptor = TargetDescriptor::cards(CardFilter::character().you_control(), GameAction::Kneel)
            .then(
                TargetDescriptor::cards(
                    CardFilter::character().or_type(CardType::Location),
                    GameAction::Kneel,
                )
                .up_to(3),
            );
        assert_eq!(descriptor.depth(), 2);
        let next = descriptor.then.as_ref().map(|d| d.count());
        assert_eq!(next, Some(Some(ChoiceCount::up_to(3))));
        assert_eq!(
            descriptor.then.as_ref().map(|d| d.prompt()),
            Some("Select up to 3 character or location to kneel".to_string())
        );
    }

    #[test]
    fn test_player_descriptor_ignores_count() {
        let descriptor = TargetDescriptor::player(PlayerRef::Opponent, GameAction::DiscardAtRandom(1)).up_to(2);
        assert_eq!(descriptor.count(), None);
        let you = PlayerId::from_index(0);
        let opponent = PlayerId::from_index(1);
        assert_eq!(PlayerRef::Opponent.resolve(you, opponent), opponent);
    }
}
