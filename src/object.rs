use std::collections::BTreeSet;
use std::sync::Arc;

use crate::card::CardDefinition;
use crate::ids::{ObjectId, PlayerId};
use crate::types::{CardType, ChallengeType, Keyword};
use crate::zone::Zone;

/// A card in a specific game: shared printed data plus mutable instance state.
#[derive(Debug, Clone)]
pub struct CardInstance {
    pub id: ObjectId,
    pub definition: Arc<CardDefinition>,
    pub zone: Zone,

    // Ownership (this engine has no control-changing effects)
    pub owner: PlayerId,
    pub controller: PlayerId,

    pub kneeled: bool,
    /// Power tokens on the card; counts toward its controller's total.
    pub power: u32,
    /// Round-scoped strength adjustment from effects.
    pub strength_modifier: i32,
    /// Participating in the current challenge.
    pub selected: bool,
    /// Chosen as a stealth target and cannot defend this challenge.
    pub stealth_target: bool,

    pub attached_to: Option<ObjectId>,
    pub attachments: Vec<ObjectId>,

    /// Indices of action abilities already used this round.
    pub used_actions: BTreeSet<usize>,
}

impl CardInstance {
    pub fn new(id: ObjectId, definition: Arc<CardDefinition>, owner: PlayerId, zone: Zone) -> Self {
        Self {
            id,
            definition,
            zone,
            owner,
            controller: owner,
            kneeled: false,
            power: 0,
            strength_modifier: 0,
            selected: false,
            stealth_target: false,
            attached_to: None,
            attachments: Vec::new(),
            used_actions: BTreeSet::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.definition.label
    }

    pub fn code(&self) -> &str {
        &self.definition.code
    }

    pub fn card_type(&self) -> CardType {
        self.definition.card_type
    }

    pub fn is_character(&self) -> bool {
        self.definition.is_character()
    }

    pub fn is_in_play(&self) -> bool {
        self.zone == Zone::PlayArea
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.definition.has_keyword(keyword)
    }

    /// Printed strength plus modifiers, never below zero.
    pub fn strength(&self) -> u32 {
        (self.definition.strength as i64 + self.strength_modifier as i64).max(0) as u32
    }

    /// Attachment in play that has not been placed on a host yet.
    pub fn is_unmapped_attachment(&self) -> bool {
        self.is_in_play()
            && self.card_type() == CardType::Attachment
            && self.attached_to.is_none()
    }

    /// Standing character in play with the icon for the given challenge.
    pub fn can_participate(&self, challenge_type: ChallengeType) -> bool {
        self.is_in_play()
            && self.is_character()
            && !self.kneeled
            && self.definition.icons.has(challenge_type)
    }

    /// Clears every piece of state that only has meaning while in play.
    pub fn reset_in_play_state(&mut self) {
        self.kneeled = false;
        self.power = 0;
        self.strength_modifier = 0;
        self.selected = false;
        self.stealth_target = false;
        self.attached_to = None;
        self.attachments.clear();
        self.used_actions.clear();
    }
}
