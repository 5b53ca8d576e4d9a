//! Challenge record for the challenge currently being fought.
//!
//! A new record replaces the previous one each time a challenge is started.
//! Participation flags also live on the card instances (`selected`,
//! `stealth_target`); the record keeps participation order, which keyword
//! resolution follows.

use crate::ids::{ObjectId, PlayerId};
use crate::types::ChallengeType;

/// Progress of the current challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize),
    serde(rename_all = "snake_case", tag = "step", content = "card")
)]
pub enum ChallengeStep {
    /// The attacker toggles participating characters.
    DeclaringAttackers,
    /// The given stealth attacker is waiting for a stealth target.
    ChoosingStealth(ObjectId),
    /// The defender toggles defending characters.
    AwaitingDefenders,
    /// The loser of a military challenge is killing characters.
    Claim,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct ChallengeResult {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub winner_strength: u32,
    pub loser_strength: u32,
    /// The loser had no strength; the winner gains 1 power.
    pub unopposed: bool,
}

impl ChallengeResult {
    pub fn challenger_won(&self, attacker: PlayerId) -> bool {
        self.winner == attacker
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct Challenge {
    pub challenge_type: ChallengeType,
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub step: ChallengeStep,
    /// In participation order.
    pub attackers: Vec<ObjectId>,
    pub defenders: Vec<ObjectId>,
    pub stealth_targets: Vec<ObjectId>,
    /// Stealth attackers that already chose (or skipped) a target.
    pub stealth_resolved: Vec<ObjectId>,
    /// Claim value; set from the winner's plot once the challenge is won.
    pub claim: u32,
    pub result: Option<ChallengeResult>,
}

impl Challenge {
    pub fn new(challenge_type: ChallengeType, attacker: PlayerId, defender: PlayerId) -> Self {
        Self {
            challenge_type,
            attacker,
            defender,
            step: ChallengeStep::DeclaringAttackers,
            attackers: Vec::new(),
            defenders: Vec::new(),
            stealth_targets: Vec::new(),
            stealth_resolved: Vec::new(),
            claim: 0,
            result: None,
        }
    }

    /// Participants on `player`'s side.
    pub fn participants(&self, player: PlayerId) -> &[ObjectId] {
        if player == self.attacker {
            &self.attackers
        } else {
            &self.defenders
        }
    }

    pub fn is_participating(&self, card: ObjectId) -> bool {
        self.attackers.contains(&card) || self.defenders.contains(&card)
    }

    /// Adds or removes `card` on `player`'s side. Returns true if it now
    /// participates.
    pub fn toggle(&mut self, player: PlayerId, card: ObjectId) -> bool {
        let side = if player == self.attacker {
            &mut self.attackers
        } else {
            &mut self.defenders
        };
        match side.iter().position(|c| *c == card) {
            Some(index) => {
                side.remove(index);
                false
            }
            None => {
                side.push(card);
                true
            }
        }
    }

    /// Drops a card that left play.
    pub fn remove(&mut self, card: ObjectId) {
        self.attackers.retain(|c| *c != card);
        self.defenders.retain(|c| *c != card);
        self.stealth_targets.retain(|c| *c != card);
    }

    pub fn is_stealth_target(&self, card: ObjectId) -> bool {
        self.stealth_targets.contains(&card)
    }
}

/// Compares the two sides. Ties go to the attacker.
pub fn determine_result(
    attacker: PlayerId,
    defender: PlayerId,
    attacker_strength: u32,
    defender_strength: u32,
) -> ChallengeResult {
    let (winner, loser, winner_strength, loser_strength) = if attacker_strength >= defender_strength {
        (attacker, defender, attacker_strength, defender_strength)
    } else {
        (defender, attacker, defender_strength, attacker_strength)
    };
    ChallengeResult {
        winner,
        loser,
        winner_strength,
        loser_strength,
        unopposed: loser_strength == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: PlayerId = PlayerId(0);
    const B: PlayerId = PlayerId(1);

    #[test]
    fn test_tie_goes_to_attacker() {
        let result = determine_result(A, B, 4, 4);
        assert_eq!(result.winner, A);
        assert_eq!(result.loser, B);
        assert!(!result.unopposed);
    }

    #[test]
    fn test_defender_wins_when_stronger() {
        let result = determine_result(A, B, 2, 3);
        assert_eq!(result.winner, B);
        assert_eq!(result.winner_strength, 3);
        assert_eq!(result.loser_strength, 2);
        assert!(!result.challenger_won(A));
    }

    #[test]
    fn test_unopposed() {
        let result = determine_result(A, B, 3, 0);
        assert!(result.unopposed);
        assert!(result.winner_strength >= result.loser_strength);
    }

    #[test]
    fn test_zero_vs_zero_is_unopposed_attacker_win() {
        let result = determine_result(A, B, 0, 0);
        assert_eq!(result.winner, A);
        assert!(result.unopposed);
    }

    #[test]
    fn test_toggle_keeps_order() {
        let mut challenge = Challenge::new(ChallengeType::Power, A, B);
        let x = ObjectId::from_raw(1);
        let y = ObjectId::from_raw(2);
        assert!(challenge.toggle(A, x));
        assert!(challenge.toggle(A, y));
        assert!(!challenge.toggle(A, x));
        assert!(challenge.toggle(A, x));
        assert_eq!(challenge.attackers, vec![y, x]);
        assert!(challenge.toggle(B, ObjectId::from_raw(3)));
        assert_eq!(challenge.participants(B), &[ObjectId::from_raw(3)]);

        challenge.remove(y);
        assert!(!challenge.is_participating(y));
    }
}
