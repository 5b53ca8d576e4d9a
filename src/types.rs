use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CardType {
    Character,
    Location,
    Attachment,
    Event,
    Plot,
    Agenda,
}

impl CardType {
    /// Card types that stay in the play area once marshalled.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            CardType::Character | CardType::Location | CardType::Attachment
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardType::Character => "character",
            CardType::Location => "location",
            CardType::Attachment => "attachment",
            CardType::Event => "event",
            CardType::Plot => "plot",
            CardType::Agenda => "agenda",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ChallengeType {
    Military,
    Intrigue,
    Power,
}

impl ChallengeType {
    pub const ALL: [ChallengeType; 3] = [
        ChallengeType::Military,
        ChallengeType::Intrigue,
        ChallengeType::Power,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChallengeType::Military => "military",
            ChallengeType::Intrigue => "intrigue",
            ChallengeType::Power => "power",
        }
    }
}

impl fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChallengeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "military" => Ok(ChallengeType::Military),
            "intrigue" => Ok(ChallengeType::Intrigue),
            "power" => Ok(ChallengeType::Power),
            other => Err(format!("Unknown challenge type '{other}'")),
        }
    }
}

/// Printed keywords the challenge engine resolves itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Keyword {
    Insight,
    Pillage,
    Renown,
    Stealth,
}

impl Keyword {
    pub fn label(&self) -> &'static str {
        match self {
            Keyword::Insight => "Insight",
            Keyword::Pillage => "Pillage",
            Keyword::Renown => "Renown",
            Keyword::Stealth => "Stealth",
        }
    }
}

/// Player statistics adjustable with `change_stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Stat {
    Power,
    Gold,
}

impl Stat {
    pub fn label(&self) -> &'static str {
        match self {
            Stat::Power => "power",
            Stat::Gold => "gold",
        }
    }
}

/// Answer to the first player prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FirstPlayerChoice {
    Me,
    Opponent,
}
