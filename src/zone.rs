use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Zone {
    DrawDeck,
    Hand,
    PlayArea,
    Discard,
    DeadPile,
    PlotDeck,
    ActivePlot,
    UsedPlots,
}

impl Zone {
    /// Returns true if objects in this zone are public (visible to both players).
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Zone::PlayArea | Zone::Discard | Zone::DeadPile | Zone::ActivePlot | Zone::UsedPlots
        )
    }

    /// Returns true if objects in this zone are hidden from the opponent.
    pub fn is_hidden(&self) -> bool {
        !self.is_public()
    }

    /// Returns true if cards in this zone are ordered (order matters).
    pub fn is_ordered(&self) -> bool {
        matches!(self, Zone::DrawDeck | Zone::Discard | Zone::DeadPile)
    }

    /// Zones whose cards keep their event listeners registered.
    pub fn keeps_listeners(&self) -> bool {
        matches!(self, Zone::PlayArea | Zone::ActivePlot)
    }

    /// Zones a player may move cards between by hand with `drop`.
    pub fn is_droppable(&self) -> bool {
        matches!(
            self,
            Zone::DrawDeck | Zone::Hand | Zone::PlayArea | Zone::Discard | Zone::DeadPile
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Zone::DrawDeck => "draw deck",
            Zone::Hand => "hand",
            Zone::PlayArea => "play area",
            Zone::Discard => "discard pile",
            Zone::DeadPile => "dead pile",
            Zone::PlotDeck => "plot deck",
            Zone::ActivePlot => "active plot",
            Zone::UsedPlots => "used pile",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a zone name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseZoneError(pub String);

impl fmt::Display for ParseZoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown zone '{}'", self.0)
    }
}

impl std::error::Error for ParseZoneError {}

impl FromStr for Zone {
    type Err = ParseZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "drawdeck" | "deck" => Ok(Zone::DrawDeck),
            "hand" => Ok(Zone::Hand),
            "playarea" | "play" => Ok(Zone::PlayArea),
            "discard" | "discardpile" => Ok(Zone::Discard),
            "dead" | "deadpile" => Ok(Zone::DeadPile),
            "plot" | "plots" | "plotdeck" => Ok(Zone::PlotDeck),
            "activeplot" => Ok(Zone::ActivePlot),
            "used" | "usedpile" | "usedplots" => Ok(Zone::UsedPlots),
            _ => Err(ParseZoneError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_visibility() {
        assert!(Zone::PlayArea.is_public());
        assert!(Zone::Discard.is_public());
        assert!(Zone::DeadPile.is_public());
        assert!(Zone::ActivePlot.is_public());

        assert!(Zone::Hand.is_hidden());
        assert!(Zone::DrawDeck.is_hidden());
        assert!(Zone::PlotDeck.is_hidden());
    }

    #[test]
    fn test_zone_parse_accepts_client_spellings() {
        assert_eq!("play area".parse::<Zone>(), Ok(Zone::PlayArea));
        assert_eq!("discard pile".parse::<Zone>(), Ok(Zone::Discard));
        assert_eq!("dead-pile".parse::<Zone>(), Ok(Zone::DeadPile));
        assert_eq!("Hand".parse::<Zone>(), Ok(Zone::Hand));
        assert!("graveyard".parse::<Zone>().is_err());
    }

    #[test]
    fn test_listener_zones() {
        assert!(Zone::PlayArea.keeps_listeners());
        assert!(Zone::ActivePlot.keeps_listeners());
        assert!(!Zone::Discard.keeps_listeners());
    }
}
