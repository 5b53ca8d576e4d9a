use crate::ability::Ability;
use crate::events::ListenerDefinition;
use crate::types::{CardType, ChallengeType, Keyword};

/// Plot card statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlotStats {
    pub initiative: u32,
    pub claim: u32,
    pub reserve: u32,
    pub income: u32,
}

/// Challenge icons printed on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChallengeIcons {
    pub military: bool,
    pub intrigue: bool,
    pub power: bool,
}

impl ChallengeIcons {
    pub const ALL: ChallengeIcons = ChallengeIcons {
        military: true,
        intrigue: true,
        power: true,
    };

    pub fn has(&self, challenge_type: ChallengeType) -> bool {
        match challenge_type {
            ChallengeType::Military => self.military,
            ChallengeType::Intrigue => self.intrigue,
            ChallengeType::Power => self.power,
        }
    }
}

/// Immutable printed card data shared by every instance of the card.
#[derive(Debug, Clone)]
pub struct CardDefinition {
    pub code: String,
    pub label: String,
    pub card_type: CardType,
    /// Faction (house) tags.
    pub factions: Vec<String>,
    pub traits: Vec<String>,
    /// Printed rules text; keywords are read from it.
    pub text: String,
    pub cost: u32,
    pub strength: u32,
    pub icons: ChallengeIcons,
    /// Present for plot cards only.
    pub plot: Option<PlotStats>,
    pub abilities: Vec<Ability>,
    pub listeners: Vec<ListenerDefinition>,
}

impl CardDefinition {
    pub fn builder(
        code: impl Into<String>,
        label: impl Into<String>,
        card_type: CardType,
    ) -> CardBuilder {
        CardBuilder::new(code, label, card_type)
    }

    /// A keyword is printed as its name followed by a period ("Insight.").
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.text.contains(&format!("{}.", keyword.label()))
    }

    pub fn has_faction(&self, faction: &str) -> bool {
        self.factions.iter().any(|f| f.eq_ignore_ascii_case(faction))
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    pub fn is_character(&self) -> bool {
        self.card_type == CardType::Character
    }

    pub fn is_plot(&self) -> bool {
        self.card_type == CardType::Plot
    }

    pub fn initiative(&self) -> u32 {
        self.plot.map_or(0, |p| p.initiative)
    }

    pub fn claim(&self) -> u32 {
        self.plot.map_or(0, |p| p.claim)
    }

    pub fn reserve(&self) -> u32 {
        self.plot.map_or(0, |p| p.reserve)
    }

    pub fn income(&self) -> u32 {
        self.plot.map_or(0, |p| p.income)
    }
}

#[derive(Debug, Clone)]
pub struct CardBuilder {
    definition: CardDefinition,
}

impl CardBuilder {
    pub fn new(code: impl Into<String>, label: impl Into<String>, card_type: CardType) -> Self {
        Self {
            definition: CardDefinition {
                code: code.into(),
                label: label.into(),
                card_type,
                factions: Vec::new(),
                traits: Vec::new(),
                text: String::new(),
                cost: 0,
                strength: 0,
                icons: ChallengeIcons::default(),
                plot: None,
                abilities: Vec::new(),
                listeners: Vec::new(),
            },
        }
    }

    pub fn faction(mut self, faction: impl Into<String>) -> Self {
        self.definition.factions.push(faction.into());
        self
    }

    pub fn traits(mut self, traits: &[&str]) -> Self {
        self.definition
            .traits
            .extend(traits.iter().map(|t| t.to_string()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.definition.text = text.into();
        self
    }

    pub fn cost(mut self, cost: u32) -> Self {
        self.definition.cost = cost;
        self
    }

    pub fn strength(mut self, strength: u32) -> Self {
        self.definition.strength = strength;
        self
    }

    pub fn icons(mut self, military: bool, intrigue: bool, power: bool) -> Self {
        self.definition.icons = ChallengeIcons {
            military,
            intrigue,
            power,
        };
        self
    }

    pub fn plot_stats(mut self, initiative: u32, claim: u32, reserve: u32, income: u32) -> Self {
        self.definition.plot = Some(PlotStats {
            initiative,
            claim,
            reserve,
            income,
        });
        self
    }

    pub fn ability(mut self, ability: Ability) -> Self {
        self.definition.abilities.push(ability);
        self
    }

    pub fn listener(mut self, listener: ListenerDefinition) -> Self {
        self.definition.listeners.push(listener);
        self
    }

    pub fn build(self) -> CardDefinition {
        self.definition
    }
}
