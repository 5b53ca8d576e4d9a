//! Card registry and the demonstration card set.
//!
//! Cards are defined programmatically with [`CardDefinition::builder`]; each
//! card lives in its own file under `definitions/`.

pub mod definitions;

pub use definitions::*;

use std::collections::HashMap;
use std::sync::Arc;

use crate::card::CardDefinition;
use crate::types::CardType;

/// Registry of card definitions, indexed by card code.
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: HashMap<String, Arc<CardDefinition>>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self {
            cards: HashMap::new(),
        }
    }

    /// A registry holding every demonstration card.
    pub fn with_demo_cards() -> Self {
        let mut registry = Self::new();

        // Characters
        registry.register(steadfast_squire());
        registry.register(grey_maester());
        registry.register(salt_raider());
        registry.register(tourney_champion());
        registry.register(shadow_infiltrator());
        registry.register(whispering_spymaster());
        registry.register(eager_recruit());
        registry.register(ravenkeeper());

        // Locations, attachments and events
        registry.register(harbor_keep());
        registry.register(tourney_blade());
        registry.register(sudden_ambush());

        // Plots
        registry.register(a_feast_for_crows());
        registry.register(tide_of_war());
        registry.register(heavy_levy());
        registry.register(marching_orders());
        registry.register(council_of_war());
        registry.register(summer_harvest());

        registry
    }

    /// Registers a definition, replacing any previous one with the same code.
    pub fn register(&mut self, definition: CardDefinition) {
        self.cards
            .insert(definition.code.clone(), Arc::new(definition));
    }

    pub fn get(&self, code: &str) -> Option<Arc<CardDefinition>> {
        self.cards.get(code).cloned()
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn characters(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.values().filter(|c| c.is_character())
    }

    pub fn plots(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.values().filter(|c| c.card_type == CardType::Plot)
    }
}
