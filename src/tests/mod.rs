//! In-crate test support.
//!
//! `fixtures` builds bare games and places demonstration cards directly in
//! zones; `integration_tests` drives whole rounds through the command
//! surface.

pub(crate) mod fixtures {
    use crate::cards::CardRegistry;
    use crate::config::GameConfig;
    use crate::game_state::{Game, Seat};
    use crate::ids::{ObjectId, PlayerId};
    use crate::zone::Zone;

    pub const ALICE: PlayerId = PlayerId(0);
    pub const BOB: PlayerId = PlayerId(1);

    /// Two players with empty decks, seeded.
    pub fn empty_game() -> Game {
        let seats = vec![Seat::new("Alice", Vec::new()), Seat::new("Bob", Vec::new())];
        Game::new(
            "test",
            "Test Game",
            seats,
            GameConfig::seeded(7),
            &CardRegistry::with_demo_cards(),
        )
        .expect("two seats with no cards")
    }

    /// Creates a demonstration card directly in `zone`.
    pub fn put_in(game: &mut Game, player: PlayerId, code: &str, zone: Zone) -> ObjectId {
        let definition = CardRegistry::with_demo_cards()
            .get(code)
            .unwrap_or_else(|| panic!("unknown demo card {code}"));
        game.create_card(definition, player, zone)
    }

    pub fn put_in_play(game: &mut Game, player: PlayerId, code: &str) -> ObjectId {
        put_in(game, player, code, Zone::PlayArea)
    }

    pub fn put_in_hand(game: &mut Game, player: PlayerId, code: &str) -> ObjectId {
        put_in(game, player, code, Zone::Hand)
    }

    /// Puts a card on top of the draw deck.
    pub fn put_in_deck(game: &mut Game, player: PlayerId, code: &str) -> ObjectId {
        put_in(game, player, code, Zone::DrawDeck)
    }

    /// Makes `code` the player's active plot.
    pub fn put_plot(game: &mut Game, player: PlayerId, code: &str) -> ObjectId {
        put_in(game, player, code, Zone::ActivePlot)
    }
}

mod integration_tests;
