//! Integration test framework for playing whole rounds.
//!
//! [`ScriptedGame`] deals two demonstration decks with a fixed seed and
//! drives the engine through the same command surface a client uses. Cards
//! are looked up by code, so scripts read like a play-by-play:
//!
//! ```ignore
//! let mut s = ScriptedGame::new(&["steadfast-squire", "tide-of-war"], &["grey-maester", "a-feast-for-crows"]);
//! s.setup(ALICE, &["steadfast-squire"]).setup(BOB, &["grey-maester"]);
//! s.choose_plots("tide-of-war", "a-feast-for-crows");
//! ```

#![allow(dead_code)]

use crate::cards::CardRegistry;
use crate::cards::definitions::COUNCIL_DRAW;
use crate::challenge::ChallengeStep;
use crate::commands::{Command, CommandError, execute};
use crate::config::GameConfig;
use crate::game_state::{Game, Seat};
use crate::ids::{ObjectId, PlayerId};
use crate::player::Phase;
use crate::tests::fixtures::{ALICE, BOB};
use crate::turn;
use crate::types::{ChallengeType, FirstPlayerChoice};
use crate::zone::Zone;

pub struct ScriptedGame {
    pub game: Game,
}

impl ScriptedGame {
    /// Deals both decks (seeded) and leaves the players at keep/mulligan.
    pub fn new(alice: &[&str], bob: &[&str]) -> Self {
        let deck = |codes: &[&str]| codes.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        let seats = vec![Seat::new("Alice", deck(alice)), Seat::new("Bob", deck(bob))];
        let mut game = Game::new(
            "script",
            "Scripted Game",
            seats,
            GameConfig::seeded(11),
            &CardRegistry::with_demo_cards(),
        )
        .expect("scripted decks use demo cards");
        turn::initialise(&mut game);
        Self { game }
    }

    pub fn find(&self, player: PlayerId, code: &str, zone: Zone) -> Option<ObjectId> {
        self.game
            .player(player)?
            .cards_in(zone)
            .into_iter()
            .find(|id| self.game.object(*id).is_some_and(|c| c.code() == code))
    }

    pub fn card(&self, player: PlayerId, code: &str, zone: Zone) -> ObjectId {
        self.find(player, code, zone)
            .unwrap_or_else(|| panic!("{player} has no {code} in their {}", zone.label()))
    }

    /// Returns a copy of `code` from hand, fetching it from the deck if the
    /// shuffle left it there.
    pub fn in_hand(&mut self, player: PlayerId, code: &str) -> ObjectId {
        if let Some(id) = self.find(player, code, Zone::Hand) {
            return id;
        }
        let id = self.card(player, code, Zone::DrawDeck);
        self.game.move_card(id, Zone::Hand);
        id
    }

    pub fn run(&mut self, player: PlayerId, command: Command) -> &mut Self {
        let name = command.name();
        if let Err(e) = execute(&mut self.game, player, command) {
            panic!("{name} from {player} rejected: {e}");
        }
        self
    }

    pub fn reject(&mut self, player: PlayerId, command: Command) -> CommandError {
        let name = command.name();
        match execute(&mut self.game, player, command) {
            Ok(()) => panic!("{name} from {player} should have been rejected"),
            Err(e) => e,
        }
    }

    pub fn click(&mut self, player: PlayerId, card: ObjectId) -> &mut Self {
        self.run(player, Command::CardClicked { card })
    }

    /// Keeps, places `codes` from hand and finishes setup.
    pub fn setup(&mut self, player: PlayerId, codes: &[&str]) -> &mut Self {
        self.run(player, Command::Keep);
        for code in codes {
            let card = self.in_hand(player, code);
            self.run(
                player,
                Command::Drop {
                    card,
                    source: Zone::Hand,
                    target: Zone::PlayArea,
                },
            );
        }
        self.run(player, Command::SetupDone)
    }

    pub fn choose_plots(&mut self, alice: &str, bob: &str) -> &mut Self {
        let plot = self.card(ALICE, alice, Zone::PlotDeck);
        self.run(ALICE, Command::SelectPlot { plot });
        let plot = self.card(BOB, bob, Zone::PlotDeck);
        self.run(BOB, Command::SelectPlot { plot })
    }

    pub fn first_player(&mut self, chooser: PlayerId, choice: FirstPlayerChoice) -> &mut Self {
        self.run(chooser, Command::SetFirstPlayer { choice })
    }

    pub fn phase(&self, player: PlayerId) -> Phase {
        self.game.player(player).map_or(Phase::GameOver, |p| p.phase)
    }

    pub fn hand_size(&self, player: PlayerId) -> usize {
        self.game.player(player).map_or(0, |p| p.hand.len())
    }
}

fn squires(n: usize) -> Vec<&'static str> {
    vec!["steadfast-squire"; n]
}

// =============================================================================
// Setup
// =============================================================================

#[test]
fn test_setup_to_plot_selection() {
    let mut s = ScriptedGame::new(
        &["steadfast-squire", "grey-maester", "tide-of-war"],
        &["salt-raider", "a-feast-for-crows"],
    );
    assert_eq!(s.hand_size(ALICE), 2);
    assert_eq!(s.game.player(ALICE).unwrap().plot_deck.len(), 1);

    s.setup(ALICE, &["steadfast-squire"]);
    assert_eq!(
        s.game.player(ALICE).unwrap().menu_title,
        "Waiting for opponent to finish setup"
    );
    assert_eq!(s.phase(ALICE), Phase::Setup);

    s.setup(BOB, &["salt-raider"]);
    assert_eq!(s.game.round, 1);
    assert!(s.game.players.iter().all(|p| p.phase == Phase::PlotSelection));
    assert!(s.game.players.iter().all(|p| p.gold == 0));
    assert!(s.game.has_message("Alice has finished setup"));
}

#[test]
fn test_setup_gold_limits_placement() {
    let mut s = ScriptedGame::new(
        &["tourney-champion", "whispering-spymaster", "tide-of-war"],
        &["a-feast-for-crows"],
    );
    s.run(ALICE, Command::Keep);
    let champion = s.in_hand(ALICE, "tourney-champion");
    let spymaster = s.in_hand(ALICE, "whispering-spymaster");
    s.run(
        ALICE,
        Command::Drop {
            card: champion,
            source: Zone::Hand,
            target: Zone::PlayArea,
        },
    );
    let err = s.reject(
        ALICE,
        Command::Drop {
            card: spymaster,
            source: Zone::Hand,
            target: Zone::PlayArea,
        },
    );
    assert_eq!(
        err,
        CommandError::NotEnoughGold {
            needed: 5,
            available: 4
        }
    );
}

#[test]
fn test_mulligan_once_then_keep() {
    let mut deck = squires(10);
    deck.push("tide-of-war");
    let mut s = ScriptedGame::new(&deck, &["a-feast-for-crows"]);

    s.run(ALICE, Command::Mulligan);
    assert_eq!(s.hand_size(ALICE), 7);
    assert!(s.game.has_message("Alice has taken a mulligan"));
    s.reject(ALICE, Command::Mulligan);
    s.run(ALICE, Command::Keep);
    assert!(s.game.has_message("Alice has kept their hand"));
    assert_eq!(s.game.player(ALICE).unwrap().gold, 8);
}

#[test]
fn test_setup_attachment_placement() {
    let mut s = ScriptedGame::new(
        &["steadfast-squire", "tourney-blade", "tide-of-war"],
        &["a-feast-for-crows"],
    );
    s.setup(ALICE, &["steadfast-squire", "tourney-blade"]);
    s.setup(BOB, &[]);

    // Alice has an unplaced attachment, Bob waits.
    assert!(s.game.player(ALICE).unwrap().waiting_for_attachments);
    assert_eq!(
        s.game.player(ALICE).unwrap().menu_title,
        "Select attachment locations"
    );
    assert_eq!(s.phase(BOB), Phase::Setup);

    let blade = s.card(ALICE, "tourney-blade", Zone::PlayArea);
    let squire = s.card(ALICE, "steadfast-squire", Zone::PlayArea);
    s.click(ALICE, blade).click(ALICE, squire);

    assert_eq!(s.game.object(blade).unwrap().attached_to, Some(squire));
    assert!(s.game.players.iter().all(|p| p.phase == Phase::PlotSelection));
}

#[test]
fn test_attachments_done_returns_unplaced_to_hand() {
    let mut s = ScriptedGame::new(&["tourney-blade", "tide-of-war"], &["a-feast-for-crows"]);
    s.setup(ALICE, &["tourney-blade"]);
    s.setup(BOB, &[]);
    s.run(ALICE, Command::AttachmentsDone);

    assert!(s.find(ALICE, "tourney-blade", Zone::Hand).is_some());
    assert_eq!(s.phase(ALICE), Phase::PlotSelection);
}

// =============================================================================
// Plot reveal
// =============================================================================

#[test]
fn test_plot_reveal_pauses_for_listener() {
    let mut deck = squires(10);
    deck.push("council-of-war");
    let mut s = ScriptedGame::new(&deck, &["steadfast-squire", "a-feast-for-crows"]);
    s.setup(ALICE, &[]).setup(BOB, &[]);
    s.choose_plots("council-of-war", "a-feast-for-crows");
    s.first_player(BOB, FirstPlayerChoice::Me);

    assert_eq!(s.game.paused_reveal, Some(ALICE));
    assert_eq!(
        s.reject(BOB, Command::MarshalDone),
        CommandError::WrongPhase(Phase::PlotReveal)
    );

    let before = s.hand_size(ALICE);
    s.run(
        ALICE,
        Command::CustomCommand {
            arg: COUNCIL_DRAW.to_string(),
        },
    );
    assert_eq!(s.hand_size(ALICE), before + 1);
    assert!(s.game.has_message("Alice uses Council of War to draw 1 card"));
    assert_eq!(s.game.paused_reveal, None);
    assert_eq!(s.phase(BOB), Phase::Marshal);
    assert_eq!(s.game.active_player, Some(BOB));
}

#[test]
fn test_begin_marshal_resumes_declined_reveal() {
    let mut deck = squires(10);
    deck.push("council-of-war");
    let mut s = ScriptedGame::new(&deck, &["a-feast-for-crows"]);
    s.setup(ALICE, &[]).setup(BOB, &[]);
    s.choose_plots("council-of-war", "a-feast-for-crows");
    s.first_player(BOB, FirstPlayerChoice::Opponent);

    // Alice reveals first and pauses before Bob's plot is revealed.
    assert_eq!(s.game.paused_reveal, Some(ALICE));
    assert!(!s.game.player(BOB).unwrap().plot_revealed);

    let before = s.hand_size(ALICE);
    s.run(ALICE, Command::BeginMarshal);
    assert_eq!(s.hand_size(ALICE), before);
    assert!(s.game.player(BOB).unwrap().plot_revealed);
    assert_eq!(s.phase(ALICE), Phase::Marshal);
    s.reject(ALICE, Command::BeginMarshal);
}

#[test]
fn test_only_revealing_player_resumes_paused_reveal() {
    let mut deck = squires(10);
    deck.push("council-of-war");
    let mut s = ScriptedGame::new(&deck, &["a-feast-for-crows"]);
    s.setup(ALICE, &[]).setup(BOB, &[]);
    s.choose_plots("council-of-war", "a-feast-for-crows");
    s.first_player(BOB, FirstPlayerChoice::Opponent);
    assert_eq!(s.game.paused_reveal, Some(ALICE));

    assert_eq!(
        s.reject(BOB, Command::BeginMarshal),
        CommandError::NotActivePlayer(BOB)
    );
    assert_eq!(s.game.paused_reveal, Some(ALICE));
    assert!(!s.game.player(BOB).unwrap().plot_revealed);
    assert_eq!(s.phase(ALICE), Phase::PlotReveal);
    assert_eq!(
        s.game.player(ALICE).unwrap().menu_title,
        "Council of War: draw 1 card?"
    );

    let before = s.hand_size(ALICE);
    s.run(
        ALICE,
        Command::CustomCommand {
            arg: COUNCIL_DRAW.to_string(),
        },
    );
    assert_eq!(s.hand_size(ALICE), before + 1);
    assert!(s.game.player(BOB).unwrap().plot_revealed);
}

#[test]
fn test_reveal_waits_for_target_selection() {
    let mut s = ScriptedGame::new(
        &["steadfast-squire", "marching-orders"],
        &["steadfast-squire", "grey-maester", "a-feast-for-crows"],
    );
    s.setup(ALICE, &["steadfast-squire"])
        .setup(BOB, &["steadfast-squire", "grey-maester"]);
    s.choose_plots("marching-orders", "a-feast-for-crows");
    s.first_player(ALICE, FirstPlayerChoice::Me);

    let pending = s.game.pending.as_ref().expect("reveal ability waits on Alice");
    assert_eq!(pending.player, ALICE);
    assert_eq!(pending.candidates.len(), 3);
    assert_eq!(
        s.reject(BOB, Command::MarshalDone),
        CommandError::SelectionPending
    );
    assert!(!s.game.player(BOB).unwrap().plot_revealed);

    let maester = s.card(BOB, "grey-maester", Zone::PlayArea);
    s.click(ALICE, maester).run(ALICE, Command::DoneTargets);

    assert!(s.game.object(maester).unwrap().kneeled);
    assert!(s.game.player(BOB).unwrap().plot_revealed);
    assert_eq!(s.phase(ALICE), Phase::Marshal);
    assert_eq!(s.game.player(ALICE).unwrap().menu_title, "Marshal your cards");
}

// =============================================================================
// Marshal
// =============================================================================

#[test]
fn test_marshal_attachment_event_and_when_played() {
    let mut deck = vec![
        "steadfast-squire",
        "tourney-blade",
        "eager-recruit",
        "sudden-ambush",
        "heavy-levy",
    ];
    deck.extend(squires(10));
    let mut s = ScriptedGame::new(&deck, &["salt-raider", "a-feast-for-crows"]);
    s.setup(ALICE, &["steadfast-squire"]).setup(BOB, &["salt-raider"]);
    s.choose_plots("heavy-levy", "a-feast-for-crows");
    s.first_player(BOB, FirstPlayerChoice::Opponent);
    assert_eq!(s.phase(ALICE), Phase::Marshal);
    assert_eq!(s.game.player(ALICE).unwrap().gold, 6);

    let squire = s.card(ALICE, "steadfast-squire", Zone::PlayArea);
    let blade = s.in_hand(ALICE, "tourney-blade");
    let recruit = s.in_hand(ALICE, "eager-recruit");
    let ambush = s.in_hand(ALICE, "sudden-ambush");

    s.run(
        ALICE,
        Command::Drop {
            card: blade,
            source: Zone::Hand,
            target: Zone::PlayArea,
        },
    );
    assert_eq!(
        s.game.player(ALICE).unwrap().menu_title,
        "Select target for attachment"
    );
    s.click(ALICE, squire);
    assert_eq!(s.game.object(blade).unwrap().attached_to, Some(squire));
    assert!(s.game.has_message("Alice has marshalled Tourney Blade for 1 gold"));

    let before = s.hand_size(ALICE);
    s.run(
        ALICE,
        Command::Drop {
            card: recruit,
            source: Zone::Hand,
            target: Zone::PlayArea,
        },
    );
    assert_eq!(s.hand_size(ALICE), before);

    let raider = s.card(BOB, "salt-raider", Zone::PlayArea);
    s.game.object_mut(raider).unwrap().kneeled = true;
    s.run(
        ALICE,
        Command::Drop {
            card: ambush,
            source: Zone::Hand,
            target: Zone::PlayArea,
        },
    );
    assert_eq!(s.game.object(ambush).unwrap().zone, Zone::Discard);
    assert_eq!(s.game.object(raider).unwrap().zone, Zone::DeadPile);
    assert_eq!(s.game.player(ALICE).unwrap().gold, 1);

    let another = s.in_hand(ALICE, "steadfast-squire");
    let err = s.reject(
        ALICE,
        Command::Drop {
            card: another,
            source: Zone::Hand,
            target: Zone::PlayArea,
        },
    );
    assert_eq!(
        err,
        CommandError::NotEnoughGold {
            needed: 2,
            available: 1
        }
    );
    s.reject(BOB, Command::MarshalDone);
}

// =============================================================================
// Challenges
// =============================================================================

/// Alice: stealth infiltrator and a squire. Bob: maester and squire, with
/// two cards left in hand. Alice is first player and both have marshalled.
fn stealth_game() -> (ScriptedGame, ObjectId, ObjectId) {
    let mut s = ScriptedGame::new(
        &["shadow-infiltrator", "steadfast-squire", "tide-of-war"],
        &[
            "grey-maester",
            "steadfast-squire",
            "salt-raider",
            "eager-recruit",
            "a-feast-for-crows",
        ],
    );
    s.setup(ALICE, &["shadow-infiltrator", "steadfast-squire"])
        .setup(BOB, &["grey-maester", "steadfast-squire"]);
    s.choose_plots("tide-of-war", "a-feast-for-crows");
    s.first_player(ALICE, FirstPlayerChoice::Me);
    s.run(ALICE, Command::MarshalDone).run(BOB, Command::MarshalDone);

    let infiltrator = s.card(ALICE, "shadow-infiltrator", Zone::PlayArea);
    let maester = s.card(BOB, "grey-maester", Zone::PlayArea);
    (s, infiltrator, maester)
}

#[test]
fn test_marshal_done_returns_unplaced_attachment() {
    let mut deck = vec!["steadfast-squire", "tourney-blade", "heavy-levy"];
    deck.extend(squires(10));
    let mut s = ScriptedGame::new(&deck, &["salt-raider", "a-feast-for-crows"]);
    s.setup(ALICE, &["steadfast-squire"]).setup(BOB, &["salt-raider"]);
    s.choose_plots("heavy-levy", "a-feast-for-crows");
    s.first_player(BOB, FirstPlayerChoice::Opponent);
    assert_eq!(s.game.player(ALICE).unwrap().gold, 6);

    let blade = s.in_hand(ALICE, "tourney-blade");
    s.run(
        ALICE,
        Command::Drop {
            card: blade,
            source: Zone::Hand,
            target: Zone::PlayArea,
        },
    );
    assert_eq!(s.game.player(ALICE).unwrap().gold, 5);
    assert_eq!(s.game.player(ALICE).unwrap().selected_attachment, Some(blade));

    s.run(ALICE, Command::MarshalDone);
    let card = s.game.object(blade).unwrap();
    assert_eq!(card.zone, Zone::Hand);
    assert_eq!(card.attached_to, None);
    assert_eq!(s.game.player(ALICE).unwrap().gold, 6);
    assert_eq!(s.game.player(ALICE).unwrap().selected_attachment, None);
    assert!(s.game.has_message("Alice returns Tourney Blade to their hand"));
    assert_eq!(s.phase(BOB), Phase::Marshal);
}

#[test]
fn test_stealth_target_cannot_defend() {
    let (mut s, infiltrator, maester) = stealth_game();
    assert_eq!(s.game.active_player, Some(ALICE));

    s.run(
        ALICE,
        Command::StartChallenge {
            challenge_type: ChallengeType::Intrigue,
        },
    );
    s.click(ALICE, infiltrator).run(ALICE, Command::DoneChallenge);
    assert_eq!(
        s.game.challenge.as_ref().unwrap().step,
        ChallengeStep::ChoosingStealth(infiltrator)
    );
    assert_eq!(
        s.game.player(ALICE).unwrap().menu_title,
        "Select stealth target for Shadow Infiltrator"
    );

    // The squire has no intrigue icon, so it cannot join.
    let own_squire = s.card(ALICE, "steadfast-squire", Zone::PlayArea);
    s.reject(ALICE, Command::CardClicked { card: own_squire });
    assert!(!s.game.object(own_squire).unwrap().selected);
    // Clicking an attacker again leaves it in.
    s.click(ALICE, infiltrator);
    assert!(s.game.challenge.as_ref().unwrap().is_participating(infiltrator));

    s.click(ALICE, maester);
    assert!(s.game.object(maester).unwrap().stealth_target);
    assert!(s.game.has_message("Alice has chosen Grey Maester as a stealth target"));
    assert!(s
        .game
        .has_message("Alice has initiated a intrigue challenge with strength 2"));

    s.reject(BOB, Command::CardClicked { card: maester });
    s.run(BOB, Command::DoneDefend);

    let alice = s.game.player(ALICE).unwrap();
    assert_eq!(alice.power, 1);
    assert_eq!(alice.challenges.get(ChallengeType::Intrigue).performed, 1);
    assert!(s.game.has_message("Alice won a intrigue challenge 2 vs 0"));
    assert!(s.game.has_message("Bob discards 1 card(s) at random from intrigue claim"));
    assert_eq!(s.hand_size(BOB), 1);

    // The intrigue button is gone, the others remain.
    let buttons: Vec<_> = alice.buttons.iter().filter_map(|b| b.arg.clone()).collect();
    assert_eq!(buttons, vec!["military".to_string(), "power".to_string()]);
}

#[test]
fn test_own_character_joins_while_choosing_stealth_target() {
    let mut s = ScriptedGame::new(
        &["shadow-infiltrator", "ravenkeeper", "tide-of-war"],
        &["grey-maester", "salt-raider", "eager-recruit", "a-feast-for-crows"],
    );
    s.setup(ALICE, &["shadow-infiltrator", "ravenkeeper"])
        .setup(BOB, &["grey-maester"]);
    s.choose_plots("tide-of-war", "a-feast-for-crows");
    s.first_player(ALICE, FirstPlayerChoice::Me);
    s.run(ALICE, Command::MarshalDone).run(BOB, Command::MarshalDone);

    let infiltrator = s.card(ALICE, "shadow-infiltrator", Zone::PlayArea);
    let ravenkeeper = s.card(ALICE, "ravenkeeper", Zone::PlayArea);
    let maester = s.card(BOB, "grey-maester", Zone::PlayArea);

    s.run(
        ALICE,
        Command::StartChallenge {
            challenge_type: ChallengeType::Intrigue,
        },
    );
    s.click(ALICE, infiltrator).run(ALICE, Command::DoneChallenge);
    assert_eq!(s.game.player(ALICE).unwrap().challenge_strength, 2);

    s.click(ALICE, ravenkeeper);
    let joined = s.game.object(ravenkeeper).unwrap();
    assert!(joined.kneeled);
    assert!(joined.selected);
    assert_eq!(s.game.player(ALICE).unwrap().challenge_strength, 3);
    assert_eq!(
        s.game.challenge.as_ref().unwrap().step,
        ChallengeStep::ChoosingStealth(infiltrator)
    );

    s.click(ALICE, maester);
    assert!(s
        .game
        .has_message("Alice has initiated a intrigue challenge with strength 3"));
    assert_eq!(
        s.game.challenge.as_ref().unwrap().attackers,
        vec![infiltrator, ravenkeeper]
    );
}

#[test]
fn test_done_stealth_skips_target() {
    let (mut s, infiltrator, maester) = stealth_game();
    s.run(
        ALICE,
        Command::StartChallenge {
            challenge_type: ChallengeType::Intrigue,
        },
    );
    s.click(ALICE, infiltrator)
        .run(ALICE, Command::DoneChallenge)
        .run(ALICE, Command::DoneStealth);

    assert_eq!(
        s.game.challenge.as_ref().unwrap().step,
        ChallengeStep::AwaitingDefenders
    );
    s.click(BOB, maester).run(BOB, Command::DoneDefend);

    // 2 vs 2 goes to the challenger without the unopposed bonus.
    assert_eq!(s.game.player(ALICE).unwrap().power, 0);
    assert!(s.game.has_message("Alice won a intrigue challenge 2 vs 2"));
    // Insight is on the losing side and does nothing.
    assert!(!s.game.has_message("from Insight"));
}

#[test]
fn test_empty_declaration_costs_nothing() {
    let (mut s, _, _) = stealth_game();
    s.run(
        ALICE,
        Command::StartChallenge {
            challenge_type: ChallengeType::Power,
        },
    );
    s.run(ALICE, Command::DoneChallenge);

    let alice = s.game.player(ALICE).unwrap();
    assert_eq!(alice.challenges.get(ChallengeType::Power).performed, 0);
    assert_eq!(alice.challenges.complete, 0);
    assert!(s.game.challenge.is_none());
    assert_eq!(alice.menu_title, "Initiate a challenge");
}

#[test]
fn test_challenge_limit_per_type() {
    let (mut s, infiltrator, _) = stealth_game();
    s.run(
        ALICE,
        Command::StartChallenge {
            challenge_type: ChallengeType::Intrigue,
        },
    );
    s.click(ALICE, infiltrator)
        .run(ALICE, Command::DoneChallenge)
        .run(ALICE, Command::DoneStealth)
        .run(BOB, Command::DoneDefend);

    let err = s.reject(
        ALICE,
        Command::StartChallenge {
            challenge_type: ChallengeType::Intrigue,
        },
    );
    assert_eq!(err, CommandError::ChallengeLimit(ChallengeType::Intrigue));
}

/// Full round: military claim, Renown, a reaction, dominance, reserve and
/// the roll-over into round 2.
#[test]
fn test_full_round_with_military_claim() {
    let mut alice = vec!["tourney-champion", "ravenkeeper", "heavy-levy", "tide-of-war"];
    alice.extend(squires(12));
    let mut s = ScriptedGame::new(
        &alice,
        &[
            "steadfast-squire",
            "grey-maester",
            "a-feast-for-crows",
            "summer-harvest",
        ],
    );
    s.setup(ALICE, &["tourney-champion", "ravenkeeper"])
        .setup(BOB, &["steadfast-squire", "grey-maester"]);
    s.choose_plots("heavy-levy", "a-feast-for-crows");

    // Feast has the higher initiative; Bob hands the first turn to Alice.
    assert_eq!(s.phase(BOB), Phase::FirstPlayerSelection);
    s.first_player(BOB, FirstPlayerChoice::Opponent);
    s.run(ALICE, Command::MarshalDone).run(BOB, Command::MarshalDone);

    let champion = s.card(ALICE, "tourney-champion", Zone::PlayArea);
    let bob_squire = s.card(BOB, "steadfast-squire", Zone::PlayArea);
    let maester = s.card(BOB, "grey-maester", Zone::PlayArea);

    s.run(
        ALICE,
        Command::StartChallenge {
            challenge_type: ChallengeType::Military,
        },
    );
    s.click(ALICE, champion).run(ALICE, Command::DoneChallenge);
    s.click(BOB, bob_squire).run(BOB, Command::DoneDefend);

    assert!(s.game.has_message("Alice won a military challenge 4 vs 2"));
    assert_eq!(s.game.object(champion).unwrap().power, 1);
    assert_eq!(s.phase(BOB), Phase::Claim);
    assert_eq!(s.game.player(BOB).unwrap().claim_to_do, 2);
    assert!(matches!(
        s.reject(ALICE, Command::DoneChallenges),
        CommandError::Illegal(_)
    ));

    let hand_before_claim = s.hand_size(ALICE);
    s.click(BOB, bob_squire).click(BOB, maester);
    assert!(s.game.has_message("Bob kills Grey Maester for claim"));
    assert_eq!(s.game.player(BOB).unwrap().dead_pile.len(), 2);
    // Ravenkeeper reacts to the won challenge.
    assert_eq!(s.hand_size(ALICE), hand_before_claim + 1);
    assert_eq!(s.phase(BOB), Phase::Challenge);

    s.run(ALICE, Command::DoneChallenges);
    assert_eq!(s.game.active_player, Some(BOB));
    s.run(BOB, Command::DoneChallenges);

    // Alice: standing Ravenkeeper (1) + 6 gold; Bob: 5 gold.
    assert!(s.game.has_message("Alice wins dominance"));
    assert_eq!(s.game.total_power(ALICE), 2);
    assert!(!s.game.object(champion).unwrap().kneeled);
    assert!(s.game.players.iter().all(|p| p.gold == 0));
    assert_eq!(s.phase(ALICE), Phase::RoundEnd);

    let err = s.reject(ALICE, Command::DoneRound);
    assert!(matches!(err, CommandError::ReserveExceeded { reserve: 5, .. }));
    while s.hand_size(ALICE) > 5 {
        let card = s.game.player(ALICE).unwrap().hand[0];
        s.run(
            ALICE,
            Command::Drop {
                card,
                source: Zone::Hand,
                target: Zone::Discard,
            },
        );
    }
    assert!(s
        .game
        .has_message("Alice has moved a card from their hand to their discard pile"));
    s.run(ALICE, Command::DoneRound);
    assert_eq!(s.game.round, 1);
    s.run(BOB, Command::DoneRound);

    assert_eq!(s.game.round, 2);
    assert!(s.game.players.iter().all(|p| p.phase == Phase::PlotSelection));
    let alice = s.game.player(ALICE).unwrap();
    assert_eq!(alice.challenges.get(ChallengeType::Military).performed, 0);
    assert_eq!(s.game.object(champion).unwrap().power, 1);
    assert!(!s.game.events.has_source(alice.active_plot.unwrap()));
}
