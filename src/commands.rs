//! The command surface: every player action enters the engine here.
//!
//! [`execute`] validates and applies one command, returning a
//! [`CommandError`] when it is illegal. [`handle_command`] is the outer
//! surface: rejected commands are logged at `debug` and otherwise ignored,
//! and the caller always gets back the acting player's view.

use std::fmt;

use log::debug;

use crate::ability::{self, SelectionError};
use crate::challenge::ChallengeStep;
use crate::events::{GameEvent, fire_event};
use crate::game_state::Game;
use crate::ids::{ObjectId, PlayerId};
use crate::player::Phase;
use crate::rules;
use crate::snapshot::{GameView, view_for};
use crate::turn;
use crate::types::{ChallengeType, FirstPlayerChoice, Stat};
use crate::zone::Zone;

/// A player command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "command", rename_all = "snake_case")
)]
pub enum Command {
    Mulligan,
    Keep,
    SetupDone,
    AttachmentsDone,
    SelectPlot {
        plot: ObjectId,
    },
    SetFirstPlayer {
        choice: FirstPlayerChoice,
    },
    BeginMarshal,
    CardClicked {
        card: ObjectId,
    },
    Drop {
        card: ObjectId,
        source: Zone,
        target: Zone,
    },
    MarshalDone,
    StartChallenge {
        challenge_type: ChallengeType,
    },
    DoneChallenge,
    DoneStealth,
    DoneDefend,
    DoneChallenges,
    DoneRound,
    ChangeStat {
        stat: Stat,
        delta: i32,
    },
    CustomCommand {
        arg: String,
    },
    Chat {
        message: String,
    },
    PlayerDisconnect,
    ShowDrawDeck,
    UseAbility {
        card: ObjectId,
        index: usize,
    },
    ChooseTargets {
        cards: Vec<ObjectId>,
    },
    DoneTargets,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Mulligan => "mulligan",
            Command::Keep => "keep",
            Command::SetupDone => "setup_done",
            Command::AttachmentsDone => "attachments_done",
            Command::SelectPlot { .. } => "select_plot",
            Command::SetFirstPlayer { .. } => "set_first_player",
            Command::BeginMarshal => "begin_marshal",
            Command::CardClicked { .. } => "card_clicked",
            Command::Drop { .. } => "drop",
            Command::MarshalDone => "marshal_done",
            Command::StartChallenge { .. } => "start_challenge",
            Command::DoneChallenge => "done_challenge",
            Command::DoneStealth => "done_stealth",
            Command::DoneDefend => "done_defend",
            Command::DoneChallenges => "done_challenges",
            Command::DoneRound => "done_round",
            Command::ChangeStat { .. } => "change_stat",
            Command::CustomCommand { .. } => "custom_command",
            Command::Chat { .. } => "chat",
            Command::PlayerDisconnect => "player_disconnect",
            Command::ShowDrawDeck => "show_draw_deck",
            Command::UseAbility { .. } => "use_ability",
            Command::ChooseTargets { .. } => "choose_targets",
            Command::DoneTargets => "done_targets",
        }
    }

    /// Commands accepted after the game is over.
    fn allowed_after_game_over(&self) -> bool {
        matches!(self, Command::Chat { .. } | Command::PlayerDisconnect)
    }

    /// Commands anyone may send while a target selection is pending.
    fn allowed_during_selection(&self) -> bool {
        matches!(
            self,
            Command::Chat { .. } | Command::PlayerDisconnect | Command::ShowDrawDeck
        )
    }

    /// Commands the chooser sends to make a pending selection.
    fn is_selection(&self) -> bool {
        matches!(
            self,
            Command::CardClicked { .. } | Command::ChooseTargets { .. } | Command::DoneTargets
        )
    }
}

/// Why a command was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    PlayerNotFound(PlayerId),
    CardNotFound(ObjectId),
    NotYourCard(ObjectId),
    NotInPlay(ObjectId),
    NotInZone { card: ObjectId, zone: Zone },
    WrongPhase(Phase),
    NotActivePlayer(PlayerId),
    GameOver,
    /// Another interaction must finish first.
    SelectionPending,
    Selection(SelectionError),
    NoSuchAbility { card: ObjectId, index: usize },
    AbilityUsed { card: ObjectId, index: usize },
    Kneeling(ObjectId),
    NotEnoughGold { needed: u32, available: u32 },
    ChallengeLimit(ChallengeType),
    ReserveExceeded { hand: usize, reserve: usize },
    Illegal(&'static str),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::PlayerNotFound(id) => write!(f, "unknown player {}", id),
            CommandError::CardNotFound(id) => write!(f, "unknown card {}", id),
            CommandError::NotYourCard(id) => write!(f, "{} belongs to another player", id),
            CommandError::NotInPlay(id) => write!(f, "{} is not in play", id),
            CommandError::NotInZone { card, zone } => {
                write!(f, "{} is not in the {}", card, zone.label())
            }
            CommandError::WrongPhase(phase) => write!(f, "not allowed in the {} phase", phase),
            CommandError::NotActivePlayer(id) => write!(f, "{} is not the active player", id),
            CommandError::GameOver => write!(f, "the game is over"),
            CommandError::SelectionPending => write!(f, "a target selection is pending"),
            CommandError::Selection(e) => write!(f, "{}", e),
            CommandError::NoSuchAbility { card, index } => {
                write!(f, "{} has no action ability #{}", card, index)
            }
            CommandError::AbilityUsed { card, index } => {
                write!(f, "ability #{} on {} was already used this round", index, card)
            }
            CommandError::Kneeling(id) => write!(f, "{} is kneeling", id),
            CommandError::NotEnoughGold { needed, available } => {
                write!(f, "needs {} gold, has {}", needed, available)
            }
            CommandError::ChallengeLimit(challenge_type) => {
                write!(f, "no {} challenges remaining", challenge_type)
            }
            CommandError::ReserveExceeded { hand, reserve } => {
                write!(f, "hand of {} exceeds reserve {}", hand, reserve)
            }
            CommandError::Illegal(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Selection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SelectionError> for CommandError {
    fn from(e: SelectionError) -> Self {
        CommandError::Selection(e)
    }
}

/// Applies a command and returns the acting player's view. Illegal commands
/// change nothing.
pub fn handle_command(game: &mut Game, player: PlayerId, command: Command) -> GameView {
    let name = command.name();
    if let Err(e) = execute(game, player, command) {
        debug!("game {}: {} rejected {}: {}", game.id, player, name, e);
    }
    view_for(game, player)
}

/// Validates and applies one command.
pub fn execute(game: &mut Game, player: PlayerId, command: Command) -> Result<(), CommandError> {
    if game.player(player).is_none() {
        return Err(CommandError::PlayerNotFound(player));
    }
    if game.is_over() && !command.allowed_after_game_over() {
        return Err(CommandError::GameOver);
    }
    if let Some(pending) = &game.pending
        && !command.allowed_during_selection()
        && !(command.is_selection() && pending.player == player)
    {
        return Err(CommandError::SelectionPending);
    }

    match command {
        Command::Mulligan => turn::mulligan(game, player),
        Command::Keep => turn::keep(game, player),
        Command::SetupDone => turn::setup_done(game, player),
        Command::AttachmentsDone => turn::attachments_done(game, player),
        Command::SelectPlot { plot } => turn::select_plot(game, player, plot),
        Command::SetFirstPlayer { choice } => turn::set_first_player(game, player, choice),
        Command::BeginMarshal => turn::resume_reveal(game, player),
        Command::CardClicked { card } => card_clicked(game, player, card),
        Command::Drop {
            card,
            source,
            target,
        } => turn::drop_card(game, player, card, source, target),
        Command::MarshalDone => turn::marshal_done(game, player),
        Command::StartChallenge { challenge_type } => {
            turn::start_challenge(game, player, challenge_type)
        }
        Command::DoneChallenge => turn::done_challenge(game, player),
        Command::DoneStealth => turn::done_stealth(game, player),
        Command::DoneDefend => turn::done_defend(game, player),
        Command::DoneChallenges => turn::done_challenges(game, player),
        Command::DoneRound => turn::done_round(game, player),
        Command::ChangeStat { stat, delta } => turn::change_stat(game, player, stat, delta),
        Command::CustomCommand { arg } => {
            fire_event(game, GameEvent::CustomCommand { player, arg });
            Ok(())
        }
        Command::Chat { message } => {
            let name = game.player_name(player);
            game.add_message(format!("<{}> {}", name, message));
            Ok(())
        }
        Command::PlayerDisconnect => {
            if let Some(p) = game.player_mut(player) {
                p.disconnected = true;
            }
            game.add_message(format!("{} has disconnected", game.player_name(player)));
            Ok(())
        }
        Command::ShowDrawDeck => {
            let visible = game.player(player).is_some_and(|p| !p.deck_visible);
            if let Some(p) = game.player_mut(player) {
                p.deck_visible = visible;
            }
            if visible {
                game.add_message(format!(
                    "{} is looking at their deck",
                    game.player_name(player)
                ));
            }
            Ok(())
        }
        Command::UseAbility { card, index } => {
            ability::activate(game, player, card, index).map(|_| ())
        }
        Command::ChooseTargets { cards } => Ok(ability::choose_targets(game, player, cards)?),
        Command::DoneTargets => ability::finish_selection(game, player)
            .map(|_| ())
            .map_err(CommandError::from),
    }
}

/// Routes a card click to whatever interaction is waiting on it.
///
/// In order: a pending target selection, `card_clicked` listeners, setup
/// attachment placement, attaching a marshalled attachment, military claim,
/// then the challenge steps.
fn card_clicked(game: &mut Game, player: PlayerId, card: ObjectId) -> Result<(), CommandError> {
    if game.object(card).is_none() {
        return Err(CommandError::CardNotFound(card));
    }
    if game.pending.as_ref().is_some_and(|p| p.player == player) {
        ability::toggle_pending_target(game, player, card)?;
        return Ok(());
    }

    game.click_handled = false;
    fire_event(game, GameEvent::CardClicked { player, card });
    if game.click_handled {
        game.click_handled = false;
        return Ok(());
    }
    if game.is_over() {
        return Ok(());
    }

    let Some(p) = game.player(player) else {
        return Err(CommandError::PlayerNotFound(player));
    };
    let phase = p.phase;
    let attaching = p.selected_attachment.is_some();

    match phase {
        Phase::Setup if p.waiting_for_attachments => {
            if attaching {
                turn::attach_selected(game, player, card)
            } else {
                turn::select_attachment(game, player, card)
            }
        }
        Phase::Marshal if attaching => turn::attach_selected(game, player, card),
        Phase::Claim => rules::kill_for_claim(game, player, card),
        Phase::Challenge => challenge_click(game, player, card),
        other => Err(CommandError::WrongPhase(other)),
    }
}

fn challenge_click(game: &mut Game, player: PlayerId, card: ObjectId) -> Result<(), CommandError> {
    let step = game
        .challenge
        .as_ref()
        .map(|c| c.step)
        .ok_or(CommandError::Illegal("no challenge in progress"))?;
    let own = game.object(card).is_some_and(|c| c.controller == player);

    match step {
        ChallengeStep::ChoosingStealth(_) if own => turn::join_during_stealth(game, player, card),
        ChallengeStep::ChoosingStealth(_) => turn::choose_stealth_target(game, player, card),
        ChallengeStep::DeclaringAttackers | ChallengeStep::AwaitingDefenders => {
            turn::toggle_participant(game, player, card).map(|_| ())
        }
        ChallengeStep::Claim | ChallengeStep::Resolved => {
            Err(CommandError::Illegal("the challenge is being resolved"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{ALICE, BOB, empty_game};

    #[test]
    fn test_chat_and_disconnect_messages() {
        let mut game = empty_game();
        execute(&mut game, ALICE, Command::Chat { message: "hello".into() }).unwrap();
        assert_eq!(game.last_message(), Some("<Alice> hello"));
        execute(&mut game, BOB, Command::PlayerDisconnect).unwrap();
        assert_eq!(game.last_message(), Some("Bob has disconnected"));
        assert!(game.player(BOB).unwrap().disconnected);
    }

    #[test]
    fn test_unknown_player_rejected() {
        let mut game = empty_game();
        let err = execute(&mut game, PlayerId(7), Command::Keep).unwrap_err();
        assert_eq!(err, CommandError::PlayerNotFound(PlayerId(7)));
    }

    #[test]
    fn test_game_over_allows_only_chat_and_disconnect() {
        let mut game = empty_game();
        game.winner = Some(ALICE);
        assert_eq!(
            execute(&mut game, BOB, Command::ShowDrawDeck),
            Err(CommandError::GameOver)
        );
        assert!(execute(&mut game, BOB, Command::Chat { message: "gg".into() }).is_ok());
    }

    #[test]
    fn test_show_draw_deck_toggles() {
        let mut game = empty_game();
        execute(&mut game, ALICE, Command::ShowDrawDeck).unwrap();
        assert!(game.player(ALICE).unwrap().deck_visible);
        assert_eq!(game.last_message(), Some("Alice is looking at their deck"));
        execute(&mut game, ALICE, Command::ShowDrawDeck).unwrap();
        assert!(!game.player(ALICE).unwrap().deck_visible);
    }

    #[test]
    fn test_rejected_command_logs_nothing() {
        let mut game = empty_game();
        let before = game.messages.len();
        handle_command(&mut game, ALICE, Command::DoneRound);
        assert_eq!(game.messages.len(), before);
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_command_json_shape() {
        let command: Command =
            serde_json::from_str(r#"{"command":"start_challenge","challenge_type":"power"}"#)
                .unwrap();
        assert_eq!(
            command,
            Command::StartChallenge {
                challenge_type: ChallengeType::Power
            }
        );
        let drop: Command = serde_json::from_str(
            r#"{"command":"drop","card":4,"source":"hand","target":"discard"}"#,
        )
        .unwrap();
        assert_eq!(drop.name(), "drop");
    }
}
