//! Round structure and the challenge state machine.
//!
//! This module handles:
//! - Game start (deal, keep/mulligan, setup placement, setup attachments)
//! - Plot selection, first player choice, the draw phase and plot reveal
//! - Marshalling
//! - Challenges: declaration, stealth, defence, resolution
//! - Dominance and the end of the round
//!
//! Every entry point validates before mutating; a rejected call returns a
//! [`CommandError`] and leaves the game untouched.

use std::sync::Arc;

use log::{debug, info};

use crate::ability::{self, AbilityContext, AbilityTrigger};
use crate::challenge::{Challenge, ChallengeStep, determine_result};
use crate::commands::CommandError;
use crate::events::{GameEvent, fire_event};
use crate::game_state::Game;
use crate::ids::{ObjectId, PlayerId};
use crate::player::{Button, Phase, Player};
use crate::rules::{self, check_victory};
use crate::types::{CardType, ChallengeType, FirstPlayerChoice, Keyword, Stat};
use crate::zone::Zone;

fn player(game: &Game, id: PlayerId) -> Result<&Player, CommandError> {
    game.player(id).ok_or(CommandError::PlayerNotFound(id))
}

fn opponent(game: &Game, id: PlayerId) -> Result<PlayerId, CommandError> {
    game.opponent_of(id).ok_or(CommandError::PlayerNotFound(id))
}

fn require_phase(game: &Game, id: PlayerId, phase: Phase) -> Result<(), CommandError> {
    let actual = player(game, id)?.phase;
    if actual != phase {
        return Err(CommandError::WrongPhase(actual));
    }
    Ok(())
}

fn require_active(game: &Game, id: PlayerId) -> Result<(), CommandError> {
    if game.active_player != Some(id) {
        return Err(CommandError::NotActivePlayer(id));
    }
    Ok(())
}

// =============================================================================
// Game start and setup
// =============================================================================

/// Shuffles each draw deck, deals the setup hand and prompts keep/mulligan.
pub fn initialise(game: &mut Game) {
    let hand_size = game.config.setup_hand_size;
    for id in game.player_ids() {
        game.shuffle_draw_deck(id);
        game.draw_cards(id, hand_size);
        if let Some(p) = game.player_mut(id) {
            p.phase = Phase::Setup;
            p.set_prompt(
                "Keep or mulligan?",
                vec![
                    Button::new("keep", "Keep Hand"),
                    Button::new("mulligan", "Mulligan"),
                ],
            );
        }
    }
    info!("game {}: started", game.id);
}

pub fn mulligan(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Setup)?;
    let p = player(game, id)?;
    if p.kept || p.mulliganed {
        return Err(CommandError::Illegal("mulligan is only allowed once, before keeping"));
    }

    let hand_size = game.config.setup_hand_size;
    game.shuffle_hand_into_deck(id);
    game.draw_cards(id, hand_size);
    if let Some(p) = game.player_mut(id) {
        p.mulliganed = true;
        p.set_prompt("Keep or mulligan?", vec![Button::new("keep", "Keep Hand")]);
    }
    game.add_message(format!("{} has taken a mulligan", game.player_name(id)));
    Ok(())
}

pub fn keep(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Setup)?;
    if player(game, id)?.kept {
        return Err(CommandError::Illegal("hand already kept"));
    }

    let setup_gold = game.config.setup_gold;
    if let Some(p) = game.player_mut(id) {
        p.kept = true;
        p.gold = setup_gold;
        p.set_prompt("Select setup cards", vec![Button::done("setup_done")]);
    }
    game.add_message(format!("{} has kept their hand", game.player_name(id)));
    Ok(())
}

/// Places a card from hand during setup, paying its cost from setup gold.
pub fn place_setup_card(game: &mut Game, id: PlayerId, card: ObjectId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Setup)?;
    let p = player(game, id)?;
    if !p.kept || p.setup_done {
        return Err(CommandError::Illegal("setup cards are placed after keeping and before setup is done"));
    }
    if !p.hand.contains(&card) {
        return Err(CommandError::NotInZone { card, zone: Zone::Hand });
    }
    let instance = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    if !instance.card_type().is_permanent() {
        return Err(CommandError::Illegal("only characters, locations and attachments can be set up"));
    }
    let cost = instance.definition.cost;
    if cost > p.gold {
        return Err(CommandError::NotEnoughGold {
            needed: cost,
            available: p.gold,
        });
    }

    if let Some(p) = game.player_mut(id) {
        p.gold -= cost;
    }
    game.move_card(card, Zone::PlayArea);
    game.add_message(format!(
        "{} has moved a card from their hand to their play area",
        game.player_name(id)
    ));
    Ok(())
}

pub fn setup_done(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Setup)?;
    let p = player(game, id)?;
    if !p.kept || p.setup_done {
        return Err(CommandError::Illegal("setup is not in progress"));
    }

    if let Some(p) = game.player_mut(id) {
        p.setup_done = true;
    }
    game.add_message(format!("{} has finished setup", game.player_name(id)));

    if game.players.iter().all(|p| p.setup_done) {
        check_for_attachments(game);
    } else if let Some(p) = game.player_mut(id) {
        p.wait("Waiting for opponent to finish setup");
    }
    Ok(())
}

fn has_unmapped_attachments(game: &Game, id: PlayerId) -> bool {
    game.cards_in_play(id)
        .iter()
        .any(|c| c.is_unmapped_attachment())
}

/// Prompts players with unplaced attachments; starts the first round once
/// there are none.
pub fn check_for_attachments(game: &mut Game) {
    let with: Vec<PlayerId> = game
        .player_ids()
        .into_iter()
        .filter(|id| has_unmapped_attachments(game, *id))
        .collect();

    if with.is_empty() {
        for p in &mut game.players {
            p.waiting_for_attachments = false;
            p.selected_attachment = None;
            p.select_card = false;
            p.gold = 0;
        }
        start_plot_phase(game);
        return;
    }

    for p in &mut game.players {
        if with.contains(&p.id) {
            p.waiting_for_attachments = true;
            if p.selected_attachment.is_none() {
                p.set_prompt(
                    "Select attachment locations",
                    vec![Button::done("attachments_done")],
                );
            }
        } else {
            p.waiting_for_attachments = false;
            p.wait("Waiting for opponent to finish setup");
        }
    }
}

/// Returns unplaced setup attachments to hand and finishes attachment
/// placement for this player.
pub fn attachments_done(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Setup)?;
    if !player(game, id)?.waiting_for_attachments {
        return Err(CommandError::Illegal("not placing attachments"));
    }

    let unplaced: Vec<ObjectId> = game
        .cards_in_play(id)
        .iter()
        .filter(|c| c.is_unmapped_attachment())
        .map(|c| c.id)
        .collect();
    for card in unplaced {
        game.move_card(card, Zone::Hand);
    }
    if let Some(p) = game.player_mut(id) {
        p.selected_attachment = None;
        p.select_card = false;
    }
    check_for_attachments(game);
    Ok(())
}

/// Marks an attachment as the one to place with the next click.
pub fn select_attachment(game: &mut Game, id: PlayerId, card: ObjectId) -> Result<(), CommandError> {
    let p = player(game, id)?;
    if p.phase != Phase::Setup || !p.waiting_for_attachments {
        return Err(CommandError::WrongPhase(p.phase));
    }
    let instance = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    if instance.controller != id || instance.card_type() != CardType::Attachment || !instance.is_in_play() {
        return Err(CommandError::Illegal("select one of your attachments in play"));
    }

    if let Some(p) = game.player_mut(id) {
        p.selected_attachment = Some(card);
        p.select_card = true;
        p.wait("Select target for attachment");
    }
    Ok(())
}

/// Attaches the selected attachment to `host` unless a `before_attach`
/// listener vetoes it.
pub fn attach_selected(game: &mut Game, id: PlayerId, host: ObjectId) -> Result<(), CommandError> {
    let p = player(game, id)?;
    let attachment = p
        .selected_attachment
        .ok_or(CommandError::Illegal("no attachment selected"))?;
    let phase = p.phase;
    let host_card = game.object(host).ok_or(CommandError::CardNotFound(host))?;
    if !host_card.is_in_play() || !host_card.is_character() || host == attachment {
        return Err(CommandError::Illegal("attachments go on characters in play"));
    }

    game.can_attach = true;
    fire_event(
        game,
        GameEvent::BeforeAttach {
            player: id,
            attachment,
            host,
        },
    );
    if !game.can_attach || game.is_over() {
        debug!("attachment {} vetoed", attachment);
        return Ok(());
    }

    game.attach(attachment, host);
    game.add_message(format!(
        "{} attaches {} to {}",
        game.player_name(id),
        game.card_label(attachment),
        game.card_label(host)
    ));
    if let Some(p) = game.player_mut(id) {
        p.selected_attachment = None;
        p.select_card = false;
    }

    if phase == Phase::Setup {
        check_for_attachments(game);
    } else if let Some(p) = game.player_mut(id) {
        p.set_prompt("Marshal your cards", vec![Button::done("marshal_done")]);
    }
    Ok(())
}

// =============================================================================
// Plot phase
// =============================================================================

/// Starts a new round: clears round-scoped state and prompts plot selection.
pub fn start_plot_phase(game: &mut Game) {
    game.round += 1;
    game.challenge = None;
    game.active_player = None;
    game.pause_for_plot = false;
    game.paused_reveal = None;
    for card in game.objects.values_mut() {
        card.strength_modifier = 0;
        card.used_actions.clear();
    }
    for id in game.player_ids() {
        let empty = game.player(id).is_some_and(|p| p.plot_deck.is_empty());
        if empty {
            game.recycle_plots(id);
        }
        if let Some(p) = game.player_mut(id) {
            p.start_round();
            p.wait("Select a plot");
        }
    }
    info!("game {}: round {}", game.id, game.round);
}

pub fn select_plot(game: &mut Game, id: PlayerId, plot: ObjectId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::PlotSelection)?;
    let p = player(game, id)?;
    if p.selected_plot.is_some() {
        return Err(CommandError::Illegal("plot already selected"));
    }
    if !p.plot_deck.contains(&plot) {
        return Err(CommandError::NotInZone {
            card: plot,
            zone: Zone::PlotDeck,
        });
    }

    if let Some(p) = game.player_mut(id) {
        p.selected_plot = Some(plot);
    }
    game.register_listeners(plot);
    game.add_message(format!("{} has selected a plot", game.player_name(id)));

    if !game.players.iter().all(|p| p.selected_plot.is_some()) {
        if let Some(p) = game.player_mut(id) {
            p.wait("Waiting for opponent to select plot");
        }
        return Ok(());
    }

    // Strictly higher initiative wins; ties keep the earlier seat.
    let mut highest: Option<(PlayerId, i64)> = None;
    for p in &game.players {
        let initiative = p
            .selected_plot
            .and_then(|plot| game.object(plot))
            .map_or(0, |plot| plot.definition.initiative()) as i64;
        if highest.is_none_or(|(_, best)| initiative > best) {
            highest = Some((p.id, initiative));
        }
    }
    if let Some((highest, _)) = highest {
        first_player_prompt(game, highest);
    }
    Ok(())
}

fn first_player_prompt(game: &mut Game, highest: PlayerId) {
    game.set_phase_all(Phase::FirstPlayerSelection);
    for p in &mut game.players {
        if p.id == highest {
            p.first_player = true;
            p.set_prompt(
                "Select a first player",
                vec![
                    Button::new("set_first_player", "Me").with_arg("me"),
                    Button::new("set_first_player", "Opponent").with_arg("opponent"),
                ],
            );
        } else {
            p.first_player = false;
            p.wait("Waiting for opponent to select first player");
        }
    }
}

/// The initiative winner picks the first player; both players draw, then
/// the first player's plot is revealed.
pub fn set_first_player(
    game: &mut Game,
    id: PlayerId,
    choice: FirstPlayerChoice,
) -> Result<(), CommandError> {
    require_phase(game, id, Phase::FirstPlayerSelection)?;
    if !player(game, id)?.first_player {
        return Err(CommandError::Illegal("only the initiative winner chooses the first player"));
    }
    let other = opponent(game, id)?;
    let first = match choice {
        FirstPlayerChoice::Me => id,
        FirstPlayerChoice::Opponent => other,
    };

    let draw = game.config.draw_phase_cards;
    for pid in game.player_ids() {
        if let Some(p) = game.player_mut(pid) {
            p.first_player = pid == first;
            p.clear_prompt();
        }
        game.draw_cards(pid, draw);
    }
    game.add_message(format!(
        "{} has selected {} to be the first player",
        game.player_name(id),
        game.player_name(first)
    ));

    reveal_plot(game, first);
    Ok(())
}

/// Reveals `id`'s selected plot and runs its reveal effects.
///
/// The sequence suspends while a `plot_revealed` listener has set
/// `pause_for_plot` (resumed by `begin_marshal`) or a reveal ability waits on
/// a target selection (resumed when it finishes).
pub fn reveal_plot(game: &mut Game, id: PlayerId) {
    let Some(p) = game.player(id) else {
        return;
    };
    let previous = p.active_plot;
    let Some(plot) = p.selected_plot else {
        return;
    };

    if let Some(previous) = previous {
        game.move_card(previous, Zone::UsedPlots);
    }
    game.move_card(plot, Zone::ActivePlot);
    let income = game.object(plot).map_or(0, |c| c.definition.income());
    if let Some(p) = game.player_mut(id) {
        p.phase = Phase::PlotReveal;
        p.plot_revealed = true;
        p.gold = income;
    }
    game.add_message(format!(
        "{} reveals {}",
        game.player_name(id),
        game.card_label(plot)
    ));

    game.pause_for_plot = false;
    let reveal_abilities: Vec<_> = game
        .object(plot)
        .map(|c| {
            c.definition
                .abilities
                .iter()
                .filter(|a| a.trigger == AbilityTrigger::WhenRevealed)
                .map(|a| Arc::clone(&a.effect))
                .collect()
        })
        .unwrap_or_default();
    if let Some(context) = AbilityContext::for_player(game, id, Some(plot)) {
        for effect in reveal_abilities {
            ability::resolve_ability(game, effect, context);
        }
    }
    fire_event(game, GameEvent::PlotRevealed { player: id, plot });
    if game.is_over() {
        return;
    }

    if game.pause_for_plot || game.pending.is_some() {
        debug!("plot reveal for {} suspended", id);
        game.paused_reveal = Some(id);
        return;
    }
    reveal_done(game, id);
}

fn reveal_done(game: &mut Game, id: PlayerId) {
    let Some(other) = game.opponent_of(id) else {
        return;
    };
    if game.player(other).is_some_and(|p| !p.plot_revealed) {
        reveal_plot(game, other);
        return;
    }
    if let Some(first) = game.first_player() {
        begin_marshal(game, first);
    }
}

/// Continues a reveal suspended behind a target selection.
pub fn resume_after_selection(game: &mut Game) {
    if game.pending.is_some() || game.pause_for_plot || game.is_over() {
        return;
    }
    if let Some(id) = game.paused_reveal.take() {
        reveal_done(game, id);
    }
}

/// `begin_marshal`: resumes a reveal paused by a `plot_revealed` listener.
pub fn resume_reveal(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    player(game, id)?;
    let Some(paused) = game.paused_reveal else {
        return Err(CommandError::Illegal("no plot reveal is paused"));
    };
    if paused != id {
        return Err(CommandError::NotActivePlayer(id));
    }
    if game.pending.is_some() {
        return Err(CommandError::SelectionPending);
    }

    game.pause_for_plot = false;
    game.paused_reveal = None;
    if let Some(p) = game.player_mut(paused) {
        p.clear_prompt();
    }
    reveal_done(game, paused);
    Ok(())
}

// =============================================================================
// Marshal phase
// =============================================================================

fn begin_marshal(game: &mut Game, id: PlayerId) {
    game.active_player = Some(id);
    if let Some(p) = game.player_mut(id) {
        p.phase = Phase::Marshal;
        p.set_prompt("Marshal your cards", vec![Button::done("marshal_done")]);
    }
    if let Some(other) = game.opponent_of(id)
        && let Some(p) = game.player_mut(other)
    {
        p.wait("Waiting for opponent to marshal their cards");
    }
    info!("game {}: {} marshals", game.id, game.player_name(id));
    fire_event(game, GameEvent::BeginMarshal { player: id });
}

/// Marshals a card from hand, paying its cost in gold.
pub fn marshal_card(game: &mut Game, id: PlayerId, card: ObjectId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Marshal)?;
    require_active(game, id)?;
    let p = player(game, id)?;
    if p.marshalled {
        return Err(CommandError::Illegal("already done marshalling"));
    }
    if !p.hand.contains(&card) {
        return Err(CommandError::NotInZone { card, zone: Zone::Hand });
    }
    if p.selected_attachment.is_some() {
        return Err(CommandError::Illegal("place the selected attachment first"));
    }
    let instance = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    let card_type = instance.card_type();
    if matches!(card_type, CardType::Plot | CardType::Agenda) {
        return Err(CommandError::Illegal("plots and agendas cannot be marshalled"));
    }
    let cost = instance.definition.cost;
    if cost > p.gold {
        return Err(CommandError::NotEnoughGold {
            needed: cost,
            available: p.gold,
        });
    }
    let played = instance
        .definition
        .abilities
        .iter()
        .filter(|a| a.trigger == AbilityTrigger::WhenPlayed)
        .map(|a| Arc::clone(&a.effect))
        .collect::<Vec<_>>();
    let context = AbilityContext::for_player(game, id, Some(card))
        .ok_or(CommandError::PlayerNotFound(id))?;

    if let Some(p) = game.player_mut(id) {
        p.gold -= cost;
    }
    fire_event(game, GameEvent::BeforeCardPlayed { player: id, card });
    if game.is_over() {
        return Ok(());
    }

    let destination = if card_type == CardType::Event {
        Zone::Discard
    } else {
        Zone::PlayArea
    };
    game.move_card(card, destination);
    game.add_message(format!(
        "{} has marshalled {} for {} gold",
        game.player_name(id),
        game.card_label(card),
        cost
    ));
    if card_type == CardType::Attachment
        && let Some(p) = game.player_mut(id)
    {
        p.selected_attachment = Some(card);
        p.select_card = true;
        p.wait("Select target for attachment");
    }

    fire_event(game, GameEvent::AfterCardPlayed { player: id, card });
    for effect in played {
        if game.is_over() {
            break;
        }
        ability::resolve_ability(game, effect, context);
    }
    Ok(())
}

pub fn marshal_done(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Marshal)?;
    require_active(game, id)?;
    if player(game, id)?.marshalled {
        return Err(CommandError::Illegal("already done marshalling"));
    }
    let other = opponent(game, id)?;

    // A marshalled attachment still waiting for a host goes back to hand
    // and its cost is refunded.
    if let Some(attachment) = player(game, id)?.selected_attachment
        && game.object(attachment).is_some_and(|c| c.is_unmapped_attachment())
    {
        let cost = game.object(attachment).map_or(0, |c| c.definition.cost);
        game.move_card(attachment, Zone::Hand);
        if let Some(p) = game.player_mut(id) {
            p.gold += cost;
        }
        game.add_message(format!(
            "{} returns {} to their hand",
            game.player_name(id),
            game.card_label(attachment)
        ));
    }
    if let Some(p) = game.player_mut(id) {
        p.marshalled = true;
        p.selected_attachment = None;
        p.select_card = false;
    }
    game.add_message(format!("{} has finished marshalling", game.player_name(id)));

    if game.player(other).is_some_and(|p| !p.marshalled) {
        if let Some(p) = game.player_mut(id) {
            p.wait("Waiting for opponent to finish marshalling");
        }
        begin_marshal(game, other);
        return Ok(());
    }

    let first = game.first_player().unwrap_or(id);
    game.set_phase_all(Phase::Challenge);
    begin_challenge(game, first);
    Ok(())
}

// =============================================================================
// Challenge phase
// =============================================================================

/// Gives `id` the challenge turn and prompts for a challenge type.
pub fn begin_challenge(game: &mut Game, id: PlayerId) {
    for card in game.objects.values_mut() {
        card.selected = false;
        card.stealth_target = false;
    }
    if let Some(challenge) = game.challenge.as_mut() {
        challenge.step = ChallengeStep::Resolved;
    }
    game.active_player = Some(id);

    let mut buttons: Vec<Button> = Vec::new();
    if let Some(p) = game.player(id) {
        buttons = ChallengeType::ALL
            .iter()
            .filter(|t| p.challenges.can_start(**t))
            .map(|t| Button::new("start_challenge", capitalize(t.label())).with_arg(t.label()))
            .collect();
    }
    buttons.push(Button::done("done_challenges"));

    if let Some(p) = game.player_mut(id) {
        p.phase = Phase::Challenge;
        p.current_challenge = None;
        p.select_card = false;
        p.set_prompt("Initiate a challenge", buttons);
    }
    if let Some(other) = game.opponent_of(id)
        && let Some(p) = game.player_mut(other)
    {
        p.phase = Phase::Challenge;
        p.current_challenge = None;
        p.select_card = false;
        p.wait("Waiting for opponent to initiate challenge");
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn challenge_in_progress(game: &Game) -> bool {
    game.challenge
        .as_ref()
        .is_some_and(|c| c.step != ChallengeStep::Resolved)
}

pub fn start_challenge(
    game: &mut Game,
    id: PlayerId,
    challenge_type: ChallengeType,
) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Challenge)?;
    require_active(game, id)?;
    let p = player(game, id)?;
    if p.done_challenges {
        return Err(CommandError::Illegal("challenges are done for this round"));
    }
    if challenge_in_progress(game) {
        return Err(CommandError::Illegal("a challenge is already in progress"));
    }
    if !p.challenges.can_start(challenge_type) {
        return Err(CommandError::ChallengeLimit(challenge_type));
    }
    let defender = opponent(game, id)?;

    game.challenge = Some(Challenge::new(challenge_type, id, defender));
    for pid in [id, defender] {
        if let Some(p) = game.player_mut(pid) {
            p.current_challenge = Some(challenge_type);
            p.challenge_strength = 0;
        }
    }
    if let Some(p) = game.player_mut(id) {
        p.select_card = true;
        p.set_prompt(
            format!("Select participants for {} challenge", challenge_type),
            vec![Button::done("done_challenge")],
        );
    }
    Ok(())
}

/// Toggles one of `id`'s characters in or out of the current challenge.
pub fn toggle_participant(game: &mut Game, id: PlayerId, card: ObjectId) -> Result<bool, CommandError> {
    let challenge = game
        .challenge
        .as_ref()
        .ok_or(CommandError::Illegal("no challenge in progress"))?;
    let declaring = match challenge.step {
        ChallengeStep::DeclaringAttackers => challenge.attacker == id,
        ChallengeStep::AwaitingDefenders => challenge.defender == id,
        _ => false,
    };
    if !declaring {
        return Err(CommandError::Illegal("not declaring participants"));
    }
    let challenge_type = challenge.challenge_type;
    let already = challenge.participants(id).contains(&card);
    let instance = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    if instance.controller != id {
        return Err(CommandError::NotYourCard(card));
    }
    if !already {
        if !instance.can_participate(challenge_type) {
            return Err(CommandError::Illegal("needs a standing character with the challenge icon"));
        }
        if instance.stealth_target {
            return Err(CommandError::Illegal("stealth targets cannot defend"));
        }
    }

    let selected = match game.challenge.as_mut() {
        Some(challenge) => challenge.toggle(id, card),
        None => false,
    };
    if let Some(instance) = game.object_mut(card) {
        instance.selected = selected;
    }
    game.refresh_challenge_strengths();
    Ok(selected)
}

/// Kneels the attackers and initiates the challenge. With no participants
/// the player returns to challenge selection and nothing is consumed.
pub fn done_challenge(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    let challenge = game
        .challenge
        .as_ref()
        .ok_or(CommandError::Illegal("no challenge in progress"))?;
    if challenge.step != ChallengeStep::DeclaringAttackers || challenge.attacker != id {
        return Err(CommandError::Illegal("not declaring attackers"));
    }
    let attackers = challenge.attackers.clone();
    let challenge_type = challenge.challenge_type;

    if attackers.is_empty() {
        game.challenge = None;
        begin_challenge(game, id);
        return Ok(());
    }

    for card in &attackers {
        if let Some(instance) = game.object_mut(*card) {
            instance.kneeled = true;
        }
    }
    if let Some(p) = game.player_mut(id) {
        p.challenges.record(challenge_type);
    }
    game.refresh_challenge_strengths();
    next_stealth_or_initiate(game);
    Ok(())
}

/// Prompts for the next stealth attacker's target, or initiates the
/// challenge once every stealth attacker has one.
fn next_stealth_or_initiate(game: &mut Game) {
    let Some(challenge) = game.challenge.as_ref() else {
        return;
    };
    let attacker = challenge.attacker;
    let next = challenge.attackers.iter().copied().find(|card| {
        !challenge.stealth_resolved.contains(card)
            && game
                .object(*card)
                .is_some_and(|c| c.has_keyword(Keyword::Stealth))
    });

    match next {
        Some(card) => {
            let label = game.card_label(card);
            if let Some(challenge) = game.challenge.as_mut() {
                challenge.step = ChallengeStep::ChoosingStealth(card);
            }
            if let Some(p) = game.player_mut(attacker) {
                p.select_card = true;
                p.set_prompt(
                    format!("Select stealth target for {}", label),
                    vec![Button::done("done_stealth")],
                );
            }
        }
        None => initiate_challenge(game),
    }
}

fn initiate_challenge(game: &mut Game) {
    let Some(challenge) = game.challenge.as_mut() else {
        return;
    };
    challenge.step = ChallengeStep::AwaitingDefenders;
    let (attacker, defender, challenge_type) =
        (challenge.attacker, challenge.defender, challenge.challenge_type);
    let strength = game.player(attacker).map_or(0, |p| p.challenge_strength);
    game.add_message(format!(
        "{} has initiated a {} challenge with strength {}",
        game.player_name(attacker),
        challenge_type,
        strength
    ));
    if let Some(p) = game.player_mut(attacker) {
        p.select_card = false;
        p.wait("Waiting for opponent to defend");
    }
    if let Some(p) = game.player_mut(defender) {
        p.select_card = true;
        p.set_prompt(
            format!("Defend {} challenge", challenge_type),
            vec![Button::done("done_defend")],
        );
    }
}

/// Marks an opponent's character as the current stealth attacker's target.
pub fn choose_stealth_target(game: &mut Game, id: PlayerId, card: ObjectId) -> Result<(), CommandError> {
    let challenge = game
        .challenge
        .as_ref()
        .ok_or(CommandError::Illegal("no challenge in progress"))?;
    let ChallengeStep::ChoosingStealth(stealth_card) = challenge.step else {
        return Err(CommandError::Illegal("not choosing a stealth target"));
    };
    if challenge.attacker != id {
        return Err(CommandError::NotActivePlayer(id));
    }
    let defender = challenge.defender;
    let target = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    if target.controller != defender
        || !target.is_in_play()
        || !target.is_character()
        || challenge.is_stealth_target(card)
    {
        return Err(CommandError::Illegal("not a legal stealth target"));
    }

    if let Some(challenge) = game.challenge.as_mut() {
        challenge.stealth_targets.push(card);
        challenge.stealth_resolved.push(stealth_card);
    }
    if let Some(target) = game.object_mut(card) {
        target.stealth_target = true;
    }
    game.add_message(format!(
        "{} has chosen {} as a stealth target",
        game.player_name(id),
        game.card_label(card)
    ));
    next_stealth_or_initiate(game);
    Ok(())
}

/// An own-side click while stealth targets are chosen: a standing character
/// with the icon joins the attack and kneels like the declared attackers.
/// Cards already attacking are kneeling, so clicking them does nothing.
pub fn join_during_stealth(game: &mut Game, id: PlayerId, card: ObjectId) -> Result<(), CommandError> {
    let challenge = game
        .challenge
        .as_ref()
        .ok_or(CommandError::Illegal("no challenge in progress"))?;
    if !matches!(challenge.step, ChallengeStep::ChoosingStealth(_)) {
        return Err(CommandError::Illegal("not choosing a stealth target"));
    }
    if challenge.attacker != id {
        return Err(CommandError::NotActivePlayer(id));
    }
    if challenge.is_participating(card) {
        return Ok(());
    }
    let challenge_type = challenge.challenge_type;
    let instance = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    if instance.controller != id {
        return Err(CommandError::NotYourCard(card));
    }
    if !instance.can_participate(challenge_type) {
        return Err(CommandError::Illegal("needs a standing character with the challenge icon"));
    }

    if let Some(challenge) = game.challenge.as_mut() {
        challenge.toggle(id, card);
    }
    if let Some(instance) = game.object_mut(card) {
        instance.selected = true;
        instance.kneeled = true;
    }
    game.refresh_challenge_strengths();
    debug!("game {}: {} joins the attack", game.id, card);
    Ok(())
}

/// Skips the current stealth attacker's target.
pub fn done_stealth(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    let challenge = game
        .challenge
        .as_mut()
        .ok_or(CommandError::Illegal("no challenge in progress"))?;
    let ChallengeStep::ChoosingStealth(stealth_card) = challenge.step else {
        return Err(CommandError::Illegal("not choosing a stealth target"));
    };
    if challenge.attacker != id {
        return Err(CommandError::NotActivePlayer(id));
    }
    challenge.stealth_resolved.push(stealth_card);
    next_stealth_or_initiate(game);
    Ok(())
}

/// Kneels the defenders and resolves the challenge.
pub fn done_defend(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    let challenge = game
        .challenge
        .as_ref()
        .ok_or(CommandError::Illegal("no challenge in progress"))?;
    if challenge.step != ChallengeStep::AwaitingDefenders || challenge.defender != id {
        return Err(CommandError::Illegal("not defending"));
    }
    let attacker = challenge.attacker;
    let challenge_type = challenge.challenge_type;
    let defenders = challenge.defenders.clone();

    for card in &defenders {
        if let Some(instance) = game.object_mut(*card) {
            instance.kneeled = true;
        }
    }
    game.refresh_challenge_strengths();
    if let Some(p) = game.player_mut(id) {
        p.select_card = false;
    }
    let defender_strength = game.player(id).map_or(0, |p| p.challenge_strength);
    let attacker_strength = game.player(attacker).map_or(0, |p| p.challenge_strength);
    game.add_message(format!(
        "{} has defended with strength {}",
        game.player_name(id),
        defender_strength
    ));

    let result = determine_result(attacker, id, attacker_strength, defender_strength);
    if let Some(challenge) = game.challenge.as_mut() {
        challenge.result = Some(result);
    }
    game.add_message(format!(
        "{} won a {} challenge {} vs {}",
        game.player_name(result.winner),
        challenge_type,
        result.winner_strength,
        result.loser_strength
    ));

    if result.unopposed {
        if let Some(p) = game.player_mut(result.winner) {
            p.power += 1;
        }
        game.add_message(format!(
            "{} has gained 1 power from an unopposed challenge",
            game.player_name(result.winner)
        ));
        if check_victory(game, result.winner) {
            return Ok(());
        }
    }

    rules::apply_keywords(game, result.winner, result.loser);
    if game.is_over() {
        return Ok(());
    }

    if result.challenger_won(attacker) {
        rules::apply_claim(game, result.winner, result.loser);
    } else {
        begin_challenge(game, attacker);
    }
    Ok(())
}

/// Ends `id`'s challenges; the other player takes theirs, then dominance.
pub fn done_challenges(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::Challenge)?;
    require_active(game, id)?;
    if challenge_in_progress(game) {
        return Err(CommandError::Illegal("a challenge is in progress"));
    }
    let other = opponent(game, id)?;

    if let Some(p) = game.player_mut(id) {
        p.done_challenges = true;
    }
    if game.player(other).is_some_and(|p| !p.done_challenges) {
        begin_challenge(game, other);
        return Ok(());
    }
    dominance(game);
    Ok(())
}

// =============================================================================
// Dominance and round end
// =============================================================================

/// Awards dominance, stands all cards, applies taxation and prompts the end
/// of the round.
pub fn dominance(game: &mut Game) {
    game.set_phase_all(Phase::Dominance);
    game.active_player = None;
    game.challenge = None;
    for p in &mut game.players {
        p.current_challenge = None;
        p.challenge_strength = 0;
    }

    let totals: Vec<(PlayerId, u32)> = game
        .player_ids()
        .into_iter()
        .map(|id| (id, game.dominance(id)))
        .collect();
    let best = totals.iter().map(|(_, d)| *d).max().unwrap_or(0);
    let leaders: Vec<PlayerId> = totals
        .iter()
        .filter(|(_, d)| *d == best)
        .map(|(id, _)| *id)
        .collect();
    match leaders.as_slice() {
        [winner] => {
            if let Some(p) = game.player_mut(*winner) {
                p.power += 1;
            }
            game.add_message(format!("{} wins dominance", game.player_name(*winner)));
            if check_victory(game, *winner) {
                return;
            }
        }
        _ => game.add_message("Dominance is tied, no player wins dominance"),
    }

    fire_event(game, GameEvent::CardsStanding);
    if game.is_over() {
        return;
    }
    for card in game.objects.values_mut() {
        if card.is_in_play() {
            card.kneeled = false;
        }
    }
    for p in &mut game.players {
        p.gold = 0;
    }

    game.set_phase_all(Phase::RoundEnd);
    let first = game.first_player();
    for p in &mut game.players {
        if Some(p.id) == first {
            p.set_prompt("", vec![Button::new("done_round", "End Turn")]);
        } else {
            p.wait("Waiting for opponent to end their turn");
        }
    }
}

/// Ends the round for `id`. Rejected while the hand exceeds the active
/// plot's reserve.
pub fn done_round(game: &mut Game, id: PlayerId) -> Result<(), CommandError> {
    require_phase(game, id, Phase::RoundEnd)?;
    let p = player(game, id)?;
    if p.round_done {
        return Err(CommandError::Illegal("round already ended"));
    }
    let reserve = p
        .active_plot
        .and_then(|plot| game.object(plot))
        .map_or(0, |plot| plot.definition.reserve()) as usize;
    if p.hand.len() > reserve {
        return Err(CommandError::ReserveExceeded {
            hand: p.hand.len(),
            reserve,
        });
    }
    let other = opponent(game, id)?;

    if let Some(p) = game.player_mut(id) {
        p.round_done = true;
        p.wait("Waiting for opponent to end their turn");
    }
    if game.player(other).is_some_and(|p| p.round_done) {
        end_round(game);
    } else if let Some(p) = game.player_mut(other) {
        p.set_prompt("", vec![Button::new("done_round", "End Turn")]);
    }
    Ok(())
}

fn end_round(game: &mut Game) {
    let plots: Vec<ObjectId> = game
        .players
        .iter()
        .flat_map(|p| p.selected_plot.into_iter().chain(p.active_plot))
        .collect();
    for plot in plots {
        game.events.unregister_source(plot);
    }
    start_plot_phase(game);
}

// =============================================================================
// Manual adjustments
// =============================================================================

/// Adjusts a player's power or gold by hand. Values clamp at zero; a clamped
/// change is not logged.
pub fn change_stat(game: &mut Game, id: PlayerId, stat: Stat, delta: i32) -> Result<(), CommandError> {
    player(game, id)?;
    let Some(p) = game.player_mut(id) else {
        return Err(CommandError::PlayerNotFound(id));
    };
    let value = match stat {
        Stat::Power => &mut p.power,
        Stat::Gold => &mut p.gold,
    };
    let updated = *value as i64 + delta as i64;
    if updated < 0 {
        *value = 0;
        return Ok(());
    }
    *value = updated as u32;
    let sign = if delta > 0 { "+" } else { "" };
    game.add_message(format!(
        "{} sets {} to {} ({}{})",
        game.player_name(id),
        stat.label(),
        updated,
        sign,
        delta
    ));
    if stat == Stat::Power && delta > 0 {
        check_victory(game, id);
    }
    Ok(())
}

/// Moves one of the player's own cards between zones by hand.
///
/// Putting a card into play from hand follows setup or marshal rules; other
/// moves into play are rejected.
pub fn drop_card(
    game: &mut Game,
    id: PlayerId,
    card: ObjectId,
    source: Zone,
    target: Zone,
) -> Result<(), CommandError> {
    let phase = player(game, id)?.phase;
    let instance = game.object(card).ok_or(CommandError::CardNotFound(card))?;
    if instance.owner != id {
        return Err(CommandError::NotYourCard(card));
    }
    if instance.zone != source {
        return Err(CommandError::NotInZone { card, zone: source });
    }
    if !source.is_droppable() || !target.is_droppable() || source == target {
        return Err(CommandError::Illegal("cards can only be dropped between droppable zones"));
    }

    if target == Zone::PlayArea {
        if source != Zone::Hand {
            return Err(CommandError::Illegal("cards enter play from hand"));
        }
        return match phase {
            Phase::Setup => place_setup_card(game, id, card),
            Phase::Marshal => marshal_card(game, id, card),
            other => Err(CommandError::WrongPhase(other)),
        };
    }

    game.move_card(card, target);
    game.add_message(format!(
        "{} has moved a card from their {} to their {}",
        game.player_name(id),
        source.label(),
        target.label()
    ));
    Ok(())
}
