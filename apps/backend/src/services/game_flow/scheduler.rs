//! Stage scheduler: the per-room coordinator task.
//!
//! One coordinator runs per active room. It drives the timed stage-by-stage
//! progression, polls completion predicates, reveals answers, triggers the
//! scoring pass and applies `advance` once per iteration. Pausing freezes
//! the countdown without consuming time; cancellation is checked at every
//! suspension point and is normal termination.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::domain::answers::{display_delay, reveal_order};
use crate::domain::rules::{TimedStage, MEDIA_UPLOAD_GRACE_SECS};
use crate::entities::games::{self, GameStage};
use crate::entities::players;
use crate::entities::rounds::{self, RoundStage};
use crate::errors::domain::DomainError;
use crate::repos::{players as players_repo, rounds as rounds_repo, variants as variants_repo};
use crate::repos::games as games_repo;
use crate::services::game_flow::{broadcast, progression};
use crate::services::{games as games_service, rounds as rounds_service, scoring as scoring_service};
use crate::state::app_state::AppState;
use crate::ws::protocol::{AnswerPlayer, ServerMsg};

/// Control surface shared by one room's coordinator and projector tasks.
/// Owned by the host's connection; cancelled on host disconnect.
#[derive(Clone)]
pub struct RoomControl {
    paused: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl RoomControl {
    pub fn new(paused: bool) -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(paused)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Countdown with one-second ticks. While the room is paused the tick is
/// skipped entirely, so the remaining time is preserved exactly.
struct Timer {
    remaining: i64,
}

impl Timer {
    fn new(seconds: u64) -> Self {
        Self {
            remaining: seconds as i64,
        }
    }

    fn time(&self) -> i64 {
        self.remaining
    }

    fn decrement(&mut self) {
        self.remaining -= 1;
    }

    fn exceeded(&self) -> bool {
        self.remaining < 0
    }

    fn expire(&mut self) {
        self.remaining = -1;
    }
}

enum Wait {
    Elapsed,
    Cancelled,
}

async fn sleep_or_cancel(cancel: &CancellationToken, duration: Duration) -> Wait {
    tokio::select! {
        _ = cancel.cancelled() => Wait::Cancelled,
        _ = tokio::time::sleep(duration) => Wait::Elapsed,
    }
}

#[derive(PartialEq)]
enum StageRun {
    Completed,
    Cancelled,
}

/// Coordinator entry point. Any unexpected error fails the room into a
/// terminal, observable state instead of leaving it silently stalled.
pub async fn run_room(state: AppState, game_id: i64, control: RoomControl) {
    info!(game_id, "room coordinator started");
    match run_loop(&state, game_id, &control).await {
        Ok(()) => info!(game_id, "room coordinator finished"),
        Err(err) => {
            error!(game_id, error = %err, "room coordinator failed");
            if let Err(finish_err) = games_service::finish_game(&state.db, game_id).await {
                error!(game_id, error = %finish_err, "failed to finish errored room");
            }
            state.registry.broadcast(
                game_id,
                ServerMsg::Cancel {
                    text: Some("game failed".to_string()),
                },
            );
        }
    }
}

async fn run_loop(
    state: &AppState,
    game_id: i64,
    control: &RoomControl,
) -> Result<(), DomainError> {
    loop {
        if control.is_cancelled() {
            return Ok(());
        }
        let game = games_repo::require_game(&state.db, game_id).await?;
        match game.stage {
            GameStage::Finished => break,
            // Nothing to drive until the host starts the room.
            GameStage::Pregame => return Ok(()),
            GameStage::Preround => {
                if run_timed_stage(state, &game, None, TimedStage::Preround, control).await?
                    == StageRun::Cancelled
                {
                    return Ok(());
                }
            }
            GameStage::Round => {
                let round = rounds_repo::require_current(&state.db, game_id).await?;
                match round.stage {
                    RoundStage::Writing => {
                        if run_timed_stage(state, &game, Some(&round), TimedStage::Writing, control)
                            .await?
                            == StageRun::Cancelled
                        {
                            return Ok(());
                        }
                        rounds_service::populate_missing_variants(&state.db, &game, &round).await?;
                    }
                    RoundStage::Selecting => {
                        if run_timed_stage(
                            state,
                            &game,
                            Some(&round),
                            TimedStage::Selecting,
                            control,
                        )
                        .await?
                            == StageRun::Cancelled
                        {
                            return Ok(());
                        }
                    }
                    RoundStage::Answers => {
                        if reveal_answers(state, &game, &round, control).await?
                            == StageRun::Cancelled
                        {
                            return Ok(());
                        }
                        scoring_service::calculate_results(&state.db, game_id).await?;
                    }
                    RoundStage::Results => {
                        if run_timed_stage(state, &game, Some(&round), TimedStage::Results, control)
                            .await?
                            == StageRun::Cancelled
                        {
                            return Ok(());
                        }
                    }
                    RoundStage::NotStarted | RoundStage::Finished => {
                        return Err(DomainError::state(format!(
                            "round stage {:?} cannot be current",
                            round.stage
                        )));
                    }
                }
            }
        }
        // A cancel command may have force-finished the room mid-stage; a
        // finished room has no transitions left.
        let game = games_repo::require_game(&state.db, game_id).await?;
        if game.stage != GameStage::Finished {
            progression::advance(&state.db, game_id).await?;
        }
    }

    // One final pass so every connection sees the final standings.
    broadcast::send_final_standings(state, game_id).await?;
    Ok(())
}

async fn run_timed_stage(
    state: &AppState,
    game: &games::Model,
    round: Option<&rounds::Model>,
    stage: TimedStage,
    control: &RoomControl,
) -> Result<StageRun, DomainError> {
    info!(game_id = game.id, stage = stage.name(), "stage started");

    let mut timer = Timer::new(stage.seconds());
    while !timer.exceeded() {
        if control.paused() {
            // No time elapses and no predicate can fire while paused.
            match sleep_or_cancel(control.token(), Duration::from_secs(1)).await {
                Wait::Cancelled => return Ok(StageRun::Cancelled),
                Wait::Elapsed => continue,
            }
        }
        state.registry.broadcast(
            game.id,
            ServerMsg::Timer {
                stage: stage.name(),
                time: timer.time(),
            },
        );
        match sleep_or_cancel(control.token(), Duration::from_secs(1)).await {
            Wait::Cancelled => return Ok(StageRun::Cancelled),
            Wait::Elapsed => timer.decrement(),
        }
        if rounds_service::stage_completed(&state.db, game, round).await? {
            timer.expire();
            info!(
                game_id = game.id,
                stage = stage.name(),
                "stage completed before the countdown ran out"
            );
        }
    }

    // Late uploads get a short grace window after the countdown.
    if stage.has_upload_grace() {
        let mut grace = Timer::new(MEDIA_UPLOAD_GRACE_SECS);
        while !rounds_service::stage_completed(&state.db, game, round).await? && !grace.exceeded() {
            match sleep_or_cancel(control.token(), Duration::from_secs(1)).await {
                Wait::Cancelled => return Ok(StageRun::Cancelled),
                Wait::Elapsed => grace.decrement(),
            }
        }
    }

    info!(game_id = game.id, stage = stage.name(), "stage is over");
    Ok(StageRun::Completed)
}

/// Broadcasts the reveal sequence: wrong guesses first, the true answer
/// last, each entry held proportionally to how many players picked it.
async fn reveal_answers(
    state: &AppState,
    game: &games::Model,
    round: &rounds::Model,
    control: &RoomControl,
) -> Result<StageRun, DomainError> {
    let players = players_repo::find_by_game(&state.db, game.id, true).await?;
    let by_id: HashMap<i64, &players::Model> = players.iter().map(|p| (p.id, p)).collect();

    let mut selections: HashMap<i64, Vec<i64>> = HashMap::new();
    for (variant_id, player_id) in variants_repo::selections_by_round(&state.db, round.id).await? {
        selections.entry(variant_id).or_default().push(player_id);
    }
    let candidates = variants_repo::find_by_round(&state.db, round.id)
        .await?
        .into_iter()
        .map(|v| {
            let picked_by = selections.remove(&v.id).unwrap_or_default();
            (v.id, v.text, v.author_id, picked_by)
        })
        .collect();

    for entry in reveal_order(candidates, round.painter_id) {
        while control.paused() {
            match sleep_or_cancel(control.token(), Duration::from_secs(1)).await {
                Wait::Cancelled => return Ok(StageRun::Cancelled),
                Wait::Elapsed => {}
            }
        }

        let author = entry
            .author_id
            .and_then(|id| by_id.get(&id))
            .map(|p| answer_player(p))
            .unwrap_or(AnswerPlayer {
                nickname: "Random answer".to_string(),
                avatar: None,
            });
        let selected_by: Vec<AnswerPlayer> = entry
            .selected_by
            .iter()
            .filter_map(|id| by_id.get(id))
            .map(|p| answer_player(p))
            .collect();

        state.registry.broadcast(
            game.id,
            ServerMsg::DisplayAnswer {
                text: entry.text.clone(),
                author,
                selected_by,
                correct: entry.correct,
            },
        );

        match sleep_or_cancel(control.token(), display_delay(entry.selected_by.len())).await {
            Wait::Cancelled => return Ok(StageRun::Cancelled),
            Wait::Elapsed => {}
        }
    }
    Ok(StageRun::Completed)
}

fn answer_player(player: &players::Model) -> AnswerPlayer {
    AnswerPlayer {
        nickname: player.nickname.clone().unwrap_or_default(),
        avatar: player.avatar.clone(),
    }
}
