//! Broadcast projector: the per-room update task.
//!
//! Runs alongside the coordinator, owned by the same host connection. Every
//! tick (or immediately after a submission notification) it computes, per
//! connected participant, the view matching their role and progress and
//! unicasts it. Hosts and finished players watch the status roster;
//! everyone else gets their personal task view. Repeated identical views
//! are suppressed by the receiving session, not here.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{error, info};

use crate::domain::rules::UPDATE_INTERVAL_MS;
use crate::entities::games::{self, GameStage};
use crate::entities::players;
use crate::entities::rounds::{self, RoundStage};
use crate::errors::domain::DomainError;
use crate::repos::{games as games_repo, players as players_repo, rounds as rounds_repo, variants as variants_repo};
use crate::services::game_flow::scheduler::RoomControl;
use crate::services::{rounds as rounds_service, scoring as scoring_service};
use crate::state::app_state::AppState;
use crate::ws::protocol::{
    PlayerStatus, ResultEntry, ServerMsg, TaskContent, TaskType, ViewPayload,
};

/// Per-round projection cache: the unshuffled variant set is stable for the
/// round, and each recipient keeps their own shuffle for its whole duration.
struct VariantCache {
    round_id: i64,
    by_player: HashMap<i64, Vec<String>>,
}

pub async fn run_updates(state: AppState, game_id: i64, control: RoomControl) {
    info!(game_id, "update broadcaster started");
    match update_loop(&state, game_id, &control).await {
        Ok(()) => info!(game_id, "updates broadcast finished"),
        Err(err) => error!(game_id, error = %err, "update broadcaster failed"),
    }
}

async fn update_loop(
    state: &AppState,
    game_id: i64,
    control: &RoomControl,
) -> Result<(), DomainError> {
    let notify = state.registry.notifier(game_id);
    let mut cache: Option<VariantCache> = None;

    loop {
        if control.is_cancelled() {
            return Ok(());
        }
        if !control.paused() {
            let game = games_repo::require_game(&state.db, game_id).await?;
            if game.stage == GameStage::Finished {
                send_final_standings(state, game_id).await?;
                return Ok(());
            }
            broadcast_views(state, &game, &mut cache).await?;
        }
        tokio::select! {
            _ = control.token().cancelled() => return Ok(()),
            _ = tokio::time::sleep(Duration::from_millis(UPDATE_INTERVAL_MS)) => {}
            _ = notify.notified() => {}
        }
    }
}

/// Final standings for every connection; also the last message a finished
/// room ever sends.
pub async fn send_final_standings(state: &AppState, game_id: i64) -> Result<(), DomainError> {
    let view = results_view(state, game_id).await?;
    state
        .registry
        .broadcast(game_id, ServerMsg::Update { view });
    Ok(())
}

async fn broadcast_views(
    state: &AppState,
    game: &games::Model,
    cache: &mut Option<VariantCache>,
) -> Result<(), DomainError> {
    let players = players_repo::find_by_game(&state.db, game.id, true).await?;

    match game.stage {
        GameStage::Pregame => {
            let flags: HashMap<i64, bool> = players
                .iter()
                .filter(|p| !p.is_host)
                .map(|p| (p.id, p.avatar.is_some()))
                .collect();
            let status = status_view(&players, &flags, TaskType::Drawing);
            let task = ViewPayload::Task {
                task_type: TaskType::Drawing,
                task: TaskContent::Text("draw yourself".to_string()),
            };
            for player in &players {
                if player.is_host || flags.get(&player.id).copied().unwrap_or(false) {
                    send(state, game.id, player, status.clone());
                } else {
                    send(state, game.id, player, task.clone());
                }
            }
        }

        GameStage::Preround => {
            let mut flags = HashMap::new();
            for player in players.iter().filter(|p| !p.is_host) {
                flags.insert(
                    player.id,
                    rounds_service::finished_painting(&state.db, game.id, player.id).await?,
                );
            }
            let status = status_view(&players, &flags, TaskType::Drawing);
            for player in &players {
                if player.is_host || flags.get(&player.id).copied().unwrap_or(false) {
                    send(state, game.id, player, status.clone());
                } else {
                    let prompt = rounds_service::drawing_task(&state.db, game.id, player.id)
                        .await?
                        .unwrap_or_default();
                    let view = ViewPayload::Task {
                        task_type: TaskType::Drawing,
                        task: TaskContent::Text(prompt),
                    };
                    send(state, game.id, player, view);
                }
            }
        }

        GameStage::Round => {
            let Some(round) = rounds_repo::find_current(&state.db, game.id).await? else {
                return Ok(());
            };
            match round.stage {
                RoundStage::Writing => {
                    broadcast_writing(state, game, &round, &players).await?;
                }
                RoundStage::Selecting => {
                    broadcast_selecting(state, game, &round, &players, cache).await?;
                }
                // The coordinator drives the reveal with display_answer
                // messages; nothing to project here.
                RoundStage::Answers => {}
                RoundStage::Results => {
                    let view = results_view(state, game.id).await?;
                    for player in &players {
                        send(state, game.id, player, view.clone());
                    }
                }
                RoundStage::NotStarted | RoundStage::Finished => {}
            }
        }

        // Handled by the caller before dispatch.
        GameStage::Finished => {}
    }
    Ok(())
}

async fn broadcast_writing(
    state: &AppState,
    game: &games::Model,
    round: &rounds::Model,
    players: &[players::Model],
) -> Result<(), DomainError> {
    // The task view needs the drawing; wait for the upload to land.
    let Some(painting) = round.painting.clone() else {
        return Ok(());
    };

    let mut flags = HashMap::new();
    for player in players.iter().filter(|p| !p.is_host) {
        flags.insert(
            player.id,
            variants_repo::find_by_author(&state.db, round.id, player.id)
                .await?
                .is_some(),
        );
    }
    let status = status_view(players, &flags, TaskType::Writing);
    let task = ViewPayload::Task {
        task_type: TaskType::Writing,
        task: TaskContent::Text(painting),
    };
    for player in players {
        if player.is_host || flags.get(&player.id).copied().unwrap_or(false) {
            send(state, game.id, player, status.clone());
        } else {
            send(state, game.id, player, task.clone());
        }
    }
    Ok(())
}

async fn broadcast_selecting(
    state: &AppState,
    game: &games::Model,
    round: &rounds::Model,
    players: &[players::Model],
    cache: &mut Option<VariantCache>,
) -> Result<(), DomainError> {
    let cache_valid = cache.as_ref().map(|c| c.round_id == round.id).unwrap_or(false);
    if !cache_valid {
        let variants = variants_repo::find_by_round(&state.db, round.id).await?;
        let mut by_player = HashMap::new();
        for player in players {
            // A guesser never sees their own submission.
            let mut options: Vec<String> = variants
                .iter()
                .filter(|v| v.author_id != Some(player.id))
                .map(|v| v.text.clone())
                .collect();
            options.shuffle(&mut rand::rng());
            by_player.insert(player.id, options);
        }
        *cache = Some(VariantCache {
            round_id: round.id,
            by_player,
        });
    }

    let mut flags = HashMap::new();
    for player in players.iter().filter(|p| !p.is_host) {
        let done = player.id == round.painter_id
            || variants_repo::player_has_selection(&state.db, round.id, player.id).await?;
        flags.insert(player.id, done);
    }
    let status = status_view(players, &flags, TaskType::Selecting);
    for player in players {
        if player.is_host || flags.get(&player.id).copied().unwrap_or(false) {
            send(state, game.id, player, status.clone());
        } else {
            let options = cache
                .as_ref()
                .and_then(|c| c.by_player.get(&player.id))
                .cloned()
                .unwrap_or_default();
            let view = ViewPayload::Task {
                task_type: TaskType::Selecting,
                task: TaskContent::Options(options),
            };
            send(state, game.id, player, view);
        }
    }
    Ok(())
}

fn status_view(
    players: &[players::Model],
    flags: &HashMap<i64, bool>,
    task_type: TaskType,
) -> ViewPayload {
    let mut roster = BTreeMap::new();
    for player in players.iter().filter(|p| !p.is_host) {
        roster.insert(
            player.nickname.clone().unwrap_or_default(),
            PlayerStatus {
                avatar: player.avatar.clone(),
                finished: flags.get(&player.id).copied().unwrap_or(false),
            },
        );
    }
    ViewPayload::Status {
        players: roster,
        task_type: Some(task_type),
    }
}

async fn results_view(state: &AppState, game_id: i64) -> Result<ViewPayload, DomainError> {
    let standings = scoring_service::get_results(&state.db, game_id).await?;
    let results = standings
        .into_iter()
        .map(|(result, player)| ResultEntry {
            nickname: player.nickname.unwrap_or_default(),
            avatar: player.avatar,
            drawing_color: player.drawing_color,
            result: result.result,
            round_increment: result.round_increment,
        })
        .collect();
    Ok(ViewPayload::Results { results })
}

/// Unicast to one participant's live connection, if any. Delivery to a dead
/// channel is the registry's problem: logged and skipped.
fn send(state: &AppState, game_id: i64, player: &players::Model, view: ViewPayload) {
    if let Some(channel) = &player.channel_name {
        state
            .registry
            .send_to(game_id, channel, ServerMsg::Update { view });
    }
}
