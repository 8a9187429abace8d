//! Scoring engine: one transactional pass per round.

use std::collections::HashMap;

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::info;

use crate::domain::rules::{
    POINTS_FOR_CORRECT_ANSWER, POINTS_FOR_CORRECT_RECOGNITION, POINTS_FOR_RECOGNITION,
};
use crate::entities::{players, results};
use crate::errors::domain::DomainError;
use crate::repos::{
    players as players_repo, results as results_repo, rounds as rounds_repo,
    variants as variants_repo,
};

/// Zeroed result rows for every participant, created at game start.
pub async fn create_results<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    for player in players_repo::find_by_game(conn, game_id, false).await? {
        results_repo::create_result(conn, game_id, player.id).await?;
    }
    Ok(())
}

/// Computes point deltas for the current round and commits them atomically.
///
/// The pass holds exclusive row locks on the room's results for its whole
/// window, resets every `round_increment` to zero, then walks the round's
/// variants:
/// - the painter's own variant awards the painter
///   `POINTS_FOR_CORRECT_RECOGNITION` per selector and each selector a flat
///   `POINTS_FOR_CORRECT_ANSWER`;
/// - any other authored variant awards its author
///   `POINTS_FOR_RECOGNITION` per selector - fooling others pays even when
///   not painting;
/// - decoys have no author and award nothing.
///
/// Reset-then-compute is the only supported entry point; re-running the pass
/// without a fresh reset would double-count.
pub async fn calculate_results<C>(conn: &C, game_id: i64) -> Result<(), DomainError>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    let txn = conn.begin().await.map_err(DomainError::from)?;

    let round = rounds_repo::require_current(&txn, game_id).await?;
    results_repo::lock_for_scoring(&txn, game_id).await?;
    results_repo::reset_round_increments(&txn, game_id).await?;

    let variants = variants_repo::find_by_round(&txn, round.id).await?;
    let mut selectors: HashMap<i64, Vec<i64>> = HashMap::new();
    for (variant_id, player_id) in variants_repo::selections_by_round(&txn, round.id).await? {
        selectors.entry(variant_id).or_default().push(player_id);
    }

    for variant in variants {
        let picked_by = selectors.remove(&variant.id).unwrap_or_default();
        match variant.author_id {
            Some(author) if author == round.painter_id => {
                results_repo::add_points(
                    &txn,
                    game_id,
                    &[author],
                    POINTS_FOR_CORRECT_RECOGNITION * picked_by.len() as i32,
                )
                .await?;
                results_repo::add_points(&txn, game_id, &picked_by, POINTS_FOR_CORRECT_ANSWER)
                    .await?;
            }
            Some(author) => {
                results_repo::add_points(
                    &txn,
                    game_id,
                    &[author],
                    POINTS_FOR_RECOGNITION * picked_by.len() as i32,
                )
                .await?;
            }
            None => {}
        }
    }

    txn.commit().await.map_err(DomainError::from)?;
    info!(game_id, round_id = round.id, "results updated");
    Ok(())
}

/// Standings with player info, ordered best-first.
pub async fn get_results<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<(results::Model, players::Model)>, DomainError> {
    let players: HashMap<i64, players::Model> =
        players_repo::find_by_game(conn, game_id, true)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

    let mut standings = Vec::new();
    for result in results_repo::find_by_game(conn, game_id).await? {
        if let Some(player) = players.get(&result.player_id) {
            standings.push((result, player.clone()));
        }
    }
    Ok(standings)
}
