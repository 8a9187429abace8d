//! Submission validation: guesses, selections, likes.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::domain::alphabet::consistent_alphabet;
use crate::domain::rules::MAX_VARIANT_LEN;
use crate::domain::similarity::too_similar;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::{players as players_repo, rounds as rounds_repo, variants as variants_repo};

/// Normalization applied to every free-text guess before validation:
/// NFC, trim, lowercase, truncate.
pub fn normalize_text(text: &str) -> String {
    text.nfc()
        .collect::<String>()
        .trim()
        .to_lowercase()
        .chars()
        .take(MAX_VARIANT_LEN)
        .collect()
}

/// Records a player's guess for the current round.
///
/// Resubmission by the same author is an idempotent no-op. Mixing alphabets
/// within a word rejects with `invalid_alphabet`; a fuzzy match against any
/// existing variant (including the true answer) rejects with `duplicate`.
pub async fn apply_variant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
    text: &str,
) -> Result<(), DomainError> {
    let round = rounds_repo::require_current(conn, game_id).await?;
    let player = players_repo::require_member(conn, game_id, player_id).await?;
    let text = normalize_text(text);

    if !consistent_alphabet(&text) {
        warn!(game_id, player_id, variant = %text, "variant failed the alphabet check");
        return Err(DomainError::validation(
            ValidationKind::InvalidAlphabet,
            "your variant contains words of letters from mixed alphabets",
        ));
    }

    if variants_repo::find_by_author(conn, round.id, player.id)
        .await?
        .is_some()
    {
        info!(
            game_id,
            player_id,
            round_id = round.id,
            "variant already applied, ignoring resubmission"
        );
        return Ok(());
    }

    for existing in variants_repo::find_by_round(conn, round.id).await? {
        if too_similar(&text, &existing.text) {
            return Err(DomainError::validation(
                ValidationKind::Duplicate,
                "your variant is too close to someone's variant or to the correct answer",
            ));
        }
    }

    variants_repo::create_variant(
        conn,
        variants_repo::VariantCreate {
            round_id: round.id,
            text,
            author_id: Some(player.id),
            task_id: None,
        },
    )
    .await?;
    info!(game_id, player_id, round_id = round.id, "variant applied");
    Ok(())
}

/// Records which variant a player picked as their guess. A second selection
/// within the same round rejects with `duplicate`.
pub async fn select_variant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
    answer: &str,
) -> Result<(), DomainError> {
    let round = rounds_repo::require_current(conn, game_id).await?;
    let player = players_repo::require_member(conn, game_id, player_id).await?;

    if variants_repo::player_has_selection(conn, round.id, player.id).await? {
        return Err(DomainError::validation(
            ValidationKind::Duplicate,
            "player has already selected a variant",
        ));
    }

    let variant = variants_repo::require_by_text(conn, round.id, answer).await?;
    variants_repo::insert_selection(conn, variant.id, player.id).await?;
    info!(
        game_id,
        player_id,
        variant_id = variant.id,
        "variant selected"
    );
    Ok(())
}

/// Records likes on the reveal screen. Own variants and repeated likes are
/// silently skipped.
pub async fn apply_likes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
    variant_ids: Vec<i64>,
) -> Result<(), DomainError> {
    let player = players_repo::require_member(conn, game_id, player_id).await?;
    for variant in variants_repo::find_by_ids(conn, variant_ids).await? {
        if variant.author_id == Some(player.id) {
            continue;
        }
        if variants_repo::has_like(conn, variant.id, player.id).await? {
            continue;
        }
        variants_repo::insert_like(conn, variant.id, player.id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_lowercases_and_truncates() {
        assert_eq!(normalize_text("  Зелёный Трактор  "), "зелёный трактор");
        let long = "a".repeat(300);
        assert_eq!(normalize_text(&long).chars().count(), MAX_VARIANT_LEN);
    }
}
