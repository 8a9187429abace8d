//! Shared helpers for integration suites: in-memory SQLite database,
//! corpus seeding, room factories.

#![allow(dead_code)]

use std::sync::Arc;

use migration::MigratorTrait as _;
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};

use backend::entities::{auto_answers, games, players, tasks};
use backend::services::games as games_service;
use backend::state::app_state::AppState;
use backend::{FsMediaStore, TaskRegistry};

/// Tiny but valid base64 payload standing in for a PNG upload.
pub const PNG_MEDIA: &str = "data:image/png;base64,aGVsbG8=";

pub async fn setup_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("connect to sqlite");
    migration::Migrator::up(&db, None)
        .await
        .expect("run migrations");
    db
}

pub async fn setup_state(db: DatabaseConnection) -> AppState {
    let tasks = TaskRegistry::build(&db, &["ru", "en"], Vec::new())
        .await
        .expect("build task registry");
    let media_root = std::env::temp_dir().join(format!("paintparty-test-{}", uuid::Uuid::new_v4()));
    AppState::new(
        db,
        Arc::new(tasks),
        Arc::new(FsMediaStore::new(media_root, "/media")),
    )
}

pub async fn seed_tasks(db: &DatabaseConnection, language: &str, texts: &[&str]) {
    for text in texts {
        tasks::ActiveModel {
            id: NotSet,
            language: Set(language.to_string()),
            text: Set((*text).to_string()),
            source: Set(String::new()),
        }
        .insert(db)
        .await
        .expect("seed task");
    }
}

pub async fn seed_auto_answers(db: &DatabaseConnection, language: &str, texts: &[&str]) {
    for text in texts {
        auto_answers::ActiveModel {
            id: NotSet,
            language: Set(language.to_string()),
            text: Set((*text).to_string()),
            source: Set(String::new()),
        }
        .insert(db)
        .await
        .expect("seed auto answer");
    }
}

pub struct TestRoom {
    pub game: games::Model,
    pub host: players::Model,
    pub players: Vec<players::Model>,
}

/// A pregame room with a host and `player_count` regular players.
pub async fn setup_room(db: &DatabaseConnection, player_count: usize, cycles: i32) -> TestRoom {
    let (game, host) = games_service::create_game(db, "host", "ru", cycles, None)
        .await
        .expect("create game");
    let mut players = Vec::new();
    for i in 0..player_count {
        let (_, player) = games_service::join_game(db, &game.code, &format!("player-{i}"))
            .await
            .expect("join game");
        players.push(player);
    }
    TestRoom {
        game,
        host,
        players,
    }
}
