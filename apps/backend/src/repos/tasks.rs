//! Task/decoy corpus repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::tasks_sea as tasks_adapter;
use crate::entities::{auto_answers, tasks};
use crate::errors::domain::DomainError;

pub async fn random_task<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    language: &str,
    excluded_ids: &[i64],
) -> Result<Option<tasks::Model>, DomainError> {
    Ok(tasks_adapter::random_task(conn, language, excluded_ids).await?)
}

pub async fn count_tasks<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    language: &str,
) -> Result<u64, DomainError> {
    Ok(tasks_adapter::count_tasks(conn, language).await?)
}

pub async fn random_auto_answers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    language: &str,
    number: u64,
) -> Result<Vec<auto_answers::Model>, DomainError> {
    Ok(tasks_adapter::random_auto_answers(conn, language, number).await?)
}
