use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Execute a function within a database transaction: begin, run the
/// closure, commit on Ok, best-effort rollback on Err (preserving the
/// original error).
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    F: for<'c> FnOnce(
        &'c DatabaseTransaction,
    ) -> Pin<Box<dyn Future<Output = Result<R, AppError>> + 'c>>,
{
    let txn = state.db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
