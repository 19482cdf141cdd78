//! Completion of a unit of work from the outcome of the work done inside it.

use tracing::warn;

use crate::domain::{DomainResult, UnitOfWork};

/// Commit `uow` when `result` is `Ok`, roll it back otherwise.
///
/// The error produced inside the unit always wins over a failing rollback,
/// which is only logged.
pub async fn complete<T>(uow: Box<dyn UnitOfWork>, result: DomainResult<T>) -> DomainResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, cause = %err, "Rollback failed");
            }
            Err(err)
        }
    }
}
