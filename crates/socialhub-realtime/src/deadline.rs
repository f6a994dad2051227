//! Time budgets for external-service calls.

use std::future::Future;
use std::time::Duration;

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;

/// Run `fut` with a time budget, mapping expiry to a `Timeout` error.
pub async fn bounded<T, F>(budget: Duration, what: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout(format!(
            "{what} did not complete within {} ms",
            budget.as_millis()
        ))),
    }
}
