use crate::services::record_store_operation;
use service_core::error::AppError;
use std::future::Future;
use std::time::Duration;

/// Runs one storage call under `limit`.
///
/// The call is spawned so that dropping the request (client disconnect) does
/// not cancel it; it always runs to completion or to the deadline.
pub async fn bounded<T, F>(operation: &'static str, limit: Duration, call: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, AppError>> + Send + 'static,
{
    let handle = tokio::spawn(tokio::time::timeout(limit, call));

    let result = match handle.await {
        Ok(Ok(result)) => result,
        Ok(Err(_elapsed)) => Err(AppError::Timeout(anyhow::anyhow!(
            "Storage operation '{}' exceeded {}s",
            operation,
            limit.as_secs_f64()
        ))),
        Err(join_error) => Err(AppError::InternalError(anyhow::anyhow!(
            "Storage operation '{}' aborted: {}",
            operation,
            join_error
        ))),
    };

    match &result {
        Ok(_) => record_store_operation(operation, "ok"),
        Err(err) => {
            tracing::warn!(operation = operation, code = err.code(), error = %err, "Storage operation failed");
            record_store_operation(operation, err.code());
        }
    }

    result
}
