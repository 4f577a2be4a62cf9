//! Deadline for store calls.

use std::future::Future;

use tokio::time::{timeout, Duration};
use tracing::warn;

use common::{AppError, AppResult};

/// Run one store call under `limit`.
///
/// A call that does not finish in time is `ServiceUnavailable` for `store`;
/// nothing is retried. Errors from the call convert into [`AppError`].
pub async fn bounded<T, E, F>(
    limit: Duration,
    store: &'static str,
    operation: &'static str,
    call: F,
) -> AppResult<T>
where
    F: Future<Output = Result<T, E>>,
    AppError: From<E>,
{
    match timeout(limit, call).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            warn!(store, operation, timeout_ms = limit.as_millis() as u64, "Store call timed out");
            Err(AppError::service_unavailable(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_hung_call_is_service_unavailable() {
        let call = std::future::pending::<Result<(), AppError>>();

        let result = bounded(Duration::from_millis(2000), "session store", "get", call).await;

        match result {
            Err(AppError::ServiceUnavailable(store)) => assert_eq!(store, "session store"),
            other => panic!("expected ServiceUnavailable, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_503() {
        let call = std::future::pending::<Result<u32, AppError>>();

        let err = bounded(Duration::from_millis(50), "credential store", "ping", call)
            .await
            .unwrap_err();

        assert_eq!(err.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.is_infrastructure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_errors_pass_through() {
        let call = async { Err::<(), _>(AppError::AccountExists) };

        let result = bounded(Duration::from_millis(2000), "credential store", "create", call).await;
        assert!(matches!(result, Err(AppError::AccountExists)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_call_returns_value() {
        let call = async { Ok::<_, AppError>(7) };

        let value = bounded(Duration::from_millis(2000), "session store", "get", call)
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
