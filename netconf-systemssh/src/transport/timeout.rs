//! Operation-level timeouts.

use std::future::Future;
use std::time::Duration;

use crate::error::{Result, TransportError};

/// Run `operation` bounded by `timeout`.
///
/// On expiry the operation future is dropped, releasing anything it holds,
/// and `OperationTimeout` carrying `message` is returned. A zero `timeout`
/// leaves the operation unbounded.
pub async fn operation_timeout<T, F>(timeout: Duration, message: &str, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if timeout.is_zero() {
        return operation.await;
    }

    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::OperationTimeout {
            message: message.to_string(),
            timeout,
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_completes_within_timeout() {
        let value = assert_ok!(
            operation_timeout(Duration::from_secs(1), "slow", async { Ok(7) }).await
        );
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_expiry_carries_message() {
        let err = assert_err!(
            operation_timeout(
                Duration::from_millis(10),
                "Timed out doing the thing",
                std::future::pending::<Result<()>>(),
            )
            .await
        );
        assert!(err.is_timeout());
        assert!(err.to_string().contains("Timed out doing the thing"));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let err = assert_err!(
            operation_timeout(Duration::from_secs(1), "slow", async {
                Err::<(), crate::Error>(TransportError::auth_failed("nope").into())
            })
            .await
        );
        assert!(err.is_authentication_failed());
    }

    #[tokio::test]
    async fn test_zero_timeout_is_unbounded() {
        let value = assert_ok!(
            operation_timeout(Duration::ZERO, "slow", async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok("done")
            })
            .await
        );
        assert_eq!(value, "done");
    }
}
