//! Timeout utilities for page operations
//!
//! Provides async timeout wrappers to prevent indefinite hangs during
//! page navigation, loading, and other browser operations.

use std::future::Future;
use std::time::Duration;

use super::RenderError;

/// Wrap an async page operation with an explicit timeout
///
/// # Arguments
/// * `operation` - The async Future to execute with a timeout
/// * `limit` - Timeout duration
/// * `operation_name` - Human-readable name for error messages
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err` - Either the operation failed or `RenderError::Timeout`
pub async fn with_page_timeout<F, T>(
    operation: F,
    limit: Duration,
    operation_name: &'static str,
) -> Result<T, RenderError>
where
    F: Future<Output = Result<T, RenderError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout {
            operation: operation_name,
            after: limit,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_operation_times_out() {
        let result: Result<(), RenderError> = with_page_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
            Duration::from_secs(30),
            "Page navigation",
        )
        .await;

        assert!(matches!(
            result,
            Err(RenderError::Timeout { operation: "Page navigation", after }) if after == Duration::from_secs(30)
        ));
    }

    #[tokio::test]
    async fn fast_operation_passes_through() {
        let result = with_page_timeout(async { Ok(7) }, Duration::from_secs(1), "Page load").await;
        assert_eq!(result.ok(), Some(7));
    }
}
