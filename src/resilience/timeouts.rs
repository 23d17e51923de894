//! Timeout enforcement.
//!
//! Every upstream call runs under a deadline. An elapsed deadline becomes
//! its own error kind so it can be answered with 504 instead of the generic
//! proxy failure.

use std::future::Future;
use std::time::Duration;

use crate::error::ProxyError;

/// Run `fut` under `limit`, mapping expiry to [`ProxyError::Timeout`].
pub async fn with_deadline<T, F>(limit: Duration, fut: F) -> Result<T, ProxyError>
where
    F: Future<Output = Result<T, ProxyError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProxyError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_inside_deadline() {
        let value = with_deadline(Duration::from_millis(200), async { Ok::<_, ProxyError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn expiry_is_distinct_error() {
        let result = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok::<_, ProxyError>(())
        })
        .await;
        assert!(matches!(result, Err(ProxyError::Timeout(d)) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn inner_errors_pass_through() {
        let result: Result<(), _> = with_deadline(Duration::from_secs(1), async {
            Err(ProxyError::InvalidTarget("nope".into()))
        })
        .await;
        assert!(matches!(result, Err(ProxyError::InvalidTarget(_))));
    }
}
