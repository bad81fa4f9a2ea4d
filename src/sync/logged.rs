//! Entry/exit logging for engine operations.

use std::future::Future;
use std::time::Instant;

use crate::error::Result;

/// Run `operation`, logging when it starts, finishes and fails.
pub async fn logged<T, F>(name: &str, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tracing::debug!(operation = name, "started");
    let started = Instant::now();

    let result = operation.await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => tracing::debug!(operation = name, elapsed_ms, "finished"),
        Err(e) => tracing::warn!(operation = name, elapsed_ms, error = %e, "failed"),
    }

    result
}
