//! Polling a task until it settles.
//!
//! ```text
//!   fetch ──▶ Settled ──▶ verify records ──▶ Ok(results)
//!     │
//!     ├─────▶ Failed  ──▶ Err(TaskFailed)
//!     │
//!     └─────▶ Pending ──▶ deadline passed? ──yes──▶ Err(Timeout)
//!                              │ no
//!                              └── sleep(interval) ──▶ fetch
//! ```

use primus_types::{TaskResult, TaskStatus, VerifyAndPollParams};
use std::future::Future;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{Result, RpcError};
use crate::messages::TaskResultResponse;

/// Fetch the task state every `params.interval()` until it is terminal or
/// `params.timeout()` has elapsed.
pub async fn poll_until_settled<F, Fut>(
    params: &VerifyAndPollParams,
    mut fetch: F,
) -> Result<Vec<TaskResult>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<TaskResultResponse>>,
{
    if params.interval_ms == 0 {
        return Err(RpcError::InvalidRequest(
            "poll interval must be greater than zero".to_string(),
        ));
    }

    let deadline = Instant::now() + params.timeout();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let response = fetch().await?;
        debug!(
            task_id = %params.task_id,
            attempt = attempts,
            status = ?response.status,
            "Polled task status"
        );

        match response.status {
            TaskStatus::Settled => {
                verify_results(&params.task_id, &response.results)?;
                info!(
                    task_id = %params.task_id,
                    attempts = attempts,
                    results = response.results.len(),
                    "Task settled"
                );
                return Ok(response.results);
            }
            TaskStatus::Failed { reason } => {
                return Err(RpcError::TaskFailed {
                    task_id: params.task_id.clone(),
                    reason,
                });
            }
            TaskStatus::Pending => {}
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(RpcError::Timeout(format!(
                "task {} not settled within {} ms ({} polls)",
                params.task_id, params.timeout_ms, attempts
            )));
        }
        tokio::time::sleep(params.interval().min(deadline - now)).await;
    }
}

/// A settled task must carry at least one record, all for the polled task
fn verify_results(task_id: &str, results: &[TaskResult]) -> Result<()> {
    if results.is_empty() {
        return Err(RpcError::InvalidResponse(format!(
            "task {} settled without attestation records",
            task_id
        )));
    }
    if let Some(stray) = results.iter().find(|r| r.task_id != task_id) {
        return Err(RpcError::InvalidResponse(format!(
            "record for task {} returned while polling {}",
            stray.task_id, task_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use primus_types::AttestationRecord;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn record(task_id: &str) -> TaskResult {
        TaskResult {
            task_id: task_id.to_string(),
            attestor: "0xattestor".to_string(),
            attestation: AttestationRecord {
                data: "{}".to_string(),
                recipient: None,
                timestamp: None,
            },
        }
    }

    fn settled(task_id: &str) -> TaskResultResponse {
        TaskResultResponse {
            status: TaskStatus::Settled,
            results: vec![record(task_id)],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_after_pending_polls() {
        let params = VerifyAndPollParams::new("t1", "0xr")
            .with_interval_ms(100)
            .with_timeout_ms(10_000);
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let results = poll_until_settled(&params, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Ok(TaskResultResponse::pending())
                } else {
                    Ok(settled("t1"))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300) && elapsed < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let params = VerifyAndPollParams::new("t1", "0xr")
            .with_interval_ms(400)
            .with_timeout_ms(1_000);
        let calls = AtomicU32::new(0);

        let err = poll_until_settled(&params, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(TaskResultResponse::pending()) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, RpcError::Timeout(_)));
        // t = 0, 400, 800, 1000
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_failed_task() {
        let params = VerifyAndPollParams::new("t1", "0xr");
        let err = poll_until_settled(&params, || async {
            Ok(TaskResultResponse {
                status: TaskStatus::Failed {
                    reason: "report rejected".to_string(),
                },
                results: vec![],
            })
        })
        .await
        .unwrap_err();

        match err {
            RpcError::TaskFailed { task_id, reason } => {
                assert_eq!(task_id, "t1");
                assert_eq!(reason, "report rejected");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rejects_foreign_records() {
        let params = VerifyAndPollParams::new("t1", "0xr");
        let err = poll_until_settled(&params, || async { Ok(settled("t2")) })
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_rejects_empty_settlement() {
        let params = VerifyAndPollParams::new("t1", "0xr");
        let err = poll_until_settled(&params, || async {
            Ok(TaskResultResponse {
                status: TaskStatus::Settled,
                results: vec![],
            })
        })
        .await
        .unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let params = VerifyAndPollParams::new("t1", "0xr").with_interval_ms(0);
        let err = poll_until_settled(&params, || async { Ok(settled("t1")) })
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidRequest(_)));
    }
}
