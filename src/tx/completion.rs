//! Completion handles
//!
//! A broadcast transaction's final status, observable as pending, succeeded
//! or failed. A handle leaves `Pending` exactly once. The poll task runs to
//! completion whether or not anyone is still watching.

use crate::error::HawalaResult;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::sync::watch;

/// Final on-chain result of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutcome {
    pub tx_hash: String,
    /// 0 on success
    pub code: u32,
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(default)]
    pub raw_log: Option<String>,
}

impl TxOutcome {
    pub fn success(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            code: 0,
            height: None,
            raw_log: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum CompletionStatus {
    Pending,
    Succeeded(TxOutcome),
    Failed(String),
}

impl CompletionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, CompletionStatus::Pending)
    }

    fn from_result(result: HawalaResult<TxOutcome>) -> Self {
        match result {
            Ok(outcome) if outcome.is_success() => CompletionStatus::Succeeded(outcome),
            Ok(outcome) => CompletionStatus::Failed(
                outcome
                    .raw_log
                    .unwrap_or_else(|| format!("Transaction failed with code {}", outcome.code)),
            ),
            Err(e) => CompletionStatus::Failed(e.message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionHandle {
    rx: watch::Receiver<CompletionStatus>,
}

impl CompletionHandle {
    /// Track `poll` on a background task. Must be called inside a tokio runtime.
    pub fn spawn<F>(poll: F) -> Self
    where
        F: Future<Output = HawalaResult<TxOutcome>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(CompletionStatus::Pending);
        tokio::spawn(async move {
            let status = CompletionStatus::from_result(poll.await);
            // No receivers left is fine: the caller stopped caring.
            let _ = tx.send(status);
        });
        Self { rx }
    }

    /// Handle that is already settled with `result`
    pub fn settled(result: HawalaResult<TxOutcome>) -> Self {
        let (_tx, rx) = watch::channel(CompletionStatus::from_result(result));
        Self { rx }
    }

    pub fn resolved(outcome: TxOutcome) -> Self {
        Self::settled(Ok(outcome))
    }

    pub fn status(&self) -> CompletionStatus {
        self.rx.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.rx.borrow().is_pending()
    }

    /// Wait until the handle settles
    pub async fn wait(&self) -> CompletionStatus {
        let mut rx = self.rx.clone();
        let status = match rx.wait_for(|status| !status.is_pending()).await {
            Ok(status) => status.clone(),
            Err(_) => CompletionStatus::Failed("Confirmation task ended unexpectedly".to_string()),
        };
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HawalaError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_resolved_handle() {
        let handle = CompletionHandle::resolved(TxOutcome::success("ABC"));
        assert!(!handle.is_pending());
        assert_eq!(
            handle.wait().await,
            CompletionStatus::Succeeded(TxOutcome::success("ABC"))
        );
    }

    #[tokio::test]
    async fn test_spawned_handle_transitions_once() {
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let handle = CompletionHandle::spawn(async move {
            let _ = gate.await;
            Ok(TxOutcome::success("HASH"))
        });
        assert!(handle.is_pending());

        release.send(()).unwrap();
        let status = handle.wait().await;
        assert_eq!(status, CompletionStatus::Succeeded(TxOutcome::success("HASH")));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.status(), status);
    }

    #[tokio::test]
    async fn test_wait_from_clone_after_settle() {
        let handle = CompletionHandle::spawn(async { Ok(TxOutcome::success("LATE")) });
        let watcher = handle.clone();
        let first = handle.wait().await;
        drop(handle);

        assert_eq!(watcher.wait().await, first);
        assert_eq!(watcher.wait().await, CompletionStatus::Succeeded(TxOutcome::success("LATE")));
    }

    #[tokio::test]
    async fn test_failed_poll() {
        let handle = CompletionHandle::spawn(async { Err(HawalaError::network_error("poll timed out")) });
        assert_eq!(
            handle.wait().await,
            CompletionStatus::Failed("poll timed out".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_zero_code_is_failure() {
        let handle = CompletionHandle::spawn(async {
            Ok(TxOutcome {
                tx_hash: "H".to_string(),
                code: 5,
                height: Some(10),
                raw_log: Some("insufficient funds".to_string()),
            })
        });
        assert_eq!(
            handle.wait().await,
            CompletionStatus::Failed("insufficient funds".to_string())
        );
    }
}
