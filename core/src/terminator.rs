//! Mediated termination of the process owning a connection.

use tracing::info;

use crate::domain::ConnectionRecord;
use crate::error::TerminationError;
use crate::ports::KillProvider;

/// Terminates processes by their owner identifier.
///
/// The terminator validates the identifier, delegates to the kill provider
/// and reports the outcome. It never retries, and it does not own the
/// scheduler: the caller reacts to success by triggering a re-scan.
pub struct ProcessTerminator<K: KillProvider> {
    kill: K,
}

impl<K: KillProvider> ProcessTerminator<K> {
    /// Create a terminator over the given kill provider.
    pub fn new(kill: K) -> Self {
        Self { kill }
    }

    /// Validate an owner token as a positive integer process id.
    pub fn validate(owner: Option<&str>) -> Result<u32, TerminationError> {
        let token = owner
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TerminationError::InvalidTarget("no owner identifier".to_string()))?;

        match token.parse::<u32>() {
            Ok(pid) if pid > 0 => Ok(pid),
            _ => Err(TerminationError::InvalidTarget(token.to_string())),
        }
    }

    /// Terminate the process behind an owner identifier.
    ///
    /// A non-numeric or missing identifier is rejected without any kill
    /// attempt. On success the caller should trigger a re-scan so the table
    /// reflects the change.
    pub async fn terminate(&self, owner: Option<&str>) -> Result<(), TerminationError> {
        let pid = Self::validate(owner)?;

        self.kill
            .kill(pid)
            .await
            .map_err(|err| TerminationError::Failed {
                pid,
                reason: err.to_string(),
            })?;

        info!(pid, "process terminated");
        Ok(())
    }

    /// Terminate the process owning the given record.
    pub async fn terminate_record(&self, record: &ConnectionRecord) -> Result<(), TerminationError> {
        self.terminate(record.owner.as_deref()).await
    }

    /// Whether the process behind an identifier is still running.
    pub fn is_running(&self, pid: u32) -> bool {
        self.kill.is_running(pid)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsStore;
    use crate::domain::{ConnState, FilterConfig, Protocol};
    use crate::error::{Error, Result};
    use crate::parser::SnapshotGrammar;
    use crate::ports::{DisplaySink, SnapshotProvider};
    use crate::scheduler::{ScanScheduler, SchedulerOptions};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    /// Kill provider recording requests and answering from a script.
    struct MockKill {
        killed: parking_lot::Mutex<Vec<u32>>,
        fail_with: Option<String>,
    }

    impl MockKill {
        fn succeeding() -> Self {
            Self {
                killed: parking_lot::Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                killed: parking_lot::Mutex::new(Vec::new()),
                fail_with: Some(reason.to_string()),
            }
        }
    }

    impl KillProvider for MockKill {
        async fn kill(&self, pid: u32) -> Result<()> {
            self.killed.lock().push(pid);
            match &self.fail_with {
                Some(reason) => Err(Error::CommandFailed(reason.clone())),
                None => Ok(()),
            }
        }

        fn is_running(&self, _pid: u32) -> bool {
            false
        }
    }

    #[test]
    fn test_validate_rejects_bad_targets() {
        for bad in [None, Some("abc"), Some("0"), Some("-5"), Some(""), Some("12.5")] {
            assert!(matches!(
                ProcessTerminator::<MockKill>::validate(bad),
                Err(TerminationError::InvalidTarget(_))
            ));
        }
    }

    #[test]
    fn test_validate_accepts_positive_integers() {
        assert_eq!(ProcessTerminator::<MockKill>::validate(Some("1234")).unwrap(), 1234);
        assert_eq!(ProcessTerminator::<MockKill>::validate(Some(" 42 ")).unwrap(), 42);
    }

    #[tokio::test]
    async fn test_invalid_target_never_reaches_provider() {
        let terminator = ProcessTerminator::new(MockKill::succeeding());
        let result = terminator.terminate(Some("not-a-pid")).await;
        assert!(matches!(result, Err(TerminationError::InvalidTarget(_))));
        assert!(terminator.kill.killed.lock().is_empty());
    }

    #[tokio::test]
    async fn test_successful_termination() {
        let terminator = ProcessTerminator::new(MockKill::succeeding());
        terminator.terminate(Some("1234")).await.unwrap();
        assert_eq!(*terminator.kill.killed.lock(), vec![1234]);
    }

    #[tokio::test]
    async fn test_failure_carries_pid_and_reason() {
        let terminator = ProcessTerminator::new(MockKill::failing("denied by OS"));
        let err = terminator.terminate(Some("77")).await.unwrap_err();
        match err {
            TerminationError::Failed { pid, reason } => {
                assert_eq!(pid, 77);
                assert!(reason.contains("denied by OS"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_terminate_record_uses_owner_field() {
        let terminator = ProcessTerminator::new(MockKill::succeeding());
        let record = ConnectionRecord::new(
            Protocol::Tcp,
            "0.0.0.0:4200",
            4200,
            Some(ConnState::Listening),
            Some("4321".to_string()),
            None,
        );
        terminator.terminate_record(&record).await.unwrap();
        assert_eq!(*terminator.kill.killed.lock(), vec![4321]);

        let ownerless = ConnectionRecord::new(
            Protocol::Udp,
            "0.0.0.0:53",
            53,
            None,
            None,
            None,
        );
        assert!(matches!(
            terminator.terminate_record(&ownerless).await,
            Err(TerminationError::InvalidTarget(_))
        ));
    }

    // ------------------------------------------------------------------
    // End-to-end: terminate, then the caller refreshes through the scheduler
    // ------------------------------------------------------------------

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl SnapshotProvider for CountingProvider {
        async fn fetch(&self, _protocol: Protocol) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("TCP  0.0.0.0:4200  0.0.0.0:0  LISTENING  1234\n".to_string())
        }
    }

    #[derive(Default)]
    struct QuietSink {
        published: AtomicUsize,
    }

    impl DisplaySink for QuietSink {
        fn scan_started(&self) {}
        fn publish(&self, _records: &[ConnectionRecord], _updated_at: SystemTime) {
            self.published.fetch_add(1, Ordering::SeqCst);
        }
        fn scan_failed(&self, _error: &Error) {}
    }

    #[tokio::test]
    async fn test_termination_success_drives_one_fresh_scan() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(QuietSink::default());
        let scheduler = ScanScheduler::with_options(
            CountingProvider { calls: calls.clone() },
            SettingsStore::with_path(dir.path().join(".portmon.json")),
            sink.clone(),
            FilterConfig::new(vec![4200], true),
            SchedulerOptions {
                interval: Duration::from_secs(60),
                scan_timeout: None,
                protocol: Protocol::Tcp,
                grammar: SnapshotGrammar::windows(),
            },
        );

        let terminator = ProcessTerminator::new(MockKill::succeeding());
        terminator.terminate(Some("1234")).await.unwrap();

        // The caller's reaction to success: exactly one out-of-cadence scan.
        assert!(scheduler.trigger_once());

        for _ in 0..200 {
            if sink.published.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.published.load(Ordering::SeqCst), 1);
    }
}
