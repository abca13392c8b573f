//! Scan scheduling - polling cadence, overlap suppression, manual triggers.
//!
//! The scheduler owns the whole scan cycle: fetch a snapshot through the
//! provider, parse it, apply the active filter and sort, cache the record
//! set and push the resulting view to the display sink. A periodic timer
//! drives the cadence; manual triggers run out of cadence. At most one scan
//! is ever in flight - triggers arriving while one runs are dropped, not
//! queued, so a slow OS call cannot build a backlog.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::SettingsStore;
use crate::domain::{
    filter_records, sort_records, ConnectionRecord, FilterConfig, Protocol, SortDirection,
    SortField,
};
use crate::error::Error;
use crate::parser::{parse_snapshot, SnapshotGrammar};
use crate::ports::{DisplaySink, SnapshotProvider};

/// Default polling cadence.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Default upper bound on one snapshot fetch.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a scan is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
}

/// Tunables for a scheduler instance.
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Seconds between periodic scans while monitoring is enabled.
    pub interval: Duration,
    /// Bound on one snapshot fetch; `None` lets a hung OS call block the
    /// scan slot indefinitely.
    pub scan_timeout: Option<Duration>,
    /// Protocol requested from the snapshot provider.
    pub protocol: Protocol,
    /// Column grammar used to parse snapshots.
    pub grammar: SnapshotGrammar,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SCAN_INTERVAL,
            scan_timeout: Some(DEFAULT_SCAN_TIMEOUT),
            protocol: Protocol::Tcp,
            grammar: SnapshotGrammar::for_host(),
        }
    }
}

/// The scan scheduler and record-set engine.
///
/// Monitoring is enabled from the start (matching the monitor-on-launch
/// behavior a UI expects), but no timer runs until `start()` is called.
/// `trigger_once()` works regardless of the enabled flag, so a refresh
/// button keeps working while monitoring is paused.
pub struct ScanScheduler<S: SnapshotProvider + 'static> {
    inner: Arc<Inner<S>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

struct Inner<S> {
    provider: S,
    settings: SettingsStore,
    sink: Arc<dyn DisplaySink>,
    options: SchedulerOptions,

    filter: RwLock<FilterConfig>,
    sort: RwLock<Option<(SortField, SortDirection)>>,

    /// Raw (unfiltered) record set of the last successful scan.
    records: RwLock<Vec<ConnectionRecord>>,
    updated_at: RwLock<Option<SystemTime>>,

    scanning: AtomicBool,
    enabled: AtomicBool,
}

impl<S: SnapshotProvider + 'static> ScanScheduler<S> {
    /// Create a scheduler with default options.
    pub fn new(
        provider: S,
        settings: SettingsStore,
        sink: Arc<dyn DisplaySink>,
        filter: FilterConfig,
    ) -> Self {
        Self::with_options(provider, settings, sink, filter, SchedulerOptions::default())
    }

    /// Create a scheduler with explicit options.
    pub fn with_options(
        provider: S,
        settings: SettingsStore,
        sink: Arc<dyn DisplaySink>,
        filter: FilterConfig,
        options: SchedulerOptions,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                settings,
                sink,
                options,
                filter: RwLock::new(filter),
                sort: RwLock::new(None),
                records: RwLock::new(Vec::new()),
                updated_at: RwLock::new(None),
                scanning: AtomicBool::new(false),
                enabled: AtomicBool::new(true),
            }),
            ticker: Mutex::new(None),
        }
    }

    /// Enable monitoring: scan immediately, then on every interval tick.
    pub fn start(&self) {
        self.inner.enabled.store(true, Ordering::SeqCst);
        info!(interval = ?self.inner.options.interval, "monitoring started");

        let mut ticker = self.ticker.lock();
        if let Some(handle) = ticker.take() {
            handle.abort();
        }

        let inner = Arc::clone(&self.inner);
        *ticker = Some(tokio::spawn(async move {
            let mut tick = time::interval(inner.options.interval);
            loop {
                // The first tick completes immediately.
                tick.tick().await;
                if !inner.enabled.load(Ordering::SeqCst) {
                    break;
                }
                Inner::spawn_scan(&inner);
            }
        }));
    }

    /// Disable monitoring and disarm the timer.
    ///
    /// A scan already in flight completes and publishes, but nothing re-arms
    /// the timer.
    pub fn stop(&self) {
        self.inner.enabled.store(false, Ordering::SeqCst);
        if let Some(handle) = self.ticker.lock().take() {
            handle.abort();
        }
        info!("monitoring stopped");
    }

    /// Invert the enabled flag, starting or stopping accordingly.
    pub fn toggle(&self) -> bool {
        let enable = !self.inner.enabled.load(Ordering::SeqCst);
        if enable {
            self.start();
        } else {
            self.stop();
        }
        enable
    }

    /// Perform a single out-of-cadence scan regardless of the enabled flag.
    ///
    /// Returns `false` when a scan is already in flight; the trigger is
    /// dropped, not queued.
    pub fn trigger_once(&self) -> bool {
        Inner::spawn_scan(&self.inner)
    }

    /// Replace the filter: republish the cached set under the new filter,
    /// persist it (fire-and-forget) and trigger a fresh scan.
    pub fn set_filter(&self, filter: FilterConfig) {
        *self.inner.filter.write() = filter.clone();
        self.inner.publish();

        let settings = self.inner.settings.clone();
        tokio::spawn(async move {
            if let Err(err) = settings.save(&filter).await {
                warn!(error = %err, "failed to persist filter settings");
            }
        });

        self.trigger_once();
    }

    /// Order the published view by the given field.
    pub fn set_sort(&self, field: SortField, direction: SortDirection) {
        *self.inner.sort.write() = Some((field, direction));
        self.inner.publish();
    }

    /// Return the published view to snapshot order.
    pub fn clear_sort(&self) {
        *self.inner.sort.write() = None;
        self.inner.publish();
    }

    /// The currently active filter.
    pub fn filter(&self) -> FilterConfig {
        self.inner.filter.read().clone()
    }

    /// The filtered, ordered view of the last successful scan.
    pub fn records(&self) -> Vec<ConnectionRecord> {
        self.inner.view()
    }

    /// Whether a scan is in flight right now.
    pub fn scan_state(&self) -> ScanState {
        if self.inner.scanning.load(Ordering::SeqCst) {
            ScanState::Scanning
        } else {
            ScanState::Idle
        }
    }

    /// Whether periodic monitoring is enabled.
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }
}

impl<S: SnapshotProvider + 'static> Drop for ScanScheduler<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.lock().take() {
            handle.abort();
        }
    }
}

impl<S: SnapshotProvider + 'static> Inner<S> {
    /// Start a scan as a detached task unless one is already in flight.
    ///
    /// The compare-and-swap on the scanning flag is what upholds the
    /// at-most-one-in-flight invariant; losers of the race are dropped.
    fn spawn_scan(inner: &Arc<Self>) -> bool {
        if inner
            .scanning
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("scan already in flight, dropping trigger");
            return false;
        }

        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            inner.run_scan().await;
            inner.scanning.store(false, Ordering::SeqCst);
        });
        true
    }

    async fn run_scan(&self) {
        self.sink.scan_started();

        let protocol = self.options.protocol;
        let fetched = match self.options.scan_timeout {
            Some(limit) => match time::timeout(limit, self.provider.fetch(protocol)).await {
                Ok(result) => result,
                Err(_) => Err(Error::CommandFailed(format!(
                    "snapshot command timed out after {:?}",
                    limit
                ))),
            },
            None => self.provider.fetch(protocol).await,
        };

        match fetched {
            Ok(raw) => {
                let records = parse_snapshot(&raw, &self.options.grammar, Some(protocol));
                debug!(count = records.len(), "scan completed");
                *self.records.write() = records;
                *self.updated_at.write() = Some(SystemTime::now());
                self.publish();
            }
            Err(err) => {
                // Previous records stay on display; the cadence is unaffected.
                warn!(error = %err, "scan failed, keeping previous records");
                self.sink.scan_failed(&err);
            }
        }
    }

    fn view(&self) -> Vec<ConnectionRecord> {
        let filtered = filter_records(&self.records.read(), &self.filter.read());
        match *self.sort.read() {
            Some((field, direction)) => sort_records(&filtered, field, direction),
            None => filtered,
        }
    }

    /// Push the current view to the sink. Nothing is published before the
    /// first successful scan.
    fn publish(&self) {
        let Some(updated_at) = *self.updated_at.read() else {
            return;
        };
        let view = self.view();
        self.sink.publish(&view, updated_at);
    }
}

// ============================================================================
// Tests
// ============================================================================
