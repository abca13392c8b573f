//! Display sink port (interface).

use std::time::SystemTime;

use crate::domain::ConnectionRecord;
use crate::error::Error;

/// Port for the presentation layer consuming engine output.
///
/// The engine pushes one `publish` per completed scan; between
/// `scan_started` and the matching `publish`/`scan_failed` the UI may show a
/// wait indicator. A failed scan keeps the previously published record set.
pub trait DisplaySink: Send + Sync {
    /// A scan cycle has begun.
    fn scan_started(&self);

    /// A scan cycle completed; `records` is the filtered, ordered view.
    fn publish(&self, records: &[ConnectionRecord], updated_at: SystemTime);

    /// The snapshot provider failed; previous records remain valid.
    fn scan_failed(&self, error: &Error);
}
