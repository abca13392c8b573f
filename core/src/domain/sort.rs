//! Type-aware, stable sorting of record sets.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::record::ConnectionRecord;

/// Sortable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Protocol,
    LocalAddress,
    LocalPort,
    State,
    Owner,
    ProcessName,
}

impl SortField {
    /// Fields whose tokens compare numerically.
    fn is_numeric(self) -> bool {
        matches!(self, SortField::LocalPort | SortField::Owner)
    }
}

/// Sort direction applied to present-vs-present comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Produce a new ordering of `records` by `field`.
///
/// The sort is stable: records with equal keys keep their relative order.
/// A record missing the sort field always orders before one that has it,
/// in both directions; two absent values compare equal.
pub fn sort_records(
    records: &[ConnectionRecord],
    field: SortField,
    direction: SortDirection,
) -> Vec<ConnectionRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare_records(a, b, field, direction));
    sorted
}

/// Comparator backing [`sort_records`], exposed for reuse by display layers.
pub fn compare_records(
    a: &ConnectionRecord,
    b: &ConnectionRecord,
    field: SortField,
    direction: SortDirection,
) -> Ordering {
    match (field_value(a, field), field_value(b, field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => direction.apply(compare_values(field, &x, &y)),
    }
}

fn field_value(record: &ConnectionRecord, field: SortField) -> Option<String> {
    match field {
        SortField::Protocol => Some(record.protocol.to_string()),
        SortField::LocalAddress => Some(record.local_address.clone()),
        SortField::LocalPort => Some(record.local_port.to_string()),
        SortField::State => record.state.as_ref().map(|s| s.to_string()),
        SortField::Owner => record.owner.clone(),
        SortField::ProcessName => record.process_name.clone(),
    }
}

/// Numeric fields compare as integers when both tokens parse; a pair with a
/// non-numeric token on either side falls back to plain string order rather
/// than being coerced to zero.
fn compare_values(field: SortField, x: &str, y: &str) -> Ordering {
    if field.is_numeric() {
        if let (Ok(xn), Ok(yn)) = (x.parse::<u64>(), y.parse::<u64>()) {
            return xn.cmp(&yn);
        }
    }
    x.cmp(y)
}

// ============================================================================
// Tests
// ============================================================================
