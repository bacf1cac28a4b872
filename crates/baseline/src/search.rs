//! Lag-N lookup over time-ordered events.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use refcast_series::Event;

/// Returns the index of the event `order` steps before `anchor`.
///
/// `events` must be sorted ascending by time. With an event exactly at the
/// anchor, the answer is `order` positions before it; otherwise the nearest
/// earlier event counts as the first step. Order zero therefore yields the
/// latest event at or before the anchor. Returns `None` when the series is
/// empty, starts at or after the anchor, or is too short.
///
/// Runs in `O(log n)`.
pub fn nth_nearest_earlier<T>(
    events: &[Event<T>],
    anchor: DateTime<Utc>,
    order: usize,
) -> Option<usize> {
    if events.first()?.time() >= anchor {
        return None;
    }

    let (mut low, mut high) = (0, events.len());
    let mut closest = None;
    while low < high {
        let mid = low + (high - low) / 2;
        match events[mid].time().cmp(&anchor) {
            Ordering::Less => {
                closest = Some(mid);
                low = mid + 1;
            }
            Ordering::Greater => high = mid,
            Ordering::Equal => return mid.checked_sub(order),
        }
    }

    let closest = closest?;
    match order {
        0 => Some(closest),
        _ => (closest + 1).checked_sub(order),
    }
}
