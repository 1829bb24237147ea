use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::compile::{CLIP_SPACE_HALF, CLIP_SPACE_SIZE};

/// Identity of a stop within one collection.
///
/// Assigned on creation and never reused while the collection lives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub u32);

impl StopId {
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The identity after this one, or `None` at `u32::MAX`.
    #[inline]
    pub const fn checked_next(self) -> Option<StopId> {
        match self.0.checked_add(1) {
            Some(v) => Some(StopId(v)),
            None => None,
        }
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single gradient control point.
///
/// `percentage` is conceptually in `[0, 100]` but is not clamped: stops outside
/// that range place the gradient's origin or end off-screen.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub percentage: f32,
    pub color: Rgb,
}

impl Stop {
    #[inline]
    pub const fn new(id: StopId, percentage: f32, color: Rgb) -> Self {
        Self {
            id,
            percentage,
            color,
        }
    }

    /// Canonical compile order: percentage ascending, then identity ascending.
    ///
    /// Percentages use `total_cmp`, so the order is total even for NaN or
    /// infinite values (they sort after every finite percentage).
    pub fn compare(a: &Stop, b: &Stop) -> Ordering {
        a.percentage
            .total_cmp(&b.percentage)
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Unclamped affine map from percentage to the 2-unit clip-space strip.
    ///
    /// Divides before scaling so whole percentages such as 0, 50, 100 and 200
    /// land exactly on `-1`, `0`, `1` and `3`.
    #[inline]
    pub fn clip_x(&self) -> f32 {
        self.percentage / 100.0 * CLIP_SPACE_SIZE - CLIP_SPACE_HALF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: u32, percentage: f32) -> Stop {
        Stop::new(StopId(id), percentage, Rgb::WHITE)
    }

    // ── compare ───────────────────────────────────────────────────────────

    #[test]
    fn compare_orders_by_percentage_first() {
        assert_eq!(Stop::compare(&stop(9, 10.0), &stop(1, 20.0)), Ordering::Less);
        assert_eq!(Stop::compare(&stop(1, 20.0), &stop(9, 10.0)), Ordering::Greater);
    }

    #[test]
    fn compare_breaks_ties_by_identity() {
        assert_eq!(Stop::compare(&stop(1, 50.0), &stop(3, 50.0)), Ordering::Less);
        assert_eq!(Stop::compare(&stop(3, 50.0), &stop(1, 50.0)), Ordering::Greater);
        assert_eq!(Stop::compare(&stop(3, 50.0), &stop(3, 50.0)), Ordering::Equal);
    }

    #[test]
    fn compare_sort_is_independent_of_input_order() {
        let mut a = vec![stop(3, 50.0), stop(1, 50.0), stop(2, 10.0)];
        let mut b = vec![stop(2, 10.0), stop(3, 50.0), stop(1, 50.0)];
        a.sort_by(Stop::compare);
        b.sort_by(Stop::compare);
        let ids = |v: &[Stop]| v.iter().map(|s| s.id.get()).collect::<Vec<_>>();
        assert_eq!(ids(&a), vec![2, 1, 3]);
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn compare_places_nan_last() {
        let mut v = vec![stop(1, f32::NAN), stop(2, 100.0), stop(3, -5.0)];
        v.sort_by(Stop::compare);
        assert_eq!(v[0].id, StopId(3));
        assert_eq!(v[1].id, StopId(2));
        assert_eq!(v[2].id, StopId(1));
    }

    // ── clip_x ────────────────────────────────────────────────────────────

    #[test]
    fn clip_x_maps_visible_range_to_unit_edges() {
        assert_eq!(stop(1, 0.0).clip_x(), -1.0);
        assert_eq!(stop(1, 50.0).clip_x(), 0.0);
        assert_eq!(stop(1, 100.0).clip_x(), 1.0);
    }

    #[test]
    fn clip_x_is_unclamped() {
        assert_eq!(stop(1, 150.0).clip_x(), 2.0);
        assert_eq!(stop(1, -50.0).clip_x(), -2.0);
    }

    #[test]
    fn stop_id_next_stops_at_the_top_of_the_range() {
        assert_eq!(StopId(4).checked_next(), Some(StopId(5)));
        assert_eq!(StopId(u32::MAX).checked_next(), None);
    }
}
