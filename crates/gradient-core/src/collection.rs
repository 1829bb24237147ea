use std::collections::BTreeMap;
use std::fmt;

use crate::color::Rgb;
use crate::stop::{Stop, StopId};

/// Callback invoked after every successful mutation.
pub type ChangeListener = Box<dyn FnMut(&StopCollection)>;

/// Identity-keyed set of gradient stops.
///
/// Storage order carries no meaning; consumers that need an order call
/// [`sorted`](Self::sorted), which recomputes it on every call.
///
/// Every mutation path (`add`, `set_*`, `remove`, `replace_all`) notifies the
/// registered listener exactly once after the change is applied. Lookups and
/// edits addressed to a missing identity leave the collection untouched and
/// do not notify.
#[derive(Default)]
pub struct StopCollection {
    stops: BTreeMap<StopId, Stop>,
    listener: Option<ChangeListener>,
}

impl StopCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two stops a fresh editor starts with: blue at 0%, red at 100%.
    pub fn with_defaults() -> Self {
        let mut stops = Self::new();
        stops.insert(Stop::new(StopId(1), 0.0, Rgb::BLUE));
        stops.insert(Stop::new(StopId(2), 100.0, Rgb::RED));
        stops
    }

    /// Registers the change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: impl FnMut(&StopCollection) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(&id)
    }

    pub fn contains(&self, id: StopId) -> bool {
        self.stops.contains_key(&id)
    }

    /// Iterates stops in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    pub fn max_id(&self) -> Option<StopId> {
        self.stops.keys().next_back().copied()
    }

    /// Identity the next added stop receives: current maximum + 1, or 1 when empty.
    ///
    /// The maximum is recomputed from the surviving stops, so deleting stops
    /// never lets a live identity be handed out twice. When the maximum is
    /// `u32::MAX` the lowest unused identity is returned instead; `None` only
    /// when every identity is live.
    pub fn next_id(&self) -> Option<StopId> {
        match self.max_id() {
            None => Some(StopId(1)),
            Some(max) => max.checked_next().or_else(|| self.lowest_unused_id()),
        }
    }

    fn lowest_unused_id(&self) -> Option<StopId> {
        let mut candidate = StopId(1);
        for &id in self.stops.keys() {
            if id < candidate {
                continue;
            }
            if id > candidate {
                break;
            }
            candidate = candidate.checked_next()?;
        }
        Some(candidate)
    }

    /// Materializes the canonical compile order (see [`Stop::compare`]).
    pub fn sorted(&self) -> Vec<Stop> {
        let mut out: Vec<Stop> = self.stops.values().copied().collect();
        out.sort_by(Stop::compare);
        out
    }

    /// Adds a new stop under a fresh identity and returns that identity.
    ///
    /// Returns `None`, leaving the collection untouched, when no identity is free.
    pub fn add(&mut self, percentage: f32, color: Rgb) -> Option<StopId> {
        let Some(id) = self.next_id() else {
            log::warn!("no free stop identity; stop not added");
            return None;
        };
        debug_assert!(!self.contains(id));
        self.insert(Stop::new(id, percentage, color));
        log::debug!("stop {id} added at {percentage}%");
        self.notify();
        Some(id)
    }

    /// Moves a stop. Returns `false` when `id` is not live.
    pub fn set_percentage(&mut self, id: StopId, percentage: f32) -> bool {
        let Some(stop) = self.stops.get_mut(&id) else {
            return false;
        };
        stop.percentage = percentage;
        self.notify();
        true
    }

    /// Recolors a stop. Returns `false` when `id` is not live.
    pub fn set_color(&mut self, id: StopId, color: Rgb) -> bool {
        let Some(stop) = self.stops.get_mut(&id) else {
            return false;
        };
        stop.color = color;
        self.notify();
        true
    }

    pub fn remove(&mut self, id: StopId) -> Option<Stop> {
        let removed = self.stops.remove(&id)?;
        log::debug!("stop {id} removed");
        self.notify();
        Some(removed)
    }

    /// Replaces the whole collection, e.g. after loading a configuration.
    ///
    /// Notifies once, after all stops are in place. If two incoming stops share
    /// an identity the later one wins; callers that need stricter input
    /// validate beforehand (the config reader rejects duplicates).
    pub fn replace_all(&mut self, stops: impl IntoIterator<Item = Stop>) {
        self.stops.clear();
        for stop in stops {
            self.insert(stop);
        }
        log::debug!("stop collection replaced ({} stops)", self.stops.len());
        self.notify();
    }

    fn insert(&mut self, stop: Stop) {
        self.stops.insert(stop.id, stop);
    }

    fn notify(&mut self) {
        // Take the listener out so it can observe `self` immutably.
        if let Some(mut listener) = self.listener.take() {
            listener(self);
            if self.listener.is_none() {
                self.listener = Some(listener);
            }
        }
    }
}

impl fmt::Debug for StopCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopCollection")
            .field("stops", &self.stops)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl FromIterator<Stop> for StopCollection {
    fn from_iter<I: IntoIterator<Item = Stop>>(iter: I) -> Self {
        let mut stops = Self::new();
        for stop in iter {
            stops.insert(stop);
        }
        stops
    }
}
