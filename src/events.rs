//! Event system for the pre-alignment panel.
//!
//! Embedding code can subscribe to selection, placement and registration
//! activity via [`EventController`]. Each event carries a set of
//! [`EventKind`] flags (bitflags-style) so a single occurrence can match
//! multiple categories (e.g. a selection change that also stopped placement
//! carries both `SELECTION_CHANGED` and `PLACEMENT_STOPPED`).
//!
//! The caller specifies an [`EventFilter`] to receive only the events they
//! care about. The filter is a simple OR mask: an event is delivered when
//! `event.kinds.intersects(filter.mask)`.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::host::NodeId;
use crate::selection::{FiducialRole, Selection};

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the *categories* an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u64);

impl EventKind {
    /// One of the four selection slots was (re)bound or unbound.
    pub const SELECTION_CHANGED: Self = Self(1 << 0);
    /// The derived `ready` flag flipped.
    pub const READY_CHANGED: Self = Self(1 << 1);
    /// Placement mode was entered.
    pub const PLACEMENT_STARTED: Self = Self(1 << 2);
    /// Placement mode was left (by toggle or by a selection change).
    pub const PLACEMENT_STOPPED: Self = Self(1 << 3);
    /// The host registration routine was invoked.
    pub const REGISTRATION_REQUESTED: Self = Self(1 << 4);
    /// The host registration routine returned success.
    pub const REGISTRATION_COMPLETE: Self = Self(1 << 5);
    /// The host registration routine reported failure.
    pub const REGISTRATION_FAILED: Self = Self(1 << 6);

    /// Wildcard: matches *every* event kind.
    pub const ALL: Self = Self(u64::MAX);

    /// Combine two event kinds (bitwise OR).
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether `self` contains all bits in `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether `self` intersects with `other` (at least one bit in common).
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns `true` if no bits are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for EventKind {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }

        let pairs: &[(EventKind, &str)] = &[
            (EventKind::SELECTION_CHANGED, "SELECTION_CHANGED"),
            (EventKind::READY_CHANGED, "READY_CHANGED"),
            (EventKind::PLACEMENT_STARTED, "PLACEMENT_STARTED"),
            (EventKind::PLACEMENT_STOPPED, "PLACEMENT_STOPPED"),
            (EventKind::REGISTRATION_REQUESTED, "REGISTRATION_REQUESTED"),
            (EventKind::REGISTRATION_COMPLETE, "REGISTRATION_COMPLETE"),
            (EventKind::REGISTRATION_FAILED, "REGISTRATION_FAILED"),
        ];

        let mut names = Vec::new();
        let mut known_bits: u64 = 0;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }

        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{extra:x}"));
        }

        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Metadata – per-event-type payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Metadata attached to selection / readiness events.
#[derive(Debug, Clone)]
pub struct SelectionMeta {
    /// Snapshot of the selection after the change.
    pub selection: Selection,
    /// Derived readiness after the change.
    pub ready: bool,
}

/// Metadata for placement start/stop events.
#[derive(Debug, Clone)]
pub struct PlacementMeta {
    /// Which fiducial set is (or was) the placement destination.
    pub target: Option<NodeId>,
    /// Role of the target, for started events.
    pub role: Option<FiducialRole>,
}

/// Metadata for registration events.
#[derive(Debug, Clone)]
pub struct RegistrationMeta {
    pub moving: NodeId,
    pub fixed: NodeId,
    /// Host error message, for failure events.
    pub error: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// AlignEvent – the top-level event type
// ─────────────────────────────────────────────────────────────────────────────

/// An event emitted by the pre-alignment controller.
///
/// `kinds` is a bitflag set of [`EventKind`] categories; the `Option<…Meta>`
/// fields carry metadata relevant to the kinds that are set.
#[derive(Debug, Clone)]
pub struct AlignEvent {
    /// Bitflag set of categories this event belongs to.
    pub kinds: EventKind,
    /// Monotonic timestamp (seconds since the controller was created).
    pub timestamp: f64,

    pub selection: Option<SelectionMeta>,
    pub placement: Option<PlacementMeta>,
    pub registration: Option<RegistrationMeta>,
}

impl AlignEvent {
    /// Create a new event with the given kinds; the timestamp is stamped by
    /// the controller on emit.
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0,
            selection: None,
            placement: None,
            registration: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

/// Selects which event categories a subscriber receives (OR-mask).
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    /// Accept all events.
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    /// Accept only the specified event kinds.
    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    /// Check whether an event passes this filter.
    #[inline]
    pub fn matches(&self, event: &AlignEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<AlignEvent>,
}

/// Collects and distributes controller events to subscribers.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscriber>,
    start_instant: std::time::Instant,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                start_instant: std::time::Instant::now(),
            })),
        }
    }

    /// Subscribe to events matching the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> Receiver<AlignEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    /// Subscribe to *all* events (no filtering).
    pub fn subscribe_all(&self) -> Receiver<AlignEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Emit an event to all matching subscribers. Called by the controller;
    /// public so embedding code can inject synthetic events.
    pub fn emit(&self, mut event: AlignEvent) {
        let mut inner = self.inner.lock().unwrap();
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_union_and_intersection() {
        let started = EventKind::PLACEMENT_STARTED;
        let stopped = EventKind::PLACEMENT_STOPPED;
        let combined = started | stopped;
        assert!(combined.contains(started));
        assert!(combined.contains(stopped));
        assert!(combined.intersects(started));
        assert!(!EventKind::SELECTION_CHANGED.intersects(started));
    }

    #[test]
    fn event_kind_all_matches_everything() {
        assert!(EventKind::ALL.contains(EventKind::SELECTION_CHANGED));
        assert!(EventKind::ALL.contains(EventKind::REGISTRATION_FAILED));
    }

    #[test]
    fn event_filter_matches() {
        let filter = EventFilter::only(EventKind::PLACEMENT_STARTED | EventKind::PLACEMENT_STOPPED);
        let evt = AlignEvent::new(EventKind::PLACEMENT_STARTED);
        assert!(filter.matches(&evt));

        let evt2 = AlignEvent::new(EventKind::SELECTION_CHANGED);
        assert!(!filter.matches(&evt2));

        let evt3 = AlignEvent::new(EventKind::SELECTION_CHANGED | EventKind::PLACEMENT_STOPPED);
        assert!(filter.matches(&evt3));
    }

    #[test]
    fn event_controller_subscribe_and_emit() {
        let ctrl = EventController::new();
        let rx_all = ctrl.subscribe_all();
        let rx_placement = ctrl.subscribe(EventFilter::only(EventKind::PLACEMENT_STARTED));
        let rx_registration = ctrl.subscribe(EventFilter::only(EventKind::REGISTRATION_REQUESTED));

        ctrl.emit(AlignEvent::new(EventKind::PLACEMENT_STARTED));

        assert!(rx_all.try_recv().is_ok());
        assert!(rx_placement.try_recv().is_ok());
        assert!(rx_registration.try_recv().is_err());
    }

    #[test]
    fn event_controller_combined_kinds() {
        let ctrl = EventController::new();
        let rx_sel = ctrl.subscribe(EventFilter::only(EventKind::SELECTION_CHANGED));
        let rx_stop = ctrl.subscribe(EventFilter::only(EventKind::PLACEMENT_STOPPED));

        // A selection change that also stopped placement matches both.
        ctrl.emit(AlignEvent::new(
            EventKind::SELECTION_CHANGED | EventKind::PLACEMENT_STOPPED,
        ));

        assert!(rx_sel.try_recv().is_ok());
        assert!(rx_stop.try_recv().is_ok());
    }

    #[test]
    fn event_controller_timestamp_set_on_emit() {
        let ctrl = EventController::new();
        let rx = ctrl.subscribe_all();

        std::thread::sleep(std::time::Duration::from_millis(10));
        ctrl.emit(AlignEvent::new(EventKind::SELECTION_CHANGED));

        let evt = rx.try_recv().unwrap();
        assert!(evt.timestamp > 0.0);
    }

    #[test]
    fn event_kind_display() {
        assert_eq!(format!("{}", EventKind::PLACEMENT_STARTED), "PLACEMENT_STARTED");
        let combo = EventKind::SELECTION_CHANGED | EventKind::READY_CHANGED;
        assert_eq!(format!("{combo}"), "SELECTION_CHANGED|READY_CHANGED");
        assert_eq!(format!("{}", EventKind::ALL), "ALL");
        let unknown = EventKind(1 << 63);
        assert!(format!("{unknown}").starts_with("0x"));
    }

    #[test]
    fn event_kinds_do_not_overlap() {
        let all_kinds = [
            EventKind::SELECTION_CHANGED,
            EventKind::READY_CHANGED,
            EventKind::PLACEMENT_STARTED,
            EventKind::PLACEMENT_STOPPED,
            EventKind::REGISTRATION_REQUESTED,
            EventKind::REGISTRATION_COMPLETE,
            EventKind::REGISTRATION_FAILED,
        ];
        for (i, a) in all_kinds.iter().enumerate() {
            for (j, b) in all_kinds.iter().enumerate() {
                if i != j {
                    assert!(!a.intersects(*b), "bits {i} and {j} overlap");
                }
            }
        }
    }

    #[test]
    fn dropped_receiver_is_cleaned_up() {
        let ctrl = EventController::new();
        let rx1 = ctrl.subscribe_all();
        let rx2 = ctrl.subscribe_all();

        drop(rx1);

        ctrl.emit(AlignEvent::new(EventKind::SELECTION_CHANGED));
        assert!(rx2.try_recv().is_ok());

        ctrl.emit(AlignEvent::new(EventKind::READY_CHANGED));
        assert!(rx2.try_recv().is_ok());
    }
}
