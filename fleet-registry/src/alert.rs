//! Alert-level derivation and the shared store the views read it through.

use crate::records::Incident;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};

/// Operational risk classification derived from the open-incident count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    #[default]
    Green,
    Yellow,
    Red,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Green => "Green",
            AlertLevel::Yellow => "Yellow",
            AlertLevel::Red => "Red",
        }
    }
}

/// Pure thresholding over the open-incident count.
pub fn level_for_open_count(open: usize) -> AlertLevel {
    match open {
        0 => AlertLevel::Green,
        1..=2 => AlertLevel::Yellow,
        _ => AlertLevel::Red,
    }
}

type Subscriber = Box<dyn Fn(AlertLevel)>;

/// Single source of truth for the current [`AlertLevel`].
///
/// The store lives for the application session and is handed to consumers
/// explicitly (the UI injects it via context). Mutations happen from one
/// serialized callback context at a time, so interior mutability with
/// `Cell`/`RefCell` is all the synchronization it needs.
///
/// Subscribers are notified synchronously on every level change.
/// Re-asserting the level that is already stored is not a transition and
/// notifies nobody.
#[derive(Default)]
pub struct AlertStore {
    level: Cell<AlertLevel>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl AlertStore {
    /// Starts at [`AlertLevel::Green`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> AlertLevel {
        self.level.get()
    }

    pub fn subscribe(&self, subscriber: impl Fn(AlertLevel) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    /// Direct override. Unused by the views but part of the contract.
    pub fn set_level(&self, level: AlertLevel) {
        if self.level.replace(level) == level {
            return;
        }
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(level);
        }
    }

    /// Recompute the level from a freshly fetched open-incident set.
    pub fn update_alert_level(&self, open_incidents: &[Incident]) {
        self.set_level(level_for_open_count(open_incidents.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{IncidentStatus, IncidentType, VehicleRef};
    use std::cell::Cell;
    use std::rc::Rc;

    fn open_incident(id: &str) -> Incident {
        Incident {
            id: id.into(),
            vehicle_id: Some(VehicleRef::Id("veh-1".into())),
            kind: IncidentType::Traffic,
            description: String::new(),
            status: IncidentStatus::Open,
        }
    }

    #[test]
    fn thresholds() {
        assert_eq!(level_for_open_count(0), AlertLevel::Green);
        assert_eq!(level_for_open_count(1), AlertLevel::Yellow);
        assert_eq!(level_for_open_count(2), AlertLevel::Yellow);
        assert_eq!(level_for_open_count(3), AlertLevel::Red);
        assert_eq!(level_for_open_count(100), AlertLevel::Red);
    }

    #[test]
    fn starts_green() {
        assert_eq!(AlertStore::new().level(), AlertLevel::Green);
    }

    #[test]
    fn update_stores_derived_level() {
        let store = AlertStore::new();
        let open: Vec<Incident> = (0..3).map(|n| open_incident(&format!("inc-{n}"))).collect();

        store.update_alert_level(&open);
        assert_eq!(store.level(), AlertLevel::Red);

        store.update_alert_level(&open[..2]);
        assert_eq!(store.level(), AlertLevel::Yellow);

        store.update_alert_level(&[]);
        assert_eq!(store.level(), AlertLevel::Green);
    }

    #[test]
    fn same_open_set_is_not_a_transition() {
        let store = AlertStore::new();
        let notifications = Rc::new(Cell::new(0));
        let seen = Rc::clone(&notifications);
        store.subscribe(move |_| seen.set(seen.get() + 1));

        let open = vec![open_incident("inc-1")];
        store.update_alert_level(&open);
        store.update_alert_level(&open);

        assert_eq!(store.level(), AlertLevel::Yellow);
        assert_eq!(notifications.get(), 1);
    }

    #[test]
    fn set_level_overrides_and_notifies() {
        let store = AlertStore::new();
        let last = Rc::new(Cell::new(AlertLevel::Green));
        let seen = Rc::clone(&last);
        store.subscribe(move |level| seen.set(level));

        store.set_level(AlertLevel::Red);
        assert_eq!(store.level(), AlertLevel::Red);
        assert_eq!(last.get(), AlertLevel::Red);
    }

    #[test]
    fn notifies_every_subscriber() {
        let store = AlertStore::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        for counter in [&first, &second] {
            let counter = Rc::clone(counter);
            store.subscribe(move |_| counter.set(counter.get() + 1));
        }

        store.set_level(AlertLevel::Yellow);
        store.set_level(AlertLevel::Red);

        assert_eq!(first.get(), 2);
        assert_eq!(second.get(), 2);
    }
}
