//! Wires the shared [`AlertStore`] into the component tree.

use fleet_registry::{AlertLevel, AlertStore, Incident};
use leptos::{create_rw_signal, provide_context, use_context, RwSignal, SignalGet, SignalSet};
use std::rc::Rc;

/// Handle on the session-wide alert state.
///
/// Reads go through a signal so any view that renders the level re-renders
/// when it changes; writes go through the store, which notifies the signal
/// along with every other subscriber.
#[derive(Clone)]
pub struct AlertHandle {
    store: Rc<AlertStore>,
    level: RwSignal<AlertLevel>,
}

impl AlertHandle {
    /// Reactive read of the current level.
    pub fn level(&self) -> AlertLevel {
        self.level.get()
    }

    pub fn update_alert_level(&self, open_incidents: &[Incident]) {
        self.store.update_alert_level(open_incidents);
    }

    /// Direct override escape hatch; see [`AlertStore::set_level`].
    #[allow(dead_code)]
    pub fn set_level(&self, level: AlertLevel) {
        self.store.set_level(level);
    }
}

/// Install the alert store for the subtree below the caller.
pub fn provide_alert_store() {
    let store = Rc::new(AlertStore::new());
    let level = create_rw_signal(store.level());
    store.subscribe(move |next| level.set(next));
    provide_context(AlertHandle { store, level });
}

/// Panics when called outside a [`provide_alert_store`] subtree — that is
/// a wiring defect, not a runtime condition.
pub fn use_alert() -> AlertHandle {
    use_context::<AlertHandle>().expect("use_alert called outside provide_alert_store scope")
}
