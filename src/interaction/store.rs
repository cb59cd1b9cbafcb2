//! Observable selection store
//!
//! A ready-made [`SelectionSink`] for hosts that want subscription
//! semantics: every change is pushed to all subscribers, and a new
//! subscriber immediately receives the current state.

use indexmap::IndexMap;

use super::collaborators::{SelectionSink, SelectionSummary};

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(Option<&SelectionSummary>)>;

#[derive(Default)]
pub struct SelectionStore {
    state: Option<SelectionSummary>,
    listeners: IndexMap<SubscriptionId, Listener>,
    next_id: SubscriptionId,
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&SelectionSummary> {
        self.state.as_ref()
    }

    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(Option<&SelectionSummary>) + 'static,
    {
        listener(self.state.as_ref());
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    fn emit(&mut self) {
        let state = self.state.as_ref();
        for listener in self.listeners.values_mut() {
            listener(state);
        }
    }
}

impl SelectionSink for SelectionStore {
    fn publish(&mut self, summary: &SelectionSummary) {
        self.state = Some(*summary);
        self.emit();
    }

    fn clear(&mut self) {
        self.state = None;
        self.emit();
    }
}
