//! Per-view state store with an explicit render hook.

use std::fmt;

use crate::state::{Credentials, MessageRates, ViewState};

/// What a render hook sees: always a complete, committed state.
#[derive(Debug, Clone, Copy)]
pub struct ViewSnapshot<'a> {
    pub state: &'a ViewState,
    pub rates: MessageRates,
    pub revision: u64,
}

pub type RenderHook = Box<dyn FnMut(&ViewSnapshot<'_>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct ViewStore {
    state: ViewState,
    remembered: Credentials,
    rates: MessageRates,
    revision: u64,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, RenderHook)>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ViewStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStore")
            .field("state", &self.state)
            .field("rates", &self.rates)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ViewStore {
    pub fn new() -> Self {
        Self {
            state: ViewState::default(),
            remembered: Credentials::default(),
            rates: MessageRates::default(),
            revision: 0,
            next_subscription: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn rates(&self) -> MessageRates {
        self.rates
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Last credentials seen in the login form, kept across other states.
    pub fn remembered_credentials(&self) -> &Credentials {
        &self.remembered
    }

    pub fn snapshot(&self) -> ViewSnapshot<'_> {
        ViewSnapshot {
            state: &self.state,
            rates: self.rates,
            revision: self.revision,
        }
    }

    /// Replaces the whole state, then notifies every subscriber once.
    pub fn set_state(&mut self, next: ViewState) {
        if let ViewState::Login(form) = &next {
            self.remembered = form.credentials();
        }
        self.state = next;
        self.publish();
    }

    pub fn set_rates(&mut self, rates: MessageRates) {
        self.rates = rates;
        self.publish();
    }

    pub fn subscribe(&mut self, hook: impl FnMut(&ViewSnapshot<'_>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(hook)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    fn publish(&mut self) {
        self.revision += 1;
        let snapshot = ViewSnapshot {
            state: &self.state,
            rates: self.rates,
            revision: self.revision,
        };
        for (_, hook) in self.subscribers.iter_mut() {
            hook(&snapshot);
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
