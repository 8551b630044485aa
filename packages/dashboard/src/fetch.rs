//! Per-fetch state and the latest-wins request guard.
//!
//! When the user changes a selector while an earlier request is still in
//! flight, responses can arrive out of order. Every load takes a
//! [`Ticket`] from a [`RequestTracker`]; a response is applied only if its
//! ticket is still the newest one, so the display always reflects the most
//! recent selection.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle of one asynchronous fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Loaded(T),
    /// The latest request failed with this message.
    Failed(String),
}

impl<T> FetchState<T> {
    /// Converts a fetch result, keeping only the error's message.
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic source of [`Ticket`]s.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    /// Issues a ticket newer than every previous one.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// A [`FetchState`] slot that only accepts the newest response.
#[derive(Debug)]
pub struct LatestSlot<T> {
    label: &'static str,
    tracker: RequestTracker,
    state: Mutex<FetchState<T>>,
}

impl<T: Clone> LatestSlot<T> {
    /// Creates an idle slot; `label` names it in logs.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            tracker: RequestTracker::default(),
            state: Mutex::new(FetchState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FetchState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the slot loading and returns the ticket for the new request.
    pub fn begin(&self) -> Ticket {
        let mut state = self.lock();
        let ticket = self.tracker.issue();
        *state = FetchState::Loading;
        ticket
    }

    /// Applies a response if `ticket` is still current. Returns whether it
    /// was applied.
    pub fn finish<E: Display>(&self, ticket: Ticket, result: Result<T, E>) -> bool {
        let mut state = self.lock();
        if !self.tracker.is_current(ticket) {
            log::debug!("Discarding stale {} response ({ticket:?})", self.label);
            return false;
        }
        if let Err(e) = &result {
            log::error!("Loading {} failed: {e}", self.label);
        }
        *state = FetchState::from_result(result);
        true
    }

    /// Sets a value directly, superseding any request in flight.
    pub fn set(&self, value: T) {
        let mut state = self.lock();
        self.tracker.issue();
        *state = FetchState::Loaded(value);
    }

    /// Returns to idle, superseding any request in flight.
    pub fn clear(&self) {
        let mut state = self.lock();
        self.tracker.issue();
        *state = FetchState::Idle;
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FetchState<T> {
        self.lock().clone()
    }
}
