//! Single-writer container for the active schedule.
//!
//! The store owns the event collection and the conflict set derived from it.
//! Every mutation recomputes the conflict set from scratch and then notifies
//! observers synchronously, so an observer always sees a conflict set that
//! matches the events it can read.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::conflict::{conflicting_event_ids, ConflictSet};
use crate::error::{Result, ScheduleError};
use crate::event::{EventPatch, ScheduleEvent};

/// What the last mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// The whole collection was replaced (extraction result, import, demo).
    Replaced { count: usize },
    Inserted { id: String },
    /// Metadata and/or times were edited.
    Updated { id: String },
    /// Only the interval moved.
    Rescheduled { id: String },
    Removed { id: String },
    Reset,
}

/// Handle returned by [`ScheduleStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreChange, &ScheduleStore)>;

#[derive(Default)]
pub struct ScheduleStore {
    events: Vec<ScheduleEvent>,
    conflicts: ConflictSet,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for ScheduleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleStore")
            .field("events", &self.events)
            .field("conflicts", &self.conflicts)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `events`. Fails on duplicate ids.
    pub fn with_events(events: Vec<ScheduleEvent>) -> Result<Self> {
        let mut store = Self::new();
        store.set_events(events)?;
        Ok(store)
    }

    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&ScheduleEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn conflicts(&self) -> &ConflictSet {
        &self.conflicts
    }

    pub fn has_conflict(&self, id: &str) -> bool {
        self.conflicts.contains(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Register an observer called after every successful mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange, &ScheduleStore) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Replace the whole collection. Fails without touching the store if two
    /// events share an id.
    pub fn set_events(&mut self, events: Vec<ScheduleEvent>) -> Result<()> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if !seen.insert(event.id.as_str()) {
                return Err(ScheduleError::DuplicateId(event.id.clone()));
            }
        }

        let count = events.len();
        self.events = events;
        self.commit(StoreChange::Replaced { count });
        Ok(())
    }

    /// Add one event. Fails if its id is already present.
    pub fn insert_event(&mut self, event: ScheduleEvent) -> Result<()> {
        if self.get(&event.id).is_some() {
            return Err(ScheduleError::DuplicateId(event.id));
        }

        let id = event.id.clone();
        self.events.push(event);
        self.commit(StoreChange::Inserted { id });
        Ok(())
    }

    /// Apply a partial edit to the event with the given id.
    pub fn update_event(&mut self, id: &str, patch: EventPatch) -> Result<()> {
        let event = self.get_mut(id)?;
        event.apply(patch);

        self.commit(StoreChange::Updated { id: id.to_string() });
        Ok(())
    }

    /// Move an event to a new interval, keeping everything else.
    pub fn reschedule(
        &mut self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        let event = self.get_mut(id)?;
        event.apply(EventPatch::reschedule(start, end));

        self.commit(StoreChange::Rescheduled { id: id.to_string() });
        Ok(())
    }

    /// Remove and return the event with the given id.
    pub fn remove_event(&mut self, id: &str) -> Result<ScheduleEvent> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ScheduleError::EventNotFound(id.to_string()))?;
        let removed = self.events.remove(index);

        self.commit(StoreChange::Removed { id: id.to_string() });
        Ok(removed)
    }

    /// Drop every event.
    pub fn reset(&mut self) {
        self.events.clear();
        self.commit(StoreChange::Reset);
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut ScheduleEvent> {
        self.events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ScheduleError::EventNotFound(id.to_string()))
    }

    /// Recompute derived state, then notify observers.
    fn commit(&mut self, change: StoreChange) {
        self.conflicts = conflicting_event_ids(&self.events);
        tracing::debug!(
            ?change,
            events = self.events.len(),
            conflicting = self.conflicts.len(),
            "store changed"
        );

        // Observers borrow the store immutably, so they are moved out for the
        // duration of the notification.
        let mut observers = std::mem::take(&mut self.observers);
        for (_, observer) in observers.iter_mut() {
            observer(&change, self);
        }
        self.observers = observers;
    }
}
