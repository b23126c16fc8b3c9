//! # Observations
//!
//! Timestamped values broadcast to subscribers, typically measures sampled
//! from a sensor or a price feed.
//!
//! An [`ObservationPublisher`] keeps its subscribers in a copy-on-write list
//! and the last published observation in an atomically swapped slot.
//! Publishing notifies a snapshot of the subscribers synchronously, on the
//! publishing thread, so subscribing or unsubscribing from inside a callback
//! only affects later publications.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use measure::observation::{
//!     Observation, ObservationConsumer, ObservationProvider, ObservationPublisher,
//! };
//!
//! struct Last(Mutex<Option<f64>>);
//!
//! impl ObservationConsumer<f64> for Last {
//!     fn consume(&self, _source: &dyn ObservationProvider<f64>, observation: &Observation<f64>) {
//!         *self.0.lock().unwrap() = Some(*observation.value());
//!     }
//! }
//!
//! let publisher = ObservationPublisher::<f64>::new();
//! let last = Arc::new(Last(Mutex::new(None)));
//! publisher.subscribe(last.clone());
//! publisher.publish(Observation::now(21.5));
//! assert_eq!(*last.0.lock().unwrap(), Some(21.5));
//! ```

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use log::debug;

/// A value observed at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<T> {
    observed_at: DateTime<Utc>,
    value: T,
}

impl<T> Observation<T> {
    pub fn new(observed_at: DateTime<Utc>, value: T) -> Self {
        Observation { observed_at, value }
    }

    /// An observation timestamped with the current time.
    pub fn now(value: T) -> Self {
        Self::new(Utc::now(), value)
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: fmt::Display> fmt::Display for Observation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.value, self.observed_at.to_rfc3339())
    }
}

/// Receives observations from the providers it subscribed to.
pub trait ObservationConsumer<T>: Send + Sync {
    fn consume(&self, source: &dyn ObservationProvider<T>, observation: &Observation<T>);
}

/// A source of observations.
pub trait ObservationProvider<T>: Send + Sync {
    /// Adds a subscriber; returns `false` if it was already subscribed.
    fn subscribe(&self, consumer: Arc<dyn ObservationConsumer<T>>) -> bool;

    /// Removes a subscriber; returns `false` if it was not subscribed.
    fn unsubscribe(&self, consumer: &Arc<dyn ObservationConsumer<T>>) -> bool;

    /// The most recently published observation, if any.
    fn last_observation(&self) -> Option<Arc<Observation<T>>>;
}

type Consumers<T> = Arc<Vec<Arc<dyn ObservationConsumer<T>>>>;

/// Thread-safe [`ObservationProvider`] broadcasting to its subscribers.
pub struct ObservationPublisher<T> {
    consumers: RwLock<Consumers<T>>,
    last: RwLock<Option<Arc<Observation<T>>>>,
}

impl<T> Default for ObservationPublisher<T> {
    fn default() -> Self {
        ObservationPublisher {
            consumers: RwLock::new(Arc::new(Vec::new())),
            last: RwLock::new(None),
        }
    }
}

impl<T: Send + Sync> ObservationPublisher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.snapshot().len()
    }

    fn snapshot(&self) -> Consumers<T> {
        self.consumers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records `observation` as the last one and hands it to every current
    /// subscriber.
    pub fn publish(&self, observation: Observation<T>) {
        let observation = Arc::new(observation);
        *self.last.write().unwrap_or_else(PoisonError::into_inner) = Some(observation.clone());

        let consumers = self.snapshot();
        debug!(
            "Publishing observation at {} to {} subscriber(s)",
            observation.observed_at(),
            consumers.len()
        );
        for consumer in consumers.iter() {
            consumer.consume(self, &observation);
        }
    }
}

impl<T: Send + Sync> ObservationProvider<T> for ObservationPublisher<T> {
    fn subscribe(&self, consumer: Arc<dyn ObservationConsumer<T>>) -> bool {
        let mut consumers = self.consumers.write().unwrap_or_else(PoisonError::into_inner);
        if consumers.iter().any(|c| Arc::ptr_eq(c, &consumer)) {
            return false;
        }
        let mut updated = Vec::with_capacity(consumers.len() + 1);
        updated.extend(consumers.iter().cloned());
        updated.push(consumer);
        *consumers = Arc::new(updated);
        true
    }

    fn unsubscribe(&self, consumer: &Arc<dyn ObservationConsumer<T>>) -> bool {
        let mut consumers = self.consumers.write().unwrap_or_else(PoisonError::into_inner);
        if !consumers.iter().any(|c| Arc::ptr_eq(c, consumer)) {
            return false;
        }
        let updated: Vec<_> = consumers
            .iter()
            .filter(|c| !Arc::ptr_eq(c, consumer))
            .cloned()
            .collect();
        *consumers = Arc::new(updated);
        true
    }

    fn last_observation(&self) -> Option<Arc<Observation<T>>> {
        self.last
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
