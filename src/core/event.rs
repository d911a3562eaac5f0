use crate::core::neighbours::NeighbourMap;
use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Payloads an algorithm can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// The completed neighbour map of one search.
    Neighbours(NeighbourMap),
}

/// A timestamped result.
///
/// Ordering uses `(time, seq)` only; `seq` is assigned by the queue so that events with
/// equal times pop in emission order.
#[derive(Debug, Clone)]
pub struct Event {
    pub time: NotNan<f64>,
    pub seq: u64,
    pub payload: EventPayload,
}

impl Event {
    /// Create a new event, validating that time is finite and non-NaN.
    pub fn new(time: f64, payload: EventPayload) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::config("event time must be finite"));
        }
        let time = NotNan::new(time).map_err(|_| Error::config("event time cannot be NaN"))?;
        Ok(Self {
            time,
            seq: 0,
            payload,
        })
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// The neighbour map carried by this event, if any.
    pub fn neighbours(&self) -> Option<&NeighbourMap> {
        match &self.payload {
            EventPayload::Neighbours(map) => Some(map),
        }
    }

    /// Take the neighbour map out of the event.
    pub fn into_neighbours(self) -> Option<NeighbourMap> {
        match self.payload {
            EventPayload::Neighbours(map) => Some(map),
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Receives results from an algorithm.
pub trait EventListener {
    fn emit(&mut self, event: Event);
}

/// Forwards emitted events to a closure.
impl<F: FnMut(Event)> EventListener for F {
    fn emit(&mut self, event: Event) {
        self(event)
    }
}

/// In-memory min-queue of emitted events, earliest first.
#[derive(Debug, Default)]
pub struct EventsQueue {
    pq: BinaryHeap<Reverse<Event>>,
    next_seq: u64,
}

impl EventsQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.pq.pop().map(|Reverse(ev)| ev)
    }

    /// The earliest event, without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.pq.peek().map(|Reverse(ev)| ev)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.pq.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.pq.is_empty()
    }

    /// Drain every event in time order.
    pub fn drain_ordered(&mut self) -> Vec<Event> {
        let mut out = Vec::with_capacity(self.pq.len());
        while let Some(ev) = self.pop() {
            out.push(ev);
        }
        out
    }
}

impl EventListener for EventsQueue {
    fn emit(&mut self, mut event: Event) {
        event.seq = self.next_seq;
        self.next_seq += 1;
        self.pq.push(Reverse(event));
    }
}
