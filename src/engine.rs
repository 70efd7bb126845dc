// Discrete-Event Simulation Kernel
//
// Minimal single-threaded event queue: events are processed in nondecreasing
// time order up to a hard stop ceiling. Insertion order breaks ties so the
// schedule is fully deterministic.

use crate::flow_monitor::FlowId;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::ops::{Add, Sub};

// ============================================================================
// Simulated Time
// ============================================================================

/// Simulated time as integer nanoseconds since run start.
///
/// Integer ticks keep the queue totally ordered and free of float-comparison
/// surprises; conversion to seconds happens only at the metrics boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    const NANOS_PER_SEC: f64 = 1_000_000_000.0;

    /// Convert from seconds. Caller guarantees a finite, non-negative value
    /// (enforced upstream by config validation).
    pub fn from_secs_f64(secs: f64) -> Self {
        SimTime((secs * Self::NANOS_PER_SEC).round() as u64)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / Self::NANOS_PER_SEC
    }

    pub fn as_nanos(self) -> u64 {
        self.0
    }
}

impl Add for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl Sub for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.9}s", self.as_secs_f64())
    }
}

// ============================================================================
// Events
// ============================================================================

/// Events dispatched by the simulation driver
#[derive(Debug, Clone)]
pub enum EventKind {
    /// A periodic traffic generator is due to emit one packet
    ClientSend { client_index: usize },

    /// A packet crossed the medium and reaches the sink
    PacketArrival {
        flow: FlowId,
        bytes: u32,
        sent_at: SimTime,
    },
}

#[derive(Debug)]
struct Scheduled {
    time: SimTime,
    seq: u64,
    kind: EventKind,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.time.cmp(&other.time).then(self.seq.cmp(&other.seq))
    }
}

// ============================================================================
// Event Queue
// ============================================================================

/// Time-ordered event queue with a hard stop ceiling.
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule an event at an absolute simulated time.
    pub fn schedule(&mut self, time: SimTime, kind: EventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { time, seq, kind }));
    }

    /// Pop the earliest event at or before `ceiling`. Events scheduled past
    /// the ceiling stay in the queue and are never processed.
    pub fn pop_at_or_before(&mut self, ceiling: SimTime) -> Option<(SimTime, EventKind)> {
        match self.heap.peek() {
            Some(Reverse(scheduled)) if scheduled.time <= ceiling => self
                .heap
                .pop()
                .map(|Reverse(scheduled)| (scheduled.time, scheduled.kind)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn send(i: usize) -> EventKind {
        EventKind::ClientSend { client_index: i }
    }

    fn client_index(kind: &EventKind) -> usize {
        match kind {
            EventKind::ClientSend { client_index } => *client_index,
            _ => panic!("expected ClientSend"),
        }
    }

    #[test]
    fn test_simtime_roundtrip() {
        let t = SimTime::from_secs_f64(1.5);
        assert_eq!(t.as_nanos(), 1_500_000_000);
        assert!((t.as_secs_f64() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_simtime_sub_saturates() {
        let a = SimTime::from_secs_f64(1.0);
        let b = SimTime::from_secs_f64(2.0);
        assert_eq!(a - b, SimTime::ZERO);
    }

    #[test]
    fn test_events_pop_in_time_order() {
        let mut queue = EventQueue::new();
        queue.schedule(SimTime::from_secs_f64(3.0), send(3));
        queue.schedule(SimTime::from_secs_f64(1.0), send(1));
        queue.schedule(SimTime::from_secs_f64(2.0), send(2));

        let ceiling = SimTime::from_secs_f64(10.0);
        let mut order = Vec::new();
        while let Some((_, kind)) = queue.pop_at_or_before(ceiling) {
            order.push(client_index(&kind));
        }
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_same_time_keeps_insertion_order() {
        let mut queue = EventQueue::new();
        let t = SimTime::from_secs_f64(5.0);
        queue.schedule(t, send(0));
        queue.schedule(t, send(1));
        queue.schedule(t, send(2));

        let ceiling = SimTime::from_secs_f64(10.0);
        let mut order = Vec::new();
        while let Some((_, kind)) = queue.pop_at_or_before(ceiling) {
            order.push(client_index(&kind));
        }
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_stop_ceiling_is_hard() {
        let mut queue = EventQueue::new();
        queue.schedule(SimTime::from_secs_f64(1.0), send(0));
        queue.schedule(SimTime::from_secs_f64(20.0), send(1));

        let ceiling = SimTime::from_secs_f64(10.0);
        assert!(queue.pop_at_or_before(ceiling).is_some());
        // the later event stays queued forever
        assert!(queue.pop_at_or_before(ceiling).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_event_exactly_at_ceiling_is_processed() {
        let mut queue = EventQueue::new();
        let ceiling = SimTime::from_secs_f64(10.0);
        queue.schedule(ceiling, send(0));
        assert!(queue.pop_at_or_before(ceiling).is_some());
    }
}
