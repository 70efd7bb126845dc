// Per-Flow Statistics Collector
//
// One FlowRecord per directional sensor→sink flow. Records are updated
// incrementally by the driver while the run is in flight and frozen into an
// immutable snapshot once the run halts.

use crate::engine::SimTime;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Flow Records
// ============================================================================

/// Identifier of one directional flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlowId(pub u32);

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flow#{}", self.0)
    }
}

/// Counters for a single flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowRecord {
    /// Packets handed to the medium by the sender
    pub tx_packets: u64,

    /// Packets delivered to the receiving endpoint
    pub rx_packets: u64,

    /// Payload bytes delivered to the receiving endpoint
    pub rx_bytes: u64,

    /// Sum of end-to-end delays over all received packets
    pub delay_sum: SimTime,

    /// Packets sent but never received (filled by reconciliation)
    pub lost_packets: u64,
}

/// Finalized statistics, one record per flow
pub type FlowStats = BTreeMap<FlowId, FlowRecord>;

// ============================================================================
// Flow Monitor
// ============================================================================

/// Collects per-flow counters during the run.
///
/// Owned mapping with a defined lifecycle: created at traffic-install time,
/// mutated only through `record_*` while the run is in flight, frozen by
/// `snapshot` which consumes the monitor.
#[derive(Debug, Default)]
pub struct FlowMonitor {
    flows: BTreeMap<FlowId, FlowRecord>,
}

impl FlowMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flow so it appears in the snapshot even if it never
    /// carries a packet.
    pub fn register_flow(&mut self, flow: FlowId) {
        self.flows.entry(flow).or_default();
    }

    /// Record one transmitted packet.
    pub fn record_tx(&mut self, flow: FlowId) {
        self.flows.entry(flow).or_default().tx_packets += 1;
    }

    /// Record one received packet with its end-to-end delay.
    pub fn record_rx(&mut self, flow: FlowId, bytes: u32, delay: SimTime) {
        let record = self.flows.entry(flow).or_default();
        record.rx_packets += 1;
        record.rx_bytes += bytes as u64;
        record.delay_sum = record.delay_sum + delay;
    }

    /// Account for packets sent but never classified as received because
    /// they were dropped on the medium or the run ended first.
    pub fn reconcile_lost_packets(&mut self) {
        for record in self.flows.values_mut() {
            record.lost_packets = record.tx_packets.saturating_sub(record.rx_packets);
        }
    }

    /// Freeze the table. Consumes the monitor so no further mutation is
    /// possible after the run halts.
    pub fn snapshot(self) -> FlowStats {
        self.flows
    }

    pub fn num_flows(&self) -> usize {
        self.flows.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
