// Metrics Aggregation
//
// Pure reduction of the per-flow statistics table into scenario-level
// metrics. All sums are commutative, so the iteration order over flows
// never affects the result.

use crate::flow_monitor::FlowStats;

// ============================================================================
// Aggregate Metrics
// ============================================================================

/// Scenario-level metrics derived from the full flow table
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateMetrics {
    /// Packets handed to the medium across all flows
    pub total_tx_packets: u64,

    /// Packets delivered across all flows
    pub total_rx_packets: u64,

    /// Payload bytes delivered across all flows
    pub total_rx_bytes: u64,

    /// Received / transmitted, in [0, 1]; 0 when nothing was transmitted
    pub packet_delivery_ratio: f64,

    /// Mean end-to-end delay over received packets (seconds); 0 when
    /// nothing was received
    pub average_delay_secs: f64,

    /// Mean delivered throughput over the run (kbit/s); 0 for a
    /// zero-length window
    pub average_throughput_kbps: f64,
}

// ============================================================================
// Aggregator
// ============================================================================

pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Reduce the flow table for a run of `simulation_duration` seconds.
    ///
    /// Every ratio is guarded: a zero denominator yields 0, never a
    /// division.
    pub fn aggregate(stats: &FlowStats, simulation_duration: f64) -> AggregateMetrics {
        let mut total_tx_packets: u64 = 0;
        let mut total_rx_packets: u64 = 0;
        let mut total_rx_bytes: u64 = 0;
        let mut sum_delay_secs: f64 = 0.0;
        // Same quantity as total_rx_packets, accumulated separately: the
        // delay average's denominator is independent of the PDR denominator.
        let mut rx_for_delay: u64 = 0;

        for record in stats.values() {
            total_tx_packets += record.tx_packets;
            total_rx_packets += record.rx_packets;
            total_rx_bytes += record.rx_bytes;
            sum_delay_secs += record.delay_sum.as_secs_f64();
            rx_for_delay += record.rx_packets;
        }

        let packet_delivery_ratio = if total_tx_packets > 0 {
            total_rx_packets as f64 / total_tx_packets as f64
        } else {
            0.0
        };

        let average_delay_secs = if rx_for_delay > 0 {
            sum_delay_secs / rx_for_delay as f64
        } else {
            0.0
        };

        let average_throughput_kbps = if simulation_duration > 0.0 {
            (total_rx_bytes as f64 * 8.0) / simulation_duration / 1000.0
        } else {
            0.0
        };

        AggregateMetrics {
            total_tx_packets,
            total_rx_packets,
            total_rx_bytes,
            packet_delivery_ratio,
            average_delay_secs,
            average_throughput_kbps,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
