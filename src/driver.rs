// Simulation Driver
//
// Runs an installed scenario to its stop time and returns the finalized
// per-flow statistics. This is the single blocking point of the pipeline:
// control does not return until the whole simulated timeline is processed.

use crate::channel::Scenario;
use crate::engine::{EventKind, EventQueue, SimTime};
use crate::flow_monitor::FlowStats;
use log::{debug, info};

// ============================================================================
// Driver
// ============================================================================

pub struct SimulationDriver;

impl SimulationDriver {
    /// Advance simulated time until no scheduled events remain at or before
    /// the stop ceiling, then reconcile lost packets and freeze the
    /// statistics table.
    ///
    /// The stop time is a hard ceiling: events scheduled past it are never
    /// processed, even if the queue is otherwise idle before then.
    pub fn run(scenario: Scenario) -> FlowStats {
        let stop = SimTime::from_secs_f64(scenario.config.simulation_duration);
        let mut queue = EventQueue::new();
        let mut monitor = scenario.monitor;

        // Seed the first send of every traffic generator.
        for (i, client) in scenario.clients.iter().enumerate() {
            if client.start < client.stop {
                queue.schedule(client.start, EventKind::ClientSend { client_index: i });
            }
        }

        let mut processed: u64 = 0;
        while let Some((now, kind)) = queue.pop_at_or_before(stop) {
            processed += 1;
            match kind {
                EventKind::ClientSend { client_index } => {
                    let client = &scenario.clients[client_index];

                    // The generator stops exactly at its stop time: a send
                    // falling on the boundary is cancelled, not emitted.
                    if now >= client.stop {
                        continue;
                    }

                    monitor.record_tx(client.flow);

                    if let Some(delay) = scenario.channel.transmit(
                        client.distance_m,
                        scenario.config.tx_power,
                        client.packet_size,
                    ) {
                        queue.schedule(
                            now + delay,
                            EventKind::PacketArrival {
                                flow: client.flow,
                                bytes: client.packet_size,
                                sent_at: now,
                            },
                        );
                    } else {
                        debug!("{} dropped on air at {}", client.flow, now);
                    }

                    queue.schedule(now + client.interval, EventKind::ClientSend { client_index });
                }

                EventKind::PacketArrival {
                    flow,
                    bytes,
                    sent_at,
                } => {
                    // Delivered only while the receiving endpoint is up.
                    if now >= scenario.server.start && now <= scenario.server.stop {
                        monitor.record_rx(flow, bytes, now - sent_at);
                    }
                }
            }
        }

        info!(
            "run halted at ceiling {} after {} events ({} events left past ceiling)",
            stop,
            processed,
            queue.len()
        );

        monitor.reconcile_lost_packets();
        monitor.snapshot()
    }
}

// ============================================================================
// Tests
// ============================================================================
