// Wireless Channel and Traffic Installation
//
// Configures the shared medium once for the whole topology (one propagation
// model, one tx power, one SSID), binds sensors into station role and the
// sink into access-point role, and installs the periodic UDP traffic
// generators plus the single receiving endpoint on the sink.

use crate::config::ScenarioConfig;
use crate::engine::SimTime;
use crate::flow_monitor::{FlowId, FlowMonitor};
use crate::topology::Topology;
use log::debug;
use std::net::Ipv4Addr;

// ============================================================================
// Channel Constants
// ============================================================================

/// Shared network identifier all nodes associate under
pub const SSID: &str = "IoT-Network";

/// Well-known UDP port of the sink's receiving endpoint
pub const SINK_PORT: u16 = 4000;

/// Traffic generators start this long after simulation start so
/// association and addressing can settle.
pub const TRAFFIC_START_OFFSET_SECS: f64 = 1.0;

/// Speed of light (m/s), for constant-speed propagation delay
const PROPAGATION_SPEED_M_S: f64 = 299_792_458.0;

// ============================================================================
// Propagation Model
// ============================================================================

/// Seam to the radio/propagation physics.
///
/// Given a link distance and the uniform tx power, decides whether a packet
/// survives the medium and how long it takes to arrive. Returning `None`
/// means the packet is lost on the air.
pub trait PropagationModel {
    fn transmit(&self, distance_m: f64, tx_power_dbm: f64, bytes: u32) -> Option<SimTime>;
}

/// Friis free-space attenuation with constant-speed propagation delay.
///
/// Receive power: tx_power - 20*log10(4*pi*d / lambda). Packets whose
/// receive power falls below the receiver sensitivity are dropped.
#[derive(Debug, Clone)]
pub struct FriisChannel {
    /// Carrier frequency (Hz)
    pub frequency_hz: f64,

    /// Receiver sensitivity floor (dBm)
    pub rx_sensitivity_dbm: f64,

    /// Link bit rate for serialization delay (bit/s)
    pub bit_rate_bps: f64,
}

impl Default for FriisChannel {
    fn default() -> Self {
        Self {
            frequency_hz: 2.412e9, // 2.4 GHz channel 1
            rx_sensitivity_dbm: -85.0,
            bit_rate_bps: 6.0e6,
        }
    }
}

impl FriisChannel {
    /// Receive power at `distance_m` for the given tx power.
    /// Friis is undefined in the near field, so distances clamp to 1 m.
    pub fn receive_power_dbm(&self, distance_m: f64, tx_power_dbm: f64) -> f64 {
        let wavelength = PROPAGATION_SPEED_M_S / self.frequency_hz;
        let d = distance_m.max(1.0);
        let path_loss_db = 20.0 * (4.0 * std::f64::consts::PI * d / wavelength).log10();
        tx_power_dbm - path_loss_db
    }
}

impl PropagationModel for FriisChannel {
    fn transmit(&self, distance_m: f64, tx_power_dbm: f64, bytes: u32) -> Option<SimTime> {
        if self.receive_power_dbm(distance_m, tx_power_dbm) < self.rx_sensitivity_dbm {
            return None;
        }

        let propagation = distance_m / PROPAGATION_SPEED_M_S;
        let serialization = (bytes as f64 * 8.0) / self.bit_rate_bps;
        Some(SimTime::from_secs_f64(propagation + serialization))
    }
}

// ============================================================================
// Wireless Devices
// ============================================================================

/// Association role on the shared medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiRole {
    Station,
    AccessPoint,
}

/// One radio bound to a node
#[derive(Debug, Clone)]
pub struct WifiDevice {
    pub node_index: usize,
    pub role: WifiRole,
    pub ssid: &'static str,
}

// ============================================================================
// Applications
// ============================================================================

/// Periodic UDP traffic generator on one sensor.
///
/// Send limit is unbounded; the generator is bounded by its stop time only.
#[derive(Debug, Clone)]
pub struct UdpClientApp {
    pub node_index: usize,
    pub flow: FlowId,
    pub dest_addr: Ipv4Addr,
    pub dest_port: u16,
    pub interval: SimTime,
    pub packet_size: u32,
    pub start: SimTime,
    pub stop: SimTime,
    /// Link distance to the sink, fixed because positions are static
    pub distance_m: f64,
}

/// The single receiving endpoint on the sink
#[derive(Debug, Clone)]
pub struct UdpServerApp {
    pub node_index: usize,
    pub port: u16,
    pub start: SimTime,
    pub stop: SimTime,
}

// ============================================================================
// Installed Scenario
// ============================================================================

/// Everything the driver needs for one run: the topology, the shared medium,
/// the installed applications and the statistics collector.
pub struct Scenario {
    pub config: ScenarioConfig,
    pub topology: Topology,
    pub devices: Vec<WifiDevice>,
    pub clients: Vec<UdpClientApp>,
    pub server: UdpServerApp,
    pub channel: Box<dyn PropagationModel>,
    pub monitor: FlowMonitor,
}

// ============================================================================
// Installer
// ============================================================================

/// Installs the channel, the roles and the traffic applications.
pub struct ChannelAndTrafficInstaller;

impl ChannelAndTrafficInstaller {
    /// Bind every sensor as a station and the sink as the access point under
    /// the shared SSID, install one periodic client per sensor plus the
    /// server on the sink, and register every flow with the monitor.
    pub fn install(
        config: ScenarioConfig,
        topology: Topology,
        channel: Box<dyn PropagationModel>,
    ) -> Scenario {
        let stop = SimTime::from_secs_f64(config.simulation_duration);
        let start = SimTime::from_secs_f64(TRAFFIC_START_OFFSET_SECS);

        let sink = topology.sink().clone();
        let sink_index = topology.nodes().len() - 1;

        let mut devices = Vec::with_capacity(topology.nodes().len());
        let mut clients = Vec::with_capacity(topology.sensors().len());
        let mut monitor = FlowMonitor::new();

        for (i, sensor) in topology.sensors().iter().enumerate() {
            devices.push(WifiDevice {
                node_index: i,
                role: WifiRole::Station,
                ssid: SSID,
            });

            let flow = FlowId(i as u32 + 1);
            monitor.register_flow(flow);

            clients.push(UdpClientApp {
                node_index: i,
                flow,
                dest_addr: sink.address,
                dest_port: SINK_PORT,
                interval: SimTime::from_secs_f64(config.packet_interval),
                packet_size: config.packet_size,
                start,
                stop,
                distance_m: sensor.position.distance_to(&sink.position),
            });
        }

        devices.push(WifiDevice {
            node_index: sink_index,
            role: WifiRole::AccessPoint,
            ssid: SSID,
        });

        let server = UdpServerApp {
            node_index: sink_index,
            port: SINK_PORT,
            start: SimTime::ZERO,
            stop,
        };

        debug!(
            "installed {} clients -> {}:{}, server window [{}, {}]",
            clients.len(),
            sink.address,
            SINK_PORT,
            server.start,
            server.stop
        );

        Scenario {
            config,
            topology,
            devices,
            clients,
            server,
            channel,
            monitor,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioOverrides;
    use crate::topology::TopologyBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build_scenario(sensor_count: u32) -> Scenario {
        let config = ScenarioConfig::from_overrides(&ScenarioOverrides {
            sensor_count: Some(sensor_count),
            ..Default::default()
        })
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let topology = TopologyBuilder::build(&config, &mut rng).unwrap();
        ChannelAndTrafficInstaller::install(config, topology, Box::new(FriisChannel::default()))
    }

    #[test]
    fn test_one_client_per_sensor_and_one_server() {
        let scenario = build_scenario(5);
        assert_eq!(scenario.clients.len(), 5);
        assert_eq!(scenario.server.port, SINK_PORT);
        assert_eq!(scenario.monitor.num_flows(), 5);
    }

    #[test]
    fn test_roles_and_shared_ssid() {
        let scenario = build_scenario(4);
        assert_eq!(scenario.devices.len(), 5);

        for device in &scenario.devices[..4] {
            assert_eq!(device.role, WifiRole::Station);
            assert_eq!(device.ssid, SSID);
        }
        let ap = scenario.devices.last().unwrap();
        assert_eq!(ap.role, WifiRole::AccessPoint);
        assert_eq!(ap.ssid, SSID);
    }

    #[test]
    fn test_clients_target_sink_address() {
        let scenario = build_scenario(3);
        let sink_addr = scenario.topology.sink().address;
        for client in &scenario.clients {
            assert_eq!(client.dest_addr, sink_addr);
            assert_eq!(client.dest_port, SINK_PORT);
        }
    }

    #[test]
    fn test_application_windows() {
        let scenario = build_scenario(2);
        let stop = SimTime::from_secs_f64(scenario.config.simulation_duration);

        for client in &scenario.clients {
            assert_eq!(client.start, SimTime::from_secs_f64(1.0));
            assert_eq!(client.stop, stop);
        }
        assert_eq!(scenario.server.start, SimTime::ZERO);
        assert_eq!(scenario.server.stop, stop);
    }

    #[test]
    fn test_friis_power_decreases_with_distance() {
        let channel = FriisChannel::default();
        let near = channel.receive_power_dbm(2.0, 20.0);
        let far = channel.receive_power_dbm(25.0, 20.0);
        assert!(near > far);
    }

    #[test]
    fn test_friis_lossless_inside_area() {
        // worst case inside the 30m square: corner sensor to center sink
        let channel = FriisChannel::default();
        let corner_distance = (15.0f64 * 15.0 + 15.0 * 15.0).sqrt();
        assert!(channel
            .transmit(corner_distance, 20.0, 64)
            .is_some());
    }

    #[test]
    fn test_friis_drops_below_sensitivity() {
        let channel = FriisChannel::default();
        // extremely low power over a long link falls under the floor
        assert!(channel.transmit(1000.0, -60.0, 64).is_none());
    }

    #[test]
    fn test_transmit_delay_grows_with_size() {
        let channel = FriisChannel::default();
        let small = channel.transmit(10.0, 20.0, 64).unwrap();
        let large = channel.transmit(10.0, 20.0, 1500).unwrap();
        assert!(large > small);
    }
}
