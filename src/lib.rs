//! # iot-wifi-sim - IoT Wireless Sensor Network Simulator
//!
//! Models a small wireless IoT deployment: N battery-powered sensor nodes
//! periodically sending fixed-size UDP datagrams to a single sink over an
//! 802.11-style link, with aggregate end-to-end metrics (packet delivery
//! ratio, mean delay, mean throughput) derived from per-flow statistics
//! collected over a bounded simulated time window.
//!
//! ## Core Components
//!
//! - **ScenarioConfig**: validated experiment parameters (defaults plus
//!   named overrides)
//! - **TopologyBuilder**: sensor/sink identities, static positions,
//!   sequential address assignment
//! - **ChannelAndTrafficInstaller**: shared medium, station/AP roles,
//!   periodic UDP traffic generators and the sink endpoint
//! - **SimulationDriver**: event loop to a hard stop ceiling, lost-packet
//!   reconciliation, statistics snapshot
//! - **MetricsAggregator**: guarded reduction into scenario-level metrics
//! - **ReportFormatter**: fixed-order human-readable report
//!
//! ## Usage
//!
//! ```
//! use iot_wifi_sim::{
//!     ChannelAndTrafficInstaller, FriisChannel, MetricsAggregator,
//!     ScenarioConfig, ScenarioOverrides, SimulationDriver, TopologyBuilder,
//! };
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let config = ScenarioConfig::from_overrides(&ScenarioOverrides {
//!     sensor_count: Some(3),
//!     simulation_duration: Some(5.0),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let topology = TopologyBuilder::build(&config, &mut rng).unwrap();
//! let scenario = ChannelAndTrafficInstaller::install(
//!     config.clone(),
//!     topology,
//!     Box::new(FriisChannel::default()),
//! );
//!
//! let stats = SimulationDriver::run(scenario);
//! let metrics = MetricsAggregator::aggregate(&stats, config.simulation_duration);
//! assert!(metrics.packet_delivery_ratio <= 1.0);
//! ```

// Pipeline stages, in data-flow order
pub mod config;
pub mod topology;
pub mod channel;
pub mod engine;
pub mod flow_monitor;
pub mod driver;
pub mod metrics;
pub mod report;

// Re-export commonly used types
pub use channel::{
    ChannelAndTrafficInstaller, FriisChannel, PropagationModel, Scenario, UdpClientApp,
    UdpServerApp, WifiDevice, WifiRole, SINK_PORT, SSID,
};
pub use config::{ConfigError, ScenarioConfig, ScenarioOverrides};
pub use driver::SimulationDriver;
pub use engine::{EventKind, EventQueue, SimTime};
pub use flow_monitor::{FlowId, FlowMonitor, FlowRecord, FlowStats};
pub use metrics::{AggregateMetrics, MetricsAggregator};
pub use report::ReportFormatter;
pub use topology::{Node, NodeRole, Position, Topology, TopologyBuilder, TopologyError};
