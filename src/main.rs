// IoT Wi-Fi sensor network simulation runner
//
// Usage:
//   iot-wifi-sim
//   iot-wifi-sim --packet-interval 0.5 --tx-power 16 --n-sensors 40
//   iot-wifi-sim --scenario scenarios/dense.yaml --seed 42

use clap::Parser;
use iot_wifi_sim::{
    ChannelAndTrafficInstaller, FriisChannel, MetricsAggregator, ReportFormatter, ScenarioConfig,
    ScenarioOverrides, SimulationDriver, TopologyBuilder,
};
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Simulate N wireless sensors streaming UDP datagrams to a single sink
/// and report packet delivery ratio, mean delay and mean throughput.
#[derive(Debug, Parser)]
#[command(name = "iot-wifi-sim", version)]
struct Cli {
    /// Interval between packets per sensor (seconds)
    #[arg(long)]
    packet_interval: Option<f64>,

    /// Transmission power (dBm)
    #[arg(long)]
    tx_power: Option<f64>,

    /// Number of sensor nodes
    #[arg(long)]
    n_sensors: Option<u32>,

    /// Scenario YAML file with named overrides (CLI flags win over the file)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Random seed for reproducible topologies
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

/// Scenario file format: metadata plus configuration overrides
#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    meta: ScenarioMeta,

    #[serde(default)]
    config: ScenarioOverrides,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init()
        .unwrap();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    // File overrides first, CLI flags on top.
    let mut overrides = match &cli.scenario {
        Some(path) => load_scenario_file(path)?,
        None => ScenarioOverrides::default(),
    };
    overrides = overrides.merged_with(ScenarioOverrides {
        sensor_count: cli.n_sensors,
        packet_interval: cli.packet_interval,
        tx_power: cli.tx_power,
        ..Default::default()
    });

    let config = ScenarioConfig::from_overrides(&overrides).map_err(|e| e.to_string())?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "building topology: {} sensors, {:.1}s window",
        config.sensor_count, config.simulation_duration
    );
    let topology = TopologyBuilder::build(&config, &mut rng).map_err(|e| e.to_string())?;

    let scenario = ChannelAndTrafficInstaller::install(
        config.clone(),
        topology,
        Box::new(FriisChannel::default()),
    );

    info!("running simulation");
    let stats = SimulationDriver::run(scenario);

    let metrics = MetricsAggregator::aggregate(&stats, config.simulation_duration);
    ReportFormatter::print_summary(&config, &metrics);

    Ok(())
}

fn load_scenario_file(path: &Path) -> Result<ScenarioOverrides, String> {
    let yaml = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;

    if let Some(name) = &scenario.meta.name {
        info!("scenario: {}", name);
    }
    if let Some(description) = &scenario.meta.description {
        info!("{}", description);
    }

    Ok(scenario.config)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_file_parses_overrides() {
        let yaml = "\
meta:
  name: dense deployment
config:
  sensor_count: 54
  packet_interval: 0.5
";
        let scenario: ScenarioFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.meta.name.as_deref(), Some("dense deployment"));
        assert_eq!(scenario.config.sensor_count, Some(54));
        assert_eq!(scenario.config.packet_interval, Some(0.5));
        assert_eq!(scenario.config.tx_power, None);
    }

    #[test]
    fn test_empty_scenario_file_is_all_defaults() {
        let scenario: ScenarioFile = serde_yaml::from_str("{}").unwrap();
        assert!(scenario.config.sensor_count.is_none());
        assert!(scenario.config.simulation_duration.is_none());
    }

    #[test]
    fn test_cli_flags_override_file_values() {
        let file = ScenarioOverrides {
            sensor_count: Some(54),
            tx_power: Some(10.0),
            ..Default::default()
        };
        let merged = file.merged_with(ScenarioOverrides {
            sensor_count: Some(3),
            ..Default::default()
        });
        assert_eq!(merged.sensor_count, Some(3));
        assert_eq!(merged.tx_power, Some(10.0));
    }
}
