// Report Formatting
//
// Renders the scenario parameters and aggregate metrics as a fixed-order,
// human-readable block. No computation beyond the PDR percentage scaling.

use crate::config::ScenarioConfig;
use crate::metrics::AggregateMetrics;

// ============================================================================
// Formatter
// ============================================================================

pub struct ReportFormatter;

impl ReportFormatter {
    /// Render the nine report fields in fixed order.
    pub fn render(config: &ScenarioConfig, metrics: &AggregateMetrics) -> String {
        let mut out = String::new();

        out.push_str("========== RESULTS ==========\n");
        out.push_str(&format!("Sensors:             {}\n", config.sensor_count));
        out.push_str(&format!(
            "Simulation time:     {} s\n",
            config.simulation_duration
        ));
        out.push_str(&format!("TxPower:             {} dBm\n", config.tx_power));
        out.push_str(&format!(
            "Packet interval:     {} s\n",
            config.packet_interval
        ));
        out.push_str(&format!(
            "Tx packets:          {}\n",
            metrics.total_tx_packets
        ));
        out.push_str(&format!(
            "Rx packets:          {}\n",
            metrics.total_rx_packets
        ));
        out.push_str(&format!(
            "PDR:                 {} %\n",
            metrics.packet_delivery_ratio * 100.0
        ));
        out.push_str(&format!(
            "Average delay:       {} s\n",
            metrics.average_delay_secs
        ));
        out.push_str(&format!(
            "Average throughput:  {} kbps\n",
            metrics.average_throughput_kbps
        ));
        out.push_str("=============================\n");

        out
    }

    /// Print the report block to stdout.
    pub fn print_summary(config: &ScenarioConfig, metrics: &AggregateMetrics) {
        print!("{}", Self::render(config, metrics));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> AggregateMetrics {
        AggregateMetrics {
            total_tx_packets: 100,
            total_rx_packets: 80,
            total_rx_bytes: 8000,
            packet_delivery_ratio: 0.8,
            average_delay_secs: 0.1,
            average_throughput_kbps: 1.6,
        }
    }

    #[test]
    fn test_all_nine_fields_present_in_order() {
        let report = ReportFormatter::render(&ScenarioConfig::default(), &sample_metrics());

        let labels = [
            "Sensors:",
            "Simulation time:",
            "TxPower:",
            "Packet interval:",
            "Tx packets:",
            "Rx packets:",
            "PDR:",
            "Average delay:",
            "Average throughput:",
        ];

        let mut cursor = 0;
        for label in labels {
            let pos = report[cursor..]
                .find(label)
                .unwrap_or_else(|| panic!("missing field: {}", label));
            cursor += pos + label.len();
        }
    }

    #[test]
    fn test_pdr_rendered_as_percentage() {
        let report = ReportFormatter::render(&ScenarioConfig::default(), &sample_metrics());
        assert!(report.contains("PDR:                 80 %"));
    }

    #[test]
    fn test_zero_traffic_renders_zero_percent() {
        let metrics = AggregateMetrics {
            total_tx_packets: 0,
            total_rx_packets: 0,
            total_rx_bytes: 0,
            packet_delivery_ratio: 0.0,
            average_delay_secs: 0.0,
            average_throughput_kbps: 0.0,
        };
        let report = ReportFormatter::render(&ScenarioConfig::default(), &metrics);
        assert!(report.contains("PDR:                 0 %"));
    }
}
