// Topology Builder
//
// Creates the sensor and sink identities, draws static positions inside the
// deployment area and assigns IPv4 addresses from a single /24 block.

use crate::config::ScenarioConfig;
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;
use std::net::Ipv4Addr;

// ============================================================================
// Deployment Geometry
// ============================================================================

/// Side length of the square deployment area (meters)
pub const AREA_SIDE_M: f64 = 30.0;

/// Base of the /24 address block shared by all nodes
pub const ADDRESS_BASE: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 0);

/// Usable host addresses in a /24 (.1 through .254)
pub const ADDRESS_CAPACITY: usize = 254;

/// 2D position inside the deployment area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Role of a node in the deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Sensor,
    Sink,
}

/// One node with its static position and assigned address.
///
/// Immutable after topology build: positions never change during the run
/// (constant-position mobility) and every node carries exactly one address.
#[derive(Debug, Clone)]
pub struct Node {
    pub role: NodeRole,
    pub position: Position,
    pub address: Ipv4Addr,
}

/// The complete built topology: sensors first, sink last.
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<Node>,
}

impl Topology {
    /// All nodes in address-assignment order (sensors first, sink last).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The sensors, in assignment order.
    pub fn sensors(&self) -> &[Node] {
        &self.nodes[..self.nodes.len() - 1]
    }

    /// The sink, looked up by role rather than by container position.
    pub fn sink(&self) -> &Node {
        self.nodes
            .iter()
            .find(|n| n.role == NodeRole::Sink)
            .expect("topology always contains a sink")
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds the node set for a validated configuration.
pub struct TopologyBuilder;

impl TopologyBuilder {
    /// Create `sensor_count` sensors plus one sink.
    ///
    /// Sensor positions are drawn independently and uniformly from the
    /// deployment square; the sink sits at the area center. Addresses are
    /// assigned sequentially from the /24 block, sensors first, sink last,
    /// so the sink's address index always equals `sensor_count`.
    pub fn build(config: &ScenarioConfig, rng: &mut StdRng) -> Result<Topology, TopologyError> {
        let total = config.sensor_count as usize + 1;
        if total > ADDRESS_CAPACITY {
            return Err(TopologyError::AddressSpaceExhausted {
                requested: total,
                capacity: ADDRESS_CAPACITY,
            });
        }

        let mut nodes = Vec::with_capacity(total);

        for _ in 0..config.sensor_count {
            let position = Position {
                x: rng.gen_range(0.0..=AREA_SIDE_M),
                y: rng.gen_range(0.0..=AREA_SIDE_M),
            };
            nodes.push(Node {
                role: NodeRole::Sensor,
                position,
                address: Ipv4Addr::UNSPECIFIED,
            });
        }

        nodes.push(Node {
            role: NodeRole::Sink,
            position: Position {
                x: AREA_SIDE_M / 2.0,
                y: AREA_SIDE_M / 2.0,
            },
            address: Ipv4Addr::UNSPECIFIED,
        });

        Self::assign_addresses(&mut nodes);

        Ok(Topology { nodes })
    }

    /// Sequential host addresses starting at .1, in node order.
    fn assign_addresses(nodes: &mut [Node]) {
        let base = u32::from(ADDRESS_BASE);
        for (i, node) in nodes.iter_mut().enumerate() {
            node.address = Ipv4Addr::from(base + i as u32 + 1);
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised during topology build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// More nodes requested than the address block can hold
    AddressSpaceExhausted { requested: usize, capacity: usize },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::AddressSpaceExhausted {
                requested,
                capacity,
            } => write!(
                f,
                "address space exhausted: {} nodes requested, block holds {}",
                requested, capacity
            ),
        }
    }
}

impl std::error::Error for TopologyError {}

// ============================================================================
// Tests
// ============================================================================
