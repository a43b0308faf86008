use super::Network;
use crate::error::{ConfigError, GraphError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Deterministic topology the network starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedTopology {
    /// `0 -> 1 -> ... -> m-1 -> 0`
    #[default]
    Cycle,
    /// Disjoint pairs `0 -> 1`, `2 -> 3`, ...; an odd node out stays isolated
    Sticks,
    /// `0 -> i` for every other node
    OutStar,
}

impl SeedTopology {
    pub fn name(self) -> &'static str {
        match self {
            SeedTopology::Cycle => "cycle",
            SeedTopology::Sticks => "sticks",
            SeedTopology::OutStar => "out_star",
        }
    }

    /// Build the seed network with `size` nodes, ids `0..size`.
    pub fn build(self, size: usize) -> Result<Network, GraphError> {
        let mut network = Network::new();
        let nodes: Vec<_> = (0..size).map(|_| network.add_node()).collect();

        match self {
            SeedTopology::Cycle => {
                for (i, &from) in nodes.iter().enumerate() {
                    let to = nodes[(i + 1) % size];
                    if from != to {
                        network.add_edge(from, to)?;
                    }
                }
            }
            SeedTopology::Sticks => {
                for pair in nodes.chunks_exact(2) {
                    network.add_edge(pair[0], pair[1])?;
                }
            }
            SeedTopology::OutStar => {
                if let Some((&hub, rest)) = nodes.split_first() {
                    for &leaf in rest {
                        network.add_edge(hub, leaf)?;
                    }
                }
            }
        }

        Ok(network)
    }
}

impl FromStr for SeedTopology {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cycle" => Ok(SeedTopology::Cycle),
            "sticks" => Ok(SeedTopology::Sticks),
            "out_star" | "out-star" | "star" => Ok(SeedTopology::OutStar),
            other => Err(ConfigError::UnknownOption {
                option: "seed topology",
                value: other.to_string(),
            }),
        }
    }
}
