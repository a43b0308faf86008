//! Directed graph store for the growing network.
//!
//! Thin wrapper over `petgraph`'s `DiGraphMap` that owns the id counter and
//! per-node float attributes. Node ids are handed out as `next_id`, which
//! equals the node count for any graph grown only through [`Network::add_node`].

mod seed;

pub use seed::SeedTopology;

use crate::error::GraphError;
use crate::score::ScoreMap;
use crate::types::NodeId;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet};

/// Attribute key under which snapshot scores are stored.
pub const SCORE_ATTRIBUTE: &str = "score";

#[derive(Debug, Clone, Default)]
pub struct Network {
    inner: DiGraphMap<NodeId, ()>,
    next_id: usize,
    attributes: BTreeMap<String, BTreeMap<NodeId, f64>>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the next free identifier.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.inner.add_node(id);
        id
    }

    /// Add a directed edge between two existing nodes.
    ///
    /// Adding an edge that already exists is a no-op, so the graph stays
    /// simple.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        if !self.inner.contains_node(from) {
            return Err(GraphError::NodeNotFound(from));
        }
        if !self.inner.contains_node(to) {
            return Err(GraphError::NodeNotFound(to));
        }
        self.inner.add_edge(from, to, ());
        Ok(())
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.inner.contains_node(node)
    }

    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.inner.contains_edge(from, to)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Identifier the next `add_node` call will return.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.next_id)
    }

    /// Node ids in ascending order.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.inner.nodes().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Node ids as a set.
    pub fn node_set(&self) -> BTreeSet<NodeId> {
        self.inner.nodes().collect()
    }

    /// Edges in ascending `(from, to)` order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<(NodeId, NodeId)> =
            self.inner.all_edges().map(|(a, b, _)| (a, b)).collect();
        edges.sort_unstable();
        edges
    }

    /// Edges pointing into `node`, as `(source, node)` pairs.
    pub fn in_edges(&self, node: NodeId) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<(NodeId, NodeId)> = self
            .inner
            .neighbors_directed(node, Direction::Incoming)
            .map(|source| (source, node))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Edges leaving `node`, as `(node, target)` pairs.
    pub fn out_edges(&self, node: NodeId) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<(NodeId, NodeId)> = self
            .inner
            .neighbors_directed(node, Direction::Outgoing)
            .map(|target| (node, target))
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn in_degree(&self, node: NodeId) -> usize {
        self.inner.neighbors_directed(node, Direction::Incoming).count()
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.inner.neighbors_directed(node, Direction::Outgoing).count()
    }

    /// Out-neighbours of `node`.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.neighbors_directed(node, Direction::Outgoing)
    }

    /// Copy of the subgraph induced by `nodes`.
    ///
    /// Ids not present in `self` are ignored. The copy keeps the id counter of
    /// its source so identifiers handed out later never collide. Attributes
    /// are restricted to the kept nodes.
    pub fn induced_subgraph(&self, nodes: &BTreeSet<NodeId>) -> Network {
        let mut inner = DiGraphMap::with_capacity(nodes.len(), 0);
        for &node in nodes {
            if self.inner.contains_node(node) {
                inner.add_node(node);
            }
        }
        for (from, to, _) in self.inner.all_edges() {
            if inner.contains_node(from) && inner.contains_node(to) {
                inner.add_edge(from, to, ());
            }
        }

        let attributes = self
            .attributes
            .iter()
            .map(|(key, values)| {
                let kept = values
                    .iter()
                    .filter(|(node, _)| inner.contains_node(**node))
                    .map(|(node, value)| (*node, *value))
                    .collect();
                (key.clone(), kept)
            })
            .collect();

        Network {
            inner,
            next_id: self.next_id,
            attributes,
        }
    }

    /// Attach a value per node under `key`. Entries for unknown nodes are skipped.
    pub fn set_node_attributes(&mut self, key: &str, values: &ScoreMap) {
        let slot = self.attributes.entry(key.to_string()).or_default();
        for (&node, &value) in values {
            if self.inner.contains_node(node) {
                slot.insert(node, value);
            }
        }
    }

    pub fn node_attribute(&self, key: &str, node: NodeId) -> Option<f64> {
        self.attributes.get(key)?.get(&node).copied()
    }

    pub fn node_attributes(&self, key: &str) -> Option<&BTreeMap<NodeId, f64>> {
        self.attributes.get(key)
    }

    /// No self loops. Parallel edges cannot be represented at all.
    pub fn is_simple(&self) -> bool {
        self.inner.all_edges().all(|(a, b, _)| a != b)
    }
}
