//! Resource dependency graph
//!
//! Nodes are stored in insertion order and dependency edges live on the
//! nodes themselves (`depends_on` sets) so the provisioning backend sees
//! them as data, not as a side effect of construction order. petgraph
//! validates acyclicity and produces the creation order.

use indexmap::IndexMap;
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use super::node::{NodeId, ResourceKind, ResourceNode};

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("self-dependency not allowed: {0}")]
    SelfDependency(NodeId),

    #[error("dependency cycle through: {0}")]
    CycleDetected(NodeId),

    #[error("output '{name}' references missing node: {node}")]
    DanglingOutput { name: String, node: NodeId },
}

/// The resource graph handed to the provisioning backend
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceGraph {
    nodes: IndexMap<NodeId, ResourceNode>,
}

impl ResourceGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Adds a node; logical ids must be unique within a graph
    pub fn insert(&mut self, node: ResourceNode) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id.clone()));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Looks up a node by id
    pub fn node(&self, id: &NodeId) -> Option<&ResourceNode> {
        self.nodes.get(id)
    }

    /// Looks up a node for mutation
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut ResourceNode> {
        self.nodes.get_mut(id)
    }

    /// Returns true if the graph contains the node
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns the number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.values()
    }

    /// Iterates over node ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Returns all nodes of the given kind, in insertion order
    pub fn nodes_of_kind(&self, kind: ResourceKind) -> Vec<&ResourceNode> {
        self.nodes.values().filter(|n| n.kind == kind).collect()
    }

    /// Adds a dependency edge: `node` must be created after `depends_on`
    pub fn add_dependency(&mut self, node: &NodeId, depends_on: &NodeId) -> Result<(), GraphError> {
        if node == depends_on {
            return Err(GraphError::SelfDependency(node.clone()));
        }
        if !self.nodes.contains_key(depends_on) {
            return Err(GraphError::NodeNotFound(depends_on.clone()));
        }
        let entry = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.clone()))?;
        entry.depends_on.insert(depends_on.clone());
        Ok(())
    }

    /// Returns the direct dependencies of a node
    pub fn dependencies(&self, id: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|n| n.depends_on.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the nodes that depend on the given node
    pub fn dependents(&self, id: &NodeId) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.depends_on.contains(id))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Returns all nodes in creation order (dependencies before dependents)
    ///
    /// Nodes with no ordering constraint between them keep their insertion
    /// order, so the result is deterministic for a structurally identical
    /// graph.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, GraphError> {
        self.check_edges()?;

        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();
        for id in self.nodes.keys() {
            let idx = graph.add_node(id.clone());
            indices.insert(id.clone(), idx);
        }
        for (id, node) in &self.nodes {
            for dep in &node.depends_on {
                // Edge direction: depends_on -> node, so toposort yields
                // dependencies first.
                graph.add_edge(indices[dep], indices[id], ());
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .filter_map(|idx| graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => {
                let id = graph
                    .node_weight(cycle.node_id())
                    .cloned()
                    .unwrap_or_else(|| NodeId::new("?"));
                Err(GraphError::CycleDetected(id))
            }
        }
    }

    /// Verifies every edge endpoint exists and the graph is acyclic
    pub fn validate(&self) -> Result<(), GraphError> {
        self.topological_order().map(|_| ())
    }

    fn check_edges(&self) -> Result<(), GraphError> {
        for node in self.nodes.values() {
            for dep in &node.depends_on {
                if !self.nodes.contains_key(dep) {
                    return Err(GraphError::NodeNotFound(dep.clone()));
                }
            }
        }
        Ok(())
    }
}
