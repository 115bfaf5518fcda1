//! Resource nodes
//!
//! A node is one provisioning unit handed to the backend: a logical id,
//! a kind, free-form properties, explicit dependency edges and any policy
//! statements attached to it. Properties may reference attributes of
//! other nodes through `${LogicalId.attr}` placeholders, which the
//! backend substitutes once the referenced resource exists.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::policy::PolicyStatement;

/// Logical identifier of a resource node within one graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder reference to an attribute of this node, e.g.
    /// `${SearchCluster.urn}`
    pub fn attr(&self, attribute: &str) -> String {
        format!("${{{}.{}}}", self.0, attribute)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// What a node provisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Identity assumable by a trusted service principal
    AccessRole,

    /// Object storage backing the pipeline's backup path
    Bucket,

    /// Managed index-and-query cluster
    SearchCluster,

    /// Streaming transport that batches records into the cluster
    DeliveryPipeline,

    /// Notification-event configuration that tags outgoing events
    EventSource,

    /// Destination binding from event source to pipeline
    EventRoute,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::AccessRole => "access_role",
            ResourceKind::Bucket => "bucket",
            ResourceKind::SearchCluster => "search_cluster",
            ResourceKind::DeliveryPipeline => "delivery_pipeline",
            ResourceKind::EventSource => "event_source",
            ResourceKind::EventRoute => "event_route",
        }
    }

    /// Returns all kinds, in a stable order
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::AccessRole,
            ResourceKind::Bucket,
            ResourceKind::SearchCluster,
            ResourceKind::DeliveryPipeline,
            ResourceKind::EventSource,
            ResourceKind::EventRoute,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One provisioning unit in the resource graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: NodeId,
    pub kind: ResourceKind,

    /// Backend-facing configuration, in insertion order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, serde_json::Value>,

    /// Explicit creation-order edges (ids of nodes this one waits for)
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub depends_on: IndexSet<NodeId>,

    /// Policy statements attached to this node (access roles only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy: Vec<PolicyStatement>,
}

impl ResourceNode {
    /// Creates a node with no properties, edges or policy
    pub fn new(id: impl Into<NodeId>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: IndexMap::new(),
            depends_on: IndexSet::new(),
            policy: Vec::new(),
        }
    }

    /// Adds a property, builder-style
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets a property on an existing node
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Gets a property value
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Attaches a policy statement
    pub fn attach_policy(&mut self, statement: PolicyStatement) {
        self.policy.push(statement);
    }

    /// Placeholder reference to an attribute of this node
    pub fn attr(&self, attribute: &str) -> String {
        self.id.attr(attribute)
    }
}
