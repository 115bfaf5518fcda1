//! Access policy composition
//!
//! The delivery pipeline acts through a single access role. Its policy is
//! the union of five fixed capability groups plus one storage statement
//! scoped to the backup bucket. The five groups are granted whether or not
//! the matching optional resource was synthesized; only the storage
//! statement is resource-scoped.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::builder::{BACKUP_BUCKET, PIPELINE_ACCESS_ROLE};
use super::graph::{GraphError, ResourceGraph};
use super::node::NodeId;

/// Search cluster read, write and administration
pub const SEARCH_ACCESS: &[&str] = &[
    "search:HttpPost",
    "search:HttpPut*",
    "search:HttpGet*",
    "search:DescribeCluster",
    "search:DescribeClusters",
    "search:DescribeClusterConfig",
];

/// Network interface management for private cluster placement
pub const NETWORK_INTERFACE_ACCESS: &[&str] = &[
    "net:DescribeNetworks",
    "net:DescribeNetworkAttribute",
    "net:DescribeSubnets",
    "net:DescribeSecurityGroups",
    "net:DescribeInterfaces",
    "net:CreateInterface",
    "net:CreateInterfacePermission",
    "net:DeleteInterface",
];

/// Delivery log group and stream writes
pub const LOG_WRITE_ACCESS: &[&str] = &[
    "logs:CreateLogGroup",
    "logs:CreateLogStream",
    "logs:PutLogEvents",
];

/// Decryption of records the upstream encrypted at rest
pub const KEY_ACCESS: &[&str] = &["keys:Decrypt", "keys:GenerateDataKey"];

/// Reading an upstream stream when the pipeline runs in stream_source mode
pub const STREAM_READ_ACCESS: &[&str] = &[
    "stream:DescribeStream",
    "stream:GetShardIterator",
    "stream:GetRecords",
    "stream:ListShards",
];

/// Object reads and writes, granted only against the backup bucket
pub const STORAGE_ACCESS: &[&str] = &[
    "storage:GetObject",
    "storage:PutObject",
    "storage:DeleteObject",
    "storage:ListBucket",
    "storage:GetBucketLocation",
];

/// The capability groups every synthesized pipeline role carries
pub const PIPELINE_CAPABILITIES: &[&[&str]] = &[
    SEARCH_ACCESS,
    NETWORK_INTERFACE_ACCESS,
    LOG_WRITE_ACCESS,
    KEY_ACCESS,
    STREAM_READ_ACCESS,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyEffect {
    Allow,
    Deny,
}

/// A single policy statement
///
/// Actions are deduplicated and keep first-seen order, so structurally
/// identical inputs serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub effect: PolicyEffect,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyStatement {
    /// Builds an allow statement over the given actions and resources
    pub fn allow(
        actions: impl IntoIterator<Item = impl Into<String>>,
        resources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let actions: IndexSet<String> = actions.into_iter().map(Into::into).collect();
        Self {
            effect: PolicyEffect::Allow,
            actions: actions.into_iter().collect(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }
}

/// Attaches the pipeline role's policy statements to the graph
///
/// Two statements are produced: the union of [`PIPELINE_CAPABILITIES`]
/// over all resources, and [`STORAGE_ACCESS`] over the backup bucket and
/// its contents. The graph must already contain the role node.
pub fn compose(mut graph: ResourceGraph) -> Result<ResourceGraph, GraphError> {
    let broad = PolicyStatement::allow(
        PIPELINE_CAPABILITIES
            .iter()
            .flat_map(|group| group.iter().copied()),
        ["*"],
    );

    let bucket_urn = NodeId::new(BACKUP_BUCKET).attr("urn");
    let narrow = PolicyStatement::allow(
        STORAGE_ACCESS.iter().copied(),
        [bucket_urn.clone(), format!("{bucket_urn}/*")],
    );

    let role_id = NodeId::new(PIPELINE_ACCESS_ROLE);
    let role = graph
        .node_mut(&role_id)
        .ok_or(GraphError::NodeNotFound(role_id))?;
    role.attach_policy(broad);
    role.attach_policy(narrow);

    Ok(graph)
}
