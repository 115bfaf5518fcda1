//! Graph construction
//!
//! Builds the resource graph from a resolved configuration. The same six
//! nodes are always created; enabling networking adds the service-linked
//! role the private cluster placement requires. Cross-node references in
//! properties are rendered as `${LogicalId.attr}` placeholders which the
//! provisioning backend substitutes after creation.

use serde_json::json;
use thiserror::Error;

use super::graph::{GraphError, ResourceGraph};
use super::network::{NetworkError, NetworkLookup};
use super::node::{NodeId, ResourceKind, ResourceNode};
use super::settings::ResolvedConfig;

// Logical ids of the nodes a synthesized stack contains.
pub const BACKUP_BUCKET: &str = "BackupBucket";
pub const PIPELINE_ACCESS_ROLE: &str = "PipelineAccessRole";
pub const SEARCH_SERVICE_LINKED_ROLE: &str = "SearchServiceLinkedRole";
pub const SEARCH_CLUSTER: &str = "SearchCluster";
pub const DELIVERY_PIPELINE: &str = "DeliveryPipeline";
pub const EVENT_SOURCE: &str = "EventSource";
pub const EVENT_ROUTE: &str = "EventRoute";

#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Resolved network placement, shared by the cluster and the pipeline
struct Placement {
    network_id: String,
    security_group: String,
    subnet_ids: Vec<String>,
}

/// Builds a [`ResourceGraph`] from a [`ResolvedConfig`]
///
/// Pure apart from the read-only network lookup: a structurally identical
/// configuration yields a structurally identical graph.
pub struct GraphBuilder<'a> {
    config: &'a ResolvedConfig,
    networks: &'a dyn NetworkLookup,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a ResolvedConfig, networks: &'a dyn NetworkLookup) -> Self {
        Self { config, networks }
    }

    /// Builds the resource graph
    pub fn build(self) -> Result<ResourceGraph, BuildError> {
        let placement = self.resolve_placement()?;

        let mut graph = ResourceGraph::new();
        graph.insert(self.backup_bucket())?;
        graph.insert(self.pipeline_access_role())?;
        if placement.is_some() {
            graph.insert(self.service_linked_role())?;
        }
        graph.insert(self.search_cluster(placement.as_ref()))?;
        graph.insert(self.delivery_pipeline(placement.as_ref()))?;
        graph.insert(self.event_source())?;
        graph.insert(self.event_route())?;
        Ok(graph)
    }

    /// Resolves the network placement when networking is enabled.
    ///
    /// The named network must exist and must have at least one subnet of
    /// the requested class; an empty placement is never rendered.
    fn resolve_placement(&self) -> Result<Option<Placement>, NetworkError> {
        let Some(networking) = &self.config.networking else {
            return Ok(None);
        };

        let network = self
            .networks
            .find_network(&networking.network_name)
            .ok_or_else(|| NetworkError::NotFound(networking.network_name.clone()))?;

        let subnet_ids: Vec<String> = network
            .select_subnets(networking.subnet_class)
            .into_iter()
            .map(str::to_string)
            .collect();
        if subnet_ids.is_empty() {
            return Err(NetworkError::NoSubnets {
                network: network.name.clone(),
                class: networking.subnet_class,
            });
        }

        Ok(Some(Placement {
            network_id: network.id.clone(),
            security_group: network.security_group.clone(),
            subnet_ids,
        }))
    }

    fn backup_bucket(&self) -> ResourceNode {
        ResourceNode::new(BACKUP_BUCKET, ResourceKind::Bucket)
    }

    fn pipeline_access_role(&self) -> ResourceNode {
        ResourceNode::new(PIPELINE_ACCESS_ROLE, ResourceKind::AccessRole)
            .with_property("assumed_by", "pipeline.service")
    }

    fn service_linked_role(&self) -> ResourceNode {
        ResourceNode::new(SEARCH_SERVICE_LINKED_ROLE, ResourceKind::AccessRole)
            .with_property("service", "search.service")
    }

    fn search_cluster(&self, placement: Option<&Placement>) -> ResourceNode {
        let config = self.config;
        let cluster_name = config.app_name.cluster_name();

        let mut capacity = json!({
            "data_node_type": config.capacity.data_node_type,
            "data_nodes": config.capacity.data_nodes,
            "master_nodes": config.capacity.master_nodes,
            "warm_nodes": config.capacity.warm_nodes,
        });
        if let Some(node_type) = &config.capacity.master_node_type {
            capacity["master_node_type"] = json!(node_type);
        }
        if let Some(node_type) = &config.capacity.warm_node_type {
            capacity["warm_node_type"] = json!(node_type);
        }

        let mut node = ResourceNode::new(SEARCH_CLUSTER, ResourceKind::SearchCluster)
            .with_property("name", cluster_name.clone())
            .with_property("version", config.version.as_str())
            .with_property("capacity", capacity)
            .with_property(
                "storage",
                json!({
                    "enabled": config.storage.enabled,
                    "volume_size": config.storage.volume_size,
                }),
            )
            // Not configurable: the cluster never comes up unencrypted.
            .with_property("enforce_https", true)
            .with_property("encryption_at_rest", true)
            .with_property("node_to_node_encryption", true)
            .with_property("zone_awareness", config.zone_awareness)
            .with_property(
                "cluster_logging",
                json!({
                    "app_log_enabled": config.cluster_logging.app_log_enabled,
                    "slow_search_log_enabled": config.cluster_logging.slow_search_log_enabled,
                    "slow_index_log_enabled": config.cluster_logging.slow_index_log_enabled,
                }),
            )
            .with_property(
                "access_policies",
                json!([{
                    "effect": "allow",
                    "principals": ["*"],
                    "actions": ["search:Http*"],
                    "resources": [format!("urn:search:cluster/{cluster_name}/*")],
                }]),
            );

        if let Some(access) = &config.access_control {
            node.set_property(
                "access_control",
                json!({ "master_user_name": access.master_user_name }),
            );
        }
        if let Some(placement) = placement {
            node.set_property(
                "network",
                json!({
                    "network_id": placement.network_id,
                    "subnet_ids": placement.subnet_ids,
                }),
            );
        }
        node
    }

    fn delivery_pipeline(&self, placement: Option<&Placement>) -> ResourceNode {
        let config = self.config;
        let role_urn = NodeId::new(PIPELINE_ACCESS_ROLE).attr("urn");

        let mut destination = json!({
            "cluster_urn": NodeId::new(SEARCH_CLUSTER).attr("urn"),
            "index_name": config.index_name,
            "rotation_period": config.rotation_period.as_str(),
            "access_role": role_urn,
            "backup_mode": config.backup_mode.as_str(),
            "backup": {
                "bucket_urn": NodeId::new(BACKUP_BUCKET).attr("urn"),
                "access_role": role_urn,
            },
        });
        if config.logging_enabled {
            destination["log_sink"] = json!({
                "enabled": true,
                "log_group": config.app_name.log_group(),
                "log_stream": config.app_name.log_stream(),
            });
        }
        if let Some(placement) = placement {
            destination["network"] = json!({
                "access_role": role_urn,
                "security_groups": [placement.security_group],
                "subnet_ids": placement.subnet_ids,
            });
        }

        ResourceNode::new(DELIVERY_PIPELINE, ResourceKind::DeliveryPipeline)
            .with_property("mode", config.delivery_mode.as_str())
            .with_property("destination", destination)
    }

    fn event_source(&self) -> ResourceNode {
        ResourceNode::new(EVENT_SOURCE, ResourceKind::EventSource)
    }

    fn event_route(&self) -> ResourceNode {
        ResourceNode::new(EVENT_ROUTE, ResourceKind::EventRoute)
            .with_property("source_name", NodeId::new(EVENT_SOURCE).attr("name"))
            .with_property("enabled", true)
            .with_property(
                "destination",
                json!({
                    "pipeline_urn": NodeId::new(DELIVERY_PIPELINE).attr("urn"),
                    "access_role": NodeId::new(PIPELINE_ACCESS_ROLE).attr("urn"),
                }),
            )
            .with_property(
                "matching_event_types",
                json!(self.config.enabled_event_types()),
            )
    }
}
