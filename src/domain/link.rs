//! Dependency resolution
//!
//! Adds the explicit creation-order edges the provisioning backend cannot
//! infer from property placeholders, then verifies the result is a DAG.

use super::builder::{
    BACKUP_BUCKET, DELIVERY_PIPELINE, EVENT_ROUTE, EVENT_SOURCE, PIPELINE_ACCESS_ROLE,
    SEARCH_CLUSTER, SEARCH_SERVICE_LINKED_ROLE,
};
use super::graph::{GraphError, ResourceGraph};
use super::node::NodeId;

/// Adds the fixed dependency edges and validates the graph
///
/// The cluster waits for its service-linked role when one exists; the
/// pipeline waits for the cluster, the access role and the backup bucket;
/// the event source waits for the pipeline; the event route waits for
/// both the pipeline and the source.
pub fn link(mut graph: ResourceGraph) -> Result<ResourceGraph, GraphError> {
    let bucket = NodeId::new(BACKUP_BUCKET);
    let role = NodeId::new(PIPELINE_ACCESS_ROLE);
    let service_role = NodeId::new(SEARCH_SERVICE_LINKED_ROLE);
    let cluster = NodeId::new(SEARCH_CLUSTER);
    let pipeline = NodeId::new(DELIVERY_PIPELINE);
    let source = NodeId::new(EVENT_SOURCE);
    let route = NodeId::new(EVENT_ROUTE);

    if graph.contains(&service_role) {
        graph.add_dependency(&cluster, &service_role)?;
    }
    graph.add_dependency(&pipeline, &cluster)?;
    graph.add_dependency(&pipeline, &role)?;
    graph.add_dependency(&pipeline, &bucket)?;
    graph.add_dependency(&source, &pipeline)?;
    graph.add_dependency(&route, &pipeline)?;
    graph.add_dependency(&route, &source)?;

    graph.validate()?;
    Ok(graph)
}
