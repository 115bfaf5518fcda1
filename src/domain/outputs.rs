//! Output projection
//!
//! Projects the named values a caller reads back once the backend has
//! provisioned the stack. The output set is fixed; only the `{app}-`
//! prefix varies.

use serde::{Deserialize, Serialize};

use super::builder::{EVENT_SOURCE, PIPELINE_ACCESS_ROLE, SEARCH_CLUSTER};
use super::graph::{GraphError, ResourceGraph};
use super::name::AppName;
use super::node::NodeId;

/// A named value exported from the synthesized stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputBinding {
    pub name: String,
    pub source: NodeId,
    pub attribute: String,
}

impl OutputBinding {
    fn new(name: String, source: &str, attribute: &str) -> Self {
        Self {
            name,
            source: NodeId::new(source),
            attribute: attribute.to_string(),
        }
    }

    /// Placeholder the backend substitutes with the exported value
    pub fn value(&self) -> String {
        self.source.attr(&self.attribute)
    }
}

/// Projects the fixed output list from the final graph
///
/// Every binding's source node must exist in the graph.
pub fn project(graph: &ResourceGraph, app: &AppName) -> Result<Vec<OutputBinding>, GraphError> {
    let bindings = vec![
        OutputBinding::new(
            format!("{app}-pipeline-access-urn"),
            PIPELINE_ACCESS_ROLE,
            "urn",
        ),
        OutputBinding::new(format!("{app}-event-source-name"), EVENT_SOURCE, "name"),
        OutputBinding::new(format!("{app}-search-cluster-id"), SEARCH_CLUSTER, "id"),
        OutputBinding::new(format!("{app}-search-cluster-name"), SEARCH_CLUSTER, "name"),
        OutputBinding::new(
            format!("{app}-search-cluster-endpoint"),
            SEARCH_CLUSTER,
            "endpoint",
        ),
        OutputBinding::new(format!("{app}-search-cluster-urn"), SEARCH_CLUSTER, "urn"),
    ];

    for binding in &bindings {
        if !graph.contains(&binding.source) {
            return Err(GraphError::DanglingOutput {
                name: binding.name.clone(),
                node: binding.source.clone(),
            });
        }
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::{ResourceKind, ResourceNode};

    fn app() -> AppName {
        "mail".parse().unwrap()
    }

    fn full_graph() -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        for (id, kind) in [
            (PIPELINE_ACCESS_ROLE, ResourceKind::AccessRole),
            (SEARCH_CLUSTER, ResourceKind::SearchCluster),
            (EVENT_SOURCE, ResourceKind::EventSource),
        ] {
            graph.insert(ResourceNode::new(id, kind)).unwrap();
        }
        graph
    }

    #[test]
    fn projects_the_fixed_output_set() {
        let bindings = project(&full_graph(), &app()).unwrap();

        let names: Vec<_> = bindings.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "mail-pipeline-access-urn",
                "mail-event-source-name",
                "mail-search-cluster-id",
                "mail-search-cluster-name",
                "mail-search-cluster-endpoint",
                "mail-search-cluster-urn",
            ]
        );
    }

    #[test]
    fn binding_values_are_placeholders() {
        let bindings = project(&full_graph(), &app()).unwrap();

        assert_eq!(bindings[0].value(), "${PipelineAccessRole.urn}");
        assert_eq!(bindings[1].value(), "${EventSource.name}");
        assert_eq!(bindings[4].value(), "${SearchCluster.endpoint}");
    }

    #[test]
    fn missing_source_is_a_dangling_output() {
        let mut graph = ResourceGraph::new();
        graph
            .insert(ResourceNode::new(
                PIPELINE_ACCESS_ROLE,
                ResourceKind::AccessRole,
            ))
            .unwrap();
        graph
            .insert(ResourceNode::new(SEARCH_CLUSTER, ResourceKind::SearchCluster))
            .unwrap();

        let err = project(&graph, &app()).unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingOutput {
                name: "mail-event-source-name".to_string(),
                node: NodeId::new(EVENT_SOURCE),
            }
        );
    }
}
