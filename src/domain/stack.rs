//! Stack synthesis
//!
//! Runs the whole pass in one call: resolve the configuration, build the
//! graph, compose the access policy, link the dependency edges, project
//! the outputs. Each stage consumes the prior graph by value and returns
//! a new one; the first failure aborts the pass, so a partial graph never
//! reaches the backend.

use serde::Serialize;
use thiserror::Error;

use super::builder::{BuildError, GraphBuilder};
use super::graph::{GraphError, ResourceGraph};
use super::link::link;
use super::network::NetworkLookup;
use super::outputs::{project, OutputBinding};
use super::policy::compose;
use super::settings::{ConfigError, DefaultSettings, DeploymentDoc, ResolvedConfig};

#[derive(Debug, Error, PartialEq)]
pub enum SynthError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A fully synthesized deployment plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackPlan {
    pub config: ResolvedConfig,
    pub graph: ResourceGraph,
    pub outputs: Vec<OutputBinding>,
}

impl StackPlan {
    /// Synthesizes a plan from a deployment document
    pub fn synthesize(
        doc: &DeploymentDoc,
        defaults: &DefaultSettings,
        networks: &dyn NetworkLookup,
    ) -> Result<Self, SynthError> {
        let config = ResolvedConfig::resolve(doc, defaults)?;
        let graph = GraphBuilder::new(&config, networks).build()?;
        let graph = compose(graph)?;
        let graph = link(graph)?;
        let outputs = project(&graph, &config.app_name)?;

        Ok(Self {
            config,
            graph,
            outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::{
        DELIVERY_PIPELINE, EVENT_ROUTE, PIPELINE_ACCESS_ROLE, SEARCH_CLUSTER,
    };
    use crate::domain::network::{NetworkError, StaticNetworkIndex};
    use crate::domain::node::NodeId;
    use crate::domain::policy::PIPELINE_CAPABILITIES;

    fn doc() -> DeploymentDoc {
        DeploymentDoc {
            app_name: Some("mail".to_string()),
            index_name: Some("mail-events".to_string()),
            ..DeploymentDoc::default()
        }
    }

    #[test]
    fn synthesize_runs_every_stage() {
        let plan = StackPlan::synthesize(
            &doc(),
            &DefaultSettings::default(),
            &StaticNetworkIndex::default(),
        )
        .unwrap();

        assert_eq!(plan.graph.len(), 6);
        assert_eq!(plan.outputs.len(), 6);

        // Policy composed.
        let role = plan.graph.node(&NodeId::new(PIPELINE_ACCESS_ROLE)).unwrap();
        assert_eq!(role.policy.len(), 2);

        // Edges linked.
        let pipeline = plan.graph.node(&NodeId::new(DELIVERY_PIPELINE)).unwrap();
        assert_eq!(pipeline.depends_on.len(), 3);
    }

    #[test]
    fn disabled_features_still_grant_the_full_policy_union() {
        let doc = DeploymentDoc {
            app_name: Some("acme".to_string()),
            index_name: Some("logs".to_string()),
            networking_enabled: Some(false),
            access_control_enabled: Some(false),
            logging_enabled: Some(false),
            event_type_filters: Some(indexmap::IndexMap::new()),
            ..DeploymentDoc::default()
        };
        let plan = StackPlan::synthesize(
            &doc,
            &DefaultSettings::default(),
            &StaticNetworkIndex::default(),
        )
        .unwrap();

        assert_eq!(plan.graph.len(), 6);

        let cluster = plan.graph.node(&NodeId::new(SEARCH_CLUSTER)).unwrap();
        assert!(cluster.depends_on.is_empty());

        let route = plan.graph.node(&NodeId::new(EVENT_ROUTE)).unwrap();
        assert_eq!(
            route.property("matching_event_types"),
            Some(&serde_json::json!([]))
        );

        // The broad grant does not shrink with the feature set.
        let role = plan.graph.node(&NodeId::new(PIPELINE_ACCESS_ROLE)).unwrap();
        let broad = &role.policy[0];
        for group in PIPELINE_CAPABILITIES {
            for action in group.iter() {
                assert!(broad.actions.iter().any(|a| a == action));
            }
        }
    }

    #[test]
    fn config_errors_propagate() {
        let mut doc = doc();
        doc.app_name = None;

        let err = StackPlan::synthesize(
            &doc,
            &DefaultSettings::default(),
            &StaticNetworkIndex::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SynthError::Config(ConfigError::MissingOption("app_name"))
        );
    }

    #[test]
    fn network_errors_propagate() {
        let mut doc = doc();
        doc.networking_enabled = Some(true);
        doc.network_name = Some("nowhere".to_string());

        let err = StackPlan::synthesize(
            &doc,
            &DefaultSettings::default(),
            &StaticNetworkIndex::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SynthError::Build(BuildError::Network(NetworkError::NotFound(
                "nowhere".to_string()
            )))
        );
    }

    #[test]
    fn plan_serializes() {
        let plan = StackPlan::synthesize(
            &doc(),
            &DefaultSettings::default(),
            &StaticNetworkIndex::default(),
        )
        .unwrap();

        let value = serde_json::to_value(&plan).unwrap();
        assert!(value["config"]["app_name"].is_string());
        assert!(value["graph"].is_object());
        assert_eq!(value["outputs"].as_array().unwrap().len(), 6);
    }
}
