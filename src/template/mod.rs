//! Backend-facing template rendering
//!
//! Renders a synthesized [`StackPlan`] into the JSON document the
//! provisioning backend consumes, and answers the lookups test harnesses
//! make against it. Assertions go through [`Template::resource`],
//! [`Template::resources_of_kind`] and [`Template::output`] rather than
//! through the synthesis internals.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{GraphError, ResourceKind, ResourceNode, StackPlan};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("failed to serialize template content")]
    Serialize(#[from] serde_json::Error),
}

/// A rendered output: exported name plus its placeholder value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedOutput {
    pub name: String,
    pub value: String,
}

/// Rendered deployment template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    /// App the template was synthesized for
    pub app_name: String,

    /// Short content hash over resources and outputs
    pub fingerprint: String,

    /// Resources in creation order (dependencies first)
    pub resources: Vec<ResourceNode>,

    /// Exported outputs
    pub outputs: Vec<RenderedOutput>,
}

impl Template {
    /// Renders a plan into the backend-facing document
    pub fn render(plan: &StackPlan) -> Result<Self, TemplateError> {
        let order = plan.graph.topological_order()?;
        let resources: Vec<ResourceNode> = order
            .iter()
            .filter_map(|id| plan.graph.node(id).cloned())
            .collect();

        let outputs: Vec<RenderedOutput> = plan
            .outputs
            .iter()
            .map(|binding| RenderedOutput {
                name: binding.name.clone(),
                value: binding.value(),
            })
            .collect();

        let fingerprint = fingerprint(&resources, &outputs)?;

        Ok(Self {
            app_name: plan.config.app_name.as_str().to_string(),
            fingerprint,
            resources,
            outputs,
        })
    }

    /// Serializes the template as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Looks up a resource by logical id
    pub fn resource(&self, id: &str) -> Option<&ResourceNode> {
        self.resources.iter().find(|r| r.id.as_str() == id)
    }

    /// Returns all resources of the given kind, in creation order
    pub fn resources_of_kind(&self, kind: ResourceKind) -> Vec<&ResourceNode> {
        self.resources.iter().filter(|r| r.kind == kind).collect()
    }

    /// Looks up an output by exported name
    pub fn output(&self, name: &str) -> Option<&RenderedOutput> {
        self.outputs.iter().find(|o| o.name == name)
    }
}

/// 16-character hash of the rendered content
fn fingerprint(
    resources: &[ResourceNode],
    outputs: &[RenderedOutput],
) -> Result<String, serde_json::Error> {
    let content = serde_json::to_string(&(resources, outputs))?;
    let hash = blake3::hash(content.as_bytes());
    let hex = hash.to_hex();
    Ok(hex[..16].to_string())
}
