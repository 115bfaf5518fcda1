//! stackplan - Deployment graph synthesizer for managed search ingestion stacks
//!
//! stackplan turns a sparse deployment document into a provisioning-ready
//! topology: a managed search cluster, a streaming delivery pipeline
//! feeding it, and a notification-event source routed into the pipeline,
//! with cross-service access policy and explicit creation order. The
//! actual provisioning backend is out of scope; the output is a rendered
//! template plus named output bindings.

pub mod cli;
pub mod domain;
pub mod manifest;
pub mod template;

pub use domain::{
    DefaultSettings, DeploymentDoc, ResolvedConfig, ResourceGraph, ResourceNode, StackPlan,
    SynthError,
};
pub use template::Template;
