//! Domain models for stackplan
//!
//! The synthesis core without any I/O concerns: configuration resolution,
//! graph construction, policy composition, dependency linking and output
//! projection.

mod name;
mod version;
mod network;
mod settings;
mod node;
mod graph;
mod policy;
mod builder;
mod link;
mod outputs;
mod stack;

pub use name::{AppName, NameError};
pub use version::EngineVersion;
pub use network::{
    NetworkError, NetworkLookup, StaticNetworkIndex, Subnet, SubnetClass, UnknownSubnetClass,
    VirtualNetwork,
};
pub use settings::{
    BackupMode, ClusterLogging, ConfigError, DefaultSettings, DeliveryMode, DeploymentDoc,
    ResolvedConfig, RotationPeriod,
};
pub use node::{NodeId, ResourceKind, ResourceNode};
pub use graph::{GraphError, ResourceGraph};
pub use policy::{compose, PolicyEffect, PolicyStatement, PIPELINE_CAPABILITIES};
pub use builder::{
    BuildError, GraphBuilder, BACKUP_BUCKET, DELIVERY_PIPELINE, EVENT_ROUTE, EVENT_SOURCE,
    PIPELINE_ACCESS_ROLE, SEARCH_CLUSTER, SEARCH_SERVICE_LINKED_ROLE,
};
pub use link::link;
pub use outputs::{project, OutputBinding};
pub use stack::{StackPlan, SynthError};
