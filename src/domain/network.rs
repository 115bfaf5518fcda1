//! Virtual network lookup and subnet placement
//!
//! Networking is optional. When enabled, the builder resolves a virtual
//! network by name through the [`NetworkLookup`] collaborator and places
//! the cluster and pipeline transport into subnets of the configured
//! class. Resolution happens entirely before synthesis output; a name
//! that does not resolve aborts the build.
//!
//! Unlike version tokens, an unknown subnet class is a hard failure:
//! there is no sensible fallback placement.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown subnet class token
#[derive(Debug, Error, PartialEq)]
#[error("unknown subnet class '{0}' (expected public, private_isolated or private_with_egress)")]
pub struct UnknownSubnetClass(pub String);

/// Errors from resolving a network placement
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("no virtual network named '{0}'")]
    NotFound(String),

    #[error("network '{network}' has no {class} subnets")]
    NoSubnets { network: String, class: SubnetClass },
}

/// Subnet placement class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetClass {
    /// Routable from the public internet
    Public,

    /// No route out of the network
    PrivateIsolated,

    /// Outbound-only route via an egress gateway
    PrivateWithEgress,
}

impl SubnetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetClass::Public => "public",
            SubnetClass::PrivateIsolated => "private_isolated",
            SubnetClass::PrivateWithEgress => "private_with_egress",
        }
    }
}

impl fmt::Display for SubnetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubnetClass {
    type Err = UnknownSubnetClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(SubnetClass::Public),
            "private_isolated" | "private-isolated" => Ok(SubnetClass::PrivateIsolated),
            "private_with_egress" | "private-with-egress" => Ok(SubnetClass::PrivateWithEgress),
            _ => Err(UnknownSubnetClass(s.to_string())),
        }
    }
}

/// A subnet within a virtual network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub class: SubnetClass,
}

/// A resolved virtual network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualNetwork {
    pub name: String,
    pub id: String,

    /// Default security group applied to placed resources
    pub security_group: String,

    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

impl VirtualNetwork {
    /// Returns the ids of subnets in the given class, in declaration order
    pub fn select_subnets(&self, class: SubnetClass) -> Vec<&str> {
        self.subnets
            .iter()
            .filter(|s| s.class == class)
            .map(|s| s.id.as_str())
            .collect()
    }
}

/// Resolves network names to live virtual networks.
///
/// The real lookup service is external to this tool; the build only needs
/// this narrow contract, which also keeps synthesis testable offline.
pub trait NetworkLookup {
    fn find_network(&self, name: &str) -> Option<&VirtualNetwork>;
}

/// Fixed catalogue of known networks, loadable from a networks file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticNetworkIndex {
    #[serde(default)]
    networks: Vec<VirtualNetwork>,
}

impl StaticNetworkIndex {
    /// Creates an index over the given networks
    pub fn new(networks: Vec<VirtualNetwork>) -> Self {
        Self { networks }
    }

    /// Returns true if the index contains no networks
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Iterates over all known networks
    pub fn iter(&self) -> impl Iterator<Item = &VirtualNetwork> {
        self.networks.iter()
    }

    /// Returns network names keyed by id (diagnostics)
    pub fn summary(&self) -> IndexMap<&str, &str> {
        self.networks
            .iter()
            .map(|n| (n.id.as_str(), n.name.as_str()))
            .collect()
    }
}

impl NetworkLookup for StaticNetworkIndex {
    fn find_network(&self, name: &str) -> Option<&VirtualNetwork> {
        self.networks.iter().find(|n| n.name == name)
    }
}
