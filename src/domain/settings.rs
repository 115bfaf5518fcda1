//! Configuration resolution
//!
//! A deployment starts from two inputs: the caller's deployment document
//! (sparse, every option may be absent) and a [`DefaultSettings`] value
//! (complete). [`ResolvedConfig::resolve`] merges them option by option,
//! override if present else default, into a flag-complete configuration
//! where optional features are present-or-absent variants, never half-set
//! fields.
//!
//! Defaults are always an explicit argument. Nothing here reads process
//! state, so several deployments can be resolved side by side and tests
//! can pin down exactly which defaults were in play.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::name::{AppName, NameError};
use super::network::{SubnetClass, UnknownSubnetClass};
use super::version::EngineVersion;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required option '{0}'")]
    MissingOption(&'static str),

    #[error(transparent)]
    InvalidAppName(#[from] NameError),

    #[error(transparent)]
    SubnetClass(#[from] UnknownSubnetClass),
}

/// How records enter the delivery pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Producers write records directly to the pipeline
    #[default]
    DirectPut,

    /// The pipeline reads from an upstream stream
    StreamSource,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::DirectPut => "direct_put",
            DeliveryMode::StreamSource => "stream_source",
        }
    }
}

/// Which documents the pipeline copies to backup storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackupMode {
    /// Only documents the cluster rejected
    #[default]
    FailedOnly,

    /// Every delivered document
    All,
}

impl BackupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupMode::FailedOnly => "failed_only",
            BackupMode::All => "all",
        }
    }
}

/// How often the pipeline rotates the target index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RotationPeriod {
    NoRotation,
    OneHour,
    #[default]
    OneDay,
    OneWeek,
    OneMonth,
}

impl RotationPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationPeriod::NoRotation => "no_rotation",
            RotationPeriod::OneHour => "one_hour",
            RotationPeriod::OneDay => "one_day",
            RotationPeriod::OneWeek => "one_week",
            RotationPeriod::OneMonth => "one_month",
        }
    }
}

/// Cluster capacity overrides (all optional, merged per field)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityDoc {
    pub data_node_type: Option<String>,
    pub data_nodes: Option<u32>,
    pub master_node_type: Option<String>,
    pub master_nodes: Option<u32>,
    pub warm_node_type: Option<String>,
    pub warm_nodes: Option<u32>,
}

/// Default cluster capacity. Dedicated master and warm instance types
/// have no default; leaving them unset defers to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityDefaults {
    pub data_node_type: String,
    pub data_nodes: u32,
    pub master_nodes: u32,
    pub warm_nodes: u32,
}

impl Default for CapacityDefaults {
    fn default() -> Self {
        Self {
            data_node_type: "search.medium".to_string(),
            data_nodes: 2,
            master_nodes: 0,
            warm_nodes: 0,
        }
    }
}

/// Resolved cluster capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    pub data_node_type: String,
    pub data_nodes: u32,

    /// None defers to the backend's default instance type
    pub master_node_type: Option<String>,
    pub master_nodes: u32,

    pub warm_node_type: Option<String>,
    pub warm_nodes: u32,
}

/// Block storage overrides (all optional, merged per field)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageDoc {
    pub enabled: Option<bool>,
    pub volume_size: Option<u32>,
}

/// Resolved block storage attached to data nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    pub enabled: bool,

    /// Volume size in GiB
    pub volume_size: u32,
}

/// Cluster log publication overrides (all optional, merged per field)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterLoggingDoc {
    pub app_log_enabled: Option<bool>,
    pub slow_search_log_enabled: Option<bool>,
    pub slow_index_log_enabled: Option<bool>,
}

/// Resolved cluster log publication flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterLogging {
    pub app_log_enabled: bool,
    pub slow_search_log_enabled: bool,
    pub slow_index_log_enabled: bool,
}

/// Networking feature parameters (present only when networking is enabled)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkingConfig {
    /// Name of the virtual network to place the stack into
    pub network_name: String,

    /// Subnet class for cluster and pipeline placement
    pub subnet_class: SubnetClass,
}

/// Access-control feature parameters (present only when enabled).
///
/// Only the master user *name* lives here. The credential itself is set
/// up out of band; this tool never generates or stores a secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessControlConfig {
    pub master_user_name: String,
}

/// A caller-supplied deployment document. Every option is optional here;
/// resolution decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentDoc {
    pub app_name: Option<String>,
    pub index_name: Option<String>,

    pub networking_enabled: Option<bool>,
    pub network_name: Option<String>,
    pub subnet_class: Option<String>,

    pub access_control_enabled: Option<bool>,
    pub master_user_name: Option<String>,

    pub logging_enabled: Option<bool>,
    pub version: Option<String>,

    pub delivery_mode: Option<DeliveryMode>,
    pub backup_mode: Option<BackupMode>,
    pub rotation_period: Option<RotationPeriod>,

    pub capacity: Option<CapacityDoc>,
    pub storage: Option<StorageDoc>,
    pub zone_awareness: Option<bool>,
    pub cluster_logging: Option<ClusterLoggingDoc>,

    pub event_type_filters: Option<IndexMap<String, bool>>,
}

/// Baseline settings applied wherever the deployment document is silent.
///
/// A partial defaults file overrides only the keys it names; everything
/// else comes from [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    pub networking_enabled: bool,
    pub network_name: Option<String>,
    pub subnet_class: String,

    pub access_control_enabled: bool,
    pub master_user_name: Option<String>,

    pub logging_enabled: bool,
    pub version: String,

    pub delivery_mode: DeliveryMode,
    pub backup_mode: BackupMode,
    pub rotation_period: RotationPeriod,

    pub capacity: CapacityDefaults,
    pub storage: Storage,
    pub zone_awareness: bool,
    pub cluster_logging: ClusterLogging,

    pub event_type_filters: IndexMap<String, bool>,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            networking_enabled: false,
            network_name: None,
            subnet_class: "private_with_egress".to_string(),
            access_control_enabled: false,
            master_user_name: None,
            logging_enabled: true,
            version: "1.3".to_string(),
            delivery_mode: DeliveryMode::DirectPut,
            backup_mode: BackupMode::FailedOnly,
            rotation_period: RotationPeriod::OneDay,
            capacity: CapacityDefaults::default(),
            storage: Storage {
                enabled: true,
                volume_size: 10,
            },
            zone_awareness: false,
            cluster_logging: ClusterLogging {
                app_log_enabled: true,
                slow_search_log_enabled: true,
                slow_index_log_enabled: true,
            },
            event_type_filters: default_event_filters(),
        }
    }
}

fn default_event_filters() -> IndexMap<String, bool> {
    IndexMap::from([
        ("Bounce".to_string(), true),
        ("Complaint".to_string(), true),
        ("Delivery".to_string(), true),
    ])
}

/// Fully resolved deployment configuration.
///
/// Every recognized option has a concrete value. Optional features are
/// `Some` with their parameters or `None`, so later stages never check a
/// flag and then read a possibly-missing field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub app_name: AppName,
    pub index_name: String,

    pub networking: Option<NetworkingConfig>,
    pub access_control: Option<AccessControlConfig>,
    pub logging_enabled: bool,

    pub version: EngineVersion,
    pub delivery_mode: DeliveryMode,
    pub backup_mode: BackupMode,
    pub rotation_period: RotationPeriod,

    pub capacity: Capacity,
    pub storage: Storage,
    pub zone_awareness: bool,
    pub cluster_logging: ClusterLogging,

    pub event_type_filters: IndexMap<String, bool>,
}

impl ResolvedConfig {
    /// Merges a deployment document against defaults.
    ///
    /// Two enumerated tokens get asymmetric treatment on purpose: an
    /// unrecognized `version` falls back to the latest known engine
    /// version, while an unrecognized `subnet_class` is an error even if
    /// networking is disabled and the token would go unused.
    pub fn resolve(doc: &DeploymentDoc, defaults: &DefaultSettings) -> Result<Self, ConfigError> {
        let app_name: AppName = doc
            .app_name
            .as_deref()
            .ok_or(ConfigError::MissingOption("app_name"))?
            .parse()?;

        let index_name = doc
            .index_name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingOption("index_name"))?;

        let subnet_class: SubnetClass = doc
            .subnet_class
            .as_deref()
            .unwrap_or(&defaults.subnet_class)
            .parse()?;

        let networking = if doc.networking_enabled.unwrap_or(defaults.networking_enabled) {
            let network_name = doc
                .network_name
                .clone()
                .or_else(|| defaults.network_name.clone())
                .ok_or(ConfigError::MissingOption("network_name"))?;
            Some(NetworkingConfig {
                network_name,
                subnet_class,
            })
        } else {
            None
        };

        let access_control = if doc
            .access_control_enabled
            .unwrap_or(defaults.access_control_enabled)
        {
            // The master user name always has a derived fallback, so
            // enabling access control alone never fails resolution.
            let master_user_name = doc
                .master_user_name
                .clone()
                .or_else(|| defaults.master_user_name.clone())
                .unwrap_or_else(|| app_name.master_user_name());
            Some(AccessControlConfig { master_user_name })
        } else {
            None
        };

        let version = EngineVersion::resolve(doc.version.as_deref().unwrap_or(&defaults.version));

        let capacity_doc = doc.capacity.clone().unwrap_or_default();
        let capacity = Capacity {
            data_node_type: capacity_doc
                .data_node_type
                .unwrap_or_else(|| defaults.capacity.data_node_type.clone()),
            data_nodes: capacity_doc.data_nodes.unwrap_or(defaults.capacity.data_nodes),
            master_node_type: capacity_doc.master_node_type,
            master_nodes: capacity_doc
                .master_nodes
                .unwrap_or(defaults.capacity.master_nodes),
            warm_node_type: capacity_doc.warm_node_type,
            warm_nodes: capacity_doc.warm_nodes.unwrap_or(defaults.capacity.warm_nodes),
        };

        let storage_doc = doc.storage.clone().unwrap_or_default();
        let storage = Storage {
            enabled: storage_doc.enabled.unwrap_or(defaults.storage.enabled),
            volume_size: storage_doc
                .volume_size
                .unwrap_or(defaults.storage.volume_size),
        };

        let logging_doc = doc.cluster_logging.clone().unwrap_or_default();
        let cluster_logging = ClusterLogging {
            app_log_enabled: logging_doc
                .app_log_enabled
                .unwrap_or(defaults.cluster_logging.app_log_enabled),
            slow_search_log_enabled: logging_doc
                .slow_search_log_enabled
                .unwrap_or(defaults.cluster_logging.slow_search_log_enabled),
            slow_index_log_enabled: logging_doc
                .slow_index_log_enabled
                .unwrap_or(defaults.cluster_logging.slow_index_log_enabled),
        };

        Ok(Self {
            app_name,
            index_name,
            networking,
            access_control,
            logging_enabled: doc.logging_enabled.unwrap_or(defaults.logging_enabled),
            version,
            delivery_mode: doc.delivery_mode.unwrap_or(defaults.delivery_mode),
            backup_mode: doc.backup_mode.unwrap_or(defaults.backup_mode),
            rotation_period: doc.rotation_period.unwrap_or(defaults.rotation_period),
            capacity,
            storage,
            zone_awareness: doc.zone_awareness.unwrap_or(defaults.zone_awareness),
            cluster_logging,
            event_type_filters: doc
                .event_type_filters
                .clone()
                .unwrap_or_else(|| defaults.event_type_filters.clone()),
        })
    }

    /// Returns true when the stack is placed in a private network
    pub fn networking_enabled(&self) -> bool {
        self.networking.is_some()
    }

    /// Returns true when fine-grained access control is enabled
    pub fn access_control_enabled(&self) -> bool {
        self.access_control.is_some()
    }

    /// Event types whose flag is set, in mapping order
    pub fn enabled_event_types(&self) -> Vec<&str> {
        self.event_type_filters
            .iter()
            .filter(|(_, &enabled)| enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
