//! KeystoneConfig - Config Loader output
//!
//! Describes the identity endpoint, the route hosting the producer and the
//! optional groups preloaded into the in-memory directory.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{Group, Operation};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete producer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct KeystoneConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Identity endpoint
    #[validate(nested)]
    pub endpoint: EndpointConfig,

    /// Route hosting the producer
    #[serde(default)]
    #[validate(nested)]
    pub route: RouteConfig,

    /// Groups preloaded into the in-memory directory
    #[serde(default)]
    #[validate(nested)]
    pub directory: DirectoryConfig,
}

/// Identity endpoint: address, credentials, default operation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EndpointConfig {
    /// Keystone v3 base URL (e.g., "http://keystone.local:5000/v3")
    #[validate(url(message = "host must be a URL"))]
    pub host: String,

    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[validate(length(min = 1, message = "project must not be empty"))]
    pub project: String,

    /// Authentication domain
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Operation used when a message carries no `operation` header
    #[serde(default)]
    pub operation: Option<Operation>,
}

fn default_domain() -> String {
    "default".to_string()
}

/// Route settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RouteConfig {
    /// Bounded queue in front of the producer
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1, message = "queue_capacity must be >= 1"))]
    pub queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// In-memory directory seed
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DirectoryConfig {
    #[serde(default)]
    #[validate(nested)]
    pub groups: Vec<GroupSeed>,
}

/// One preloaded group
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GroupSeed {
    #[validate(length(min = 1, message = "group name must not be empty"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub domain_id: Option<String>,
}

impl GroupSeed {
    /// Convert to a group without an id (the directory assigns one)
    pub fn to_group(&self) -> Group {
        Group {
            id: None,
            name: self.name.clone(),
            description: self.description.clone(),
            domain_id: self.domain_id.clone(),
        }
    }
}
