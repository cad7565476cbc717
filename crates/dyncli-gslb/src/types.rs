use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::matcher::LabelPattern;

/// Serve mode of a pool entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServeMode {
    /// Always serve, regardless of monitoring
    Always,
    /// Serve only while the health check passes
    Obey,
    /// Removed from the pool
    Remove,
    /// Never serve
    No,
}

impl ServeMode {
    pub const ALL: [ServeMode; 4] = [Self::Always, Self::Obey, Self::Remove, Self::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Obey => "obey",
            Self::Remove => "remove",
            Self::No => "no",
        }
    }
}

impl fmt::Display for ServeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "obey" => Ok(Self::Obey),
            "remove" => Ok(Self::Remove),
            "no" => Ok(Self::No),
            other => Err(format!(
                "invalid serve mode \"{other}\", expected one of always, obey, remove, no"
            )),
        }
    }
}

/// One steered endpoint within a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub address: String,
    pub label: String,
    pub weight: i64,
    pub serve_mode: ServeMode,
}

/// Configuration of one GSLB region, as read from and written back to the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionState {
    pub region_code: String,
    pub serve_count: i64,
    #[serde(default)]
    pub failover_mode: String,
    #[serde(default)]
    pub failover_data: String,
    #[serde(default)]
    pub pool: Vec<PoolEntry>,
}

/// GSLB service settings (only the fields the reconciler reads)
#[derive(Debug, Clone, Deserialize)]
pub struct GslbService {
    pub ttl: u64,
}

/// A GSLB service addressed by zone and node name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GslbResource {
    pub zone: String,
    pub fqdn: String,
}

impl GslbResource {
    pub fn new(zone: impl Into<String>, fqdn: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            fqdn: fqdn.into(),
        }
    }
}

impl fmt::Display for GslbResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (zone {})", self.fqdn, self.zone)
    }
}

/// Desired state for one reconciliation run
#[derive(Debug, Clone)]
pub struct DesiredConfig {
    pub resource: GslbResource,
    pub label_pattern: LabelPattern,
    pub serve_mode: ServeMode,
}

/// Region payloads to send back, keyed by region code
pub type UpdatePlan = BTreeMap<String, RegionState>;
