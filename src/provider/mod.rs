pub mod edgegrid;
pub mod gtm;

#[cfg(test)]
pub mod fake;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GTM domain as returned by the config API. Only the parts this tool
/// reads are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct Domain {
    #[allow(dead_code)]
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// A GTM property. Fields not modelled here are carried through `extra` so
/// an update writes back exactly what was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub traffic_targets: Vec<TrafficTarget>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTarget {
    pub datacenter_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Change status reported after an update, and the shape of the domain's
/// current status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatus {
    #[serde(default)]
    pub change_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub passing_validation: bool,
    #[serde(default)]
    pub propagation_status: String,
    #[serde(default)]
    pub propagation_status_date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datacenter {
    pub datacenter_id: u32,
    #[serde(default)]
    pub nickname: Option<String>,
}

#[async_trait]
pub trait GtmApi: Send + Sync {
    /// Fetch a domain. `Ok(None)` when the domain does not exist.
    async fn get_domain(&self, name: &str) -> Result<Option<Domain>>;

    async fn update_property(&self, domain: &str, property: &Property) -> Result<ResponseStatus>;

    async fn get_domain_status(&self, domain: &str) -> Result<ResponseStatus>;

    async fn list_datacenters(&self, domain: &str) -> Result<Vec<Datacenter>>;
}
