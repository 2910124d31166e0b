//! In-memory `GtmApi` used by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::{Datacenter, Domain, GtmApi, Property, ResponseStatus, TrafficTarget};

#[derive(Default)]
pub struct FakeGtm {
    pub domain: Option<Domain>,
    pub datacenters: Option<Vec<Datacenter>>,
    /// Property name -> error message returned by `update_property`.
    pub failing: HashMap<String, String>,
    /// Status replies, served in order. `None` stands for a failed query.
    /// The last reply repeats once the queue is drained.
    pub statuses: Mutex<VecDeque<Option<String>>>,
    pub updates: Mutex<Vec<Property>>,
    pub status_queries: Mutex<usize>,
}

impl FakeGtm {
    pub fn with_domain(domain: Domain) -> Self {
        Self {
            domain: Some(domain),
            ..Default::default()
        }
    }

    pub fn fail_update(mut self, property: &str, message: &str) -> Self {
        self.failing.insert(property.to_string(), message.to_string());
        self
    }

    pub fn statuses(self, replies: &[Option<&str>]) -> Self {
        *self.statuses.lock().unwrap() = replies.iter().map(|r| r.map(str::to_string)).collect();
        self
    }

    pub fn datacenters(mut self, list: &[(u32, &str)]) -> Self {
        self.datacenters = Some(
            list.iter()
                .map(|(id, nick)| Datacenter {
                    datacenter_id: *id,
                    nickname: Some(nick.to_string()),
                })
                .collect(),
        );
        self
    }

    pub fn updated(&self) -> Vec<Property> {
        self.updates.lock().unwrap().clone()
    }

    pub fn status_query_count(&self) -> usize {
        *self.status_queries.lock().unwrap()
    }
}

pub fn target(datacenter_id: u32, enabled: bool) -> TrafficTarget {
    TrafficTarget {
        datacenter_id,
        name: None,
        enabled,
        extra: Default::default(),
    }
}

pub fn property(name: &str, targets: Vec<TrafficTarget>) -> Property {
    Property {
        name: name.to_string(),
        traffic_targets: targets,
        extra: Default::default(),
    }
}

pub fn domain(properties: Vec<Property>) -> Domain {
    Domain {
        name: "example.akadns.net".to_string(),
        properties,
    }
}

#[async_trait]
impl GtmApi for FakeGtm {
    async fn get_domain(&self, _name: &str) -> Result<Option<Domain>> {
        Ok(self.domain.clone())
    }

    async fn update_property(&self, _domain: &str, property: &Property) -> Result<ResponseStatus> {
        if let Some(message) = self.failing.get(&property.name) {
            anyhow::bail!("{}", message);
        }

        let mut updates = self.updates.lock().unwrap();
        updates.push(property.clone());
        Ok(ResponseStatus {
            change_id: format!("change-{}", updates.len()),
            message: "Change Pending".to_string(),
            passing_validation: true,
            propagation_status: "PENDING".to_string(),
            propagation_status_date: "2024-01-15T08:00:00.000+00:00".to_string(),
        })
    }

    async fn get_domain_status(&self, _domain: &str) -> Result<ResponseStatus> {
        *self.status_queries.lock().unwrap() += 1;

        let mut queue = self.statuses.lock().unwrap();
        let reply = if queue.len() > 1 {
            queue.pop_front().flatten()
        } else {
            queue.front().cloned().flatten()
        };

        match reply {
            Some(status) => Ok(ResponseStatus {
                propagation_status: status,
                ..Default::default()
            }),
            None => anyhow::bail!("status endpoint unavailable"),
        }
    }

    async fn list_datacenters(&self, _domain: &str) -> Result<Vec<Datacenter>> {
        match &self.datacenters {
            Some(list) => Ok(list.clone()),
            None => anyhow::bail!("403 Forbidden"),
        }
    }
}
