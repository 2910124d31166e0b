use std::convert::Infallible;
use std::str::FromStr;

use log::{debug, warn};

use crate::error::CommandError;
use crate::provider::GtmApi;

/// A `--datacenter` value: numeric ids are taken as-is, anything else is a
/// nickname looked up against the domain's datacenter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatacenterSelector {
    Id(u32),
    Nickname(String),
}

impl FromStr for DatacenterSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u32>() {
            Ok(id) => DatacenterSelector::Id(id),
            Err(_) => DatacenterSelector::Nickname(s.to_string()),
        })
    }
}

/// Turn selectors into datacenter ids, in the order given and without
/// duplicates. The datacenter list is only fetched when a nickname is present.
pub async fn resolve(
    api: &dyn GtmApi,
    domain: &str,
    selectors: &[DatacenterSelector],
    verbose: bool,
) -> Result<Vec<u32>, CommandError> {
    let has_nicknames = selectors
        .iter()
        .any(|s| matches!(s, DatacenterSelector::Nickname(_)));

    let known = if has_nicknames {
        api.list_datacenters(domain).await.map_err(|e| {
            warn!("Failed to list datacenters for {}: {:#}", domain, e);
            CommandError::Resolution {
                detail: verbose.then(|| format!("{:#}", e)),
            }
        })?
    } else {
        Vec::new()
    };

    let mut ids = Vec::new();
    for selector in selectors {
        let id = match selector {
            DatacenterSelector::Id(id) => *id,
            DatacenterSelector::Nickname(nickname) => {
                let found = known
                    .iter()
                    .find(|dc| dc.nickname.as_deref() == Some(nickname.as_str()))
                    .ok_or_else(|| CommandError::Resolution {
                        detail: verbose
                            .then(|| format!("No datacenter with nickname {}", nickname)),
                    })?;
                debug!("Datacenter {} resolved to id {}", nickname, found.datacenter_id);
                found.datacenter_id
            }
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fake::FakeGtm;

    fn selectors(values: &[&str]) -> Vec<DatacenterSelector> {
        values.iter().map(|v| v.parse().unwrap()).collect()
    }

    #[test]
    fn parses_ids_and_nicknames() {
        assert_eq!(selectors(&["3131"]), vec![DatacenterSelector::Id(3131)]);
        assert_eq!(
            selectors(&[" east "]),
            vec![DatacenterSelector::Nickname("east".to_string())]
        );
        assert_eq!(
            selectors(&["-1"]),
            vec![DatacenterSelector::Nickname("-1".to_string())]
        );
    }

    #[tokio::test]
    async fn ids_need_no_lookup() {
        // no datacenter list configured, so a lookup would fail
        let api = FakeGtm::default();
        let ids = resolve(&api, "example.akadns.net", &selectors(&["1", "2", "1"]), false)
            .await
            .unwrap();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn nicknames_resolve_to_ids() {
        let api = FakeGtm::default().datacenters(&[(3131, "east"), (3132, "west")]);
        let ids = resolve(&api, "example.akadns.net", &selectors(&["west", "7", "east"]), false)
            .await
            .unwrap();
        assert_eq!(ids, vec![3132, 7, 3131]);
    }

    #[tokio::test]
    async fn unknown_nickname_fails() {
        let api = FakeGtm::default().datacenters(&[(3131, "east")]);
        let err = resolve(&api, "example.akadns.net", &selectors(&["north"]), true)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to retrieve datacenter list. No datacenter with nickname north"
        );
    }

    #[tokio::test]
    async fn lookup_failure_detail_depends_on_verbosity() {
        let api = FakeGtm::default();

        let quiet = resolve(&api, "example.akadns.net", &selectors(&["east"]), false)
            .await
            .unwrap_err();
        assert_eq!(quiet.to_string(), "Unable to retrieve datacenter.");

        let loud = resolve(&api, "example.akadns.net", &selectors(&["east"]), true)
            .await
            .unwrap_err();
        assert_eq!(loud.to_string(), "Unable to retrieve datacenter list. 403 Forbidden");
    }
}
