use log::{debug, info, warn};

use crate::error::CommandError;
use crate::output::Reporter;
use crate::poll::{self, PollOutcome, PollSettings};
use crate::provider::{GtmApi, Property};
use crate::summary::{Detail, FailedUpdate, SuccessRecord, UpdateSummary};

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub domain: String,
    pub datacenters: Vec<u32>,
    /// Requested state. `None` leaves every target untouched.
    pub enabled: Option<bool>,
    pub detail: Detail,
    pub dry_run: bool,
    pub wait: Option<PollSettings>,
}

#[derive(Debug)]
pub struct UpdateOutcome {
    pub summary: UpdateSummary,
    pub poll: Option<PollOutcome>,
}

/// Set `enabled` on every traffic target that belongs to one of the given
/// datacenters. Returns true if any target changed.
pub fn apply_datacenter_state(property: &mut Property, datacenters: &[u32], enabled: Option<bool>) -> bool {
    let Some(enabled) = enabled else {
        return false;
    };

    let mut changed = false;
    for target in property
        .traffic_targets
        .iter_mut()
        .filter(|t| datacenters.contains(&t.datacenter_id) && t.enabled != enabled)
    {
        debug!(
            "{}: datacenter {} enabled {} -> {}",
            property.name, target.datacenter_id, target.enabled, enabled
        );
        target.enabled = enabled;
        changed = true;
    }
    changed
}

/// Submit one changed property, or render it when this is a dry run.
pub async fn dispatch(
    api: &dyn GtmApi,
    domain: &str,
    property: &Property,
    detail: Detail,
    dry_run: bool,
) -> Result<SuccessRecord, FailedUpdate> {
    let failed = |message: String| FailedUpdate {
        prop_name: property.name.clone(),
        fail_msg: message,
    };

    if dry_run {
        return serde_json::to_string_pretty(property)
            .map(SuccessRecord::Planned)
            .map_err(|e| failed(e.to_string()));
    }

    match api.update_property(domain, property).await {
        Ok(status) => {
            info!("Updated property {} (change {})", property.name, status.change_id);
            Ok(detail.success(&property.name, status))
        }
        Err(e) => {
            warn!("Failed to update property {}: {:#}", property.name, e);
            Err(failed(format!("{:#}", e)))
        }
    }
}

/// Toggle the requested datacenters across every property of the domain.
pub async fn update_datacenters(
    api: &dyn GtmApi,
    options: &UpdateOptions,
    reporter: &Reporter,
) -> Result<UpdateOutcome, CommandError> {
    let domain_name = options.domain.as_str();
    reporter.line(format!("Updating Datacenter(s) in domain {}", domain_name));

    let domain = match api.get_domain(domain_name).await {
        Ok(Some(domain)) => domain,
        Ok(None) => return Err(CommandError::DomainNotFound(domain_name.to_string())),
        Err(e) => {
            warn!("Failed to fetch domain {}: {:#}", domain_name, e);
            return Err(CommandError::DomainNotFound(domain_name.to_string()));
        }
    };

    let property_count = domain.properties.len();
    reporter.line(format!("{} contains {} properties", domain_name, property_count));

    let mut summary = UpdateSummary::default();
    for mut property in domain.properties {
        let spinner = reporter.spinner(format!("Updating Property: {}", property.name));
        debug!("{} contains {} targets", property.name, property.traffic_targets.len());

        if apply_datacenter_state(&mut property, &options.datacenters, options.enabled) {
            let result = dispatch(api, domain_name, &property, options.detail, options.dry_run).await;
            summary.record(result);
        }
        spinner.ok();
    }

    let poll = match options.wait {
        Some(settings) if summary.submitted() > 0 => {
            let spinner = reporter.spinner("Waiting for completion");
            let outcome = poll::wait_for_propagation(api, domain_name, settings).await;
            spinner.finish(outcome.note());
            if let PollOutcome::Unknown(reason) = &outcome {
                warn!("Failed to query status of {}: {}", domain_name, reason);
            }
            Some(outcome)
        }
        _ => None,
    };

    if property_count == 1 {
        if let Some(failure) = summary.failed.first() {
            return Err(CommandError::PropertyUpdate {
                property: failure.prop_name.clone(),
                message: failure.fail_msg.clone(),
            });
        }
    }

    Ok(UpdateOutcome { summary, poll })
}
