use std::time::Duration;

use log::debug;

use crate::provider::GtmApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Seconds between status queries.
    pub interval: u64,
    /// Total wait budget in seconds.
    pub timeout: u64,
    /// Length of one interval second.
    pub tick: Duration,
}

impl PollSettings {
    pub fn new(interval: u64, timeout: u64) -> Self {
        Self {
            interval: interval.max(1),
            timeout,
            tick: Duration::from_secs(1),
        }
    }

    fn pause(&self) -> Duration {
        self.tick
            .saturating_mul(u32::try_from(self.interval).unwrap_or(u32::MAX))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Complete,
    Denied,
    /// The status query failed; the change may or may not have gone out.
    Unknown(String),
    TimedOut,
}

impl PollOutcome {
    pub fn note(&self) -> &'static str {
        match self {
            PollOutcome::Complete => " [Change deployed]",
            PollOutcome::Denied => " [Change denied]",
            PollOutcome::Unknown(_) => " [Unable to retrieve domain status.]",
            PollOutcome::TimedOut => {
                " [Maximum wait time elapsed. Use query-status to confirm successful deployment]"
            }
        }
    }
}

/// Wait for the domain's pending change to finish propagating. Each round
/// sleeps one interval and then queries the status once.
pub async fn wait_for_propagation(api: &dyn GtmApi, domain: &str, settings: PollSettings) -> PollOutcome {
    let mut remaining = settings.timeout;

    loop {
        tokio::time::sleep(settings.pause()).await;

        let status = match api.get_domain_status(domain).await {
            Ok(status) => status,
            Err(e) => return PollOutcome::Unknown(format!("{:#}", e)),
        };

        match status.propagation_status.as_str() {
            "COMPLETE" => return PollOutcome::Complete,
            "DENIED" => return PollOutcome::Denied,
            other => debug!("{} propagation status: {}", domain, other),
        }

        remaining = remaining.saturating_sub(settings.interval);
        if remaining == 0 {
            return PollOutcome::TimedOut;
        }
    }
}
