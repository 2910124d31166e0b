use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::NOTHING, Table};
use log::{info, warn};

use crate::config::Settings;
use crate::datacenter::{self, DatacenterSelector};
use crate::error::CommandError;
use crate::output::Reporter;
use crate::poll::PollSettings;
use crate::provider::GtmApi;
use crate::summary::{Detail, StatusDetail};
use crate::update::{self, UpdateOptions};

#[derive(Args, Debug)]
pub struct UpdateDatacenterArgs {
    /// GTM domain name
    pub domain: Option<String>,

    /// Datacenter id or nickname (repeatable, comma separated values allowed)
    #[arg(long = "datacenter", value_delimiter = ',')]
    pub datacenters: Vec<DatacenterSelector>,

    /// Enable the datacenters
    #[arg(long)]
    pub enable: bool,

    /// Disable the datacenters
    #[arg(long)]
    pub disable: bool,

    /// Show full change status for each update
    #[arg(long)]
    pub verbose: bool,

    /// Wait for the change to finish propagating
    #[arg(long)]
    pub complete: bool,

    /// Print the properties that would be submitted without submitting them
    #[arg(long)]
    pub dryrun: bool,

    /// Maximum seconds to wait with --complete
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seconds between status checks with --complete
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Print a JSON summary only
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct QueryStatusArgs {
    /// GTM domain name
    pub domain: String,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

impl UpdateDatacenterArgs {
    /// The state requested on the command line, if any.
    pub fn requested_state(&self) -> Result<Option<bool>, CommandError> {
        match (self.enable, self.disable) {
            (true, true) => Err(CommandError::UserInput(
                "must specify either enable or disable.".to_string(),
            )),
            (true, false) => Ok(Some(true)),
            (false, true) => Ok(Some(false)),
            (false, false) => Ok(None),
        }
    }

    pub fn poll_settings(&self, settings: &Settings) -> PollSettings {
        PollSettings::new(
            self.interval.unwrap_or(settings.poll_interval),
            self.timeout.unwrap_or(settings.poll_timeout),
        )
    }
}

pub async fn update_datacenter(
    api: &dyn GtmApi,
    args: UpdateDatacenterArgs,
    settings: &Settings,
    show_help: impl Fn(),
) -> Result<()> {
    let Some(domain) = args.domain.clone() else {
        show_help();
        return Err(CommandError::UserInput("domain name is required".to_string()).into());
    };
    let enabled = args.requested_state()?;
    if args.datacenters.is_empty() {
        show_help();
        return Err(CommandError::UserInput("One or more datacenters is required".to_string()).into());
    }
    if enabled.is_none() {
        warn!("Neither --enable nor --disable given, no targets will change");
    }

    let datacenters = datacenter::resolve(api, &domain, &args.datacenters, args.verbose).await?;

    let options = UpdateOptions {
        domain,
        datacenters,
        enabled,
        detail: Detail::from_verbose(args.verbose),
        dry_run: args.dryrun,
        wait: args.complete.then(|| args.poll_settings(settings)),
    };
    let reporter = Reporter::new(args.json);
    let outcome = update::update_datacenters(api, &options, &reporter).await?;
    if let Some(poll) = &outcome.poll {
        info!("Completion wait ended:{}", poll.note());
    }
    let summary = outcome.summary;

    if options.dry_run {
        let json = summary.to_json().context("Unable to display dryrun results")?;
        println!("{}", json);
        return Ok(());
    }

    if reporter.is_json() {
        let json = summary.to_json().context("Unable to display status results")?;
        println!("{}", json);
    } else if summary.is_empty() {
        println!("No property updates were needed.");
    } else {
        println!("{}", summary.render());
    }

    Ok(())
}

pub async fn query_status(api: &dyn GtmApi, args: QueryStatusArgs) -> Result<()> {
    let status: StatusDetail = api
        .get_domain_status(&args.domain)
        .await
        .with_context(|| format!("Unable to retrieve status of domain {}", args.domain))?
        .into();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", render_status(&args.domain, &status));
    Ok(())
}

fn render_status(domain: &str, status: &StatusDetail) -> String {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    let passing = status.passing_validation.to_string();
    table.add_row(vec!["Change Id", status.change_id.as_str()]);
    table.add_row(vec!["Message", status.message.as_str()]);
    table.add_row(vec!["Passing Validation", passing.as_str()]);
    table.add_row(vec!["Propagation Status", status.propagation_status.as_str()]);
    table.add_row(vec!["Propagation Status Date", status.propagation_status_date.as_str()]);

    format!("\nDomain {} Status\n\n{}\n", domain, table)
}
