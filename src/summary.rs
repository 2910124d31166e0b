use comfy_table::{presets::NOTHING, Table};
use serde::Serialize;

use crate::provider::ResponseStatus;

/// How successful updates are reported. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    Short,
    Verbose,
}

impl Detail {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Detail::Verbose
        } else {
            Detail::Short
        }
    }

    pub fn success(self, property: &str, status: ResponseStatus) -> SuccessRecord {
        match self {
            Detail::Short => SuccessRecord::Short {
                prop_name: property.to_string(),
                change_id: status.change_id,
            },
            Detail::Verbose => SuccessRecord::Verbose {
                prop_name: property.to_string(),
                resp_stat: status.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SuccessRecord {
    Short {
        #[serde(rename = "PropName")]
        prop_name: String,
        #[serde(rename = "ChangeId")]
        change_id: String,
    },
    Verbose {
        #[serde(rename = "PropName")]
        prop_name: String,
        #[serde(rename = "RespStat")]
        resp_stat: StatusDetail,
    },
    /// Pretty-printed property that a dry run would have submitted.
    Planned(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusDetail {
    pub change_id: String,
    pub message: String,
    pub passing_validation: bool,
    pub propagation_status: String,
    pub propagation_status_date: String,
}

impl From<ResponseStatus> for StatusDetail {
    fn from(status: ResponseStatus) -> Self {
        Self {
            change_id: status.change_id,
            message: status.message,
            passing_validation: status.passing_validation,
            propagation_status: status.propagation_status,
            propagation_status_date: status.propagation_status_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedUpdate {
    #[serde(rename = "PropName")]
    pub prop_name: String,
    #[serde(rename = "FailMsg")]
    pub fail_msg: String,
}

/// Outcome of one update run. Both lists are always serialized, empty or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateSummary {
    #[serde(rename = "Updated_Properties")]
    pub updated: Vec<SuccessRecord>,
    #[serde(rename = "Failed_Updates")]
    pub failed: Vec<FailedUpdate>,
}

impl UpdateSummary {
    pub fn record(&mut self, result: Result<SuccessRecord, FailedUpdate>) {
        match result {
            Ok(success) => self.updated.push(success),
            Err(failure) => self.failed.push(failure),
        }
    }

    /// Updates actually submitted, i.e. excluding dry-run entries.
    pub fn submitted(&self) -> usize {
        self.updated
            .iter()
            .filter(|r| !matches!(r, SuccessRecord::Planned(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.failed.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.load_preset(NOTHING);

        table.add_row(vec!["Completed Updates", "", "", ""]);
        if self.updated.is_empty() {
            table.add_row(vec!["", "No successful updates", "", ""]);
        }
        for record in &self.updated {
            match record {
                SuccessRecord::Short { prop_name, change_id } => {
                    table.add_row(vec!["", prop_name.as_str(), "ChangeId", change_id.as_str()]);
                }
                SuccessRecord::Verbose { prop_name, resp_stat } => {
                    let passing = resp_stat.passing_validation.to_string();
                    table.add_row(vec!["", prop_name.as_str(), "ChangeId", resp_stat.change_id.as_str()]);
                    table.add_row(vec!["", "", "Message", resp_stat.message.as_str()]);
                    table.add_row(vec!["", "", "Passing Validation", passing.as_str()]);
                    table.add_row(vec!["", "", "Propagation Status", resp_stat.propagation_status.as_str()]);
                    table.add_row(vec![
                        "",
                        "",
                        "Propagation Status Date",
                        resp_stat.propagation_status_date.as_str(),
                    ]);
                }
                SuccessRecord::Planned(json) => {
                    table.add_row(vec!["", "", "Dry Run", json.as_str()]);
                }
            }
        }

        table.add_row(vec!["Failed Updates", "", "", ""]);
        if self.failed.is_empty() {
            table.add_row(vec!["", "No failed property updates", "", ""]);
        }
        for failure in &self.failed {
            table.add_row(vec!["", failure.prop_name.as_str(), "Failure Message", failure.fail_msg.as_str()]);
        }

        format!("\nDatacenter Update Summary\n\n{}\n", table)
    }
}
