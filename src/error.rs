use thiserror::Error;

/// Failures that end the command with exit code 1.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    UserInput(String),

    #[error("Domain {0} not found")]
    DomainNotFound(String),

    /// Nickname lookup failed. `detail` is only shown in verbose mode.
    #[error("{}", resolution_message(.detail))]
    Resolution { detail: Option<String> },

    #[error("Error updating property {property}: {message}")]
    PropertyUpdate { property: String, message: String },
}

fn resolution_message(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("Unable to retrieve datacenter list. {}", detail),
        None => "Unable to retrieve datacenter.".to_string(),
    }
}
