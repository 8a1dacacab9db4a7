use std::env;

use crate::error::TrackerError;

pub const DEFAULT_START_DATE_FIELD: &str = "customfield_10014";
pub const DEFAULT_WORKLOG_PROJECT: &str = "DEV";

/// Connection and filing settings, loaded once per run and passed by
/// reference to the client, collector and upserter.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: String,
    pub username: String,
    pub api_token: String,
    /// Custom field id holding a sub-task's start date.
    pub start_date_field: String,
    /// Project that holds the per-user epic, monthly tasks and sub-tasks.
    pub worklog_project: String,
    /// Project excluded from the activity search.
    pub excluded_project: String,
}

impl Config {
    pub fn from_env() -> Result<Self, TrackerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TrackerError> {
        let server = require(&lookup, "JIRA_SERVER")?;
        let username = require(&lookup, "JIRA_USERNAME")?;
        let api_token = require(&lookup, "JIRA_API_TOKEN")?;

        let start_date_field = lookup("JIRA_START_DATE_FIELD")
            .unwrap_or_else(|| DEFAULT_START_DATE_FIELD.to_string());
        let worklog_project = lookup("JIRA_WORKLOG_PROJECT")
            .unwrap_or_else(|| DEFAULT_WORKLOG_PROJECT.to_string());
        let excluded_project =
            lookup("JIRA_EXCLUDED_PROJECT").unwrap_or_else(|| worklog_project.clone());

        Ok(Config {
            server: server.trim_end_matches('/').to_string(),
            username,
            api_token,
            start_date_field,
            worklog_project,
            excluded_project,
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, TrackerError> {
    match lookup(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(TrackerError::Config(format!(
            "missing environment variable {}",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_with(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn loads_required_and_defaults() {
        let vars = env_with(&[
            ("JIRA_SERVER", "https://jira.example.com/"),
            ("JIRA_USERNAME", "bot"),
            ("JIRA_API_TOKEN", "secret"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.server, "https://jira.example.com");
        assert_eq!(config.start_date_field, DEFAULT_START_DATE_FIELD);
        assert_eq!(config.worklog_project, "DEV");
        assert_eq!(config.excluded_project, "DEV");
    }

    #[test]
    fn excluded_project_follows_worklog_project() {
        let vars = env_with(&[
            ("JIRA_SERVER", "https://jira.example.com"),
            ("JIRA_USERNAME", "bot"),
            ("JIRA_API_TOKEN", "secret"),
            ("JIRA_WORKLOG_PROJECT", "OPS"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.worklog_project, "OPS");
        assert_eq!(config.excluded_project, "OPS");
    }

    #[test]
    fn missing_server_is_a_config_error() {
        let vars = env_with(&[("JIRA_USERNAME", "bot"), ("JIRA_API_TOKEN", "secret")]);
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();

        assert!(matches!(err, TrackerError::Config(_)));
        assert!(err.to_string().contains("JIRA_SERVER"));
    }
}
