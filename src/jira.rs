use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::TrackerError;

/// Fixed search page size. Result sets larger than this are not paginated;
/// the collector logs what gets dropped.
pub const SEARCH_PAGE_SIZE: u32 = 100;

// Wire types for the tracker's REST responses. Field names follow the
// Jira v2 payloads; everything not needed by the pipeline is ignored.

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub total: Option<u64>,
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
    pub key: String,
    pub fields: IssueFields,
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "timeoriginalestimate")]
    pub original_estimate: Option<i64>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<ChangeHistory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeHistory {
    pub created: String,
    #[serde(default)]
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeItem {
    pub field: String,
    #[serde(rename = "fromString")]
    pub from: Option<String>,
    #[serde(rename = "toString")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorklogPage {
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Worklog {
    pub started: String,
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<JiraComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraComment {
    #[serde(default)]
    pub body: String,
    pub created: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub name: Option<String>,
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

/// The tracker operations the pipeline needs. `JiraClient` is the live
/// implementation; tests substitute an in-memory fake.
pub trait Tracker {
    fn current_user(&self) -> Result<CurrentUser, TrackerError>;
    fn search_issues(
        &self,
        jql: &str,
        expand_changelog: bool,
        max_results: u32,
    ) -> Result<SearchPage, TrackerError>;
    fn worklogs(&self, issue_key: &str) -> Result<Vec<Worklog>, TrackerError>;
    fn comments(&self, issue_key: &str) -> Result<Vec<JiraComment>, TrackerError>;
    fn create_issue(&self, fields: Value) -> Result<String, TrackerError>;
    fn add_comment(&self, issue_key: &str, body: &str) -> Result<(), TrackerError>;
    fn assign_issue(&self, issue_key: &str, assignee: &str) -> Result<(), TrackerError>;
}

pub struct JiraClient {
    http: Client,
    server: String,
    username: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(config: &Config) -> Result<Self, TrackerError> {
        let http = Client::builder().build()?;
        Ok(JiraClient {
            http,
            server: config.server.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, TrackerError> {
        let response = self
            .http
            .get(format!("{}{}", self.server, path))
            .basic_auth(&self.username, Some(&self.api_token))
            .query(query)
            .send()?;
        classify(response)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Response, TrackerError> {
        let response = self
            .http
            .post(format!("{}{}", self.server, path))
            .basic_auth(&self.username, Some(&self.api_token))
            .json(body)
            .send()?;
        classify(response)
    }

    fn put(&self, path: &str, body: &Value) -> Result<Response, TrackerError> {
        let response = self
            .http
            .put(format!("{}{}", self.server, path))
            .basic_auth(&self.username, Some(&self.api_token))
            .json(body)
            .send()?;
        classify(response)
    }
}

fn classify(response: Response) -> Result<Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status.as_u16() {
        401 => Err(TrackerError::AuthRejected),
        403 => Err(TrackerError::Forbidden),
        404 => Err(TrackerError::NotFound),
        code => Err(TrackerError::Api {
            status: code,
            message: response.text().unwrap_or_default(),
        }),
    }
}

impl Tracker for JiraClient {
    fn current_user(&self) -> Result<CurrentUser, TrackerError> {
        Ok(self.get("/rest/api/2/myself", &[])?.json()?)
    }

    fn search_issues(
        &self,
        jql: &str,
        expand_changelog: bool,
        max_results: u32,
    ) -> Result<SearchPage, TrackerError> {
        let mut query = vec![
            ("jql", jql.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if expand_changelog {
            query.push(("expand", "changelog".to_string()));
        }
        Ok(self.get("/rest/api/2/search", &query)?.json()?)
    }

    fn worklogs(&self, issue_key: &str) -> Result<Vec<Worklog>, TrackerError> {
        let page: WorklogPage = self
            .get(&format!("/rest/api/2/issue/{}/worklog", issue_key), &[])?
            .json()?;
        Ok(page.worklogs)
    }

    fn comments(&self, issue_key: &str) -> Result<Vec<JiraComment>, TrackerError> {
        let page: CommentPage = self
            .get(&format!("/rest/api/2/issue/{}/comment", issue_key), &[])?
            .json()?;
        Ok(page.comments)
    }

    fn create_issue(&self, fields: Value) -> Result<String, TrackerError> {
        let created: CreatedIssue = self
            .post("/rest/api/2/issue", &json!({ "fields": fields }))?
            .json()?;
        Ok(created.key)
    }

    fn add_comment(&self, issue_key: &str, body: &str) -> Result<(), TrackerError> {
        self.post(
            &format!("/rest/api/2/issue/{}/comment", issue_key),
            &json!({ "body": body }),
        )?;
        Ok(())
    }

    fn assign_issue(&self, issue_key: &str, assignee: &str) -> Result<(), TrackerError> {
        self.put(
            &format!("/rest/api/2/issue/{}/assignee", issue_key),
            &json!({ "name": assignee }),
        )?;
        Ok(())
    }
}

/// Parse a tracker timestamp like `2024-08-14T10:30:00.000+0200` into UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Date part of a tracker timestamp, for display.
pub fn date_part(raw: &str) -> String {
    raw.split('T').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_timestamps_with_offset_and_millis() {
        let parsed = parse_timestamp("2024-08-14T10:30:00.000+0200").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 8, 14, 8, 30, 0).unwrap());

        let parsed = parse_timestamp("2024-08-14T10:30:00+00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 8, 14, 10, 30, 0).unwrap());
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-08-14").is_none());
    }

    #[test]
    fn date_part_truncates_at_the_time_separator() {
        assert_eq!(date_part("2024-08-14T10:30:00.000+0200"), "2024-08-14");
        assert_eq!(date_part("2024-08-14"), "2024-08-14");
    }

    #[test]
    fn search_page_deserializes_with_changelog() {
        let payload = r#"{
            "total": 1,
            "issues": [{
                "key": "ABC-1",
                "fields": {
                    "summary": "Fix bug",
                    "timeoriginalestimate": 7200,
                    "created": "2024-08-01T09:00:00.000+0000",
                    "updated": "2024-08-14T17:00:00.000+0000"
                },
                "changelog": {
                    "histories": [{
                        "created": "2024-08-14T11:00:00.000+0000",
                        "items": [{
                            "field": "status",
                            "fromString": "To Do",
                            "toString": "Done"
                        }]
                    }]
                }
            }]
        }"#;

        let page: SearchPage = serde_json::from_str(payload).unwrap();
        assert_eq!(page.total, Some(1));
        let issue = &page.issues[0];
        assert_eq!(issue.key, "ABC-1");
        assert_eq!(issue.fields.original_estimate, Some(7200));
        let history = &issue.changelog.as_ref().unwrap().histories[0];
        assert_eq!(history.items[0].from.as_deref(), Some("To Do"));
    }

    #[test]
    fn worklog_page_deserializes_camel_case_fields() {
        let payload = r#"{
            "worklogs": [
                {"started": "2024-08-14T09:00:00.000+0000", "timeSpentSeconds": 3600}
            ]
        }"#;

        let page: WorklogPage = serde_json::from_str(payload).unwrap();
        assert_eq!(page.worklogs[0].time_spent_seconds, 3600);
    }

    #[test]
    fn search_page_tolerates_missing_optional_fields() {
        let payload = r#"{"issues": [{"key": "DEV-9", "fields": {"summary": "Epic for Jane"}}]}"#;

        let page: SearchPage = serde_json::from_str(payload).unwrap();
        assert_eq!(page.total, None);
        assert!(page.issues[0].changelog.is_none());
        assert_eq!(page.issues[0].fields.original_estimate, None);
    }
}
