//! In-memory stand-in for the tracker, shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::config::Config;
use crate::error::TrackerError;
use crate::jira::{
    CurrentUser, IssueFields, JiraComment, JiraIssue, SearchPage, Tracker, Worklog,
};

pub fn test_config() -> Config {
    Config {
        server: "https://jira.example.com".to_string(),
        username: "bot".to_string(),
        api_token: "token".to_string(),
        start_date_field: "customfield_10014".to_string(),
        worklog_project: "DEV".to_string(),
        excluded_project: "DEV".to_string(),
    }
}

pub fn bare_issue(key: &str, summary: &str) -> JiraIssue {
    JiraIssue {
        key: key.to_string(),
        fields: IssueFields {
            summary: summary.to_string(),
            ..IssueFields::default()
        },
        changelog: None,
    }
}

/// Canned tracker: searches are answered by the first registered pattern
/// contained in the JQL, mutations are recorded for assertions.
#[derive(Default)]
pub struct FakeTracker {
    pub display_name: String,
    searches: Vec<(&'static str, SearchPage)>,
    worklogs_by_issue: HashMap<String, Vec<Worklog>>,
    comments_by_issue: HashMap<String, Vec<JiraComment>>,
    pub search_log: RefCell<Vec<String>>,
    pub created: RefCell<Vec<Value>>,
    pub added_comments: RefCell<Vec<(String, String)>>,
    pub assignments: RefCell<Vec<(String, String)>>,
}

impl FakeTracker {
    pub fn with_user(display_name: &str) -> Self {
        FakeTracker {
            display_name: display_name.to_string(),
            ..FakeTracker::default()
        }
    }

    pub fn on_search(mut self, jql_pattern: &'static str, issues: Vec<JiraIssue>) -> Self {
        let page = SearchPage {
            total: Some(issues.len() as u64),
            issues,
        };
        self.searches.push((jql_pattern, page));
        self
    }

    pub fn with_worklogs(mut self, issue_key: &str, worklogs: Vec<Worklog>) -> Self {
        self.worklogs_by_issue.insert(issue_key.to_string(), worklogs);
        self
    }

    pub fn with_comments(mut self, issue_key: &str, comments: Vec<JiraComment>) -> Self {
        self.comments_by_issue.insert(issue_key.to_string(), comments);
        self
    }
}

impl Tracker for FakeTracker {
    fn current_user(&self) -> Result<CurrentUser, TrackerError> {
        Ok(CurrentUser {
            name: Some("jdoe".to_string()),
            account_id: None,
            display_name: self.display_name.clone(),
        })
    }

    fn search_issues(
        &self,
        jql: &str,
        _expand_changelog: bool,
        _max_results: u32,
    ) -> Result<SearchPage, TrackerError> {
        self.search_log.borrow_mut().push(jql.to_string());
        for (pattern, page) in &self.searches {
            if jql.contains(pattern) {
                return Ok(page.clone());
            }
        }
        Ok(SearchPage {
            total: Some(0),
            issues: Vec::new(),
        })
    }

    fn worklogs(&self, issue_key: &str) -> Result<Vec<Worklog>, TrackerError> {
        Ok(self
            .worklogs_by_issue
            .get(issue_key)
            .cloned()
            .unwrap_or_default())
    }

    fn comments(&self, issue_key: &str) -> Result<Vec<JiraComment>, TrackerError> {
        Ok(self
            .comments_by_issue
            .get(issue_key)
            .cloned()
            .unwrap_or_default())
    }

    fn create_issue(&self, fields: Value) -> Result<String, TrackerError> {
        self.created.borrow_mut().push(fields);
        Ok(format!("LOG-{}", self.created.borrow().len()))
    }

    fn add_comment(&self, issue_key: &str, body: &str) -> Result<(), TrackerError> {
        self.added_comments
            .borrow_mut()
            .push((issue_key.to_string(), body.to_string()));
        Ok(())
    }

    fn assign_issue(&self, issue_key: &str, assignee: &str) -> Result<(), TrackerError> {
        self.assignments
            .borrow_mut()
            .push((issue_key.to_string(), assignee.to_string()));
        Ok(())
    }
}
