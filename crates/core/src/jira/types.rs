//! Search request and response types for the tracker REST API.

use serde::{Deserialize, Serialize};

/// A single search call: filter query, requested fields, result cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub jql: String,
    pub fields: Vec<String>,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
}

impl SearchRequest {
    pub fn new(jql: impl Into<String>, fields: &[&str], max_results: u32) -> Self {
        Self {
            jql: jql.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            max_results,
        }
    }

    /// URL query parameters in the form the search endpoint expects.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("jql", self.jql.clone()),
            ("fields", self.fields.join(",")),
            ("maxResults", self.max_results.to_string()),
        ]
    }
}

/// Search endpoint response. Only the issue list is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

/// Issue fields. Which ones are present depends on the `fields` parameter.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IssueFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatusField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Issue {
    pub fn status_name(&self) -> Option<&str> {
        self.fields.status.as_ref()?.name.as_deref()
    }

    pub fn project_key(&self) -> Option<&str> {
        self.fields.project.as_ref()?.key.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.fields.summary.as_deref()
    }
}
