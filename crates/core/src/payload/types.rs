//! Types for trigger and status requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while building a request payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// `storedValues` is not valid JSON or not a JSON object.
    #[error("Invalid storedValues JSON: {0}")]
    MalformedStoredValues(String),
}

/// Body of the retest request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    /// Cancel any run already in progress for the suite.
    pub force_cancel_previous_testing: bool,
    /// Values injected into the run's execution context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_values: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchDescriptor>,
    /// Deployment under test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_case_uuids: Option<Vec<String>>,
}

/// Branch/commit under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDescriptor {
    pub name: String,
    pub commit: String,
    pub allow_known_issues: bool,
}

/// Query parameters for the status endpoint, reused on every poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusQuery {
    pub branch_name: Option<String>,
    /// Raw label expression, passed through unsplit.
    pub labels: Option<String>,
}

impl StatusQuery {
    /// Query pairs for the parameters that are present.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(branch) = &self.branch_name {
            pairs.push(("branchName", branch.as_str()));
        }
        if let Some(labels) = &self.labels {
            pairs.push(("labels", labels.as_str()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_trigger_request_omits_optional_fields() {
        let request = TriggerRequest {
            force_cancel_previous_testing: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "forceCancelPreviousTesting": true }));
    }

    #[test]
    fn test_trigger_request_uses_camel_case() {
        let request = TriggerRequest {
            force_cancel_previous_testing: false,
            custom_name: Some("Nightly".to_string()),
            branch: Some(BranchDescriptor {
                name: "feature".to_string(),
                commit: "abc123".to_string(),
                allow_known_issues: true,
            }),
            url: Some("https://example.com".to_string()),
            excluded_labels: Some(vec!["slow".to_string()]),
            test_case_uuids: Some(vec!["uuid1".to_string()]),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "forceCancelPreviousTesting": false,
                "customName": "Nightly",
                "branch": { "name": "feature", "commit": "abc123", "allowKnownIssues": true },
                "url": "https://example.com",
                "excludedLabels": ["slow"],
                "testCaseUuids": ["uuid1"]
            })
        );
    }

    #[test]
    fn test_status_query_pairs() {
        assert!(StatusQuery::default().pairs().is_empty());

        let query = StatusQuery {
            branch_name: Some("feature".to_string()),
            labels: Some("smoke,regression".to_string()),
        };
        assert_eq!(
            query.pairs(),
            vec![("branchName", "feature"), ("labels", "smoke,regression")]
        );
    }
}
