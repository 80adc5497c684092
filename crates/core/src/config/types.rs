use std::fmt;
use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Remote API endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL for the retest and status endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base URL for run cancellation and test case listing.
    #[serde(default = "default_cancel_base_url")]
    pub cancel_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cancel_base_url: default_cancel_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.testrigor.com/api/v1".to_string()
}

fn default_cancel_base_url() -> String {
    "https://api2.testrigor.com/api/v1".to_string()
}

/// Inputs for a single test run.
///
/// Keys are snake_case; the camelCase names used by build-plugin manifests
/// are accepted as aliases. Empty strings count as absent.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(alias = "authenticationToken", deserialize_with = "lenient_string")]
    pub authentication_token: Option<String>,
    #[serde(alias = "testSuiteId", deserialize_with = "lenient_string")]
    pub test_suite_id: Option<String>,
    #[serde(alias = "waitForResults", deserialize_with = "strict_true")]
    pub wait_for_results: bool,
    /// Seconds between status checks.
    #[serde(alias = "pollingInterval")]
    pub polling_interval: u64,
    #[serde(alias = "forceCancelPreviousTesting", deserialize_with = "strict_true")]
    pub force_cancel_previous_testing: bool,
    #[serde(alias = "customName", deserialize_with = "lenient_string")]
    pub custom_name: Option<String>,
    /// JSON object encoded as a string.
    #[serde(alias = "storedValues")]
    pub stored_values: Option<String>,
    #[serde(alias = "branchName", deserialize_with = "lenient_string")]
    pub branch_name: Option<String>,
    #[serde(alias = "commitHash", deserialize_with = "lenient_string")]
    pub commit_hash: Option<String>,
    #[serde(alias = "deployUrl")]
    pub deploy_url: Option<String>,
    #[serde(alias = "allowKnownIssues", deserialize_with = "strict_true")]
    pub allow_known_issues: bool,
    /// Comma-separated label list.
    #[serde(deserialize_with = "lenient_string")]
    pub labels: Option<String>,
    /// Comma-separated label list.
    #[serde(alias = "excludedLabels", deserialize_with = "lenient_string")]
    pub excluded_labels: Option<String>,
    /// Comma-separated test case UUIDs.
    #[serde(alias = "testCaseUuids", deserialize_with = "lenient_string")]
    pub test_case_uuids: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            authentication_token: None,
            test_suite_id: None,
            wait_for_results: true,
            polling_interval: DEFAULT_POLLING_INTERVAL_SECS,
            force_cancel_previous_testing: false,
            custom_name: None,
            stored_values: None,
            branch_name: None,
            commit_hash: None,
            deploy_url: None,
            allow_known_issues: false,
            labels: None,
            excluded_labels: None,
            test_case_uuids: None,
        }
    }
}

/// Default seconds between status checks.
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 10;

impl RunConfig {
    pub fn token(&self) -> Option<&str> {
        non_empty(&self.authentication_token)
    }

    pub fn suite_id(&self) -> Option<&str> {
        non_empty(&self.test_suite_id)
    }

    pub fn custom_name(&self) -> Option<&str> {
        non_empty(&self.custom_name)
    }

    pub fn stored_values(&self) -> Option<&str> {
        non_empty(&self.stored_values)
    }

    pub fn branch_name(&self) -> Option<&str> {
        non_empty(&self.branch_name)
    }

    pub fn commit_hash(&self) -> Option<&str> {
        non_empty(&self.commit_hash)
    }

    pub fn deploy_url(&self) -> Option<&str> {
        non_empty(&self.deploy_url)
    }

    pub fn labels(&self) -> Option<&str> {
        non_empty(&self.labels)
    }

    pub fn excluded_labels(&self) -> Option<&str> {
        non_empty(&self.excluded_labels)
    }

    pub fn test_case_uuids(&self) -> Option<&str> {
        non_empty(&self.test_case_uuids)
    }

    /// Whether branch/commit testing was requested.
    pub fn uses_branch(&self) -> bool {
        self.branch_name().is_some() || self.commit_hash().is_some()
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Only a boolean `true` counts as true; anything else is false.
fn strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value == serde_json::Value::Bool(true))
}

/// Accept a string, number or boolean and keep it as text.
///
/// Numeric-looking inputs such as an all-digit commit hash arrive as numbers
/// from TOML and from environment overrides.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(de::Error::custom(format!(
            "invalid type: {}, expected a string or number",
            other
        ))),
    }
}

// Token stays out of logs.
impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field(
                "authentication_token",
                &self.token().map(|_| "<redacted>"),
            )
            .field("test_suite_id", &self.test_suite_id)
            .field("wait_for_results", &self.wait_for_results)
            .field("polling_interval", &self.polling_interval)
            .field(
                "force_cancel_previous_testing",
                &self.force_cancel_previous_testing,
            )
            .field("custom_name", &self.custom_name)
            .field("stored_values", &self.stored_values)
            .field("branch_name", &self.branch_name)
            .field("commit_hash", &self.commit_hash)
            .field("deploy_url", &self.deploy_url)
            .field("allow_known_issues", &self.allow_known_issues)
            .field("labels", &self.labels)
            .field("excluded_labels", &self.excluded_labels)
            .field("test_case_uuids", &self.test_case_uuids)
            .finish()
    }
}
