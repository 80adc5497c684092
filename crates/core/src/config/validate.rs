use thiserror::Error;

use super::types::RunConfig;

/// Reason a run configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("authenticationToken is required")]
    MissingToken,

    #[error("testSuiteId is required")]
    MissingSuiteId,

    #[error("deployUrl is required when using branch/commit testing")]
    BranchWithoutDeployUrl,

    #[error("deployUrl is required when using testCaseUuids")]
    TestCasesWithoutDeployUrl,

    #[error("pollingInterval must be at least 1 second")]
    ZeroPollingInterval,
}

/// Validate a run configuration before any network call.
///
/// Rules are checked in order and the first failure wins.
pub fn validate_run_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.token().is_none() {
        return Err(ValidationError::MissingToken);
    }

    if config.suite_id().is_none() {
        return Err(ValidationError::MissingSuiteId);
    }

    if config.uses_branch() && config.deploy_url().is_none() {
        return Err(ValidationError::BranchWithoutDeployUrl);
    }

    if config.test_case_uuids().is_some() && config.deploy_url().is_none() {
        return Err(ValidationError::TestCasesWithoutDeployUrl);
    }

    if config.polling_interval == 0 {
        return Err(ValidationError::ZeroPollingInterval);
    }

    Ok(())
}
