pub mod api;
pub mod config;
pub mod host;
pub mod payload;
pub mod runner;
pub mod testing;

pub use api::{ApiError, FailureKind, StatusResult, TestRigorApi, TestRigorClient};
pub use config::{
    load_config, load_config_from_str, validate_run_config, ApiConfig, Config, ConfigError,
    RunConfig, ValidationError,
};
pub use host::{Host, StatusReport};
pub use payload::{
    build_status_query, build_trigger_request, parse_comma_separated, parse_stored_values,
    PayloadError, StatusQuery, TriggerRequest,
};
pub use runner::{run, run_test_suite, RunError, RunOutcome, StatusCategory, MAX_POLL_ATTEMPTS};
