//! Request payloads derived from a validated run configuration.
//!
//! The trigger endpoint takes split label lists; the status endpoint takes
//! the raw label expression.

mod builder;
mod types;

pub use builder::{
    build_status_query, build_trigger_request, parse_comma_separated, parse_stored_values,
};
pub use types::*;
