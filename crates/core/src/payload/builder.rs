//! Builders for the retest body and the status query.

use serde_json::{Map, Value};

use crate::config::RunConfig;

use super::{BranchDescriptor, PayloadError, StatusQuery, TriggerRequest};

/// Branch name sent when only a commit hash is configured.
const DEFAULT_BRANCH: &str = "main";

/// Split a comma-separated list, trimming entries and dropping empty ones.
///
/// Returns `None` for absent input or when nothing survives filtering.
pub fn parse_comma_separated(input: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = input?
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Parse the `storedValues` input into a JSON object.
pub fn parse_stored_values(
    input: Option<&str>,
) -> Result<Option<Map<String, Value>>, PayloadError> {
    let Some(raw) = input.filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| PayloadError::MalformedStoredValues(e.to_string()))?;

    match parsed {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(PayloadError::MalformedStoredValues(
            "storedValues must be a JSON object".to_string(),
        )),
    }
}

/// Build the retest request body.
pub fn build_trigger_request(config: &RunConfig) -> Result<TriggerRequest, PayloadError> {
    let mut request = TriggerRequest {
        force_cancel_previous_testing: config.force_cancel_previous_testing,
        stored_values: parse_stored_values(config.stored_values())?,
        custom_name: config.custom_name().map(str::to_string),
        ..Default::default()
    };

    if config.uses_branch() {
        request.branch = Some(BranchDescriptor {
            name: config.branch_name().unwrap_or(DEFAULT_BRANCH).to_string(),
            commit: config.commit_hash().unwrap_or_default().to_string(),
            allow_known_issues: config.allow_known_issues,
        });
        request.url = config.deploy_url().map(str::to_string);
    }

    request.labels = parse_comma_separated(config.labels());
    request.excluded_labels = parse_comma_separated(config.excluded_labels());

    if let Some(uuids) = parse_comma_separated(config.test_case_uuids()) {
        if request.url.is_none() {
            request.url = config.deploy_url().map(str::to_string);
        }
        request.test_case_uuids = Some(uuids);
    }

    Ok(request)
}

/// Build the status query. Labels are passed through unsplit.
pub fn build_status_query(config: &RunConfig) -> StatusQuery {
    StatusQuery {
        branch_name: config.branch_name().map(str::to_string),
        labels: config.labels().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> RunConfig {
        RunConfig {
            authentication_token: Some("token".to_string()),
            test_suite_id: Some("suite123".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_comma_separated() {
        assert_eq!(
            parse_comma_separated(Some("label1, label2, label3")),
            Some(vec![
                "label1".to_string(),
                "label2".to_string(),
                "label3".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_comma_separated_empty_input() {
        assert_eq!(parse_comma_separated(None), None);
        assert_eq!(parse_comma_separated(Some("")), None);
        assert_eq!(parse_comma_separated(Some(" , ,  ")), None);
    }

    #[test]
    fn test_parse_comma_separated_filters_and_trims() {
        assert_eq!(
            parse_comma_separated(Some("  label1  , ,  label3  ")),
            Some(vec!["label1".to_string(), "label3".to_string()])
        );
    }

    #[test]
    fn test_parse_comma_separated_is_idempotent() {
        let inputs = [
            "a,b,c",
            " a , b ,, c ",
            ",,,x,,,",
            "one",
            "  spaced  out  , tabs\t,\tend",
        ];
        for input in inputs {
            let first = parse_comma_separated(Some(input)).unwrap();
            let joined = first.join(",");
            let second = parse_comma_separated(Some(&joined)).unwrap();
            assert_eq!(first, second, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_parse_stored_values_object() {
        let values = parse_stored_values(Some(r#"{"key": "value", "number": 123}"#))
            .unwrap()
            .unwrap();
        assert_eq!(Value::Object(values), json!({ "key": "value", "number": 123 }));
    }

    #[test]
    fn test_parse_stored_values_empty() {
        assert!(parse_stored_values(None).unwrap().is_none());
        assert!(parse_stored_values(Some("")).unwrap().is_none());
    }

    #[test]
    fn test_parse_stored_values_invalid_json() {
        let err = parse_stored_values(Some("invalid json")).unwrap_err();
        assert!(matches!(err, PayloadError::MalformedStoredValues(_)));
        assert!(err.to_string().starts_with("Invalid storedValues JSON"));
    }

    #[test]
    fn test_parse_stored_values_rejects_array() {
        let err = parse_stored_values(Some(r#"["array"]"#)).unwrap_err();
        assert!(err
            .to_string()
            .contains("storedValues must be a JSON object"));
    }

    #[test]
    fn test_parse_stored_values_rejects_scalars() {
        assert!(parse_stored_values(Some("42")).is_err());
        assert!(parse_stored_values(Some("null")).is_err());
        assert!(parse_stored_values(Some(r#""text""#)).is_err());
    }

    #[test]
    fn test_build_basic_request() {
        let request = build_trigger_request(&RunConfig {
            force_cancel_previous_testing: true,
            ..config()
        })
        .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "forceCancelPreviousTesting": true })
        );
    }

    #[test]
    fn test_build_request_with_stored_values() {
        let request = build_trigger_request(&RunConfig {
            stored_values: Some(r#"{"key": "value"}"#.to_string()),
            ..config()
        })
        .unwrap();
        assert_eq!(
            request.stored_values.map(Value::Object),
            Some(json!({ "key": "value" }))
        );
    }

    #[test]
    fn test_build_request_with_malformed_stored_values() {
        let result = build_trigger_request(&RunConfig {
            stored_values: Some("[1, 2]".to_string()),
            ..config()
        });
        assert!(matches!(
            result,
            Err(PayloadError::MalformedStoredValues(_))
        ));
    }

    #[test]
    fn test_build_request_with_branch() {
        let request = build_trigger_request(&RunConfig {
            branch_name: Some("feature".to_string()),
            commit_hash: Some("abc123".to_string()),
            deploy_url: Some("https://example.com".to_string()),
            allow_known_issues: true,
            ..config()
        })
        .unwrap();
        assert_eq!(
            request.branch,
            Some(BranchDescriptor {
                name: "feature".to_string(),
                commit: "abc123".to_string(),
                allow_known_issues: true,
            })
        );
        assert_eq!(request.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_build_request_commit_only_defaults_branch_name() {
        let request = build_trigger_request(&RunConfig {
            commit_hash: Some("abc123".to_string()),
            deploy_url: Some("https://example.com".to_string()),
            ..config()
        })
        .unwrap();
        let branch = request.branch.unwrap();
        assert_eq!(branch.name, "main");
        assert_eq!(branch.commit, "abc123");
        assert!(!branch.allow_known_issues);
    }

    #[test]
    fn test_build_request_branch_only_defaults_commit() {
        let request = build_trigger_request(&RunConfig {
            branch_name: Some("feature".to_string()),
            deploy_url: Some("https://example.com".to_string()),
            ..config()
        })
        .unwrap();
        assert_eq!(request.branch.unwrap().commit, "");
    }

    #[test]
    fn test_build_request_without_branch_omits_url() {
        let request = build_trigger_request(&RunConfig {
            deploy_url: Some("https://example.com".to_string()),
            ..config()
        })
        .unwrap();
        assert!(request.branch.is_none());
        assert!(request.url.is_none());
    }

    #[test]
    fn test_build_request_with_labels() {
        let request = build_trigger_request(&RunConfig {
            labels: Some("smoke, regression".to_string()),
            excluded_labels: Some("slow".to_string()),
            ..config()
        })
        .unwrap();
        assert_eq!(
            request.labels,
            Some(vec!["smoke".to_string(), "regression".to_string()])
        );
        assert_eq!(request.excluded_labels, Some(vec!["slow".to_string()]));
    }

    #[test]
    fn test_build_request_blank_labels_are_omitted() {
        let request = build_trigger_request(&RunConfig {
            labels: Some(" , ".to_string()),
            ..config()
        })
        .unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("labels").is_none());
    }

    #[test]
    fn test_build_request_with_test_case_uuids() {
        let request = build_trigger_request(&RunConfig {
            test_case_uuids: Some("uuid1, uuid2".to_string()),
            deploy_url: Some("https://example.com".to_string()),
            ..config()
        })
        .unwrap();
        assert_eq!(
            request.test_case_uuids,
            Some(vec!["uuid1".to_string(), "uuid2".to_string()])
        );
        assert_eq!(request.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_build_request_with_custom_name() {
        let request = build_trigger_request(&RunConfig {
            custom_name: Some("My Custom Test Run".to_string()),
            ..config()
        })
        .unwrap();
        assert_eq!(request.custom_name.as_deref(), Some("My Custom Test Run"));
    }

    #[test]
    fn test_build_status_query_empty() {
        assert_eq!(build_status_query(&config()), StatusQuery::default());
    }

    #[test]
    fn test_build_status_query_keeps_raw_labels() {
        let query = build_status_query(&RunConfig {
            branch_name: Some("feature".to_string()),
            labels: Some("smoke, regression".to_string()),
            ..config()
        });
        assert_eq!(query.branch_name.as_deref(), Some("feature"));
        assert_eq!(query.labels.as_deref(), Some("smoke, regression"));
    }
}
