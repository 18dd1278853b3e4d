//! Rule evaluation.
//!
//! Evaluates a single rule against the extracted targets and the live
//! request snapshot.

use crate::config::{Rule, RuleTarget};
use crate::extract::ExtractedTargets;
use crate::path;
use crate::request::RequestSnapshot;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by rule evaluation.
///
/// Body-decoding problems never reach this type, and a rule that cannot
/// resolve its value simply does not match. An invalid pattern on a regex
/// rule is a configuration mistake and is the one condition reported to the
/// caller.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule with `is_regex` carries a pattern that does not compile.
    #[error("invalid rule pattern `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Evaluate a single rule against a request.
///
/// Headers are read live from the snapshot; every other target resolves
/// through the pre-extracted values.
pub fn evaluate_rule(
    rule: &Rule,
    targets: &ExtractedTargets,
    snapshot: &RequestSnapshot,
) -> Result<bool, RuleError> {
    // A rule missing its target or its modifier can never match.
    let (Some(target), Some(modifier)) = (rule.target, non_empty(rule.modifier.as_deref())) else {
        return Ok(false);
    };

    // Headers bypass the extracted targets entirely.
    if target == RuleTarget::Header {
        let Some(header) = snapshot.header(modifier) else {
            return Ok(false);
        };
        return if rule.is_regex {
            Ok(compile(&rule.value)?.is_match(header))
        } else {
            Ok(header == rule.value)
        };
    }

    let resolved = targets
        .get(target)
        .and_then(|root| path::lookup(root, modifier));
    let Some(resolved) = resolved else {
        return Ok(false);
    };

    if rule.is_regex {
        let regex = compile(&rule.value)?;
        Ok(match resolved {
            Value::Array(items) => items.iter().any(|item| regex.is_match(&string_form(item))),
            other => regex.is_match(&string_form(other)),
        })
    } else {
        Ok(match resolved {
            Value::Array(items) => items.iter().any(|item| string_form(item) == rule.value),
            other => string_form(other) == rule.value,
        })
    }
}

fn non_empty(modifier: Option<&str>) -> Option<&str> {
    modifier.filter(|m| !m.is_empty())
}

fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

/// String form of a value: strings compare by content, everything else by
/// its canonical JSON rendering (so numeric `5` equals `"5"`).
fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_targets;
    use serde_json::json;

    fn json_snapshot(body: &str) -> RequestSnapshot {
        RequestSnapshot::new()
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    fn rule(target: RuleTarget, modifier: &str, value: &str, is_regex: bool) -> Rule {
        Rule {
            target: Some(target),
            modifier: Some(modifier.to_string()),
            value: value.to_string(),
            is_regex,
        }
    }

    fn eval(rule: &Rule, snapshot: &RequestSnapshot) -> Result<bool, RuleError> {
        let targets = extract_targets(snapshot);
        evaluate_rule(rule, &targets, snapshot)
    }

    #[test]
    fn test_rule_without_target_never_matches() {
        let snapshot = json_snapshot(r#"{"a":1}"#);
        let rule = Rule {
            target: None,
            modifier: Some("a".to_string()),
            value: "1".to_string(),
            is_regex: false,
        };
        assert!(!eval(&rule, &snapshot).unwrap());
    }

    #[test]
    fn test_rule_without_modifier_never_matches() {
        let snapshot = json_snapshot(r#"{"a":1}"#);
        let rule = Rule {
            target: Some(RuleTarget::Body),
            modifier: None,
            value: "1".to_string(),
            is_regex: false,
        };
        assert!(!eval(&rule, &snapshot).unwrap());

        let empty_modifier = Rule {
            modifier: Some(String::new()),
            ..rule
        };
        assert!(!eval(&empty_modifier, &snapshot).unwrap());
    }

    #[test]
    fn test_body_path_equality() {
        let snapshot = json_snapshot(r#"{"user":{"id":"42"}}"#);
        assert!(eval(&rule(RuleTarget::Body, "user.id", "42", false), &snapshot).unwrap());
        assert!(!eval(&rule(RuleTarget::Body, "user.id", "43", false), &snapshot).unwrap());
    }

    #[test]
    fn test_numeric_value_matches_by_string_form() {
        let snapshot = json_snapshot(r#"{"count":5,"enabled":true}"#);
        assert!(eval(&rule(RuleTarget::Body, "count", "5", false), &snapshot).unwrap());
        assert!(eval(&rule(RuleTarget::Body, "enabled", "true", false), &snapshot).unwrap());
    }

    #[test]
    fn test_unresolved_path_never_matches() {
        let snapshot = json_snapshot(r#"{"user":{"id":"42"}}"#);
        assert!(!eval(&rule(RuleTarget::Body, "user.name", "42", false), &snapshot).unwrap());
    }

    #[test]
    fn test_array_membership() {
        let snapshot = json_snapshot(r#"{"tags":["alpha","beta",3]}"#);
        assert!(eval(&rule(RuleTarget::Body, "tags", "beta", false), &snapshot).unwrap());
        assert!(eval(&rule(RuleTarget::Body, "tags", "3", false), &snapshot).unwrap());
        assert!(!eval(&rule(RuleTarget::Body, "tags", "gamma", false), &snapshot).unwrap());
    }

    #[test]
    fn test_regex_against_array_matches_any_element() {
        let snapshot = json_snapshot(r#"{"tags":["alpha","beta"]}"#);
        assert!(eval(&rule(RuleTarget::Body, "tags", "^bet", true), &snapshot).unwrap());
        assert!(!eval(&rule(RuleTarget::Body, "tags", "^gam", true), &snapshot).unwrap());
    }

    #[test]
    fn test_regex_against_scalar() {
        let snapshot = json_snapshot(r#"{"user":{"email":"ada@example.com"}}"#);
        assert!(eval(
            &rule(RuleTarget::Body, "user.email", "@example\\.com$", true),
            &snapshot
        )
        .unwrap());
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let snapshot = json_snapshot(r#"{"a":"x"}"#);
        let err = eval(&rule(RuleTarget::Body, "a", "[unclosed", true), &snapshot).unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_header_rule_reads_live_value() {
        let snapshot = RequestSnapshot::new().with_header("X-Env", "prod");
        let targets = extract_targets(&snapshot);

        let header_rule = rule(RuleTarget::Header, "x-env", "prod", false);
        assert!(evaluate_rule(&header_rule, &targets, &snapshot).unwrap());

        let miss = rule(RuleTarget::Header, "x-region", "prod", false);
        assert!(!evaluate_rule(&miss, &targets, &snapshot).unwrap());
    }

    #[test]
    fn test_header_rule_with_regex() {
        let snapshot = RequestSnapshot::new().with_header("Authorization", "Bearer abc123");
        assert!(eval(
            &rule(RuleTarget::Header, "authorization", "^Bearer ", true),
            &snapshot
        )
        .unwrap());
    }

    #[test]
    fn test_query_and_params_targets() {
        let snapshot = RequestSnapshot::new()
            .with_query_param("page", json!("2"))
            .with_query_param("filter", json!({"active": "yes"}))
            .with_param("id", "42");

        let targets = extract_targets(&snapshot);
        assert!(evaluate_rule(&rule(RuleTarget::Query, "page", "2", false), &targets, &snapshot)
            .unwrap());
        assert!(evaluate_rule(
            &rule(RuleTarget::Query, "filter.active", "yes", false),
            &targets,
            &snapshot
        )
        .unwrap());
        assert!(
            evaluate_rule(&rule(RuleTarget::Params, "id", "42", false), &targets, &snapshot)
                .unwrap()
        );
    }

    #[test]
    fn test_form_body_rule() {
        let snapshot = RequestSnapshot::new()
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body("user[name]=ada&tags[]=a&tags[]=b");

        assert!(eval(&rule(RuleTarget::Body, "user.name", "ada", false), &snapshot).unwrap());
        assert!(eval(&rule(RuleTarget::Body, "tags", "b", false), &snapshot).unwrap());
    }
}
