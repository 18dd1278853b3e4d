//! Configuration model for rule-gated candidate responses.
//!
//! Defines the rules a response carries, how a rule set combines, and
//! loading/validation of a candidate set from a file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// An ordered set of candidate responses for one route.
///
/// Candidate order is significant: the first candidate whose rules match is
/// returned, and the first element doubles as the fallback when nothing
/// matches.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RouteResponses {
    /// Candidate responses, in evaluation order
    #[serde(default)]
    pub responses: Vec<ResponseDefinition>,

    /// Pick uniformly at random instead of evaluating rules
    #[serde(default, alias = "randomResponse")]
    pub random_response: bool,
}

impl RouteResponses {
    /// Load a candidate set from a YAML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let responses: Self = serde_yaml::from_str(&content)?;
        responses.validate()?;
        Ok(responses)
    }

    /// Validate the candidate set.
    ///
    /// Structural checks only. Rule patterns are not compiled here; an
    /// invalid pattern surfaces at evaluation time instead.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.responses.is_empty() {
            anyhow::bail!("At least one response must be defined");
        }
        for (i, response) in self.responses.iter().enumerate() {
            response
                .validate()
                .map_err(|e| anyhow::anyhow!("Response {}: {}", i, e))?;
        }
        Ok(())
    }
}

/// A single candidate response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseDefinition {
    /// Optional identifier, used for logging only
    #[serde(default)]
    pub id: Option<String>,

    /// HTTP status code
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body, handed back untouched to the dispatch layer
    #[serde(default)]
    pub body: Option<serde_json::Value>,

    /// Matching rules, combined per `rules_operator`
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// How the rule set combines (ALL = every rule, ANY = at least one)
    #[serde(default, alias = "rulesOperator")]
    pub rules_operator: RulesOperator,
}

fn default_status() -> u16 {
    200
}

impl Default for ResponseDefinition {
    fn default() -> Self {
        Self {
            id: None,
            status: default_status(),
            headers: HashMap::new(),
            body: None,
            rules: Vec::new(),
            rules_operator: RulesOperator::default(),
        }
    }
}

impl ResponseDefinition {
    /// Validate the response definition.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.status < 100 || self.status > 599 {
            anyhow::bail!("Invalid status code: {}", self.status);
        }
        Ok(())
    }
}

/// A single matching rule.
///
/// A rule reads one value out of the request (per `target`/`modifier`) and
/// compares it against `value`. A rule missing its target or modifier can
/// never match.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Which part of the request this rule inspects
    #[serde(default)]
    pub target: Option<RuleTarget>,

    /// Path into the target's data, or the header name for header rules
    #[serde(default)]
    pub modifier: Option<String>,

    /// Expected value, compared by string form
    #[serde(default)]
    pub value: String,

    /// Interpret `value` as a regular expression
    #[serde(default, alias = "isRegex")]
    pub is_regex: bool,
}

/// Request part a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTarget {
    /// Decoded request body
    Body,
    /// Query parameters
    Query,
    /// Route parameters
    Params,
    /// Request header, read live from the request
    Header,
}

/// Combination policy across a response's rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RulesOperator {
    /// Every rule must match; an empty rule set matches vacuously
    #[serde(alias = "AND")]
    All,
    /// At least one rule must match; an empty rule set never matches
    #[default]
    #[serde(alias = "OR")]
    Any,
}
