//! Rule-based response selection for mock servers.
//!
//! Given an ordered set of candidate responses and the data of an incoming
//! request, picks exactly one candidate to return. The server layer that
//! parses requests and dispatches the chosen response stays outside this
//! crate.
//!
//! # Features
//!
//! - **Target Extraction**: decode the body (JSON or form-urlencoded) and
//!   normalize query/route parameters into lookup targets
//! - **Rule Evaluation**: equality, regex, and array-membership rules over
//!   body paths, query paths, route params, and live headers
//! - **ALL/ANY Combination**: per-response rule sets combined as AND or OR
//! - **Ordered Selection**: first matching candidate wins, first candidate
//!   is the fallback
//! - **Random Mode**: uniform pick across candidates, bypassing rules
//!
//! # Example Configuration
//!
//! ```yaml
//! responses:
//!   - id: default
//!     status: 200
//!     body: "Hello, World!"
//!   - id: admin
//!     status: 200
//!     body: "Hello, admin!"
//!     rules_operator: ALL
//!     rules:
//!       - target: header
//!         modifier: X-Role
//!         value: admin
//!       - target: body
//!         modifier: user.id
//!         value: "42"
//! ```
//!
//! # Example
//!
//! ```
//! use mockrules::{select_response, RequestSnapshot, ResponseDefinition, Rule, RuleTarget};
//!
//! let mut gated = ResponseDefinition::default();
//! gated.rules = vec![Rule {
//!     target: Some(RuleTarget::Header),
//!     modifier: Some("X-Env".to_string()),
//!     value: "prod".to_string(),
//!     is_regex: false,
//! }];
//! let candidates = vec![ResponseDefinition::default(), gated];
//!
//! let snapshot = RequestSnapshot::new().with_header("X-Env", "prod");
//! let chosen = select_response(&candidates, &snapshot, false).unwrap();
//! assert!(std::ptr::eq(chosen, &candidates[1]));
//! ```

pub mod config;
pub mod extract;
pub mod path;
pub mod request;
pub mod rules;
pub mod select;

pub use config::{ResponseDefinition, RouteResponses, Rule, RuleTarget, RulesOperator};
pub use extract::{extract_targets, ExtractedTargets};
pub use request::RequestSnapshot;
pub use rules::{evaluate_rule, RuleError};
pub use select::{choose_response, select_response};
