//! Response selection.
//!
//! Scans candidates in caller order and returns the first whose rule set
//! matches, falling back to the first candidate. Random mode bypasses rule
//! evaluation entirely.

use crate::config::{ResponseDefinition, RulesOperator};
use crate::extract::{extract_targets, ExtractedTargets};
use crate::request::RequestSnapshot;
use crate::rules::{evaluate_rule, RuleError};
use rand::Rng;
use tracing::debug;

/// Pick one candidate response.
///
/// Candidates are evaluated in order and the first whose rules match wins.
/// When nothing matches, the first candidate is returned, even if its own
/// rules were already evaluated and failed. With `random_response` the pick
/// is uniform over all candidates and rules are ignored.
///
/// # Panics
///
/// Panics if `candidates` is empty; the caller guarantees at least one.
pub fn choose_response<'a>(
    candidates: &'a [ResponseDefinition],
    targets: &ExtractedTargets,
    snapshot: &RequestSnapshot,
    random_response: bool,
) -> Result<&'a ResponseDefinition, RuleError> {
    if random_response {
        let index = rand::thread_rng().gen_range(0..candidates.len());
        debug!(index, "Picked random response");
        return Ok(&candidates[index]);
    }

    for (index, candidate) in candidates.iter().enumerate() {
        if matches_candidate(candidate, targets, snapshot)? {
            debug!(index, id = candidate.id.as_deref(), "Response rules matched");
            return Ok(candidate);
        }
    }

    debug!("No response rules matched, falling back to first candidate");
    Ok(&candidates[0])
}

/// Extract targets and pick a response in one call.
pub fn select_response<'a>(
    candidates: &'a [ResponseDefinition],
    snapshot: &RequestSnapshot,
    random_response: bool,
) -> Result<&'a ResponseDefinition, RuleError> {
    let targets = extract_targets(snapshot);
    choose_response(candidates, &targets, snapshot, random_response)
}

/// Combine a candidate's rules per its operator.
fn matches_candidate(
    candidate: &ResponseDefinition,
    targets: &ExtractedTargets,
    snapshot: &RequestSnapshot,
) -> Result<bool, RuleError> {
    match candidate.rules_operator {
        // Every rule must hold; an empty rule set holds vacuously.
        RulesOperator::All => {
            for rule in &candidate.rules {
                if !evaluate_rule(rule, targets, snapshot)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        // At least one rule must hold; an empty rule set never does.
        RulesOperator::Any => {
            for rule in &candidate.rules {
                if evaluate_rule(rule, targets, snapshot)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}
