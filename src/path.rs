//! Dot/bracket path lookup over JSON values.
//!
//! Resolves paths like `user.id`, `items[0].name`, or `deep.list.2` against
//! nested objects and arrays. A missing path resolves to `None`, never an
//! error.

use serde_json::Value;

/// Resolve `path` against `root`.
///
/// Bracket indices and bare numeric dot-segments both index arrays;
/// numeric-looking keys still resolve against objects. Traversing into a
/// scalar, an absent key, or an out-of-bounds index yields `None`.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;

    for segment in parse_segments(path) {
        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Split a path into its segments.
///
/// `items[0].name` becomes `["items", "0", "name"]`. Quotes around bracket
/// segments are stripped, so `a["b.c"]` addresses the literal key `b.c`.
fn parse_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '[' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                in_bracket = true;
            }
            ']' if in_bracket => {
                let segment = std::mem::take(&mut current);
                segments.push(
                    segment
                        .trim_matches(|c| c == '"' || c == '\'')
                        .to_string(),
                );
                in_bracket = false;
            }
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}
