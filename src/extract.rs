//! Target extraction from a request snapshot.
//!
//! Builds the per-invocation lookup targets a rule can inspect: the decoded
//! body, the query map, and the route parameters. Headers are not
//! pre-extracted; rules read them live from the snapshot.

use crate::config::RuleTarget;
use crate::request::RequestSnapshot;
use serde_json::{Map, Value};

/// Decoded lookup targets, computed once per evaluation call.
#[derive(Debug, Clone)]
pub struct ExtractedTargets {
    /// Decoded request body; an empty object when decoding fails
    pub body: Value,
    /// Query parameters, as provided by the snapshot
    pub query: Value,
    /// Route parameters, as provided by the snapshot
    pub params: Value,
}

impl ExtractedTargets {
    /// Get the extracted value for a target.
    ///
    /// Headers have no entry here; they are read live from the snapshot.
    pub fn get(&self, target: RuleTarget) -> Option<&Value> {
        match target {
            RuleTarget::Body => Some(&self.body),
            RuleTarget::Query => Some(&self.query),
            RuleTarget::Params => Some(&self.params),
            RuleTarget::Header => None,
        }
    }
}

/// Extract lookup targets from a snapshot.
///
/// Never fails: a body that cannot be decoded, or whose content type is
/// unrecognized or absent, yields an empty object.
pub fn extract_targets(snapshot: &RequestSnapshot) -> ExtractedTargets {
    let content_type = snapshot
        .header("content-type")
        .unwrap_or_default()
        .to_ascii_lowercase();

    let body = if content_type.contains("application/x-www-form-urlencoded") {
        decode_form(&snapshot.body)
    } else if content_type.contains("application/json") {
        serde_json::from_str(&snapshot.body).unwrap_or_else(|_| empty_object())
    } else {
        empty_object()
    };

    let params: Map<String, Value> = snapshot
        .params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    ExtractedTargets {
        body,
        query: snapshot.query.clone(),
        params: Value::Object(params),
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Decode an `application/x-www-form-urlencoded` body into a nested value.
///
/// Bracket notation nests: `a[b]=1` becomes `{"a":{"b":"1"}}`, while
/// `a[0]=x` and `a[]=x` build arrays. Pairs that cannot be placed are
/// dropped rather than failing the decode.
fn decode_form(body: &str) -> Value {
    let mut root = empty_object();

    for pair in body.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (form_decode(k), form_decode(v)),
            None => (form_decode(pair), String::new()),
        };
        if key.is_empty() {
            continue;
        }
        place(&mut root, &parse_form_key(&key), value);
    }

    root
}

/// Insert one decoded value at the slot its key segments address.
fn place(root: &mut Value, segments: &[String], value: String) {
    let mut current = root;

    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        let next_is_index = segments
            .get(i + 1)
            .is_some_and(|s| s.is_empty() || s.bytes().all(|b| b.is_ascii_digit()));

        current = match current {
            Value::Object(map) => {
                if last {
                    map.insert(segment.clone(), Value::String(value));
                    return;
                }
                let slot = map
                    .entry(segment.clone())
                    .or_insert_with(|| new_container(next_is_index));
                if !slot.is_object() && !slot.is_array() {
                    // Slot already holds a scalar; drop the conflicting pair.
                    return;
                }
                slot
            }
            Value::Array(items) => {
                let index = if segment.is_empty() {
                    items.len()
                } else {
                    match segment.parse::<usize>() {
                        Ok(index) => index,
                        Err(_) => return,
                    }
                };
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                if last {
                    items[index] = Value::String(value);
                    return;
                }
                if items[index].is_null() {
                    items[index] = new_container(next_is_index);
                } else if !items[index].is_object() && !items[index].is_array() {
                    return;
                }
                &mut items[index]
            }
            _ => return,
        };
    }
}

fn new_container(indexed: bool) -> Value {
    if indexed {
        Value::Array(Vec::new())
    } else {
        empty_object()
    }
}

/// Split a form key into its bracket segments (`a[b][]` → `a`, `b`, ``).
fn parse_form_key(key: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in key.chars() {
        match ch {
            '[' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                in_bracket = true;
            }
            ']' if in_bracket => {
                segments.push(std::mem::take(&mut current));
                in_bracket = false;
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Percent/plus decoding for form keys and values.
fn form_decode(s: &str) -> String {
    let mut out = Vec::with_capacity(s.len());
    let mut bytes = s.bytes();

    while let Some(b) = bytes.next() {
        match b {
            b'%' => {
                let hi = bytes.next();
                let lo = bytes.next();
                match (hi.and_then(hex_value), lo.and_then(hex_value)) {
                    (Some(h), Some(l)) => out.push(h << 4 | l),
                    _ => {
                        out.push(b'%');
                        out.extend(hi);
                        out.extend(lo);
                    }
                }
            }
            b'+' => out.push(b' '),
            _ => out.push(b),
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
