//! Resolution of caller-declared links against a finished layout.

use crate::layout::{LaidOutNode, Link, LinkKind};
use serde_json::Value;
use treechart_core::SpecialLinks;

/// Identifiers answered by the laid-out node itself rather than its data.
const NODE_LEVEL_IDENTIFIERS: [&str; 2] = ["depth", "height"];

/// Appends one link per `(parent, child)` match: the parent is the first node matching the
/// declared parent value, children are every node matching the declared child value.
///
/// Declarations that match nothing are skipped.
pub fn resolve_special_links(nodes: &[LaidOutNode], special: &SpecialLinks) -> Vec<Link> {
    let identifier = special.identifier.as_str();
    let mut out = Vec::new();
    for decl in &special.links {
        let Some(source) = nodes
            .iter()
            .position(|n| identifier_matches(n, identifier, &decl.parent))
        else {
            tracing::trace!(identifier, parent = %decl.parent, "special link parent not found");
            continue;
        };

        let before = out.len();
        out.extend(
            nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| identifier_matches(n, identifier, &decl.child))
                .map(|(target, _)| Link {
                    source,
                    target,
                    kind: LinkKind::Special,
                }),
        );
        if out.len() == before {
            tracing::trace!(identifier, child = %decl.child, "special link child not found");
        }
    }
    out
}

fn identifier_matches(node: &LaidOutNode, identifier: &str, wanted: &Value) -> bool {
    if NODE_LEVEL_IDENTIFIERS.contains(&identifier) {
        let level = if identifier == "depth" {
            node.depth
        } else {
            node.height
        };
        return loose_eq(&Value::from(level), wanted);
    }
    match node.data.get(identifier) {
        Some(field) => loose_eq(field, wanted),
        None => false,
    }
}

/// JavaScript `==` restricted to JSON scalars. Arrays and objects compare by identity in JS, so
/// two separately parsed values never match.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => match (to_number(a), to_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// `ToNumber` for scalars; `None` stands in for `NaN`.
fn to_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return Some(0.0);
            }
            if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
                return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
            }
            match t {
                "Infinity" | "+Infinity" => Some(f64::INFINITY),
                "-Infinity" => Some(f64::NEG_INFINITY),
                _ if t.contains(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => None,
                _ => t.parse::<f64>().ok().filter(|v| !v.is_nan()),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_equality_coerces_scalars() {
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(loose_eq(&json!(1), &json!("1")));
        assert!(loose_eq(&json!(" 2 "), &json!(2)));
        assert!(loose_eq(&json!(true), &json!(1)));
        assert!(loose_eq(&json!(false), &json!("0")));
        assert!(loose_eq(&json!(0), &json!("")));
        assert!(loose_eq(&json!(null), &json!(null)));
        assert!(loose_eq(&json!("a"), &json!("a")));

        assert!(!loose_eq(&json!(null), &json!(0)));
        assert!(!loose_eq(&json!("a"), &json!(0)));
        assert!(!loose_eq(&json!("1"), &json!("1.0")));
        assert!(!loose_eq(&json!([1]), &json!([1])));
        assert!(!loose_eq(&json!({ "a": 1 }), &json!({ "a": 1 })));
        assert!(!loose_eq(&json!("NaN"), &json!(0)));
    }

    #[test]
    fn numeric_strings_parse_like_js() {
        assert_eq!(to_number(&json!("0x10")), Some(16.0));
        assert_eq!(to_number(&json!("1e3")), Some(1000.0));
        assert_eq!(to_number(&json!("-Infinity")), Some(f64::NEG_INFINITY));
        assert_eq!(to_number(&json!("12px")), None);
        assert_eq!(to_number(&json!(null)), None);
    }
}
