//! The built-in transformation set.
//!
//! Transformations are grouped by the value domain they act on: document
//! nodes, numbers, strings and arrays. Node transformations propagate
//! `Null` input unchanged; every other transformation answers input of the
//! wrong runtime type with the `Inapplicable` sentinel so the chain can
//! continue. Static arguments (selectors, indices, patterns) are parsed at
//! construction time and rejected eagerly as configuration errors.

use std::sync::Arc;

use regex::Regex;

use crate::document::Document;
use crate::error::ExtractError;
use crate::registry::{Transform, TransformOp, TransformRegistry};
use crate::value::Value;

/// Register the standard built-in set into `registry`.
pub(crate) fn install<D: Document>(registry: &mut TransformRegistry<D>) {
    // DOM node transformations
    registry.register_factory("select-one", |args| {
        let selector = required("select-one", args, 0, "selector")?.to_string();
        Ok(op(node_op(move |doc: &D, node| {
            Ok(match doc.query_one(&node, &selector)? {
                Some(found) => Value::Node(found),
                None => Value::Null,
            })
        })))
    });

    registry.register_factory("select-all", |args| {
        let selector = required("select-all", args, 0, "selector")?.to_string();
        Ok(op(node_op(move |doc: &D, node| {
            Ok(Value::NodeList(doc.query_all(&node, &selector)?))
        })))
    });

    registry.register(
        "inner-html",
        node_op(|doc: &D, node| Ok(Value::String(doc.inner_html(&node)))),
    );

    registry.register(
        "inner-text",
        node_op(|doc: &D, node| Ok(Value::String(doc.inner_text(&node)))),
    );

    registry.register(
        "value",
        node_op(|doc: &D, node| {
            Ok(match doc.form_value(&node) {
                Some(value) => Value::String(value),
                None => Value::Null,
            })
        }),
    );

    registry.register_factory("get-attribute", |args| {
        let name = required("get-attribute", args, 0, "name")?.to_string();
        Ok(op(node_op(move |doc: &D, node| {
            Ok(match doc.attribute(&node, &name) {
                Some(value) => Value::String(value),
                None => Value::Null,
            })
        })))
    });

    // Number transformations
    registry.register("to-int", |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
        Ok(match value {
            Value::String(s) => match parse_int_prefix(&s) {
                Some(i) => Value::Int(i),
                None => Value::Inapplicable,
            },
            _ => Value::Inapplicable,
        })
    });

    registry.register("to-float", |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
        Ok(match value {
            Value::String(s) => match parse_float_prefix(&s) {
                Some(f) => Value::Float(f),
                None => Value::Inapplicable,
            },
            _ => Value::Inapplicable,
        })
    });

    registry.register("round", |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
        Ok(match value {
            Value::Int(i) => Value::Int(i),
            // Half rounds toward positive infinity.
            Value::Float(f) => Value::Int((f + 0.5).floor() as i64),
            _ => Value::Inapplicable,
        })
    });

    registry.register_factory("multiply-by", |args| {
        let factor = float_arg("multiply-by", args, 0, "factor")?;
        Ok(op(move |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
            Ok(match value {
                Value::Int(i) => Value::Float(factor * i as f64),
                Value::Float(f) => Value::Float(factor * f),
                _ => Value::Inapplicable,
            })
        }))
    });

    // String transformations
    registry.register("html-to-text", |doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
        Ok(match value {
            // Markup with no text content yields the empty string.
            Value::String(markup) => Value::String(doc.fragment_text(&markup)),
            _ => Value::Inapplicable,
        })
    });

    registry.register("to-string", |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
        Ok(Value::String(value.to_string()))
    });

    registry.register("trim", |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
        Ok(match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            _ => Value::Inapplicable,
        })
    });

    registry.register_factory("split", |args| {
        let delimiter = required("split", args, 0, "delimiter")?.to_string();
        let limit = match args.get(1) {
            Some(_) => Some(usize_arg("split", args, 1, "limit")?),
            None => None,
        };
        Ok(op(move |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
            Ok(match value {
                Value::String(s) => {
                    let mut pieces: Vec<Value<D::Node>> = if delimiter.is_empty() {
                        s.chars().map(|c| Value::String(c.to_string())).collect()
                    } else {
                        s.split(delimiter.as_str())
                            .map(|p| Value::String(p.to_string()))
                            .collect()
                    };
                    // The limit truncates the full split; the tail is
                    // discarded, not appended to the last piece.
                    if let Some(limit) = limit {
                        pieces.truncate(limit);
                    }
                    Value::List(pieces)
                }
                _ => Value::Inapplicable,
            })
        }))
    });

    registry.register_factory("replace", |args| {
        let pattern = build_pattern("replace", required("replace", args, 0, "pattern")?)?;
        let replacement = required("replace", args, 1, "replacement")?.to_string();
        Ok(op(move |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
            Ok(match value {
                Value::String(s) => Value::String(match &pattern {
                    Pattern::Literal(pat) => s.replacen(pat.as_str(), &replacement, 1),
                    Pattern::Re { regex, global: true } => {
                        regex.replace_all(&s, replacement.as_str()).into_owned()
                    }
                    Pattern::Re { regex, global: false } => {
                        regex.replace(&s, replacement.as_str()).into_owned()
                    }
                }),
                _ => Value::Inapplicable,
            })
        }))
    });

    registry.register_factory("match", |args| {
        let pattern = build_pattern("match", required("match", args, 0, "pattern")?)?;
        Ok(op(move |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
            Ok(match value {
                Value::String(s) => match &pattern {
                    Pattern::Literal(pat) => {
                        if s.contains(pat.as_str()) {
                            Value::List(vec![Value::String(pat.clone())])
                        } else {
                            Value::Null
                        }
                    }
                    Pattern::Re { regex, global: true } => {
                        let matches: Vec<Value<D::Node>> = regex
                            .find_iter(&s)
                            .map(|m| Value::String(m.as_str().to_string()))
                            .collect();
                        if matches.is_empty() {
                            Value::Null
                        } else {
                            Value::List(matches)
                        }
                    }
                    Pattern::Re { regex, global: false } => match regex.captures(&s) {
                        Some(caps) => Value::List(
                            caps.iter()
                                .map(|group| match group {
                                    Some(m) => Value::String(m.as_str().to_string()),
                                    None => Value::Null,
                                })
                                .collect(),
                        ),
                        None => Value::Null,
                    },
                },
                _ => Value::Inapplicable,
            })
        }))
    });

    // Array transformations
    registry.register_factory("get-index", |args| {
        let index = int_arg("get-index", args, 0, "index")?;
        Ok(op(move |_doc: &D, value: Value<D::Node>| -> Result<Value<D::Node>, ExtractError> {
            let slot = usize::try_from(index).ok();
            Ok(match value {
                Value::List(items) => match slot.and_then(|i| items.into_iter().nth(i)) {
                    Some(item) => item,
                    None => Value::Inapplicable,
                },
                Value::NodeList(nodes) => match slot.and_then(|i| nodes.into_iter().nth(i)) {
                    Some(node) => Value::Node(node),
                    None => Value::Inapplicable,
                },
                _ => Value::Inapplicable,
            })
        }))
    });

    // Unlike get-index, slice has no sentinel guard: unsliceable input is
    // a fatal execution error that aborts the extraction call.
    registry.register_factory("slice", |args| {
        let start = int_arg("slice", args, 0, "start")?;
        let stop = match args.get(1) {
            Some(_) => Some(int_arg("slice", args, 1, "stop")?),
            None => None,
        };
        Ok(op(move |_doc: &D, value: Value<D::Node>| match value {
            Value::List(items) => {
                let (from, to) = normalize_range(items.len(), start, stop);
                Ok(Value::List(items.into_iter().take(to).skip(from).collect()))
            }
            Value::NodeList(nodes) => {
                let (from, to) = normalize_range(nodes.len(), start, stop);
                Ok(Value::NodeList(nodes.into_iter().take(to).skip(from).collect()))
            }
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                let (from, to) = normalize_range(chars.len(), start, stop);
                Ok(Value::String(chars[from..to].iter().collect()))
            }
            other => Err(ExtractError::ExecutionError {
                transform: "slice".to_string(),
                message: format!("cannot slice {}", other.kind()),
            }),
        }))
    });
}

fn op<D: Document, T: TransformOp<D> + 'static>(transform: T) -> Transform<D> {
    Arc::new(transform)
}

/// Guard for node transformations: `Null` propagates unchanged, non-node
/// input is inapplicable.
fn node_op<D, F>(
    f: F,
) -> impl Fn(&D, Value<D::Node>) -> Result<Value<D::Node>, ExtractError> + Send + Sync
where
    D: Document,
    F: Fn(&D, D::Node) -> Result<Value<D::Node>, ExtractError> + Send + Sync,
{
    move |doc, value| match value {
        Value::Node(node) => f(doc, node),
        Value::Null => Ok(Value::Null),
        _ => Ok(Value::Inapplicable),
    }
}

fn required<'a>(
    transform: &str,
    args: &'a [String],
    index: usize,
    what: &str,
) -> Result<&'a str, ExtractError> {
    args.get(index).map(String::as_str).ok_or_else(|| ExtractError::InvalidArgs {
        transform: transform.to_string(),
        message: format!("missing required argument '{}'", what),
    })
}

fn int_arg(transform: &str, args: &[String], index: usize, what: &str) -> Result<i64, ExtractError> {
    let raw = required(transform, args, index, what)?;
    parse_int_prefix(raw).ok_or_else(|| ExtractError::InvalidArgs {
        transform: transform.to_string(),
        message: format!("argument '{}' is not an integer: '{}'", what, raw),
    })
}

fn usize_arg(
    transform: &str,
    args: &[String],
    index: usize,
    what: &str,
) -> Result<usize, ExtractError> {
    let value = int_arg(transform, args, index, what)?;
    usize::try_from(value).map_err(|_| ExtractError::InvalidArgs {
        transform: transform.to_string(),
        message: format!("argument '{}' must not be negative: {}", what, value),
    })
}

fn float_arg(
    transform: &str,
    args: &[String],
    index: usize,
    what: &str,
) -> Result<f64, ExtractError> {
    let raw = required(transform, args, index, what)?;
    parse_float_prefix(raw).ok_or_else(|| ExtractError::InvalidArgs {
        transform: transform.to_string(),
        message: format!("argument '{}' is not a number: '{}'", what, raw),
    })
}

/// Parse the longest integer prefix after optional leading whitespace and
/// sign. Returns `None` when no digits are present.
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: &str = &rest[..rest
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit())
        .count()];
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the longest decimal prefix (sign, digits, fraction, exponent)
/// after optional leading whitespace. Returns `None` when no digits are
/// present before the exponent.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    let mantissa_digits = s[digits_start..end].chars().any(|c| c.is_ascii_digit());
    if !mantissa_digits {
        return None;
    }
    // Include an exponent only if it is complete; `"1e"` parses as 1.
    let mut with_exp = end;
    if with_exp < bytes.len() && (bytes[with_exp] == b'e' || bytes[with_exp] == b'E') {
        with_exp += 1;
        if with_exp < bytes.len() && (bytes[with_exp] == b'+' || bytes[with_exp] == b'-') {
            with_exp += 1;
        }
        let exp_digits_start = with_exp;
        while with_exp < bytes.len() && bytes[with_exp].is_ascii_digit() {
            with_exp += 1;
        }
        if with_exp > exp_digits_start {
            end = with_exp;
        }
    }
    s[..end].parse().ok()
}

enum Pattern {
    Literal(String),
    Re { regex: Regex, global: bool },
}

/// A pattern argument in the conventional regex-literal textual form
/// (`/body/flags`) becomes a real pattern; anything else is a literal
/// substring.
fn is_regex_literal(s: &str) -> bool {
    if !s.starts_with('/') || s.len() < 2 {
        return false;
    }
    match s.rfind('/') {
        Some(0) | None => false,
        Some(close) => {
            let flags = &s[close + 1..];
            flags.len() <= 4 && flags.chars().all(|c| "gimy".contains(c))
        }
    }
}

fn build_pattern(transform: &str, raw: &str) -> Result<Pattern, ExtractError> {
    if !is_regex_literal(raw) {
        return Ok(Pattern::Literal(raw.to_string()));
    }
    // The body spans from the first to the last slash, so it may itself
    // contain slashes.
    let close = raw.rfind('/').unwrap_or(0);
    let body = &raw[1..close];
    let flags = &raw[close + 1..];
    if flags.contains('y') {
        return Err(ExtractError::InvalidArgs {
            transform: transform.to_string(),
            message: "sticky flag 'y' is not supported".to_string(),
        });
    }
    let inline: String = flags.chars().filter(|c| matches!(c, 'i' | 'm')).collect();
    let source = if inline.is_empty() {
        body.to_string()
    } else {
        format!("(?{}){}", inline, body)
    };
    let regex = Regex::new(&source).map_err(|e| ExtractError::InvalidArgs {
        transform: transform.to_string(),
        message: format!("invalid pattern '{}': {}", raw, e),
    })?;
    Ok(Pattern::Re {
        regex,
        global: flags.contains('g'),
    })
}

/// Normalize slice bounds: negative indices count from the end, and both
/// ends clamp to the sequence length.
fn normalize_range(len: usize, start: i64, stop: Option<i64>) -> (usize, usize) {
    let clamp = |index: i64| -> usize {
        if index < 0 {
            len.saturating_sub(index.unsigned_abs() as usize)
        } else {
            (index as u64).min(len as u64) as usize
        }
    };
    let from = clamp(start);
    let to = stop.map_or(len, clamp);
    (from, to.max(from))
}
