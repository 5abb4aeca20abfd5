use crate::error::StartupError;
use std::collections::HashMap;

/// One segment of a parsed route template.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    /// Must equal the incoming path segment, case-insensitively.
    Literal(String),
    /// Binds one path segment to a named parameter. With `default`, an
    /// absent segment binds the default instead; with `optional`, an absent
    /// segment simply leaves the parameter unbound.
    Param {
        name: String,
        default: Option<String>,
        optional: bool,
    },
}

/// A parsed URL template: literals, `{name}`, `{name?}`, `{name=Default}`.
/// No catch-all segments.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    segments: Vec<Segment>,
}

impl RouteTemplate {
    pub fn parse(raw: &str) -> Result<Self, StartupError> {
        let err = |reason: &str| StartupError::Route {
            template: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        for piece in raw.trim_matches('/').split('/') {
            if piece.is_empty() {
                continue;
            }
            if let Some(inner) = piece.strip_prefix('{') {
                let inner = inner
                    .strip_suffix('}')
                    .ok_or_else(|| err("unterminated parameter segment"))?;
                if inner.contains('*') {
                    return Err(err("catch-all segments are not supported"));
                }
                let (body, optional) = match inner.strip_suffix('?') {
                    Some(body) => (body, true),
                    None => (inner, false),
                };
                let (name, default) = match body.split_once('=') {
                    Some((name, default)) => (name, Some(default.to_string())),
                    None => (body, None),
                };
                if name.is_empty() {
                    return Err(err("parameter segment has no name"));
                }
                if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(err("parameter names must be alphanumeric"));
                }
                if optional && default.is_some() {
                    return Err(err("a segment cannot be both optional and defaulted"));
                }
                segments.push(Segment::Param {
                    name: name.to_string(),
                    default,
                    optional,
                });
            } else if piece.contains('}') {
                return Err(err("unexpected '}' in literal segment"));
            } else {
                segments.push(Segment::Literal(piece.to_string()));
            }
        }

        Ok(Self { segments })
    }

    /// Try to match a pre-split path. Returns bound parameters on success.
    /// Extra path segments beyond the template never match.
    pub fn matches(&self, path: &[&str]) -> Option<HashMap<String, String>> {
        let mut values = HashMap::new();
        let mut i = 0;

        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => {
                    if !path.get(i)?.eq_ignore_ascii_case(lit) {
                        return None;
                    }
                    i += 1;
                }
                Segment::Param {
                    name,
                    default,
                    optional,
                } => {
                    if let Some(value) = path.get(i) {
                        values.insert(name.clone(), value.to_string());
                        i += 1;
                    } else if let Some(default) = default {
                        values.insert(name.clone(), default.clone());
                    } else if !optional {
                        return None;
                    }
                }
            }
        }

        (i == path.len()).then_some(values)
    }
}
