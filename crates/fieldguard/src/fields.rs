//! Sensitive-field traversal: applies the codec to designated paths inside a
//! record payload.
//!
//! The intake system stores applications as JSON documents; only the fields
//! named here (by default `ssn` and `dateOfBirth`) are ever encrypted. Paths
//! use dot notation, with a `[]` suffix to expand into every element of an
//! array, e.g. `applications[].ssn` for bulk submissions.

use serde_json::Value;

use crate::crypto::{CodecError, FieldCodec};

/// The set of field paths designated as sensitive.
#[derive(Debug, Clone)]
pub struct SensitiveFields {
    paths: Vec<String>,
}

impl SensitiveFields {
    /// Parse a comma-separated path list, e.g. `"ssn,dateOfBirth"`.
    ///
    /// Empty segments are skipped, so a trailing comma is harmless.
    pub fn parse(list: &str) -> Self {
        let paths = list
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect();
        Self { paths }
    }

    /// Number of configured paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no paths are configured.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Encrypt every sensitive string field in `payload` in place.
pub fn protect_fields(
    payload: &mut Value,
    fields: &SensitiveFields,
    codec: &FieldCodec,
) -> Result<(), CodecError> {
    apply_fields(payload, fields, &|s| codec.protect(s))
}

/// Decrypt every sensitive string field in `payload` in place.
///
/// Legacy unencrypted values pass through unchanged; a value that parses as
/// an envelope but fails authentication aborts the whole operation.
pub fn reveal_fields(
    payload: &mut Value,
    fields: &SensitiveFields,
    codec: &FieldCodec,
) -> Result<(), CodecError> {
    apply_fields(payload, fields, &|s| codec.reveal(s))
}

fn apply_fields(
    payload: &mut Value,
    fields: &SensitiveFields,
    apply: &dyn Fn(&str) -> Result<String, CodecError>,
) -> Result<(), CodecError> {
    for path in &fields.paths {
        let segments = parse_path(path);
        apply_at_path(payload, &segments, apply)?;
    }
    Ok(())
}

/// Segments of a dot-notation field path.
enum PathSegment {
    /// Navigate into an object property by name.
    Key(String),
    /// Expand into every element of a JSON array.
    ArrayItem,
}

/// Parse a dot-notation path into a list of [`PathSegment`]s.
///
/// `"applications[].ssn"` → `[Key("applications"), ArrayItem, Key("ssn")]`.
fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if let Some(key) = part.strip_suffix("[]") {
            segments.push(PathSegment::Key(key.to_owned()));
            segments.push(PathSegment::ArrayItem);
        } else {
            segments.push(PathSegment::Key(part.to_owned()));
        }
    }
    segments
}

/// Recursively navigate `value` following `segments` and rewrite any string
/// leaf found at the end of the path. Missing keys and non-string leaves are
/// left untouched.
fn apply_at_path(
    value: &mut Value,
    segments: &[PathSegment],
    apply: &dyn Fn(&str) -> Result<String, CodecError>,
) -> Result<(), CodecError> {
    if segments.is_empty() {
        if let Value::String(s) = value {
            *value = Value::String(apply(s)?);
        }
        return Ok(());
    }

    match &segments[0] {
        PathSegment::Key(key) => {
            if let Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    apply_at_path(child, &segments[1..], apply)?;
                }
            }
        }
        PathSegment::ArrayItem => {
            if let Value::Array(arr) = value {
                for item in arr.iter_mut() {
                    apply_at_path(item, &segments[1..], apply)?;
                }
            }
        }
    }
    Ok(())
}
