//! Form validation and sanitization.
//!
//! Each form is described by a static table of [`FieldSpec`]s. Every field is
//! checked on its own and all failures are collected, so a single submission
//! reports every problem at once. Accepted values are trimmed and HTML-escaped
//! before they are handed back in a [`SanitizedForm`].

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

lazy_static! {
    static ref ALPHANUMERIC: Regex = Regex::new(r"^[\p{L}\p{N}]+$")
        .expect("Failed to compile alphanumeric pattern");
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Raw Form Input
// =============================================================================

/// Submitted form fields in arrival order. Repeated keys are kept, so a field
/// can carry a single value or a list of values.
#[derive(Clone, Debug, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value submitted for `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    /// All values submitted for `name`: empty when absent, one element for a
    /// scalar, every element in order for a list.
    pub fn list(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

impl From<Vec<(String, String)>> for FormData {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormData {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

// =============================================================================
// Field Specifications
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Must be non-empty after trimming.
    Required,
    /// Skipped entirely when the raw value is empty.
    Optional,
    /// Optional `YYYY-MM-DD` calendar date.
    Date,
    /// Required non-negative number.
    Decimal,
    /// Optional non-negative integer.
    Integer,
    /// Escaped only; membership is checked when the record is built.
    Enumerated,
    /// Zero or more values, each sanitized on its own.
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Check {
    MaxLength(usize),
    Alphanumeric,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub checks: &'static [Check],
    /// Reported when the value is missing or cannot be parsed.
    pub message: &'static str,
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        message: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            checks: &[],
            message,
        }
    }

    pub const fn with_checks(mut self, checks: &'static [Check]) -> Self {
        self.checks = checks;
        self
    }
}

// =============================================================================
// Results
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    List(Vec<String>),
}

/// Sanitized attempted values, keyed by field name. Shown back in a form
/// view when validation fails.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SanitizedForm {
    fields: BTreeMap<&'static str, FieldValue>,
}

impl SanitizedForm {
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.insert(name, FieldValue::Single(value.into()));
        self
    }

    pub fn with_list(mut self, name: &'static str, values: Vec<String>) -> Self {
        self.fields.insert(name, FieldValue::List(values));
        self
    }

    /// Sanitized value of a scalar field, `None` when absent or empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Single(value)) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.fields.get(name) {
            Some(FieldValue::List(values)) => values,
            _ => &[],
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name)
            .and_then(|value| NaiveDate::parse_from_str(value, DATE_FORMAT).ok())
    }

    pub fn decimal(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(parse_decimal)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(parse_integer)
    }
}

/// Outcome of validating a form against its field table.
#[derive(Clone, Debug, Default)]
pub struct Validated {
    pub values: SanitizedForm,
    pub errors: Vec<FieldError>,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Trim and HTML-escape a value.
pub fn sanitize(raw: &str) -> String {
    html_escape::encode_safe(raw.trim()).into_owned()
}

/// Undo [`sanitize`] escaping so a stored value can be put back into a form.
pub fn unescape(stored: &str) -> String {
    html_escape::decode_html_entities(stored).into_owned()
}

fn parse_decimal(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}

fn parse_integer(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().filter(|n| *n >= 0)
}

fn apply_checks(spec: &FieldSpec, trimmed: &str, errors: &mut Vec<FieldError>) {
    for check in spec.checks {
        match check {
            Check::MaxLength(max) if trimmed.chars().count() > *max => {
                errors.push(FieldError::new(
                    spec.name,
                    format!("{} must not exceed {} characters.", spec.label, max),
                ));
            }
            Check::Alphanumeric if !ALPHANUMERIC.is_match(trimmed) => {
                errors.push(FieldError::new(
                    spec.name,
                    format!("{} has non-alphanumeric characters.", spec.label),
                ));
            }
            _ => {}
        }
    }
}

fn validate_field(spec: &FieldSpec, form: &FormData, out: &mut Validated) {
    if spec.kind == FieldKind::List {
        let values = form
            .list(spec.name)
            .into_iter()
            .map(sanitize)
            .filter(|value| !value.is_empty())
            .collect();
        out.values = std::mem::take(&mut out.values).with_list(spec.name, values);
        return;
    }

    let raw = form.value(spec.name).unwrap_or_default();
    let trimmed = raw.trim();

    let valid = match spec.kind {
        FieldKind::Required | FieldKind::Decimal if trimmed.is_empty() => false,
        FieldKind::Optional | FieldKind::Date | FieldKind::Integer | FieldKind::Enumerated
            if raw.is_empty() =>
        {
            out.values = std::mem::take(&mut out.values).with(spec.name, "");
            return;
        }
        FieldKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_ok(),
        FieldKind::Decimal => parse_decimal(trimmed).is_some(),
        FieldKind::Integer => parse_integer(trimmed).is_some(),
        _ => true,
    };

    if valid {
        apply_checks(spec, trimmed, &mut out.errors);
    } else {
        out.push_error(spec.name, spec.message);
    }
    out.values = std::mem::take(&mut out.values).with(spec.name, sanitize(raw));
}

/// Validate `form` against `specs`, collecting every failure.
pub fn validate(specs: &[FieldSpec], form: &FormData) -> Validated {
    let mut out = Validated::default();
    for spec in specs {
        validate_field(spec, form, &mut out);
    }
    out
}
