//! Field-level validation of JSON request bodies.
//!
//! Each payload is checked against a static [`Schema`] before it is turned into
//! a typed request. Unknown keys, including the server-assigned `id` and
//! `createdAt`, are dropped without complaint.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// String that is not blank.
    Text,
    Email,
    Integer,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
    /// Accepts `null`. A blank string is normalized to `null`.
    pub nullable: bool,
}

impl Field {
    const fn required(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, required: true, nullable: false }
    }

    const fn nullable(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, required: false, nullable: true }
    }
}

pub type Schema = [Field];

pub const LOGIN: &Schema = &[
    Field::required("username", Kind::Text),
    Field::required("password", Kind::Text),
];

pub const TIMELINE_ENTRY: &Schema = &[
    Field::required("title", Kind::Text),
    Field::required("description", Kind::Text),
    Field::required("year", Kind::Text),
    Field::nullable("imageUrl", Kind::Text),
    Field::required("order", Kind::Integer),
];

pub const CONTACT_SUBMISSION: &Schema = &[
    Field::required("name", Kind::Text),
    Field::required("email", Kind::Email),
    Field::required("phone", Kind::Text),
    Field::required("service", Kind::Text),
    Field::required("message", Kind::Text),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    /// Every field optional; used for partial updates.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

#[derive(Debug, Clone, Error)]
#[error("invalid data ({} field errors)", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { errors: vec![FieldError::new(field, message)] }
    }
}

/// Check `payload` against `schema`, returning only the recognized fields.
/// Every failing field is reported, not just the first.
pub fn validate(
    payload: &Value,
    schema: &Schema,
    mode: Mode,
) -> Result<Map<String, Value>, ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::single("body", "must be a JSON object"))?;

    let mut out = Map::new();
    let mut errors = Vec::new();

    for field in schema {
        match object.get(field.name) {
            None => {
                if field.required && mode == Mode::Create {
                    errors.push(FieldError::new(field.name, "is required"));
                }
            }
            Some(value) => match check(field, value) {
                Ok(value) => {
                    out.insert(field.name.to_string(), value);
                }
                Err(message) => errors.push(FieldError::new(field.name, message)),
            },
        }
    }

    if errors.is_empty() { Ok(out) } else { Err(ValidationError { errors }) }
}

/// Validate, then deserialize the surviving fields into `T`.
pub fn parse<T: DeserializeOwned>(
    payload: &Value,
    schema: &Schema,
    mode: Mode,
) -> Result<T, ValidationError> {
    let fields = validate(payload, schema, mode)?;
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ValidationError::single("body", e.to_string()))
}

fn check(field: &Field, value: &Value) -> Result<Value, &'static str> {
    if value.is_null() {
        return if field.nullable { Ok(Value::Null) } else { Err("must not be null") };
    }

    match field.kind {
        Kind::Text => {
            let s = value.as_str().ok_or("must be a string")?;
            if s.trim().is_empty() {
                return if field.nullable { Ok(Value::Null) } else { Err("must not be empty") };
            }
            Ok(value.clone())
        }
        Kind::Email => {
            let s = value.as_str().ok_or("must be a string")?;
            if is_email(s.trim()) {
                Ok(Value::String(s.trim().to_string()))
            } else {
                Err("must be a valid email address")
            }
        }
        Kind::Integer => integer(value).map(Value::from).ok_or("must be an integer"),
    }
}

fn integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    // 6.0 is still an integer on the wire
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
