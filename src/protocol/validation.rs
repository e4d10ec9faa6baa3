//! Boundary validation between untyped JSON and the typed message records
//!
//! Inside the crate every record is well-formed by construction. Payloads that
//! arrive as raw JSON are checked here against the JSON Schema generated for the
//! target type, so a caller gets every violation (field, expectation, actual
//! value) at once rather than the first serde error.

use crate::error::{PayloadError, SchemaResult, SchemaValidationError, Violation};
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{ValidationError, Validator};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

const MAX_DESCRIBED_STRING: usize = 40;

/// Compiled validators, one per record type, built on first use
static VALIDATORS: Lazy<RwLock<HashMap<TypeId, Arc<Validator>>>> = Lazy::new(Default::default);

/// Generate the JSON Schema for a record type
pub fn json_schema<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema).expect("Schema should be serializable")
}

/// Compiled validator for a record type
///
/// The schema is generated and compiled once per type; later calls share it.
pub fn validator<T: JsonSchema + 'static>() -> SchemaResult<Arc<Validator>> {
    let type_id = TypeId::of::<T>();

    let cached = VALIDATORS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&type_id)
        .cloned();
    if let Some(validator) = cached {
        return Ok(validator);
    }

    let type_name = T::schema_name();
    let compiled = jsonschema::validator_for(&json_schema::<T>()).map_err(|e| {
        SchemaValidationError::single("", format!("a valid {type_name} schema"), e.to_string())
    })?;
    debug!(schema = %type_name, "Compiled payload validator");

    let mut validators = VALIDATORS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(Arc::clone(
        validators
            .entry(type_id)
            .or_insert_with(|| Arc::new(compiled)),
    ))
}

/// Decode a record from an untyped JSON value
///
/// The value is validated against the record's schema first; nested records
/// are checked recursively. Either a fully valid record is returned or a
/// [`SchemaValidationError`] listing every violation.
pub fn decode<T>(value: &Value) -> SchemaResult<T>
where
    T: DeserializeOwned + JsonSchema + 'static,
{
    let type_name = T::schema_name();
    let validator = validator::<T>()?;

    if let Err(errors) = validator.validate(value) {
        let violations: Vec<Violation> = errors.map(|e| to_violation(&e)).collect();
        warn!(
            schema = %type_name,
            violations = violations.len(),
            "Payload failed schema validation"
        );
        return Err(SchemaValidationError { violations });
    }

    let record = serde_json::from_value(value.clone()).map_err(|e| {
        SchemaValidationError::single("", format!("a valid {type_name}"), e.to_string())
    })?;

    debug!(schema = %type_name, "Decoded payload");
    Ok(record)
}

/// Decode a record from JSON text
pub fn decode_str<T>(payload: &str) -> Result<T, PayloadError>
where
    T: DeserializeOwned + JsonSchema + 'static,
{
    let value: Value = serde_json::from_str(payload)?;
    Ok(decode(&value)?)
}

/// Encode a record into a JSON value with the exact wire field names
pub fn encode<T: Serialize>(record: &T) -> serde_json::Result<Value> {
    serde_json::to_value(record)
}

/// Encode a record into compact JSON text
pub fn encode_string<T: Serialize>(record: &T) -> serde_json::Result<String> {
    serde_json::to_string(record)
}

/// Encode a record into indented JSON text
pub fn encode_pretty<T: Serialize>(record: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

fn to_violation(error: &ValidationError<'_>) -> Violation {
    let field = error.instance_path.to_string();

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| property.to_string());
            Violation::new(format!("{field}/{name}"), "a required property", "missing")
        }
        ValidationErrorKind::Type {
            kind: TypeKind::Single(expected),
        } => Violation::new(field, format!("type {expected}"), describe(&error.instance)),
        ValidationErrorKind::Type {
            kind: TypeKind::Multiple(types),
        } => {
            let mut names: Vec<String> = types.clone().into_iter().map(|t| t.to_string()).collect();
            names.sort();
            Violation::new(
                field,
                format!("one of types {}", names.join(", ")),
                describe(&error.instance),
            )
        }
        ValidationErrorKind::MinLength { limit } => Violation::new(
            field,
            format!("a string of at least {limit} character(s)"),
            describe(&error.instance),
        ),
        _ => Violation::new(field, error.to_string(), describe(&error.instance)),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) if s.is_empty() => "empty string".to_string(),
        Value::String(s) if s.chars().count() > MAX_DESCRIBED_STRING => {
            let head: String = s.chars().take(MAX_DESCRIBED_STRING).collect();
            format!("string {head:?}...")
        }
        Value::String(s) => format!("string {s:?}"),
        Value::Array(items) => format!("array of {} item(s)", items.len()),
        Value::Object(fields) => format!("object with {} field(s)", fields.len()),
    }
}
