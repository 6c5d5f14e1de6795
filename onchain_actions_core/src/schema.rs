//! Typed argument schemas and the validator that runs before every handler.
//!
//! Arguments usually come straight from an LLM, so they are treated as
//! untrusted until [`Schema::validate`] has produced an [`ActionArgs`]. The
//! same [`Schema`] value renders the JSON Schema published to the agent, so
//! what the agent is told and what is enforced cannot drift apart.

use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{ActionError, ActionResult};

/// Field name reported when the argument payload itself is malformed.
pub const ROOT_FIELD: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    /// A string restricted to the listed values.
    Enum(Vec<String>),
    Array(Box<FieldType>),
    /// Accepted as-is.
    Any,
}

impl FieldType {
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn array_of(item: FieldType) -> Self {
        Self::Array(Box::new(item))
    }

    fn to_json_schema(&self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Number => json!({ "type": "number" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Enum(values) => json!({ "type": "string", "enum": values }),
            Self::Array(item) => json!({ "type": "array", "items": item.to_json_schema() }),
            Self::Any => json!({}),
        }
    }

    /// Check `value` against this type, applying only lossless coercions.
    fn coerce(&self, path: &str, value: Value) -> Result<Value, Mismatch> {
        match (self, value) {
            (Self::Any, value) => Ok(value),

            (Self::String, Value::String(s)) => Ok(Value::String(s)),
            (Self::String, Value::Number(n)) => Ok(Value::String(n.to_string())),

            (Self::Number, Value::Number(n)) => Ok(Value::Number(n)),
            (Self::Number, Value::String(s)) => decimal_to_f64(&s)
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| Mismatch::new(path, format!("`{s}` is not exactly representable as a number"))),

            (Self::Integer, Value::Number(n)) if n.is_i64() => Ok(Value::Number(n)),
            (Self::Integer, Value::Number(n)) => n
                .as_f64()
                .and_then(integral_f64)
                .map(Value::from)
                .ok_or_else(|| Mismatch::new(path, format!("expected a 64-bit signed integer, got {n}"))),
            (Self::Integer, Value::String(s)) => decimal_to_i64(&s)
                .map(Value::from)
                .ok_or_else(|| Mismatch::new(path, format!("`{s}` is not an integer"))),

            (Self::Boolean, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Self::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(Mismatch::new(path, format!("`{s}` is not a boolean"))),
            },

            (Self::Enum(allowed), Value::String(s)) => {
                if allowed.iter().any(|candidate| candidate == &s) {
                    Ok(Value::String(s))
                } else {
                    Err(Mismatch::new(
                        path,
                        format!("`{s}` is not one of [{}]", allowed.join(", ")),
                    ))
                }
            }

            (Self::Array(item), Value::Array(values)) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| item.coerce(&format!("{path}[{i}]"), v))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),

            (expected, other) => Err(Mismatch::new(
                path,
                format!("expected {}, got {}", expected.type_name(), json_type_name(&other)),
            )),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Any => "any value",
        }
    }
}

struct Mismatch {
    field: String,
    reason: String,
}

impl Mismatch {
    fn new(field: &str, reason: String) -> Self {
        Self {
            field: field.to_string(),
            reason,
        }
    }
}

/// One declared argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Maximum length in characters, strings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
            description: None,
            max_length: None,
        }
    }

    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type)
        }
    }

    /// Value used when the field is absent. Implies the field is optional.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(default.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = self.field_type.to_json_schema();
        if let Some(obj) = schema.as_object_mut() {
            if let Some(description) = &self.description {
                obj.insert("description".into(), Value::String(description.clone()));
            }
            if let Some(default) = &self.default {
                obj.insert("default".into(), default.clone());
            }
            if let Some(max_length) = self.max_length {
                obj.insert("maxLength".into(), Value::from(max_length));
            }
        }
        schema
    }

    fn check(&self, value: Value) -> Result<Value, Mismatch> {
        let value = self.field_type.coerce(&self.name, value)?;
        if let (Some(max), Some(s)) = (self.max_length, value.as_str()) {
            let len = s.chars().count();
            if len > max {
                return Err(Mismatch::new(
                    &self.name,
                    format!("must be at most {max} characters, got {len}"),
                ));
            }
        }
        Ok(value)
    }
}

/// Structural description of the arguments an action accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    #[serde(default)]
    allow_extra: bool,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Let keys the schema does not declare through unchanged.
    pub fn allow_extra(mut self) -> Self {
        self.allow_extra = true;
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": self.allow_extra,
        })
    }

    /// Validate raw arguments for `action`.
    ///
    /// Checks run in a fixed order so a missing required field is always the
    /// error reported, whatever else is wrong with the payload: object shape,
    /// missing required fields, undeclared keys, then per-field types.
    /// `null` is read as "absent" both for the payload and for field values.
    pub fn validate(&self, action: &str, raw: Value) -> ActionResult<ActionArgs> {
        let mut input = match raw {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ActionError::validation(
                    action,
                    ROOT_FIELD,
                    format!("expected an object of arguments, got {}", json_type_name(&other)),
                ))
            }
        };

        if let Some(missing) = self
            .fields
            .iter()
            .find(|f| f.required && input.get(&f.name).map_or(true, Value::is_null))
        {
            return Err(ActionError::validation(
                action,
                missing.name.as_str(),
                "missing required field",
            ));
        }

        if !self.allow_extra {
            if let Some(unknown) = input.keys().find(|key| self.get(key).is_none()) {
                return Err(ActionError::validation(
                    action,
                    unknown.as_str(),
                    "unexpected field",
                ));
            }
        }

        let mut output = Map::new();
        for spec in &self.fields {
            match input.remove(&spec.name) {
                Some(value) if !value.is_null() => {
                    let value = spec
                        .check(value)
                        .map_err(|m| ActionError::validation(action, m.field, m.reason))?;
                    output.insert(spec.name.clone(), value);
                }
                _ => {
                    if let Some(default) = &spec.default {
                        output.insert(spec.name.clone(), default.clone());
                    }
                }
            }
        }
        output.extend(input);

        Ok(ActionArgs::new(Value::Object(output)))
    }
}

/// Validate against an optional schema.
///
/// Without a schema the raw value reaches the handler untouched; such
/// handlers must treat their input defensively.
pub fn validate(action: &str, schema: Option<&Schema>, raw: Value) -> ActionResult<ActionArgs> {
    match schema {
        Some(schema) => schema.validate(action, raw),
        None => Ok(ActionArgs::new(raw)),
    }
}

/// Arguments as handed to a handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionArgs(Value);

impl ActionArgs {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Deserialize into the handler's typed input.
    pub fn parse<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_value(self.0.clone())?)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

fn decimal_to_f64(text: &str) -> Option<f64> {
    let decimal = BigDecimal::from_str(text).ok()?;
    let float = decimal.to_f64().filter(|f| f.is_finite())?;
    // Shortest round-trip formatting; equal only if nothing was lost.
    let back = BigDecimal::from_str(&float.to_string()).ok()?;
    (back == decimal).then_some(float)
}

const MAX_I64_DIGITS: i64 = 19;

fn decimal_to_i64(text: &str) -> Option<i64> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }
    let decimal = BigDecimal::from_str(text).ok()?;
    // Rescaling costs grow with the exponent; no i64 needs more than this.
    let (_, scale) = decimal.as_bigint_and_exponent();
    if !(-MAX_I64_DIGITS..=MAX_I64_DIGITS).contains(&scale) {
        return None;
    }
    if decimal.with_scale(0) != decimal {
        return None;
    }
    decimal.to_i64()
}

fn integral_f64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f as i64)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
