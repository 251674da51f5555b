// SPDX-License-Identifier: MIT

//! Variable bindings: engine input and working output state

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::Scalar;
use crate::error::InputError;

/// Mapping from variable name to typed scalar
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Binding {
    fields: HashMap<String, Scalar>,
}

impl Binding {
    /// Create an empty binding
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a variable
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode an input binding from a JSON value, which must be an object
    pub fn from_json(value: &Value) -> Result<Self, InputError> {
        match value {
            Value::Object(map) => Self::from_json_map(map),
            other => Err(InputError::NotAnObject(json_kind(other))),
        }
    }

    /// Decode an input binding from a JSON object.
    ///
    /// Whole numbers become integers; other numbers are kept as floats.
    /// Nulls, arrays and nested objects are rejected.
    pub fn from_json_map(map: &Map<String, Value>) -> Result<Self, InputError> {
        let mut binding = Self::new();
        for (key, value) in map {
            let scalar = match value {
                Value::Bool(b) => Scalar::Boolean(*b),
                Value::String(s) => Scalar::String(s.clone()),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => Scalar::Integer(i),
                    None => match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                            Scalar::Integer(f as i64)
                        }
                        Some(f) => Scalar::Float(f),
                        None => {
                            return Err(InputError::UnsupportedValue {
                                key: key.clone(),
                                kind: "number",
                            })
                        }
                    },
                },
                other => {
                    return Err(InputError::UnsupportedValue {
                        key: key.clone(),
                        kind: json_kind(other),
                    })
                }
            };
            binding.fields.insert(key.clone(), scalar);
        }
        Ok(binding)
    }

    /// Convert the binding to a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), scalar_to_json(v)))
                .collect(),
        )
    }
}

fn scalar_to_json(value: &Scalar) -> Value {
    match value {
        Scalar::Boolean(b) => Value::Bool(*b),
        Scalar::Integer(i) => Value::from(*i),
        Scalar::Float(f) => Value::from(*f),
        Scalar::String(s) => Value::String(s.clone()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for Binding {
    fn from_iter<T: IntoIterator<Item = (K, Scalar)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
