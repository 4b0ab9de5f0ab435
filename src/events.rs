use crate::{error::EvaluationError, values::Value};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// What a record holds under a key that is present.
#[derive(Clone, PartialEq, Debug)]
pub enum FieldValue {
    Null,
    Single(Value),
    /// Several values under one key; a test holds if it holds for any of them.
    Multi(Vec<Value>),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Single(value)
    }
}

/// The narrow view of a record that compiled predicates evaluate against.
pub trait RecordView {
    fn get(&self, key: &str) -> Result<Option<FieldValue>, EvaluationError>;
}

impl RecordView for HashMap<String, FieldValue> {
    fn get(&self, key: &str) -> Result<Option<FieldValue>, EvaluationError> {
        Ok(HashMap::get(self, key).cloned())
    }
}

impl RecordView for BTreeMap<String, FieldValue> {
    fn get(&self, key: &str) -> Result<Option<FieldValue>, EvaluationError> {
        Ok(BTreeMap::get(self, key).cloned())
    }
}

/// Where address-derived keys live in an event record.
///
/// An event lists its addresses under `address_key`, each one an object that may carry any of
/// `address_fields`. Those keys therefore resolve to one value per address.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default)]
pub struct RecordLayout {
    pub address_key: String,
    pub address_fields: Vec<String>,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            address_key: "address".to_string(),
            address_fields: vec!["asn".to_string(), "cc".to_string(), "ip".to_string()],
        }
    }
}

impl RecordLayout {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn is_address_field(&self, key: &str) -> bool {
        self.address_fields.iter().any(|field| field == key)
    }
}

pub struct EventRecord<'a> {
    fields: &'a serde_json::Map<String, serde_json::Value>,
    layout: &'a RecordLayout,
}

impl<'a> EventRecord<'a> {
    pub fn new(
        fields: &'a serde_json::Map<String, serde_json::Value>,
        layout: &'a RecordLayout,
    ) -> Self {
        Self { fields, layout }
    }

    fn get_address_field(&self, key: &str) -> Result<Option<FieldValue>, EvaluationError> {
        let addresses = match self.fields.get(&self.layout.address_key) {
            None => return Ok(None),
            Some(serde_json::Value::Array(addresses)) => addresses,
            Some(other) => {
                return Err(EvaluationError::UnsupportedValue {
                    key: self.layout.address_key.clone(),
                    value: other.to_string(),
                })
            }
        };

        let mut values = Vec::with_capacity(addresses.len());
        for address in addresses {
            let Some(address) = address.as_object() else {
                return Err(EvaluationError::UnsupportedValue {
                    key: self.layout.address_key.clone(),
                    value: address.to_string(),
                });
            };
            match address.get(key) {
                None => {}
                Some(serde_json::Value::Null) => return Ok(Some(FieldValue::Null)),
                Some(value) => values.push(to_value(key, value)?),
            }
        }
        if values.is_empty() {
            Ok(None)
        } else {
            Ok(Some(FieldValue::Multi(values)))
        }
    }
}

impl RecordView for EventRecord<'_> {
    fn get(&self, key: &str) -> Result<Option<FieldValue>, EvaluationError> {
        if self.layout.is_address_field(key) {
            return self.get_address_field(key);
        }
        match self.fields.get(key) {
            None => Ok(None),
            Some(serde_json::Value::Null) => Ok(Some(FieldValue::Null)),
            Some(value) => Ok(Some(FieldValue::Single(to_value(key, value)?))),
        }
    }
}

fn to_value(key: &str, value: &serde_json::Value) -> Result<Value, EvaluationError> {
    let unsupported = || EvaluationError::UnsupportedValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    match value {
        serde_json::Value::Bool(value) => Ok(Value::Boolean(*value)),
        serde_json::Value::String(value) => Ok(Value::String(value.clone())),
        serde_json::Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Ok(Value::from(integer))
            } else if let Some(integer) = number.as_u64() {
                Ok(Value::from(integer))
            } else {
                number
                    .as_f64()
                    .and_then(|float| Decimal::try_from(float).ok())
                    .map(Value::Number)
                    .ok_or_else(unsupported)
            }
        }
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(unsupported())
        }
    }
}
