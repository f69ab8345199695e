// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource state as exchanged with Terraform.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Attribute name holding the resource ID
pub const ID_ATTRIBUTE: &str = "id";

/// Resource state: a JSON object of attribute values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceState {
    pub values: Map<String, Value>,
}

impl ResourceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value; anything but an object yields `None`
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|values| Self {
            values: values.clone(),
        })
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(|v| v.as_str()).map(String::from)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn id(&self) -> Option<String> {
        self.get_string(ID_ATTRIBUTE).filter(|id| !id.is_empty())
    }

    /// Flattened `a.0.b.#` view of the state, as used by acceptance checks
    pub fn flatmap(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (key, value) in &self.values {
            flatten_into(key, value, &mut out);
        }
        out
    }
}

fn flatten_into(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            out.insert(format!("{}.#", prefix), items.len().to_string());
            for (index, item) in items.iter().enumerate() {
                flatten_into(&format!("{}.{}", prefix, index), item, out);
            }
        }
        Value::Object(entries) => {
            out.insert(format!("{}.%", prefix), entries.len().to_string());
            for (key, item) in entries {
                flatten_into(&format!("{}.{}", prefix, key), item, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
