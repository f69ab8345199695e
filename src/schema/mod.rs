// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Terraform schema types and configuration validation.
//!
//! Schemas are plain metadata. [`SchemaBlock::validate`] enforces what they
//! declare (required fields, types, cardinality) against a JSON configuration
//! and reports problems as [`Diagnostic`]s.

pub mod metadata;
pub mod rbac;
pub mod validate;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Path to an attribute, e.g. `["rule", "0", "api_groups"]`
pub type AttributePath = Vec<String>;

/// Attribute type for schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Number,
    Bool,
    List(Box<AttributeType>),
    Map(Box<AttributeType>),
}

impl AttributeType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Number => value.is_number(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::List(elem) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| elem.matches(v))),
            AttributeType::Map(elem) => value
                .as_object()
                .is_some_and(|entries| entries.values().all(|v| elem.matches(v))),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Number => write!(f, "number"),
            AttributeType::Bool => write!(f, "bool"),
            AttributeType::List(elem) => write!(f, "list of {}", elem),
            AttributeType::Map(elem) => write!(f, "map of {}", elem),
        }
    }
}

/// Custom check run on a configured, well-typed attribute value
#[derive(Clone, Copy)]
pub struct Validator(pub fn(&Value, &[String]) -> Vec<Diagnostic>);

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

/// Schema attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaAttribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip)]
    pub validator: Option<Validator>,
}

impl SchemaAttribute {
    fn of(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            description: None,
            required: false,
            optional: false,
            computed: false,
            min_items: None,
            validator: None,
        }
    }

    pub fn string() -> Self {
        Self::of(AttributeType::String)
    }

    pub fn number() -> Self {
        Self::of(AttributeType::Number)
    }

    pub fn bool() -> Self {
        Self::of(AttributeType::Bool)
    }

    pub fn list(element_type: AttributeType) -> Self {
        Self::of(AttributeType::List(Box::new(element_type)))
    }

    pub fn map(element_type: AttributeType) -> Self {
        Self::of(AttributeType::Map(Box::new(element_type)))
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn with_min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }


    pub fn with_validator(mut self, validator: fn(&Value, &[String]) -> Vec<Diagnostic>) -> Self {
        self.validator = Some(Validator(validator));
        self
    }

    /// Set only by the provider, never by configuration
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    fn validate(&self, path: &[String], value: Option<&Value>, diags: &mut Vec<Diagnostic>) {
        let name = path.last().map(String::as_str).unwrap_or_default();

        let Some(value) = value.filter(|v| !v.is_null()) else {
            if self.required {
                diags.push(
                    Diagnostic::error("Missing required argument")
                        .with_detail(&format!(
                            "The argument {:?} is required, but no definition was found.",
                            name
                        ))
                        .with_attribute(path.to_vec()),
                );
            }
            return;
        };

        if self.is_computed_only() {
            diags.push(
                Diagnostic::error("Value for unconfigurable attribute")
                    .with_detail(&format!(
                        "Can't configure a value for {:?}: its value will be decided automatically.",
                        name
                    ))
                    .with_attribute(path.to_vec()),
            );
            return;
        }

        if !self.attr_type.matches(value) {
            diags.push(
                Diagnostic::error("Incorrect attribute value type")
                    .with_detail(&format!(
                        "Inappropriate value for attribute {:?}: {} required.",
                        name, self.attr_type
                    ))
                    .with_attribute(path.to_vec()),
            );
            return;
        }

        if let Some(items) = value.as_array() {
            let declared = items.len();
            if let Some(min) = self.min_items.filter(|min| declared < *min) {
                diags.push(
                    Diagnostic::error("Not enough list items")
                        .with_detail(&format!(
                            "{}: attribute supports {} item minimum, config has {} declared",
                            path.join("."),
                            min,
                            declared
                        ))
                        .with_attribute(path.to_vec()),
                );
            }
        }

        if let Some(Validator(check)) = self.validator {
            diags.extend(check(value, path));
        }
    }
}

/// Block type for nested blocks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaBlock {
    pub attributes: BTreeMap<String, SchemaAttribute>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub blocks: BTreeMap<String, NestedBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: &str, attr: SchemaAttribute) -> Self {
        self.attributes.insert(name.to_string(), attr);
        self
    }

    pub fn with_attributes(mut self, attrs: BTreeMap<String, SchemaAttribute>) -> Self {
        self.attributes.extend(attrs);
        self
    }

    pub fn with_block(mut self, name: &str, block: NestedBlock) -> Self {
        self.blocks.insert(name.to_string(), block);
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Validate a configuration object against this block
    pub fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        self.validate_at(&[], config, &mut diags);
        diags
    }

    fn validate_at(&self, path: &[String], config: &Value, diags: &mut Vec<Diagnostic>) {
        let empty = Map::new();
        let object = match config {
            Value::Object(object) => object,
            Value::Null => &empty,
            _ => {
                diags.push(
                    Diagnostic::error("Invalid block")
                        .with_detail("A block must be an object.")
                        .with_attribute(path.to_vec()),
                );
                return;
            }
        };

        for key in object.keys() {
            if !self.attributes.contains_key(key) && !self.blocks.contains_key(key) {
                diags.push(
                    Diagnostic::error("Unsupported argument")
                        .with_detail(&format!("An argument named {:?} is not expected here.", key))
                        .with_attribute(child(path, key)),
                );
            }
        }

        for (name, attr) in &self.attributes {
            attr.validate(&child(path, name), object.get(name), diags);
        }

        for (name, block) in &self.blocks {
            block.validate(&child(path, name), object.get(name), diags);
        }
    }
}

fn child(path: &[String], segment: impl Into<String>) -> AttributePath {
    let mut path = path.to_vec();
    path.push(segment.into());
    path
}

/// Nested block type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedBlock {
    pub nesting_mode: NestingMode,
    pub block: SchemaBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl NestedBlock {
    pub fn list(block: SchemaBlock) -> Self {
        Self {
            nesting_mode: NestingMode::List,
            block,
            min_items: None,
            max_items: None,
        }
    }

    pub fn with_min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    fn validate(&self, path: &[String], value: Option<&Value>, diags: &mut Vec<Diagnostic>) {
        let name = path.last().map(String::as_str).unwrap_or_default();
        let items: Vec<&Value> = match value {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().collect(),
            // A lone object is shorthand for a single block
            Some(object @ Value::Object(_)) => vec![object],
            Some(_) => {
                diags.push(
                    Diagnostic::error("Invalid block")
                        .with_detail(&format!("Blocks of type {:?} must be objects.", name))
                        .with_attribute(path.to_vec()),
                );
                return;
            }
        };

        if let Some(min) = self.min_items.filter(|min| items.len() < *min) {
            diags.push(
                Diagnostic::error(&format!("Insufficient {} blocks", name))
                    .with_detail(&format!(
                        "At least {} {:?} blocks are required, config has {} declared.",
                        min,
                        name,
                        items.len()
                    ))
                    .with_attribute(path.to_vec()),
            );
        }
        if let Some(max) = self.max_items.filter(|max| items.len() > *max) {
            diags.push(
                Diagnostic::error(&format!("Too many {} blocks", name))
                    .with_detail(&format!(
                        "No more than {} {:?} blocks are allowed, config has {} declared.",
                        max,
                        name,
                        items.len()
                    ))
                    .with_attribute(path.to_vec()),
            );
        }

        for (index, item) in items.into_iter().enumerate() {
            self.block
                .validate_at(&child(path, index.to_string()), item, diags);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingMode {
    List,
}

/// Resource schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSchema {
    pub version: i64,
    pub block: SchemaBlock,
}

impl ResourceSchema {
    pub fn new(version: i64, block: SchemaBlock) -> Self {
        Self { version, block }
    }
}

/// Provider schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSchema {
    pub provider: SchemaBlock,
    pub resource_schemas: BTreeMap<String, ResourceSchema>,
}

impl ProviderSchema {
    pub fn new(provider: SchemaBlock) -> Self {
        Self {
            provider,
            resource_schemas: BTreeMap::new(),
        }
    }

    pub fn with_resource(mut self, name: &str, schema: ResourceSchema) -> Self {
        self.resource_schemas.insert(name.to_string(), schema);
        self
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticSeverity {
    Error,
}

/// Diagnostic message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error(summary: &str) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.to_string(),
            detail: None,
            attribute: None,
        }
    }

    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_attribute(mut self, path: AttributePath) -> Self {
        self.attribute = Some(path);
        self
    }
}

impl From<&crate::error::ProviderError> for Diagnostic {
    fn from(err: &crate::error::ProviderError) -> Self {
        Diagnostic::error(&err.to_string())
    }
}
