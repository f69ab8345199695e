// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::env as vars;
use crate::schema::{SchemaAttribute, SchemaBlock};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::path::PathBuf;

/// Provider configuration, from environment variables and the provider block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Path to a kubeconfig file; default discovery when unset
    pub config_path: Option<PathBuf>,
    /// Kubeconfig context to use instead of the current one
    pub config_context: Option<String>,
    /// When false, only the in-cluster service account is used
    pub load_config_file: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            config_context: None,
            load_config_file: true,
        }
    }
}

/// Attributes of the provider block; unset ones keep the environment value
#[derive(Debug, Default, Deserialize)]
struct ProviderBlock {
    config_path: Option<String>,
    config_context: Option<String>,
    load_config_file: Option<bool>,
}

impl ProviderConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config_path = env::var(vars::CONFIG_PATH).ok().filter(|p| !p.is_empty()).map(PathBuf::from);
        let config_context = env::var(vars::CONFIG_CONTEXT).ok().filter(|c| !c.is_empty());
        let load_config_file = match env::var(vars::LOAD_CONFIG_FILE) {
            Ok(value) => parse_bool(&value).with_context(|| {
                format!("{} must be true or false, got {:?}", vars::LOAD_CONFIG_FILE, value)
            })?,
            Err(_) => true,
        };

        Ok(ProviderConfig {
            config_path,
            config_context,
            load_config_file,
        })
    }

    /// Overlay the attributes set in a provider block
    pub fn merge_block(mut self, block: &Value) -> Result<Self> {
        if block.is_null() {
            return Ok(self);
        }

        let block: ProviderBlock =
            serde_json::from_value(block.clone()).context("invalid provider configuration block")?;

        if let Some(path) = block.config_path.filter(|p| !p.is_empty()) {
            self.config_path = Some(PathBuf::from(path));
        }
        if let Some(context) = block.config_context.filter(|c| !c.is_empty()) {
            self.config_context = Some(context);
        }
        if let Some(load) = block.load_config_file {
            self.load_config_file = load;
        }

        Ok(self)
    }

    /// Schema of the provider block
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .with_attribute(
                "config_path",
                SchemaAttribute::string()
                    .with_description(&format!(
                        "Path to the kube config file. Can be sourced from `{}`.",
                        vars::CONFIG_PATH
                    ))
                    .optional(),
            )
            .with_attribute(
                "config_context",
                SchemaAttribute::string()
                    .with_description(&format!(
                        "Context to choose from the config file. Can be sourced from `{}`.",
                        vars::CONFIG_CONTEXT
                    ))
                    .optional(),
            )
            .with_attribute(
                "load_config_file",
                SchemaAttribute::bool()
                    .with_description(&format!(
                        "Load local kubeconfig. Can be sourced from `{}`.",
                        vars::LOAD_CONFIG_FILE
                    ))
                    .optional(),
            )
            .with_description("Kubernetes RBAC provider")
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => anyhow::bail!("not a boolean: {:?}", other),
    }
}
