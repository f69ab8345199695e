// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provider: configuration, resource registry and request dispatch.

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use crate::kubernetes::create_client;
use crate::resources::{all_resources, resource_schemas, PlannedChange, Resource};
use crate::rpc::{RpcRequest, RpcResponse, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::schema::{Diagnostic, ProviderSchema};
use crate::state::ResourceState;
use kube::Client;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, instrument};

type Registry = BTreeMap<String, Arc<dyn Resource>>;

pub struct Provider {
    base_config: ProviderConfig,
    resources: RwLock<Option<Arc<Registry>>>,
}

impl Provider {
    /// Unconfigured provider; `base_config` is overlaid by the provider block
    pub fn new(base_config: ProviderConfig) -> Self {
        Self {
            base_config,
            resources: RwLock::new(None),
        }
    }

    /// Provider already bound to a cluster
    pub fn with_client(client: Client) -> Self {
        let provider = Self::new(ProviderConfig::default());
        provider.install(client);
        provider
    }

    fn install(&self, client: Client) {
        let registry = Arc::new(all_resources(client));
        *self
            .resources
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(registry);
    }

    fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>> {
        let registry = self
            .resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ProviderError::NotConfigured)?;

        registry
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    pub fn get_schema(&self) -> ProviderSchema {
        resource_schemas()
            .into_iter()
            .fold(ProviderSchema::new(ProviderConfig::schema()), |schema, (name, resource)| {
                schema.with_resource(&name, resource)
            })
    }

    /// Connect to the cluster described by the provider block
    #[instrument(skip(self, block))]
    pub async fn configure(&self, block: &Value) -> Vec<Diagnostic> {
        let config = match self.base_config.clone().merge_block(block) {
            Ok(config) => config,
            Err(e) => return vec![Diagnostic::error("Invalid provider configuration").with_detail(&format!("{:#}", e))],
        };
        debug!("Provider configuration: {:?}", config);

        match create_client(&config).await {
            Ok(client) => {
                self.install(client);
                info!("Provider configured");
                Vec::new()
            }
            Err(e) => vec![Diagnostic::error("Failed to configure Kubernetes client").with_detail(&e.to_string())],
        }
    }

    /// Schema validation; works before the provider is configured
    pub fn validate_resource_config(&self, type_name: &str, config: &Value) -> Vec<Diagnostic> {
        match resource_schemas().get(type_name) {
            Some(schema) => schema.block.validate(config),
            None => vec![(&ProviderError::UnknownResourceType(type_name.to_string())).into()],
        }
    }

    pub fn plan_resource_change(
        &self,
        type_name: &str,
        prior: Option<&ResourceState>,
        proposed: &ResourceState,
    ) -> Result<PlannedChange> {
        self.resource(type_name)?.plan_change(prior, proposed)
    }

    /// Create, update or delete depending on which states are present
    #[instrument(skip(self, prior, planned))]
    pub async fn apply_resource_change(
        &self,
        type_name: &str,
        prior: Option<&ResourceState>,
        planned: Option<&ResourceState>,
    ) -> Result<Option<ResourceState>> {
        let resource = self.resource(type_name)?;
        match (prior, planned) {
            (None, Some(planned)) => resource.create(planned).await.map(Some),
            (Some(prior), Some(planned)) => resource.update(prior, planned).await.map(Some),
            (Some(prior), None) => resource.delete(prior).await.map(|_| None),
            (None, None) => Ok(None),
        }
    }

    pub async fn read_resource(
        &self,
        type_name: &str,
        current: &ResourceState,
    ) -> Result<Option<ResourceState>> {
        self.resource(type_name)?.read(current).await
    }

    pub async fn import_resource_state(&self, type_name: &str, id: &str) -> Result<ResourceState> {
        self.resource(type_name)?.import(id).await
    }

    /// Handle one JSON-RPC request line and produce the response line
    pub async fn handle_request(&self, input: &str) -> String {
        let request: RpcRequest = match serde_json::from_str(input) {
            Ok(r) => r,
            Err(e) => {
                return RpcResponse::error(0, PARSE_ERROR, &format!("Parse error: {}", e)).to_line();
            }
        };
        debug!("Handling {} (id {})", request.method, request.id);

        let params = &request.params;
        let type_name = params.get("type_name").and_then(Value::as_str).unwrap_or_default();

        let result = match request.method.as_str() {
            "GetProviderSchema" => serde_json::to_value(self.get_schema()).unwrap_or_default(),
            "ConfigureProvider" => {
                let diagnostics = self.configure(params.get("config").unwrap_or(&Value::Null)).await;
                json!({ "diagnostics": diagnostics })
            }
            "ValidateResourceConfig" => {
                let config = params.get("config").unwrap_or(&Value::Null);
                json!({ "diagnostics": self.validate_resource_config(type_name, config) })
            }
            "PlanResourceChange" => {
                let prior = state_param(params, "prior_state");
                let proposed = state_param(params, "proposed_new_state").unwrap_or_default();
                match self.plan_resource_change(type_name, prior.as_ref(), &proposed) {
                    Ok(change) => json!({
                        "planned_state": change.planned,
                        "requires_replace": change.requires_replace,
                        "diagnostics": [],
                    }),
                    Err(e) => failure(&e),
                }
            }
            "ApplyResourceChange" => {
                let prior = state_param(params, "prior_state");
                let planned = state_param(params, "planned_state");
                match self
                    .apply_resource_change(type_name, prior.as_ref(), planned.as_ref())
                    .await
                {
                    Ok(new_state) => json!({ "new_state": new_state, "diagnostics": [] }),
                    Err(e) => failure(&e),
                }
            }
            "ReadResource" => {
                let current = state_param(params, "current_state").unwrap_or_default();
                match self.read_resource(type_name, &current).await {
                    Ok(new_state) => json!({ "new_state": new_state, "diagnostics": [] }),
                    Err(e) => failure(&e),
                }
            }
            "ImportResourceState" => {
                let id = params.get("id").and_then(Value::as_str).unwrap_or_default();
                match self.import_resource_state(type_name, id).await {
                    Ok(state) => json!({
                        "imported_resources": [{ "type_name": type_name, "state": state }],
                        "diagnostics": [],
                    }),
                    Err(e) => failure(&e),
                }
            }
            "StopProvider" => json!({}),
            other => {
                return RpcResponse::error(
                    request.id,
                    METHOD_NOT_FOUND,
                    &format!("Method not found: {}", other),
                )
                .to_line();
            }
        };

        RpcResponse::success(request.id, result).to_line()
    }
}

/// Object-valued state parameter; `null` or missing means absent
fn state_param(params: &Value, key: &str) -> Option<ResourceState> {
    params.get(key).and_then(ResourceState::from_value)
}

fn failure(err: &ProviderError) -> Value {
    json!({ "diagnostics": [Diagnostic::from(err)] })
}
