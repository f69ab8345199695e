// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resources managed by the provider.

pub mod cluster_role;

pub use cluster_role::ClusterRoleResource;

use crate::error::Result;
use crate::schema::{AttributePath, Diagnostic, ResourceSchema};
use crate::state::ResourceState;
use async_trait::async_trait;
use kube::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of planning a change against prior state
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChange {
    pub planned: ResourceState,
    /// Attributes whose change forces the object to be recreated
    pub requires_replace: Vec<AttributePath>,
}

/// Resource lifecycle
#[async_trait]
pub trait Resource: Send + Sync {
    /// Resource type name
    fn type_name(&self) -> &str;

    fn schema(&self) -> ResourceSchema;

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        self.schema().block.validate(config)
    }

    /// Plan changes
    fn plan_change(
        &self,
        prior: Option<&ResourceState>,
        proposed: &ResourceState,
    ) -> Result<PlannedChange> {
        let _ = prior;
        Ok(PlannedChange {
            planned: proposed.clone(),
            requires_replace: Vec::new(),
        })
    }

    async fn create(&self, planned: &ResourceState) -> Result<ResourceState>;

    /// Refresh from the server; `None` means the object is gone
    async fn read(&self, current: &ResourceState) -> Result<Option<ResourceState>>;

    async fn update(&self, prior: &ResourceState, planned: &ResourceState) -> Result<ResourceState>;

    async fn delete(&self, current: &ResourceState) -> Result<()>;

    /// Build full state for an existing object from its ID
    async fn import(&self, id: &str) -> Result<ResourceState>;
}

/// Schemas of every resource type, available before the provider is configured
pub fn resource_schemas() -> BTreeMap<String, ResourceSchema> {
    BTreeMap::from([(
        ClusterRoleResource::TYPE_NAME.to_string(),
        ClusterRoleResource::resource_schema(),
    )])
}

/// Instantiate every resource type against a cluster
pub fn all_resources(client: Client) -> BTreeMap<String, Arc<dyn Resource>> {
    let resources: Vec<Arc<dyn Resource>> = vec![Arc::new(ClusterRoleResource::from_client(client))];

    resources
        .into_iter()
        .map(|r| (r.type_name().to_string(), r))
        .collect()
}
