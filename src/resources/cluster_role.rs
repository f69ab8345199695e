// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The `kubernetes_cluster_role` resource.

use super::{PlannedChange, Resource};
use crate::constants::{kinds, resource_types};
use crate::error::{ProviderError, Result};
use crate::id::{build_id, id_parts};
use crate::kubernetes::ClusterRoleApi;
use crate::schema::metadata::metadata_block;
use crate::schema::rbac::policy_rule_block;
use crate::schema::{NestedBlock, ResourceSchema, SchemaAttribute, SchemaBlock};
use crate::state::ResourceState;
use crate::types::{preserve_internal_keys, ClusterRoleModel, MetadataBlock};
use async_trait::async_trait;
use k8s_openapi::api::rbac::v1::ClusterRole;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct ClusterRoleResource {
    api: Arc<dyn ClusterRoleApi>,
}

impl ClusterRoleResource {
    pub const TYPE_NAME: &'static str = resource_types::CLUSTER_ROLE;

    pub fn new(api: Arc<dyn ClusterRoleApi>) -> Self {
        Self { api }
    }

    pub fn from_client(client: Client) -> Self {
        let api: Api<ClusterRole> = Api::all(client);
        Self::new(Arc::new(api))
    }

    pub fn resource_schema() -> ResourceSchema {
        let block = SchemaBlock::new()
            .with_attribute(
                "id",
                SchemaAttribute::string()
                    .with_description("Name of the cluster role")
                    .computed(),
            )
            .with_block("metadata", metadata_block("clusterRole"))
            .with_block(
                "rule",
                NestedBlock::list(
                    policy_rule_block().with_description("List of PolicyRules for this ClusterRole"),
                )
                .with_min_items(1),
            )
            .with_description("A ClusterRole is a cluster level, logical grouping of PolicyRules that can be referenced as a unit by a RoleBinding or ClusterRoleBinding.");

        ResourceSchema::new(0, block)
    }

    /// Fetch by ID and map into state, keeping internal keys the configuration mentions
    async fn read_by_id(
        &self,
        id: &str,
        configured: Option<&MetadataBlock>,
    ) -> Result<Option<ResourceState>> {
        let name = role_name(id)?;

        info!("Reading cluster role {}", name);
        let role = match self.api.get_cluster_role(&name).await {
            Ok(role) => role,
            Err(e) if e.is_not_found() => {
                warn!("Cluster role {} not found, removing from state", name);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        debug!("Received cluster role: {:?}", role);

        ClusterRoleModel::from_cluster_role(&role, configured)
            .into_state(id)
            .map(Some)
    }
}

/// Cluster roles are cluster-scoped, so their ID is the bare name
fn role_name(id: &str) -> Result<String> {
    let parsed = id_parts(id)?;
    if !parsed.is_cluster_scoped() {
        return Err(ProviderError::InvalidId {
            id: id.to_string(),
            expected: "name",
        });
    }
    Ok(parsed.name)
}

fn state_id(state: &ResourceState) -> Result<String> {
    state
        .id()
        .ok_or_else(|| ProviderError::InvalidState("resource has no id".to_string()))
}

#[async_trait]
impl Resource for ClusterRoleResource {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        Self::resource_schema()
    }

    fn plan_change(
        &self,
        prior: Option<&ResourceState>,
        proposed: &ResourceState,
    ) -> Result<PlannedChange> {
        let mut model = ClusterRoleModel::from_state(proposed)?;
        let Some(prior) = prior else {
            return Ok(PlannedChange {
                planned: proposed.clone(),
                requires_replace: Vec::new(),
            });
        };

        let prior_model = ClusterRoleModel::from_state(prior)?;
        let prior_metadata = prior_model.metadata()?;
        let id = state_id(prior)?;

        if model.name()? != prior_metadata.name {
            return Ok(PlannedChange {
                planned: proposed.clone(),
                requires_replace: vec![vec![
                    "metadata".to_string(),
                    "0".to_string(),
                    "name".to_string(),
                ]],
            });
        }

        // Server-owned fields stay as last observed until the update lands
        if let Some(metadata) = model.metadata.first_mut() {
            metadata.generation = prior_metadata.generation;
            metadata.resource_version = prior_metadata.resource_version.clone();
            metadata.self_link = prior_metadata.self_link.clone();
            metadata.uid = prior_metadata.uid.clone();
        }

        Ok(PlannedChange {
            planned: model.into_state(&id)?,
            requires_replace: Vec::new(),
        })
    }

    #[instrument(skip(self, planned))]
    async fn create(&self, planned: &ResourceState) -> Result<ResourceState> {
        let model = ClusterRoleModel::from_state(planned)?;
        let role = model.to_cluster_role()?;

        info!("Creating new cluster role: {}", role.name_any());
        let out = self.api.create_cluster_role(&role).await?;
        info!("Submitted new cluster role: {}", out.name_any());

        let id = build_id("", &out.name_any());
        ClusterRoleModel::from_cluster_role(&out, model.metadata().ok()).into_state(&id)
    }

    #[instrument(skip(self, current), fields(id = ?current.id()))]
    async fn read(&self, current: &ResourceState) -> Result<Option<ResourceState>> {
        let id = state_id(current)?;
        let configured = ClusterRoleModel::from_state(current)?;
        self.read_by_id(&id, configured.metadata().ok()).await
    }

    #[instrument(skip(self, prior, planned), fields(id = ?prior.id()))]
    async fn update(&self, prior: &ResourceState, planned: &ResourceState) -> Result<ResourceState> {
        let id = state_id(prior)?;
        let name = role_name(&id)?;

        let mut model = ClusterRoleModel::from_state(planned)?;
        if model.name()? != name {
            return Err(ProviderError::InvalidState(format!(
                "metadata.0.name cannot be updated in place (from {:?} to {:?})",
                name,
                model.name()?
            )));
        }
        if let Some(metadata) = model.metadata.first_mut() {
            if metadata.resource_version.is_empty() {
                metadata.resource_version = ClusterRoleModel::from_state(prior)?
                    .metadata()
                    .map(|m| m.resource_version.clone())
                    .unwrap_or_default();
            }
        }

        let mut role = model.to_cluster_role()?;
        let live = self.api.get_cluster_role(&name).await?;
        preserve_internal_keys(&mut role, &live);

        info!("Updating cluster role {}", name);
        let out = self.api.replace_cluster_role(&name, &role).await?;
        info!("Submitted updated cluster role: {}", out.name_any());

        ClusterRoleModel::from_cluster_role(&out, model.metadata().ok()).into_state(&id)
    }

    #[instrument(skip(self, current), fields(id = ?current.id()))]
    async fn delete(&self, current: &ResourceState) -> Result<()> {
        let name = role_name(&state_id(current)?)?;

        info!("Deleting cluster role: {}", name);
        match self.api.delete_cluster_role(&name).await {
            Ok(()) => info!("Cluster role {} deleted", name),
            Err(e) if e.is_not_found() => debug!("Cluster role {} already gone", name),
            Err(e) => return Err(e),
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn import(&self, id: &str) -> Result<ResourceState> {
        let name = role_name(id)?;
        self.read_by_id(&build_id("", &name), None)
            .await?
            .ok_or_else(|| ProviderError::NotFound {
                kind: kinds::CLUSTER_ROLE,
                name,
            })
    }
}
