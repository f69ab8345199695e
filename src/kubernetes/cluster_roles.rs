// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ClusterRole API access

use crate::constants::kinds;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use k8s_openapi::api::rbac::v1::ClusterRole;
use kube::{
    api::{DeleteParams, PostParams},
    Api, ResourceExt,
};
use tracing::{debug, instrument};

/// Cluster-scoped ClusterRole operations used by the resource lifecycle.
///
/// Implementations report a missing object as [`ProviderError::NotFound`] so
/// callers can tell it apart from other API failures.
#[async_trait]
pub trait ClusterRoleApi: Send + Sync {
    async fn get_cluster_role(&self, name: &str) -> Result<ClusterRole>;

    async fn create_cluster_role(&self, role: &ClusterRole) -> Result<ClusterRole>;

    async fn replace_cluster_role(&self, name: &str, role: &ClusterRole) -> Result<ClusterRole>;

    async fn delete_cluster_role(&self, name: &str) -> Result<()>;
}

#[async_trait]
impl ClusterRoleApi for Api<ClusterRole> {
    #[instrument(skip(self))]
    async fn get_cluster_role(&self, name: &str) -> Result<ClusterRole> {
        self.get(name).await.map_err(|e| not_found_or(name, e))
    }

    #[instrument(skip(self, role), fields(name = %role.name_any()))]
    async fn create_cluster_role(&self, role: &ClusterRole) -> Result<ClusterRole> {
        Ok(self.create(&PostParams::default(), role).await?)
    }

    #[instrument(skip(self, role))]
    async fn replace_cluster_role(&self, name: &str, role: &ClusterRole) -> Result<ClusterRole> {
        self.replace(name, &PostParams::default(), role)
            .await
            .map_err(|e| not_found_or(name, e))
    }

    #[instrument(skip(self))]
    async fn delete_cluster_role(&self, name: &str) -> Result<()> {
        let outcome = self
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|e| not_found_or(name, e))?;
        debug!("Delete of ClusterRole {} accepted: {:?}", name, outcome.is_left());
        Ok(())
    }
}

fn not_found_or(name: &str, err: kube::Error) -> ProviderError {
    match err {
        kube::Error::Api(ref response) if response.code == 404 => ProviderError::NotFound {
            kind: kinds::CLUSTER_ROLE,
            name: name.to_string(),
        },
        other => ProviderError::KubeError(other),
    }
}
