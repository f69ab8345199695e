// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Mapping between `kubernetes_cluster_role` attributes and RBAC v1 objects

use super::{blocks, null_default};
use crate::error::{ProviderError, Result};
use crate::schema::validate::is_internal_key;
use crate::state::{ResourceState, ID_ATTRIBUTE};
use k8s_openapi::api::rbac::v1::{ClusterRole, PolicyRule};
use kube::api::ObjectMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attributes of a `kubernetes_cluster_role` resource
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ClusterRoleModel {
    #[serde(default, deserialize_with = "blocks")]
    pub metadata: Vec<MetadataBlock>,
    #[serde(default, deserialize_with = "blocks")]
    pub rule: Vec<PolicyRuleBlock>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MetadataBlock {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_default")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_default")]
    pub generation: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub resource_version: String,
    #[serde(default, deserialize_with = "null_default")]
    pub self_link: String,
    #[serde(default, deserialize_with = "null_default")]
    pub uid: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PolicyRuleBlock {
    #[serde(default, deserialize_with = "null_default")]
    pub api_groups: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub non_resource_urls: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub resource_names: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub resources: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub verbs: Vec<String>,
}

impl PolicyRuleBlock {
    pub fn to_policy_rule(&self) -> PolicyRule {
        PolicyRule {
            api_groups: Some(self.api_groups.clone()),
            non_resource_urls: non_empty(&self.non_resource_urls),
            resource_names: non_empty(&self.resource_names),
            resources: non_empty(&self.resources),
            verbs: self.verbs.clone(),
        }
    }

    pub fn from_policy_rule(rule: &PolicyRule) -> Self {
        Self {
            api_groups: rule.api_groups.clone().unwrap_or_default(),
            non_resource_urls: rule.non_resource_urls.clone().unwrap_or_default(),
            resource_names: rule.resource_names.clone().unwrap_or_default(),
            resources: rule.resources.clone().unwrap_or_default(),
            verbs: rule.verbs.clone(),
        }
    }
}

impl MetadataBlock {
    fn to_object_meta(&self) -> ObjectMeta {
        ObjectMeta {
            name: Some(self.name.clone()),
            labels: non_empty_map(&self.labels),
            annotations: non_empty_map(&self.annotations),
            resource_version: Some(self.resource_version.clone()).filter(|rv| !rv.is_empty()),
            ..Default::default()
        }
    }

    /// Server metadata, minus internal keys the configuration does not mention
    fn from_object_meta(meta: &ObjectMeta, configured: Option<&MetadataBlock>) -> Self {
        let empty = BTreeMap::new();
        let (configured_labels, configured_annotations) = configured
            .map(|c| (&c.labels, &c.annotations))
            .unwrap_or((&empty, &empty));

        Self {
            name: meta.name.clone().unwrap_or_default(),
            labels: remove_internal_keys(meta.labels.as_ref(), configured_labels),
            annotations: remove_internal_keys(meta.annotations.as_ref(), configured_annotations),
            generation: meta.generation.unwrap_or_default(),
            resource_version: meta.resource_version.clone().unwrap_or_default(),
            self_link: meta.self_link.clone().unwrap_or_default(),
            uid: meta.uid.clone().unwrap_or_default(),
        }
    }
}

impl ClusterRoleModel {
    pub fn from_state(state: &ResourceState) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(state.values.clone()))?)
    }

    pub fn metadata(&self) -> Result<&MetadataBlock> {
        match self.metadata.as_slice() {
            [metadata] => Ok(metadata),
            other => Err(ProviderError::InvalidState(format!(
                "expected exactly one metadata block, found {}",
                other.len()
            ))),
        }
    }

    pub fn name(&self) -> Result<&str> {
        Ok(self.metadata()?.name.as_str())
    }

    /// Desired object built from configuration
    pub fn to_cluster_role(&self) -> Result<ClusterRole> {
        Ok(ClusterRole {
            metadata: self.metadata()?.to_object_meta(),
            rules: Some(self.rule.iter().map(PolicyRuleBlock::to_policy_rule).collect()),
            ..Default::default()
        })
    }

    /// Attributes observed on the server
    pub fn from_cluster_role(role: &ClusterRole, configured: Option<&MetadataBlock>) -> Self {
        Self {
            metadata: vec![MetadataBlock::from_object_meta(&role.metadata, configured)],
            rule: role
                .rules
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(PolicyRuleBlock::from_policy_rule)
                .collect(),
        }
    }

    pub fn into_state(self, id: &str) -> Result<ResourceState> {
        let mut state = match serde_json::to_value(self)? {
            Value::Object(values) => ResourceState { values },
            _ => return Err(ProviderError::InvalidState("state is not an object".to_string())),
        };
        state.set(ID_ATTRIBUTE, Value::String(id.to_string()));
        Ok(state)
    }
}

/// Carry the `kubernetes.io` labels and annotations of `live` over into
/// `desired`; configured values win.
pub fn preserve_internal_keys(desired: &mut ClusterRole, live: &ClusterRole) {
    merge_internal_keys(&mut desired.metadata.labels, live.metadata.labels.as_ref());
    merge_internal_keys(
        &mut desired.metadata.annotations,
        live.metadata.annotations.as_ref(),
    );
}

fn merge_internal_keys(
    desired: &mut Option<BTreeMap<String, String>>,
    live: Option<&BTreeMap<String, String>>,
) {
    let mut internal = live
        .into_iter()
        .flatten()
        .filter(|(k, _)| is_internal_key(k))
        .peekable();
    if internal.peek().is_none() {
        return;
    }

    let target = desired.get_or_insert_with(BTreeMap::new);
    for (k, v) in internal {
        target.entry(k.clone()).or_insert_with(|| v.clone());
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

fn non_empty_map(values: &BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    (!values.is_empty()).then(|| values.clone())
}

fn remove_internal_keys(
    server: Option<&BTreeMap<String, String>>,
    configured: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    server
        .into_iter()
        .flatten()
        .filter(|(k, _)| !is_internal_key(k) || configured.contains_key(*k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
