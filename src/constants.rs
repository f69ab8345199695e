// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Resource type names served by this provider
pub mod resource_types {
    pub const CLUSTER_ROLE: &str = "kubernetes_cluster_role";
}

/// Kubernetes object kinds, used in error messages
pub mod kinds {
    pub const CLUSTER_ROLE: &str = "ClusterRole";
}

/// Resource ID encoding
pub mod id {
    /// Separator between scope and name
    pub const SEPARATOR: char = '/';
    /// Human readable form of the accepted ID layout
    pub const EXPECTED_FORMAT: &str = "name or scope/name";
}

/// Label and annotation keys under this DNS domain are owned by Kubernetes
pub const INTERNAL_KEY_DOMAIN: &str = "kubernetes.io";

/// Environment variables read by the provider configuration
pub mod env {
    pub const CONFIG_PATH: &str = "KUBE_CONFIG_PATH";
    pub const CONFIG_CONTEXT: &str = "KUBE_CTX";
    pub const LOAD_CONFIG_FILE: &str = "KUBE_LOAD_CONFIG_FILE";
}
