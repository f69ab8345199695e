// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation and RBAC API access.

pub mod client;
pub mod cluster_roles;

pub use client::create_client;
pub use cluster_roles::ClusterRoleApi;
