// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource ID encoding shared by all resource types.
//!
//! An ID is either `name` (cluster-scoped objects) or `scope/name`. The
//! `/name` form with an empty scope is read as cluster-scoped too.

use crate::constants::id::{EXPECTED_FORMAT, SEPARATOR};
use crate::error::{ProviderError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    /// Empty for cluster-scoped objects
    pub scope: String,
    pub name: String,
}

impl ResourceId {
    pub fn cluster_scoped(name: impl Into<String>) -> Self {
        Self {
            scope: String::new(),
            name: name.into(),
        }
    }

    pub fn is_cluster_scoped(&self) -> bool {
        self.scope.is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cluster_scoped() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}{}{}", self.scope, SEPARATOR, self.name)
        }
    }
}

impl FromStr for ResourceId {
    type Err = ProviderError;

    fn from_str(id: &str) -> Result<Self> {
        let invalid = || ProviderError::InvalidId {
            id: id.to_string(),
            expected: EXPECTED_FORMAT,
        };

        let parts: Vec<&str> = id.split(SEPARATOR).collect();
        match parts.as_slice() {
            [name] if !name.is_empty() => Ok(Self::cluster_scoped(*name)),
            [scope, name] if !name.is_empty() => Ok(Self {
                scope: scope.to_string(),
                name: name.to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}

/// Join a scope and a name into a resource ID
pub fn build_id(scope: &str, name: &str) -> String {
    ResourceId {
        scope: scope.to_string(),
        name: name.to_string(),
    }
    .to_string()
}

/// Split a resource ID into its scope and name
pub fn id_parts(id: &str) -> Result<ResourceId> {
    id.parse()
}
