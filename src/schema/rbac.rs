// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Schema fragments shared by RBAC resources

use super::{AttributeType, SchemaAttribute, SchemaBlock};
use std::collections::BTreeMap;

/// Fields of a single RBAC policy rule block
pub fn policy_rule_fields() -> BTreeMap<String, SchemaAttribute> {
    BTreeMap::from([
        (
            "api_groups".to_string(),
            SchemaAttribute::list(AttributeType::String)
                .with_description("APIGroups is the name of the APIGroup that contains the resources. If multiple API groups are specified, any action requested against one of the enumerated resources in any API group will be allowed.")
                .required()
                .with_min_items(1),
        ),
        (
            "non_resource_urls".to_string(),
            SchemaAttribute::list(AttributeType::String)
                .with_description("NonResourceURLs is a set of partial urls that a user should have access to. *s are allowed, but only as the full, final step in the path. Since non-resource URLs are not namespaced, this field is only applicable for ClusterRoles referenced from a ClusterRoleBinding. Rules can either apply to API resources (such as \"pods\" or \"secrets\") or non-resource URL paths (such as \"/api\"), but not both.")
                .optional(),
        ),
        (
            "resource_names".to_string(),
            SchemaAttribute::list(AttributeType::String)
                .with_description("ResourceNames is an optional white list of names that the rule applies to. An empty set means that everything is allowed.")
                .optional(),
        ),
        (
            "resources".to_string(),
            SchemaAttribute::list(AttributeType::String)
                .with_description("Resources is a list of resources this rule applies to. ResourceAll represents all resources.")
                .optional(),
        ),
        (
            "verbs".to_string(),
            SchemaAttribute::list(AttributeType::String)
                .with_description("Verbs is a list of Verbs that apply to ALL the ResourceKinds and AttributeRestrictions contained in this rule. VerbAll represents all kinds.")
                .optional(),
        ),
    ])
}

pub fn policy_rule_block() -> SchemaBlock {
    SchemaBlock::new().with_attributes(policy_rule_fields())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_are_ordered_by_name() {
        let names: Vec<String> = policy_rule_fields().into_keys().collect();
        assert_eq!(
            names,
            vec![
                "api_groups",
                "non_resource_urls",
                "resource_names",
                "resources",
                "verbs"
            ]
        );
    }

    #[test]
    fn test_only_api_groups_is_required() {
        let fields = policy_rule_fields();

        assert!(fields["api_groups"].required);
        assert_eq!(fields["api_groups"].min_items, Some(1));
        for (name, field) in fields.iter().filter(|(name, _)| *name != "api_groups") {
            assert!(field.optional, "{} should be optional", name);
            assert_eq!(field.min_items, None);
        }
    }

    #[test]
    fn test_all_fields_are_string_lists() {
        for field in policy_rule_fields().values() {
            assert_eq!(
                field.attr_type,
                AttributeType::List(Box::new(AttributeType::String))
            );
            assert!(field.description.is_some());
        }
    }

    #[test]
    fn test_empty_api_groups_rejected() {
        let diags = policy_rule_block().validate(&json!({
            "api_groups": [],
            "resources": ["pods"],
            "verbs": ["get"],
        }));

        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].detail.as_deref(),
            Some("api_groups: attribute supports 1 item minimum, config has 0 declared")
        );
    }

    #[test]
    fn test_missing_api_groups_rejected() {
        let diags = policy_rule_block().validate(&json!({"verbs": ["get"]}));

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].summary, "Missing required argument");
    }

    #[test]
    fn test_other_fields_accept_zero_entries() {
        let diags = policy_rule_block().validate(&json!({
            "api_groups": [""],
            "non_resource_urls": [],
            "resource_names": [],
            "resources": [],
            "verbs": [],
        }));

        assert!(diags.is_empty());
    }
}
