// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Standard object metadata block

use super::validate::{validate_annotations, validate_labels, validate_rbac_name};
use super::{AttributeType, NestedBlock, SchemaAttribute, SchemaBlock};

/// Metadata block for a cluster-scoped object called `object_name` in descriptions
pub fn metadata_block(object_name: &str) -> NestedBlock {
    let block = SchemaBlock::new()
        .with_attribute(
            "annotations",
            SchemaAttribute::map(AttributeType::String)
                .with_description(&format!(
                    "An unstructured key value map stored with the {} that may be used to store arbitrary metadata. More info: http://kubernetes.io/docs/user-guide/annotations",
                    object_name
                ))
                .optional()
                .with_validator(validate_annotations),
        )
        .with_attribute(
            "generation",
            SchemaAttribute::number()
                .with_description("A sequence number representing a specific generation of the desired state.")
                .computed(),
        )
        .with_attribute(
            "labels",
            SchemaAttribute::map(AttributeType::String)
                .with_description(&format!(
                    "Map of string keys and values that can be used to organize and categorize (scope and select) the {}. More info: http://kubernetes.io/docs/user-guide/labels",
                    object_name
                ))
                .optional()
                .with_validator(validate_labels),
        )
        .with_attribute(
            "name",
            SchemaAttribute::string()
                .with_description(&format!(
                    "Name of the {}, must be unique. Cannot be updated. More info: http://kubernetes.io/docs/user-guide/identifiers#names",
                    object_name
                ))
                .required()
                .with_validator(validate_rbac_name),
        )
        .with_attribute(
            "resource_version",
            SchemaAttribute::string()
                .with_description(&format!(
                    "An opaque value that represents the internal version of this {} that can be used by clients to determine when it has changed.",
                    object_name
                ))
                .computed(),
        )
        .with_attribute(
            "self_link",
            SchemaAttribute::string()
                .with_description(&format!("A URL representing this {}.", object_name))
                .computed(),
        )
        .with_attribute(
            "uid",
            SchemaAttribute::string()
                .with_description(&format!(
                    "The unique in time and space value for this {}. More info: http://kubernetes.io/docs/user-guide/identifiers#uids",
                    object_name
                ))
                .computed(),
        )
        .with_description(&format!("Standard {}'s metadata.", object_name));

    NestedBlock::list(block).with_min_items(1).with_max_items(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_required_and_server_fields_computed() {
        let metadata = metadata_block("clusterRole");
        let attrs = &metadata.block.attributes;

        assert!(attrs["name"].required);
        for computed in ["generation", "resource_version", "self_link", "uid"] {
            assert!(attrs[computed].is_computed_only(), "{} should be computed", computed);
        }
        assert!(attrs["labels"].optional);
        assert!(attrs["annotations"].optional);
    }

    #[test]
    fn test_exactly_one_block() {
        let metadata = metadata_block("clusterRole");

        assert_eq!(metadata.min_items, Some(1));
        assert_eq!(metadata.max_items, Some(1));
    }
}
