// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Value validators for Kubernetes object metadata

use super::Diagnostic;
use crate::constants::INTERNAL_KEY_DOMAIN;
use serde_json::Value;
use url::Url;

const DNS1123_SUBDOMAIN_MAX_LEN: usize = 253;
const QUALIFIED_NAME_MAX_LEN: usize = 63;
const LABEL_VALUE_MAX_LEN: usize = 63;

/// Whether a label or annotation key belongs to the `kubernetes.io` domain
pub fn is_internal_key(key: &str) -> bool {
    Url::parse(&format!("k8s://{}", key))
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| {
            host == INTERNAL_KEY_DOMAIN
                || host
                    .strip_suffix(INTERNAL_KEY_DOMAIN)
                    .is_some_and(|sub| sub.ends_with('.'))
        })
}

/// RBAC object names only need to be valid path segments
pub fn validate_rbac_name(value: &Value, path: &[String]) -> Vec<Diagnostic> {
    let Some(name) = value.as_str() else {
        return Vec::new();
    };

    let problem = if name.is_empty() {
        Some("must not be empty".to_string())
    } else if name == "." || name == ".." {
        Some(format!("may not be {:?}", name))
    } else if let Some(c) = name.chars().find(|c| *c == '/' || *c == '%') {
        Some(format!("may not contain {:?}", c))
    } else {
        None
    };

    problem
        .map(|p| vec![invalid(path, &format!("{:?} {}", name, p))])
        .unwrap_or_default()
}

pub fn validate_labels(value: &Value, path: &[String]) -> Vec<Diagnostic> {
    let Some(labels) = value.as_object() else {
        return Vec::new();
    };

    let mut diags = Vec::new();
    for (key, label_value) in labels {
        if let Err(e) = check_qualified_name(key) {
            diags.push(invalid(path, &format!("label key {:?} {}", key, e)));
        }
        if let Some(v) = label_value.as_str() {
            if let Err(e) = check_label_value(v) {
                diags.push(invalid(path, &format!("label value {:?} {}", v, e)));
            }
        }
    }
    diags
}

pub fn validate_annotations(value: &Value, path: &[String]) -> Vec<Diagnostic> {
    let Some(annotations) = value.as_object() else {
        return Vec::new();
    };

    let mut diags = Vec::new();
    for key in annotations.keys() {
        if is_internal_key(key) {
            diags.push(invalid(
                path,
                &format!("{:?} is internal Kubernetes annotation", key),
            ));
        } else if let Err(e) = check_qualified_name(&key.to_ascii_lowercase()) {
            diags.push(invalid(path, &format!("annotation key {:?} {}", key, e)));
        }
    }
    diags
}

fn invalid(path: &[String], detail: &str) -> Diagnostic {
    Diagnostic::error("Invalid attribute value")
        .with_detail(&format!("{}: {}", path.join("."), detail))
        .with_attribute(path.to_vec())
}

/// `[prefix/]name` where prefix is a DNS-1123 subdomain
fn check_qualified_name(key: &str) -> Result<(), String> {
    let name = match key.split_once('/') {
        Some((prefix, name)) => {
            check_dns1123_subdomain(prefix).map_err(|e| format!("prefix {}", e))?;
            name
        }
        None => key,
    };

    if name.is_empty() {
        return Err("name part must not be empty".to_string());
    }
    if name.len() > QUALIFIED_NAME_MAX_LEN {
        return Err(format!(
            "name part must be no more than {} characters",
            QUALIFIED_NAME_MAX_LEN
        ));
    }
    check_alphanumeric_edges(name)
}

fn check_label_value(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    if value.len() > LABEL_VALUE_MAX_LEN {
        return Err(format!(
            "must be no more than {} characters",
            LABEL_VALUE_MAX_LEN
        ));
    }
    check_alphanumeric_edges(value)
}

/// Alphanumerics, `-`, `_` or `.`, starting and ending with an alphanumeric
fn check_alphanumeric_edges(s: &str) -> Result<(), String> {
    let valid_inner = s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    let valid_edges = s.starts_with(|c: char| c.is_ascii_alphanumeric())
        && s.ends_with(|c: char| c.is_ascii_alphanumeric());

    if valid_inner && valid_edges {
        Ok(())
    } else {
        Err("must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character".to_string())
    }
}

fn check_dns1123_subdomain(s: &str) -> Result<(), String> {
    if s.is_empty() || s.len() > DNS1123_SUBDOMAIN_MAX_LEN {
        return Err(format!(
            "must be between 1 and {} characters",
            DNS1123_SUBDOMAIN_MAX_LEN
        ));
    }

    let valid = s.split('.').all(|label| {
        !label.is_empty()
            && label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    });

    if valid {
        Ok(())
    } else {
        Err("must be a lowercase RFC 1123 subdomain".to_string())
    }
}
