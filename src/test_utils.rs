// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for faking the Kubernetes RBAC API.

use http::{Method, Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

const CLUSTER_ROLES_PATH: &str = "/apis/rbac.authorization.k8s.io/v1/clusterroles";

#[derive(Default)]
struct ServerState {
    objects: BTreeMap<String, Value>,
    resource_version: u64,
    failures: HashMap<String, (u16, String)>,
    requests: Vec<(String, String)>,
}

/// An in-memory stand-in for the ClusterRole REST endpoints.
///
/// Objects get a fresh `resourceVersion` on every write, and replace requests
/// carrying a stale `resourceVersion` are rejected with 409 like the real
/// API server does.
#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<ServerState>>,
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request with the given method
    pub fn fail_on(self, method: &str, status: u16, reason: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(method.to_string(), (status, reason.to_string()));
        self
    }

    /// Stop failing requests with the given method
    pub fn recover(&self, method: &str) {
        self.state.lock().unwrap().failures.remove(method);
    }

    /// Seed an object directly, bypassing the API
    pub fn insert(&self, object: String) {
        let object: Value = serde_json::from_str(&object).unwrap();
        let mut state = self.state.lock().unwrap();
        let name = object["metadata"]["name"].as_str().unwrap().to_string();
        let stored = state.store(&name, object, None);
        state.objects.insert(name, stored);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.state.lock().unwrap().objects.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.lock().unwrap().objects.contains_key(name)
    }

    /// `(method, path)` of every request seen so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Build a kube Client talking to this fake
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn handle(&self, method: &Method, path: &str, body: &[u8]) -> (u16, String) {
        let mut state = self.state.lock().unwrap();
        state
            .requests
            .push((method.to_string(), path.to_string()));

        if let Some((status, reason)) = state.failures.get(method.as_str()) {
            return (*status, status_json(*status, reason, "injected failure"));
        }

        let Some(rest) = path.strip_prefix(CLUSTER_ROLES_PATH) else {
            return (404, not_found_json("path", path));
        };
        let name = rest.trim_start_matches('/');

        match (method.as_str(), name.is_empty()) {
            ("GET", false) => match state.objects.get(name) {
                Some(object) => (200, object.to_string()),
                None => (404, not_found_json("clusterroles.rbac.authorization.k8s.io", name)),
            },
            ("POST", true) => {
                let Ok(object) = serde_json::from_slice::<Value>(body) else {
                    return (400, status_json(400, "BadRequest", "invalid body"));
                };
                let name = object["metadata"]["name"].as_str().unwrap_or_default().to_string();
                if state.objects.contains_key(&name) {
                    return (
                        409,
                        status_json(409, "AlreadyExists", &format!("clusterroles {:?} already exists", name)),
                    );
                }
                if let Some(message) = invalid_rules(&object) {
                    return (422, status_json(422, "Invalid", &message));
                }
                let stored = state.store(&name, object, None);
                state.objects.insert(name, stored.clone());
                (201, stored.to_string())
            }
            ("PUT", false) => {
                let Ok(object) = serde_json::from_slice::<Value>(body) else {
                    return (400, status_json(400, "BadRequest", "invalid body"));
                };
                let Some(existing) = state.objects.get(name).cloned() else {
                    return (404, not_found_json("clusterroles.rbac.authorization.k8s.io", name));
                };
                let sent_version = object["metadata"]["resourceVersion"].as_str().unwrap_or_default();
                let current_version = existing["metadata"]["resourceVersion"].as_str().unwrap_or_default();
                if !sent_version.is_empty() && sent_version != current_version {
                    return (
                        409,
                        status_json(409, "Conflict", "the object has been modified; please apply your changes to the latest version and try again"),
                    );
                }
                if let Some(message) = invalid_rules(&object) {
                    return (422, status_json(422, "Invalid", &message));
                }
                let stored = state.store(name, object, Some(&existing));
                state.objects.insert(name.to_string(), stored.clone());
                (200, stored.to_string())
            }
            ("DELETE", false) => match state.objects.remove(name) {
                Some(object) => (200, object.to_string()),
                None => (404, not_found_json("clusterroles.rbac.authorization.k8s.io", name)),
            },
            _ => (405, status_json(405, "MethodNotAllowed", "method not allowed")),
        }
    }
}

impl ServerState {
    /// Stamp server-owned metadata onto an object about to be stored
    fn store(&mut self, name: &str, mut object: Value, existing: Option<&Value>) -> Value {
        self.resource_version += 1;
        let generation = existing
            .and_then(|e| e["metadata"]["generation"].as_i64())
            .unwrap_or(0)
            + 1;
        let uid = existing
            .and_then(|e| e["metadata"]["uid"].as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("uid-{}", name));

        object["apiVersion"] = Value::from("rbac.authorization.k8s.io/v1");
        object["kind"] = Value::from("ClusterRole");
        let metadata = &mut object["metadata"];
        metadata["resourceVersion"] = Value::from(self.resource_version.to_string());
        metadata["generation"] = Value::from(generation);
        metadata["uid"] = Value::from(uid);
        metadata["selfLink"] = Value::from(format!("{}/{}", CLUSTER_ROLES_PATH, name));
        object
    }
}

/// Rules may target resources or non-resource URLs, not both
fn invalid_rules(object: &Value) -> Option<String> {
    let rules = object["rules"].as_array()?;
    rules.iter().enumerate().find_map(|(index, rule)| {
        let has = |field: &str| rule[field].as_array().is_some_and(|v| !v.is_empty());
        (has("resources") && has("nonResourceURLs")).then(|| {
            format!(
                "rules[{}]: Invalid value: nonResourceURLs and resources are mutually exclusive",
                index
            )
        })
    })
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let server = self.clone();
        let (parts, body) = req.into_parts();

        Box::pin(async move {
            let body = body.collect().await?.to_bytes();
            let (status, payload) = server.handle(&parts.method, parts.uri.path(), &body);

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(payload.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a ClusterRole JSON object with a single rule on pods
pub fn cluster_role_json(name: &str, verbs: &[&str]) -> String {
    serde_json::json!({
        "apiVersion": "rbac.authorization.k8s.io/v1",
        "kind": "ClusterRole",
        "metadata": {
            "name": name,
        },
        "rules": [{
            "apiGroups": [""],
            "resources": ["pods"],
            "verbs": verbs,
        }]
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}
