// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Step-based acceptance harness running the provider against a fake API server.
//!
//! Each `apply` mirrors one Terraform test step: validate the configuration,
//! refresh the prior state, plan, apply, then refresh from the ID alone and
//! require the result to match what apply stored.

use crate::provider::Provider;
use crate::state::{ResourceState, ID_ATTRIBUTE};
use crate::test_utils::FakeApiServer;
use kube::Client;
use serde_json::Value;
use std::collections::BTreeMap;

pub struct AccTest {
    server: FakeApiServer,
    provider: Provider,
    type_name: &'static str,
    state: Option<ResourceState>,
}

impl AccTest {
    pub fn new(type_name: &'static str) -> Self {
        let server = FakeApiServer::new();
        let provider = Provider::with_client(server.clone().into_client());
        Self {
            server,
            provider,
            type_name,
            state: None,
        }
    }

    pub fn server(&self) -> &FakeApiServer {
        &self.server
    }

    /// Client against the same fake, for checks on live objects
    pub fn client(&self) -> Client {
        self.server.clone().into_client()
    }

    pub fn state(&self) -> &ResourceState {
        self.state.as_ref().expect("no resource in state")
    }

    /// Run one configuration step
    pub async fn apply(&mut self, config: Value) -> &ResourceState {
        let diags = self.provider.validate_resource_config(self.type_name, &config);
        assert!(diags.is_empty(), "configuration is invalid: {:?}", diags);

        let prior = match self.state.take() {
            Some(current) => self
                .provider
                .read_resource(self.type_name, &current)
                .await
                .expect("refresh failed"),
            None => None,
        };

        let proposed = ResourceState::from_value(&config).expect("configuration must be an object");
        let change = self
            .provider
            .plan_resource_change(self.type_name, prior.as_ref(), &proposed)
            .expect("plan failed");

        let new_state = if change.requires_replace.is_empty() {
            self.provider
                .apply_resource_change(self.type_name, prior.as_ref(), Some(&change.planned))
                .await
                .expect("apply failed")
        } else {
            self.provider
                .apply_resource_change(self.type_name, prior.as_ref(), None)
                .await
                .expect("destroy before replace failed");
            let fresh = self
                .provider
                .plan_resource_change(self.type_name, None, &proposed)
                .expect("plan for replacement failed");
            self.provider
                .apply_resource_change(self.type_name, None, Some(&fresh.planned))
                .await
                .expect("create for replacement failed")
        };
        let new_state = new_state.expect("apply returned no state");

        self.check_id_refresh(&new_state).await;
        self.state.insert(new_state)
    }

    /// Reading back from the ID alone must reproduce the applied state
    async fn check_id_refresh(&self, applied: &ResourceState) {
        let id = applied.id().expect("applied state has no id");
        let mut bare = ResourceState::new();
        bare.set(ID_ATTRIBUTE, Value::from(id.clone()));

        let refreshed = self
            .provider
            .read_resource(self.type_name, &bare)
            .await
            .expect("refresh by id failed")
            .unwrap_or_else(|| panic!("{} vanished right after apply", id));

        assert_eq!(
            refreshed.flatmap(),
            applied.flatmap(),
            "refresh by id does not match applied state"
        );
    }

    pub fn check_attr(&self, key: &str, expected: &str) {
        let flat = self.state().flatmap();
        match flat.get(key) {
            Some(actual) => assert_eq!(actual, expected, "attribute {}", key),
            None => panic!("attribute {} not set; state has {:?}", key, flat.keys()),
        }
    }

    pub fn check_no_attr(&self, key: &str) {
        assert!(
            !self.state().flatmap().contains_key(key),
            "attribute {} unexpectedly set",
            key
        );
    }

    /// Import by ID and compare with the current state, skipping ignored prefixes
    pub async fn import_verify(&self, ignore: &[&str]) {
        let current = self.state();
        let id = current.id().expect("state has no id");

        let imported = self
            .provider
            .import_resource_state(self.type_name, &id)
            .await
            .expect("import failed");

        let filter = |flat: BTreeMap<String, String>| -> BTreeMap<String, String> {
            flat.into_iter()
                .filter(|(key, _)| !ignore.iter().any(|prefix| key.starts_with(prefix)))
                .collect()
        };
        assert_eq!(
            filter(imported.flatmap()),
            filter(current.flatmap()),
            "imported state differs"
        );
    }

    /// Destroy the resource, returning its last state for destroy checks
    pub async fn destroy(&mut self) -> ResourceState {
        let current = self.state.take().expect("nothing to destroy");
        let gone = self
            .provider
            .apply_resource_change(self.type_name, Some(&current), None)
            .await
            .expect("destroy failed");
        assert!(gone.is_none(), "destroy returned a state");
        current
    }
}
