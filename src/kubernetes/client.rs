// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation from provider configuration

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config as KConfig,
};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client for the configured cluster
#[instrument(skip(config))]
pub async fn create_client(config: &ProviderConfig) -> Result<Client> {
    let client_config = match (&config.config_path, config.load_config_file) {
        (Some(path), true) => {
            let kubeconfig = read_kubeconfig(path).await?;
            config_from_kubeconfig(&kubeconfig, config.config_context.as_deref()).await?
        }
        (_, true) => infer_config(config.config_context.as_deref()).await?,
        (_, false) => {
            info!("Kubeconfig loading disabled, using in-cluster configuration");
            KConfig::incluster().map_err(|e| {
                ProviderError::KubeconfigError(format!("Failed to load in-cluster config: {}", e))
            })?
        }
    };

    debug!("Using cluster {}", client_config.cluster_url);

    Client::try_from(client_config)
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to create client: {}", e)))
}

async fn read_kubeconfig(path: &Path) -> Result<String> {
    info!("Loading kubeconfig from {}", path.display());

    tokio::fs::read_to_string(path).await.map_err(|e| {
        ProviderError::KubeconfigError(format!(
            "Failed to read kubeconfig {}: {}",
            path.display(),
            e
        ))
    })
}

/// Parse a kubeconfig document and select the requested context
async fn config_from_kubeconfig(kubeconfig: &str, context: Option<&str>) -> Result<KConfig> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    KConfig::from_custom_kubeconfig(kubeconfig_parsed, &context_options(context))
        .await
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to create config: {}", e)))
}

/// Default kubeconfig discovery, honouring an explicit context
async fn infer_config(context: Option<&str>) -> Result<KConfig> {
    match context {
        Some(_) => KConfig::from_kubeconfig(&context_options(context))
            .await
            .map_err(|e| {
                ProviderError::KubeconfigError(format!("Failed to load kubeconfig: {}", e))
            }),
        None => KConfig::infer()
            .await
            .map_err(|e| ProviderError::KubeconfigError(format!("Failed to infer config: {}", e))),
    }
}

fn context_options(context: Option<&str>) -> KubeConfigOptions {
    KubeConfigOptions {
        context: context.map(String::from),
        ..Default::default()
    }
}
