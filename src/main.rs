// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kubernetes_rbac_provider::config::ProviderConfig;
use kubernetes_rbac_provider::provider::Provider;

/// Terraform provider for Kubernetes RBAC cluster roles
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-kubernetes-rbac")]
struct Args {
    /// Enable debug logging
    #[arg(long, env = "TF_LOG_PROVIDER_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Stdout carries the protocol, so logs go to stderr
    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Kubernetes RBAC provider");

    let config = ProviderConfig::from_env()?;
    info!(
        "Configuration loaded: config_path={:?}, config_context={:?}, load_config_file={}",
        config.config_path, config.config_context, config.load_config_file
    );
    let provider = Provider::new(config);

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        let input = match lines.next_line().await {
            Ok(Some(input)) => input,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };
        if input.trim().is_empty() {
            continue;
        }

        let response = provider.handle_request(&input).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("Kubernetes RBAC provider shutting down");
    Ok(())
}
