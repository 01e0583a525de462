mod api;
mod config;
mod k8s;
mod logging;
mod restarter;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::oneshot;

use crate::api::WebhookServer;
use crate::config::Cli;
use crate::k8s::cluster::KubeCluster;
use crate::restarter::Restarter;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    tracing::info!(
        "Starting rollout-hook {} on {}",
        env!("CARGO_PKG_VERSION"),
        cli.listen_addr
    );

    let client = k8s::kube_client::init_client(cli.kubeconfig)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize Kubernetes client: {e:?}"))?;
    let cluster = Arc::new(KubeCluster::new(
        client,
        Duration::from_secs(cli.cluster_timeout_secs),
    ));
    let restarter = Arc::new(Restarter::new(cluster));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    WebhookServer::new(restarter, cli.listen_addr)
        .run(shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!("Webhook server failed: {e:?}"))?;

    tracing::info!("rollout-hook stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::signal;
    use tokio::signal::unix::SignalKind;

    let mut sigterm =
        signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl-C, shutting down");
        }
        _ = sigterm.recv() => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}
