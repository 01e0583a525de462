use std::path::PathBuf;

use clap::Parser;

/// Webhook receiver that rolling-restarts the Deployment owning a notified pod
#[derive(Parser, Debug)]
#[command(about, version)]
pub struct Cli {
    #[arg(
        long,
        env = "LISTEN_ADDR",
        default_value = "0.0.0.0:8080",
        help = "HTTP listen address for the webhook server"
    )]
    pub listen_addr: String,

    #[arg(
        long,
        env = "KUBECONFIG",
        value_hint = clap::ValueHint::FilePath,
        help = "Path to kubeconfig file (defaults to in-cluster config or ~/.kube/config)"
    )]
    pub kubeconfig: Option<PathBuf>,

    #[arg(
        long,
        default_value = "10",
        help = "Deadline in seconds for each cluster API call"
    )]
    pub cluster_timeout_secs: u64,
}
