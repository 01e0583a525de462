use std::path::PathBuf;

use error_stack::Report;
use error_stack::ResultExt;
use kube::config::KubeConfigOptions;
use kube::config::Kubeconfig;
use kube::Client;
use kube::Config;

use crate::k8s::ClusterError;

/// Build the cluster client once at startup.
///
/// With an explicit kubeconfig path the client is built from that file;
/// otherwise kube's default resolution applies (in-cluster service account,
/// falling back to `~/.kube/config`).
pub async fn init_client(kubeconfig: Option<PathBuf>) -> Result<Client, Report<ClusterError>> {
    let client = match kubeconfig {
        Some(path) => {
            let kubeconfig =
                Kubeconfig::read_from(&path).change_context(ClusterError::Transport {
                    message: format!("failed to read kubeconfig file: {}", path.display()),
                })?;

            let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .change_context(ClusterError::Transport {
                    message: format!("invalid kubeconfig file: {}", path.display()),
                })?;

            Client::try_from(config).change_context(ClusterError::Transport {
                message: "failed to create Kubernetes client from kubeconfig".to_string(),
            })?
        }
        None => Client::try_default()
            .await
            .change_context(ClusterError::Transport {
                message: "failed to create Kubernetes client from default config".to_string(),
            })?,
    };
    Ok(client)
}
