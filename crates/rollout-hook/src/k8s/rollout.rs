//! Rollout trigger: force a rolling restart by touching the pod template.
//!
//! Setting `kubectl.kubernetes.io/restartedAt` on the deployment's pod
//! template changes the template hash, which makes the deployment
//! controller roll all pods. The same mechanism `kubectl rollout restart`
//! uses.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use error_stack::Report;
use tracing::info;

use crate::k8s::ClusterApi;
use crate::k8s::ClusterError;
use crate::k8s::DeploymentIdentity;

pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// The pod-template mutation applied to a deployment.
///
/// Built fresh per trigger. The timestamp is RFC 3339 UTC with microsecond
/// precision, so consecutive triggers compare lexicographically in apply
/// order.
#[derive(Debug, Clone)]
pub struct RestartPatch {
    restarted_at: String,
}

impl RestartPatch {
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            restarted_at: instant.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    pub fn restarted_at(&self) -> &str {
        &self.restarted_at
    }

    /// The merge-patch document sent to the cluster API.
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::json!({
            "spec": {
                "template": {
                    "metadata": {
                        "annotations": {
                            RESTARTED_AT_ANNOTATION: self.restarted_at,
                        }
                    }
                }
            }
        })
    }
}

/// Apply a single restart patch to `deployment`.
///
/// One mutation per call, never retried; a rejected patch surfaces as
/// [`ClusterError::Patch`] for the caller to report.
pub async fn trigger(
    cluster: &dyn ClusterApi,
    deployment: &DeploymentIdentity,
) -> Result<(), Report<ClusterError>> {
    let patch = RestartPatch::now();
    cluster
        .patch_deployment(&deployment.namespace, &deployment.name, &patch.to_document())
        .await?;
    info!(
        deployment = %deployment.name,
        namespace = %deployment.namespace,
        restarted_at = %patch.restarted_at,
        "deployment restart triggered"
    );
    Ok(())
}
