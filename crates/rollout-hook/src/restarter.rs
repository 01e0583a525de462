//! Event handling: one resolve-then-trigger pass per notification.

use std::sync::Arc;

use error_stack::Report;
use tracing::info;

use crate::k8s::resolver;
use crate::k8s::rollout;
use crate::k8s::types::Resolution;
use crate::k8s::types::SkipReason;
use crate::k8s::ClusterApi;
use crate::k8s::ClusterError;
use crate::k8s::DeploymentIdentity;
use crate::k8s::PodIdentity;

/// What handling one notification amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The owning deployment was patched.
    Restarted(DeploymentIdentity),
    /// The ownership chain does not lead to a deployment; nothing was done.
    Skipped(SkipReason),
}

/// Sequences ownership resolution and the rollout trigger.
///
/// Stateless across events: the shared cluster handle is the only thing
/// that outlives a single call to [`Restarter::handle`].
pub struct Restarter {
    cluster: Arc<dyn ClusterApi>,
}

impl Restarter {
    pub fn new(cluster: Arc<dyn ClusterApi>) -> Self {
        Self { cluster }
    }

    /// Handle one image-update notification for `pod`.
    ///
    /// A skipped resolution is a success with no action; every failure in
    /// either step propagates for the HTTP boundary to report. No retries.
    pub async fn handle(&self, pod: &PodIdentity) -> Result<Outcome, Report<ClusterError>> {
        info!(
            pod = %pod.name,
            namespace = %pod.namespace,
            "handling image update notification"
        );

        match resolver::resolve(self.cluster.as_ref(), pod).await? {
            Resolution::Restart(deployment) => {
                rollout::trigger(self.cluster.as_ref(), &deployment).await?;
                Ok(Outcome::Restarted(deployment))
            }
            Resolution::Skip(reason) => {
                info!(pod = %pod.name, namespace = %pod.namespace, %reason, "no restart needed");
                Ok(Outcome::Skipped(reason))
            }
        }
    }
}
