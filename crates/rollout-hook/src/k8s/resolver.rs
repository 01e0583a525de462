//! Ownership resolution: walk Pod → ReplicaSet → Deployment.
//!
//! The walk is a fixed depth-2 traversal, not a general graph search. At
//! each hop the controlling owner's kind is validated, so a pod run by a
//! Job, a DaemonSet or a custom controller skips cleanly instead of
//! restarting the wrong resource type.

use error_stack::Report;
use tracing::info;

use crate::k8s::types::controlling_owner;
use crate::k8s::types::Resolution;
use crate::k8s::types::SkipReason;
use crate::k8s::ClusterApi;
use crate::k8s::ClusterError;
use crate::k8s::DeploymentIdentity;
use crate::k8s::PodIdentity;

const REPLICA_SET_KIND: &str = "ReplicaSet";
const DEPLOYMENT_KIND: &str = "Deployment";

/// Resolve the deployment owning `pod`.
///
/// Performs no mutation. Fetch failures (missing object, transport, auth,
/// deadline) are hard errors; an ownership chain that does not terminate in
/// a deployment is a [`Resolution::Skip`], reported as success upstream.
pub async fn resolve(
    cluster: &dyn ClusterApi,
    pod: &PodIdentity,
) -> Result<Resolution, Report<ClusterError>> {
    let pod_owners = cluster.pod_owner_refs(&pod.namespace, &pod.name).await?;

    let replica_set = match controlling_owner(&pod_owners) {
        Some(owner) if owner.kind == REPLICA_SET_KIND => owner.name.clone(),
        Some(owner) => {
            info!(
                pod = %pod.name,
                namespace = %pod.namespace,
                owner_kind = %owner.kind,
                "pod is controlled by something other than a ReplicaSet, skipping"
            );
            return Ok(Resolution::Skip(SkipReason::PodNotOwnedByReplicaSet));
        }
        None => {
            info!(
                pod = %pod.name,
                namespace = %pod.namespace,
                "pod has no owner references, skipping"
            );
            return Ok(Resolution::Skip(SkipReason::PodNotOwnedByReplicaSet));
        }
    };

    let rs_owners = cluster
        .replica_set_owner_refs(&pod.namespace, &replica_set)
        .await?;

    match controlling_owner(&rs_owners) {
        Some(owner) if owner.kind == DEPLOYMENT_KIND => Ok(Resolution::Restart(
            DeploymentIdentity {
                name: owner.name.clone(),
                namespace: pod.namespace.clone(),
            },
        )),
        Some(owner) => {
            info!(
                replica_set = %replica_set,
                namespace = %pod.namespace,
                owner_kind = %owner.kind,
                "ReplicaSet is controlled by something other than a Deployment, skipping"
            );
            Ok(Resolution::Skip(SkipReason::ReplicaSetNotOwnedByDeployment))
        }
        None => {
            info!(
                replica_set = %replica_set,
                namespace = %pod.namespace,
                "ReplicaSet has no owner references, skipping"
            );
            Ok(Resolution::Skip(SkipReason::ReplicaSetNotOwnedByDeployment))
        }
    }
}
