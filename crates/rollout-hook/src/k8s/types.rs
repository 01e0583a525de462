//! Identity and result types shared by the resolver and the rollout trigger.

/// Identifies the pod named by an inbound notification.
///
/// Built once per event from the webhook payload; both fields are
/// guaranteed non-empty by the HTTP layer before resolution starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodIdentity {
    pub name: String,
    pub namespace: String,
}

/// The deployment a successful two-hop resolution terminates in.
///
/// The namespace is always inherited from the originating [`PodIdentity`];
/// owner references are scoped to the namespace of the owned object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentIdentity {
    pub name: String,
    pub namespace: String,
}

/// Read-only projection of a `metadata.ownerReferences` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRef {
    pub kind: String,
    pub name: String,
}

/// Controller-following policy: the first owner reference wins.
///
/// Kubernetes allows multiple owner references, but in practice a resource
/// has exactly one controlling owner and it is listed first. Returning an
/// `Option` keeps the absent-owner case an explicit branch for callers.
pub fn controlling_owner(refs: &[OwnerRef]) -> Option<&OwnerRef> {
    refs.first()
}

/// Why a resolution legitimately ended without a deployment to restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SkipReason {
    #[display("pod is not controlled by a ReplicaSet")]
    PodNotOwnedByReplicaSet,
    #[display("ReplicaSet is not controlled by a Deployment")]
    ReplicaSetNotOwnedByDeployment,
}

/// Outcome of walking the ownership chain for one pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The chain terminated in a deployment; restart it.
    Restart(DeploymentIdentity),
    /// The chain does not lead to a deployment. Not an error: standalone
    /// pods, Jobs and DaemonSets all land here.
    Skip(SkipReason),
}
