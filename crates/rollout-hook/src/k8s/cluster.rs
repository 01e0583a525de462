//! Cluster API access behind a narrow trait.
//!
//! The restarter only needs three verbs: fetch a pod's owner references,
//! fetch a ReplicaSet's owner references, and patch a deployment. Keeping
//! them behind a trait lets tests substitute an in-memory cluster.

use std::time::Duration;

use async_trait::async_trait;
use error_stack::Report;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::Patch;
use kube::api::PatchParams;
use kube::Api;
use kube::Client;
use tokio::time::timeout;

use crate::k8s::types::OwnerRef;
use crate::k8s::ClusterError;

/// The three cluster verbs the restarter depends on.
///
/// Read verbs return only `metadata.ownerReferences`, the single field the
/// resolution walk consults.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn pod_owner_refs(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<OwnerRef>, Report<ClusterError>>;

    async fn replica_set_owner_refs(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<OwnerRef>, Report<ClusterError>>;

    async fn patch_deployment(
        &self,
        namespace: &str,
        name: &str,
        patch: &serde_json::Value,
    ) -> Result<(), Report<ClusterError>>;
}

/// [`ClusterApi`] backed by a real Kubernetes API server.
///
/// The client handle is shared, read-only configuration; every call is
/// bounded by `call_timeout` and an elapsed deadline surfaces as
/// [`ClusterError::Transport`].
pub struct KubeCluster {
    client: Client,
    call_timeout: Duration,
}

impl KubeCluster {
    pub fn new(client: Client, call_timeout: Duration) -> Self {
        Self {
            client,
            call_timeout,
        }
    }
}

fn owner_refs(meta: &ObjectMeta) -> Vec<OwnerRef> {
    meta.owner_references
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|r| OwnerRef {
            kind: r.kind.clone(),
            name: r.name.clone(),
        })
        .collect()
}

fn fetch_error(
    kind: &'static str,
    namespace: &str,
    name: &str,
    err: kube::Error,
) -> Report<ClusterError> {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => Report::new(ClusterError::NotFound {
            kind,
            name: name.to_string(),
            namespace: namespace.to_string(),
        }),
        other => Report::new(ClusterError::Transport {
            message: format!("failed to fetch {kind} {namespace}/{name}: {other}"),
        })
        .attach_printable(format!("Kubernetes API error: {other:?}")),
    }
}

fn deadline_error(verb: &str, namespace: &str, name: &str) -> Report<ClusterError> {
    Report::new(ClusterError::Transport {
        message: format!("{verb} {namespace}/{name} exceeded the call deadline"),
    })
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn pod_owner_refs(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<OwnerRef>, Report<ClusterError>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod = timeout(self.call_timeout, api.get(name))
            .await
            .map_err(|_| deadline_error("fetching pod", namespace, name))?
            .map_err(|e| fetch_error("pod", namespace, name, e))?;
        Ok(owner_refs(&pod.metadata))
    }

    async fn replica_set_owner_refs(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<OwnerRef>, Report<ClusterError>> {
        let api: Api<ReplicaSet> = Api::namespaced(self.client.clone(), namespace);
        let rs = timeout(self.call_timeout, api.get(name))
            .await
            .map_err(|_| deadline_error("fetching ReplicaSet", namespace, name))?
            .map_err(|e| fetch_error("ReplicaSet", namespace, name, e))?;
        Ok(owner_refs(&rs.metadata))
    }

    async fn patch_deployment(
        &self,
        namespace: &str,
        name: &str,
        patch: &serde_json::Value,
    ) -> Result<(), Report<ClusterError>> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        timeout(
            self.call_timeout,
            api.patch(name, &PatchParams::default(), &Patch::Merge(patch)),
        )
        .await
        .map_err(|_| deadline_error("patching deployment", namespace, name))?
        .map_err(|e| {
            Report::new(ClusterError::Patch {
                name: name.to_string(),
                namespace: namespace.to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(())
    }
}
