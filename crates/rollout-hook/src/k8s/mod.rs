//! Kubernetes integration module.
//!
//! This module resolves which Deployment owns a notified pod and triggers a
//! rolling restart of it.
//!
//! The main components are:
//! - [`ClusterApi`]: the three cluster verbs the restarter depends on
//! - [`resolver::resolve`]: the Pod → ReplicaSet → Deployment owner walk
//! - [`rollout::trigger`]: the restartedAt annotation patch

use core::error::Error;

pub mod cluster;
pub mod kube_client;
pub mod resolver;
pub mod rollout;
pub mod types;

pub use cluster::ClusterApi;
pub use types::DeploymentIdentity;
pub use types::PodIdentity;

/// Errors that can occur while talking to the cluster API.
#[derive(Debug, derive_more::Display)]
pub enum ClusterError {
    #[display("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        name: String,
        namespace: String,
    },
    #[display("cluster API transport failure: {message}")]
    Transport { message: String },
    #[display("failed to patch deployment {namespace}/{name}: {message}")]
    Patch {
        name: String,
        namespace: String,
        message: String,
    },
}

impl Error for ClusterError {}
