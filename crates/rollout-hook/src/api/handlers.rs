use std::sync::Arc;

use poem::handler;
use poem::http::StatusCode;
use poem::web::Data;
use poem::web::Json;
use tracing::error;
use tracing::warn;

use super::types::WebhookPayload;
use super::types::WebhookResponse;
use crate::k8s::PodIdentity;
use crate::restarter::Restarter;

/// Receive an image-update notification and restart the owning deployment.
///
/// Identity validation happens here, before any cluster call; resolver and
/// trigger failures are reported as 500 with the error message.
#[handler]
pub async fn webhook(
    Json(payload): Json<WebhookPayload>,
    Data(restarter): Data<&Arc<Restarter>>,
) -> poem::Result<Json<WebhookResponse>> {
    let metadata = payload.metadata;
    if metadata.pod_name.is_empty() || metadata.pod_namespace.is_empty() {
        warn!("rejecting notification without pod_name or pod_namespace");
        return Err(poem::Error::from_string(
            "missing pod_name or pod_namespace in metadata",
            StatusCode::BAD_REQUEST,
        ));
    }

    let pod = PodIdentity {
        name: metadata.pod_name,
        namespace: metadata.pod_namespace,
    };

    match restarter.handle(&pod).await {
        Ok(_) => Ok(Json(WebhookResponse::ok())),
        Err(report) => {
            error!(
                pod = %pod.name,
                namespace = %pod.namespace,
                "failed to restart owning deployment: {report:?}"
            );
            Err(poem::Error::from_string(
                report.to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Liveness endpoint.
#[handler]
pub async fn healthz() -> &'static str {
    "OK"
}
