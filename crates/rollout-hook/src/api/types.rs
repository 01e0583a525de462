use serde::Deserialize;
use serde::Serialize;

/// Inbound image-update notification, Diun webhook shape.
///
/// Only the pod identity is consumed; any other fields the notifier sends
/// (image, digest, ...) are ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub metadata: WebhookMetadata,
}

#[derive(Debug, Deserialize)]
pub struct WebhookMetadata {
    #[serde(default)]
    pub pod_name: String,
    #[serde(default)]
    pub pod_namespace: String,
}

/// Outbound result reported to the notifier.
///
/// A skipped restart is still `"ok"`: nothing needed doing.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

impl WebhookResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
