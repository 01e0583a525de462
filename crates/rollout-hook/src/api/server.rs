use std::sync::Arc;

use error_stack::Report;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::Tracing;
use poem::post;
use poem::Endpoint;
use poem::EndpointExt;
use poem::Route;
use poem::Server;
use tokio::sync::oneshot;
use tracing::error;
use tracing::info;

use super::errors::ApiError;
use super::handlers::healthz;
use super::handlers::webhook;
use crate::restarter::Restarter;

fn routes(restarter: Arc<Restarter>) -> impl Endpoint {
    Route::new()
        .at("/webhook", post(webhook))
        .at("/healthz", get(healthz))
        .data(restarter)
        .with(Tracing)
}

/// HTTP server for receiving image-update notifications
pub struct WebhookServer {
    restarter: Arc<Restarter>,
    listen_addr: String,
}

impl WebhookServer {
    pub fn new(restarter: Arc<Restarter>, listen_addr: String) -> Self {
        Self {
            restarter,
            listen_addr,
        }
    }

    /// Run the server until it fails or shutdown is requested.
    ///
    /// # Errors
    ///
    /// - [`ApiError::ServerError`] if the server fails to bind or serve
    pub async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<(), Report<ApiError>> {
        info!("Starting webhook server on {}", self.listen_addr);

        let app = routes(self.restarter);
        let listener = TcpListener::bind(&self.listen_addr);
        let server = Server::new(listener);

        tokio::select! {
            result = server.run(app) => {
                match result {
                    Ok(()) => {
                        info!("webhook server stopped normally");
                        Ok(())
                    }
                    Err(e) => {
                        error!("webhook server failed: {e}");
                        Err(Report::new(ApiError::ServerError {
                            message: format!("server failed: {e}"),
                        }))
                    }
                }
            }
            _ = &mut shutdown_rx => {
                info!("webhook server shutdown requested");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use serde_json::json;

    use super::*;
    use crate::k8s::cluster::fake::owner;
    use crate::k8s::cluster::fake::FakeCluster;

    fn client_for(cluster: Arc<FakeCluster>) -> TestClient<impl Endpoint> {
        TestClient::new(routes(Arc::new(Restarter::new(cluster))))
    }

    fn restartable_cluster() -> FakeCluster {
        FakeCluster::default()
            .with_pod("ns-a", "web-7d9f8-abcde", vec![owner("ReplicaSet", "rs-1")])
            .with_replica_set("ns-a", "rs-1", vec![owner("Deployment", "dep-1")])
    }

    fn notification(pod_name: &str, pod_namespace: &str) -> serde_json::Value {
        json!({
            "metadata": {
                "pod_name": pod_name,
                "pod_namespace": pod_namespace,
            }
        })
    }

    #[tokio::test]
    async fn webhook_restarts_and_reports_ok() {
        let cluster = Arc::new(restartable_cluster());
        let client = client_for(cluster.clone());

        let resp = client
            .post("/webhook")
            .body_json(&notification("web-7d9f8-abcde", "ns-a"))
            .send()
            .await;

        resp.assert_status_is_ok();
        resp.assert_json(json!({"status": "ok"})).await;
        assert_eq!(cluster.patch_count(), 1);
    }

    #[tokio::test]
    async fn skipped_pod_still_reports_ok() {
        let cluster =
            Arc::new(FakeCluster::default().with_pod("default", "standalone", vec![]));
        let client = client_for(cluster.clone());

        let resp = client
            .post("/webhook")
            .body_json(&notification("standalone", "default"))
            .send()
            .await;

        resp.assert_status_is_ok();
        resp.assert_json(json!({"status": "ok"})).await;
        assert_eq!(cluster.patch_count(), 0);
    }

    #[tokio::test]
    async fn empty_pod_name_is_rejected_before_any_cluster_call() {
        // An unreachable cluster would turn any API call into a 500, so a
        // 400 here proves validation is first.
        let cluster = Arc::new(FakeCluster::unreachable());
        let client = client_for(cluster.clone());

        let resp = client
            .post("/webhook")
            .body_json(&notification("", "default"))
            .send()
            .await;

        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(cluster.patch_count(), 0);
    }

    #[tokio::test]
    async fn missing_namespace_is_rejected_before_any_cluster_call() {
        let cluster = Arc::new(FakeCluster::unreachable());
        let client = client_for(cluster.clone());

        let resp = client
            .post("/webhook")
            .body_json(&json!({"metadata": {"pod_name": "web-1"}}))
            .send()
            .await;

        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(cluster.patch_count(), 0);
    }

    #[tokio::test]
    async fn payload_without_metadata_is_a_client_error() {
        let cluster = Arc::new(FakeCluster::unreachable());
        let client = client_for(cluster.clone());

        let resp = client
            .post("/webhook")
            .body_json(&json!({"image": "web:latest"}))
            .send()
            .await;

        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(cluster.patch_count(), 0);
    }

    #[tokio::test]
    async fn missing_pod_reports_server_failure() {
        let cluster = Arc::new(FakeCluster::default());
        let client = client_for(cluster.clone());

        let resp = client
            .post("/webhook")
            .body_json(&notification("ghost", "default"))
            .send()
            .await;

        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cluster.patch_count(), 0);
    }

    #[tokio::test]
    async fn rejected_patch_reports_server_failure() {
        let cluster = Arc::new(restartable_cluster().failing_patches());
        let client = client_for(cluster.clone());

        let resp = client
            .post("/webhook")
            .body_json(&notification("web-7d9f8-abcde", "ns-a"))
            .send()
            .await;

        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cluster.patch_count(), 0);
    }

    #[tokio::test]
    async fn healthz_answers_ok() {
        let client = client_for(Arc::new(FakeCluster::default()));

        let resp = client.get("/healthz").send().await;

        resp.assert_status_is_ok();
        resp.assert_text("OK").await;
    }

    #[tokio::test]
    async fn server_graceful_shutdown() {
        let cluster = Arc::new(FakeCluster::default());
        let server = WebhookServer::new(
            Arc::new(Restarter::new(cluster)),
            "127.0.0.1:0".to_string(),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        shutdown_tx.send(()).expect("should send shutdown signal");

        server
            .run(shutdown_rx)
            .await
            .expect("server should stop cleanly on shutdown");
    }
}
