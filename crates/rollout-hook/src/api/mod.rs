//! HTTP surface: the webhook endpoint and the server around it.

pub mod errors;
pub mod handlers;
pub mod server;
pub mod types;

pub use server::WebhookServer;
