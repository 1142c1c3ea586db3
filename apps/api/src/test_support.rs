//! Helpers shared by unit tests: a throwaway upstream server and client
//! settings pointing at it.

use std::time::Duration;

use axum::Router;

use crate::config::{GigaChatSettings, HhSettings};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test upstream");
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub fn hh_settings(base: &str) -> HhSettings {
    HhSettings {
        api_base: base.to_string(),
        oauth_base: base.to_string(),
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://localhost:8080/auth/callback".to_string(),
        user_agent: "otclick-tests/1.0".to_string(),
    }
}

pub fn gigachat_settings(base: &str) -> GigaChatSettings {
    GigaChatSettings {
        oauth_url: format!("{base}/oauth"),
        api_base: base.to_string(),
        client_id: "giga-id".to_string(),
        client_secret: "giga-secret".to_string(),
        scope: "GIGACHAT_API_PERS".to_string(),
        model: "GigaChat-2".to_string(),
        token_ttl: Duration::from_secs(1500),
    }
}
