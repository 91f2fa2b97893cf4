//! Bind and run the HTTP server.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::oneshot;

use super::routes::{router, AppState};

/// Handle returned by [`serve`]: the bound port and a shutdown trigger.
pub struct ServeHandle {
    /// The port the server is listening on.
    pub port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        Ok(())
    }
}

/// Bind the router and start serving in a spawned task.
pub async fn serve(state: Arc<AppState>, bind: &str) -> Result<ServeHandle> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("roster listening on {bind} (port {port})");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        port,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}

/// Serve until ctrl-c, then shut down gracefully.
pub async fn serve_until_ctrl_c(state: Arc<AppState>, bind: &str) -> Result<()> {
    let handle = serve(state, bind).await?;
    tokio::signal::ctrl_c().await?;
    handle.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterConfig;
    use crate::db::Database;
    use crate::roster::Roster;
    use tempfile::TempDir;

    async fn start() -> (TempDir, ServeHandle) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_at(temp_dir.path().join("test.db")).unwrap();
        db.migrate().unwrap();
        let roster = Roster::builtin(&RosterConfig::default()).unwrap();
        let handle = serve(Arc::new(AppState::new(roster, db)), "127.0.0.1:0")
            .await
            .unwrap();
        (temp_dir, handle)
    }

    #[tokio::test]
    async fn test_serve_lists_models() {
        let (_temp, handle) = start().await;
        assert_ne!(handle.port, 0);

        let url = format!("http://127.0.0.1:{}/api/models?provider=openrouter", handle.port);
        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["provider"], "openrouter");
        assert_eq!(body["models"].as_array().unwrap().len(), 3);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_serve_selection_flow() {
        let (_temp, handle) = start().await;
        let base = format!("http://127.0.0.1:{}", handle.port);
        let client = reqwest::Client::new();

        let resp = client
            .put(format!("{}/api/selection", base))
            .json(&serde_json::json!({ "session": "abc", "modelId": "gpt-4o-mini" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = client
            .get(format!("{}/api/selection/abc?user_class=guest", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["model"]["id"], "gpt-4o-mini");

        let resp = client
            .get(format!("{}/api/entitlements/nobody", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);

        handle.shutdown().await.unwrap();
    }
}
