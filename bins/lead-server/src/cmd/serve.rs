use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::{Effective, ServeArgs};
use crate::error::ServerError;
use lead_api::LeadStore;
use lead_gateway::{AppState, SheetsStore};

/// Сколько ждать завершения in-flight запросов после Ctrl+C.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run(args: ServeArgs) -> Result<(), ServerError> {
    tracing::info!("lead-server starting");

    // --- Load config ---
    let eff = Effective::new(&args)?;
    tracing::info!(config = %args.config, host = %eff.host, port = eff.port, "loaded config");

    // --- Downstream ---
    let store: Option<Arc<dyn LeadStore>> = match &eff.sheets_url {
        Some(url) => {
            let sheets: Arc<dyn LeadStore> =
                Arc::new(SheetsStore::new(url.clone(), eff.request_timeout)?);
            tracing::info!(timeout = ?eff.request_timeout, "google sheets configured");
            Some(sheets)
        }
        None => {
            tracing::warn!("GOOGLE_SHEETS_URL not set, leads will only be logged");
            None
        }
    };

    let state = AppState::new(store, eff.source.clone());

    // --- HTTP server ---
    let token = CancellationToken::new();
    let api_token = token.clone();
    let host = eff.host.clone();
    let port = eff.port;
    let mut api_handle = tokio::spawn(async move {
        lead_gateway::run(&host, port, state, api_token).await
    });

    tokio::select! {
        // Сервер завершился сам (например, порт занят).
        res = &mut api_handle => {
            res??;
            return Ok(());
        }
        sig = tokio::signal::ctrl_c() => {
            sig?;
        }
    }

    tracing::info!("shutting down...");
    token.cancel();

    match tokio::time::timeout(DRAIN_TIMEOUT, &mut api_handle).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "api server error"),
        Ok(Err(e)) => tracing::error!(error = %e, "api task failed"),
        Err(_) => {
            tracing::warn!("drain timeout, aborting api server");
            api_handle.abort();
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}
