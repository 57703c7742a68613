use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tokio_util::sync::CancellationToken;

use lead_api::LeadStore;

mod error;
mod http;
mod sheets;

pub use error::GatewayError;
pub use sheets::SheetsStore;

/// Предел тела заявки. Превышение — 500 в общем конверте ошибки.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Маршрут формы заявки: POST — отправка, GET — health check.
pub const SUBMIT_LEAD_PATH: &str = "/submit-lead";

/// Состояние handler'ов. Клонируется в каждый запрос, мутабельного
/// разделяемого состояния нет.
#[derive(Clone)]
pub struct AppState {
    /// None — хранилище не сконфигурировано, заявки только логируются.
    store: Option<Arc<dyn LeadStore>>,
    default_source: Arc<str>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn LeadStore>>, default_source: impl Into<String>) -> Self {
        Self {
            store,
            default_source: Arc::from(default_source.into()),
        }
    }

    pub fn downstream_configured(&self) -> bool {
        self.store.is_some()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            SUBMIT_LEAD_PATH,
            post(http::handle_submit_lead).get(http::handle_health),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Lead submission HTTP сервер.
pub async fn run(
    host: &str,
    port: u16,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), GatewayError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| GatewayError::Bind { addr: addr.clone(), source })?;

    tracing::info!(
        addr = %addr,
        downstream_configured = state.downstream_configured(),
        "lead gateway listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(GatewayError::Serve)?;

    Ok(())
}
