#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("downstream: {0}")]
    Downstream(#[from] lead_api::DownstreamError),

    #[error("{0}")]
    Gateway(#[from] lead_gateway::GatewayError),

    #[error("api task: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("signal: {0}")]
    Signal(#[from] std::io::Error),
}
