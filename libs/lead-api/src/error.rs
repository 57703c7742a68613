/// Заявка не прошла проверку обязательных полей.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Category of a downstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownstreamErrorKind {
    /// reqwest client could not be built from the configured timeout.
    /// Only surfaces while lead-server is starting.
    Client,
    /// Transport failure: DNS, connect, timeout.
    Request,
    /// Response arrived but its body could not be read.
    Body,
}

impl std::fmt::Display for DownstreamErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownstreamErrorKind::Client => f.write_str("client"),
            DownstreamErrorKind::Request => f.write_str("request"),
            DownstreamErrorKind::Body => f.write_str("body"),
        }
    }
}

/// Ошибка вызова внешнего хранилища заявок.
///
/// Только эти ошибки меняют HTTP статус ответа (→ 500). Non-2xx статус
/// или не-JSON тело ответа ошибкой не считаются.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct DownstreamError {
    kind: DownstreamErrorKind,
    message: String,
}

impl DownstreamError {
    pub fn client(msg: impl Into<String>) -> Self {
        Self { kind: DownstreamErrorKind::Client, message: msg.into() }
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self { kind: DownstreamErrorKind::Request, message: msg.into() }
    }

    pub fn body(msg: impl Into<String>) -> Self {
        Self { kind: DownstreamErrorKind::Body, message: msg.into() }
    }

    pub fn kind(&self) -> DownstreamErrorKind {
        self.kind
    }
}
