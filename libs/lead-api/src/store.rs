use std::future::Future;
use std::pin::Pin;

use crate::{DownstreamError, LeadRecord};

/// Ответ внешнего хранилища на одну отправку.
#[derive(Debug, Clone, PartialEq)]
pub struct Forwarded {
    /// HTTP статус ответа. Non-2xx не считается ошибкой.
    pub status: u16,
    /// Тело ответа, если это валидный JSON. None — тело не распарсилось.
    pub body: Option<serde_json::Value>,
}

/// Внешнее хранилище заявок (таблица за HTTP-скриптом).
///
/// Одна попытка на вызов, без ретраев. Err — только если сам вызов
/// не состоялся (DNS, connect, чтение тела).
pub trait LeadStore: Send + Sync {
    /// Отправить нормализованную запись.
    fn forward(
        &self,
        record: &LeadRecord,
    ) -> Pin<Box<dyn Future<Output = Result<Forwarded, DownstreamError>> + Send + '_>>;

    /// Адрес хранилища для диагностики.
    fn endpoint(&self) -> &str;
}
