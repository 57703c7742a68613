//! Доменные типы lead-gateway: запись заявки, валидация, seam к внешнему хранилищу.

mod error;
mod record;
mod store;

pub use error::{DownstreamError, DownstreamErrorKind, ValidationError};
pub use record::{DEFAULT_SOURCE, FieldValue, LeadRecord};
pub use store::{Forwarded, LeadStore};
