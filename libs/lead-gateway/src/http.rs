use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use lead_api::LeadRecord;

use super::{AppState, GatewayError};

const MSG_SUBMITTED: &str = "Lead submitted successfully";
const MSG_NOT_CONFIGURED: &str = "Lead received (Google Sheets not configured)";
const MSG_HEALTH: &str = "Lead submission endpoint is active";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitAck<'a> {
    success: bool,
    message: &'static str,
    timestamp: &'a str,
    downstream_response: Option<serde_json::Value>,
    /// Эхо заявки — только когда хранилище не сконфигурировано.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a LeadRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    message: &'static str,
    downstream_configured: bool,
    timestamp: String,
}

// ═══════════════════════════════════════════════════════════════
//  POST /submit-lead
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_submit_lead(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, GatewayError> {
    let body = body.inspect_err(|e| {
        tracing::error!(status = %e.status(), error = %e, "lead body rejected");
    })?;

    let raw: serde_json::Value = serde_json::from_slice(&body).inspect_err(|e| {
        tracing::error!(error = %e, "malformed lead body");
    })?;

    let record = LeadRecord::validate(&raw, Utc::now(), &state.default_source).inspect_err(|e| {
        tracing::info!(error = %e, "lead rejected");
    })?;

    tracing::info!(
        name = %record.name(),
        city = %record.city(),
        age = %record.age(),
        phone = %record.masked_phone(),
        course = %record.course(),
        source = %record.source(),
        timestamp = %record.timestamp(),
        "lead received"
    );

    let Some(store) = &state.store else {
        tracing::warn!("downstream not configured, lead logged only");
        let ack = SubmitAck {
            success: true,
            message: MSG_NOT_CONFIGURED,
            timestamp: record.timestamp(),
            downstream_response: None,
            data: Some(&record),
        };
        return Ok(Json(ack).into_response());
    };

    let forwarded = store.forward(&record).await.inspect_err(|e| {
        tracing::error!(
            endpoint = %store.endpoint(),
            kind = %e.kind(),
            error = %e,
            "downstream request failed"
        );
    })?;

    tracing::info!(status = forwarded.status, "lead forwarded");

    let ack = SubmitAck {
        success: true,
        message: MSG_SUBMITTED,
        timestamp: record.timestamp(),
        downstream_response: forwarded.body,
        data: None,
    };
    Ok(Json(ack).into_response())
}

// ═══════════════════════════════════════════════════════════════
//  GET /submit-lead
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(Health {
        message: MSG_HEALTH,
        downstream_configured: state.downstream_configured(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
