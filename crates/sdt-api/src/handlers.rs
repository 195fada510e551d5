//! API Handlers
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sdt_core::{parse_timezone, ConfigurationError, FieldDefinition, NormalizedValue, RequestContext, SdtError, SDT_VERSION};
use sdt_in::{FieldError, FieldWidget, RawItem};
use sdt_picker::field_picker;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::AppState;

/// Error body returned for requests that cannot be processed at all
pub struct ApiError(SdtError);

impl From<SdtError> for ApiError {
    fn from(err: SdtError) -> Self {
        ApiError(err)
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(err: ConfigurationError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SdtError::Config(_) => StatusCode::BAD_REQUEST,
            SdtError::Parse(_) | SdtError::Range(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SdtError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({ "code": self.0.code(), "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Per-request overrides of the service defaults
#[derive(Debug, Default, Deserialize)]
pub struct ContextOverrides {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub first_day: Option<u8>,
}

impl ContextOverrides {
    fn apply(&self, mut ctx: RequestContext) -> Result<RequestContext, ApiError> {
        if let Some(timezone) = &self.timezone {
            ctx.display_timezone = parse_timezone(timezone)?;
        }
        if let Some(language) = &self.language {
            ctx = ctx.with_language(language.clone());
        }
        if let Some(first_day) = self.first_day {
            if first_day > 6 {
                let message = format!("first_day must be 0-6, got {}", first_day);
                return Err(ConfigurationError::Settings(message).into());
            }
            ctx = ctx.with_first_day(first_day);
        }
        Ok(ctx)
    }
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub field: FieldDefinition,
    #[serde(default)]
    pub items: Vec<RawItem>,
    #[serde(flatten)]
    pub context: ContextOverrides,
}

#[derive(Debug, Serialize)]
pub struct DeltaError {
    pub code: &'static str,
    pub message: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DeltaResult {
    pub delta: usize,
    pub value: Option<NormalizedValue>,
    pub error: Option<DeltaError>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub field: String,
    pub valid: bool,
    pub trace_id: String,
    pub results: Vec<DeltaResult>,
}

fn delta_error(err: &FieldError) -> DeltaError {
    let message = err.user_message();
    let detail = err.to_string();
    DeltaError {
        code: SdtError::from(err.clone()).code(),
        message,
        detail,
    }
}

pub async fn normalize(
    State(state): State<AppState>,
    Json(request): Json<NormalizeRequest>,
) -> Result<(StatusCode, Json<NormalizeResponse>), ApiError> {
    let ctx = request.context.apply(state.config.request_context())?;
    let widget = FieldWidget::new(&request.field, &ctx)?;
    let massaged = widget.massage(&request.items);

    let results: Vec<DeltaResult> = massaged
        .outcomes
        .into_iter()
        .enumerate()
        .map(|(delta, outcome)| match outcome {
            Ok(value) => {
                if value.is_some() {
                    state.metrics.normalized.inc();
                }
                DeltaResult { delta, value, error: None }
            }
            Err(err) => {
                let error = delta_error(&err);
                state.metrics.rejected.with_label_values(&[error.code]).inc();
                DeltaResult {
                    delta,
                    value: None,
                    error: Some(error),
                }
            }
        })
        .collect();

    let valid = results.iter().all(|result| result.error.is_none());
    info!(trace_id = %ctx.trace_id, field = %request.field.name, deltas = results.len(), valid, "normalized field");

    let status = if valid {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((
        status,
        Json(NormalizeResponse {
            field: request.field.name,
            valid,
            trace_id: ctx.trace_id,
            results,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct PickerRequest {
    pub field: FieldDefinition,
    #[serde(flatten)]
    pub context: ContextOverrides,
}

pub async fn picker(
    State(state): State<AppState>,
    Json(request): Json<PickerRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let ctx = request.context.apply(state.config.request_context())?;
    let picker = field_picker(&request.field, &ctx)?;
    state.metrics.pickers.inc();

    let body = serde_json::to_value(&picker).map_err(|e| SdtError::Serialize(e.to_string()))?;
    Ok((StatusCode::OK, Json(body)))
}

pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let text = state
        .metrics
        .encode()
        .map_err(|e| SdtError::Serialize(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response())
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "version": SDT_VERSION })))
}
