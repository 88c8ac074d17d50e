use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{BatchReport, CalculateRequest};
use crate::services::AuditService;

/// POST /calculate
/// Computes per-appliance energy figures and the batch totals
pub async fn calculate(
    State(service): State<AuditService>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchReport>> {
    let Json(body) =
        payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let request = CalculateRequest::try_from(body)?;

    let report = service.calculate(&request)?;
    Ok(Json(report))
}
