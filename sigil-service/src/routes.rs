//! HTTP handlers: send-certificate, element catalog, verification.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde::Deserialize;
use sigil_api::{NewElement, SendCertificateRequest, SendCertificateResponse};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::backend::{AuthContext, NewCertificate};
use crate::error::AppError;
use crate::state::AppState;
use crate::verify;

/// Resolve the bearer credential or fail before anything else happens.
async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
    Ok(state.certificates.authenticate(token).await?)
}

/// POST /send-certificate
///
/// Persists the certificate record unconditionally, then attempts
/// delivery. Delivery failure does not roll the record back: the response
/// still carries `success: true` plus a distinct `emailError` (degraded
/// success). A missing credential fails before any persistence.
pub async fn send_certificate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SendCertificateRequest>,
) -> Result<Json<SendCertificateResponse>, AppError> {
    let auth = authorize(&state, &headers).await?;
    req.validate()?;

    let record = state
        .certificates
        .insert_certificate(NewCertificate {
            user_id: auth.user_id,
            title: req.certificate_title.clone(),
            recipient_name: req.recipient_name.clone(),
            recipient_email: req.recipient_email.clone(),
            certificate_data: req.certificate_data.clone(),
        })
        .await?;
    info!(certificate_id = %record.id, "certificate saved");

    let (message, email_id, email_error) = match state
        .mailer
        .send(
            &req.recipient_email,
            &req.recipient_name,
            &req.certificate_title,
            &req.certificate_data,
        )
        .await
    {
        Ok(Some(id)) => (
            format!("Certificate sent to {}", req.recipient_email),
            Some(id),
            None,
        ),
        Ok(None) => (
            "Certificate saved. Configure the mail provider API key to enable delivery."
                .to_string(),
            None,
            None,
        ),
        Err(e) => {
            warn!(certificate_id = %record.id, error = %e, "delivery failed after persistence");
            (
                "Certificate saved, but delivery failed.".to_string(),
                None,
                Some(e.to_string()),
            )
        }
    };

    Ok(Json(SendCertificateResponse {
        success: true,
        certificate_id: record.id,
        message,
        email_id,
        email_error,
    }))
}

#[derive(Deserialize)]
pub struct ElementQuery {
    category: Option<String>,
}

/// GET /elements?category=
pub async fn list_elements_handler(
    State(state): State<AppState>,
    Query(query): Query<ElementQuery>,
) -> Result<impl IntoResponse, AppError> {
    let category = query.category.as_deref().filter(|c| *c != "all");
    let rows = state.elements.list(category).await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateElementRequest {
    pub title: String,
    pub category: String,
    pub file_name: String,
    /// Base64 image bytes; the stored file travels inside the request.
    pub file_data: String,
}

/// POST /elements (admin)
///
/// Uploads the file first, then inserts the catalog row referencing the
/// resulting public URL; a storage failure aborts before the row exists.
pub async fn create_element_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateElementRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = authorize(&state, &headers).await?;
    if !auth.is_admin {
        return Err(AppError::Forbidden);
    }

    NewElement {
        title: req.title.clone(),
        category: req.category.clone(),
    }
    .validate()?;
    let bytes = BASE64.decode(&req.file_data)?;

    let ext = std::path::Path::new(&req.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    let file_name = format!("{}-{}.{ext}", Utc::now().timestamp_millis(), Uuid::new_v4().simple());

    let image_url = state.storage.store(&file_name, bytes).await?;
    let record = state
        .elements
        .insert(req.title, req.category, image_url, auth.user_id)
        .await?;
    info!(element_id = %record.id, title = %record.title, "element uploaded");

    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /elements/{id} (admin)
///
/// Removes the catalog row, then best-effort removes the backing file;
/// a failed file removal is logged, never surfaced.
pub async fn delete_element_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let auth = authorize(&state, &headers).await?;
    if !auth.is_admin {
        return Err(AppError::Forbidden);
    }

    let record = state.elements.delete(id).await?;

    if let Some(file_name) = record.image_url.rsplit('/').next() {
        if let Err(e) = state.storage.remove(file_name).await {
            error!(element_id = %id, error = %e, "failed to remove backing file");
        }
    }
    info!(element_id = %id, "element deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /verify/{code}, the placeholder verification surface.
pub async fn verify_handler(Path(code): Path<String>) -> impl IntoResponse {
    Json(verify::verify_code(&code, Utc::now()))
}
