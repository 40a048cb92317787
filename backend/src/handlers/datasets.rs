//! Dataset upload and version handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::DatasetVersion;
use crate::services::planning::{company_key, UploadMetadata, UploadedFile};
use crate::services::PlanningService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VersionListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeletedVersions {
    pub company: String,
    pub deleted_versions: u64,
}

/// Read the `file` part and optional metadata fields of a multipart upload
pub(crate) async fn read_upload(
    mut multipart: Multipart,
) -> AppResult<(UploadedFile, UploadMetadata)> {
    let mut file = None;
    let mut metadata = UploadMetadata::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                file = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "description" => metadata.description = non_empty(field.text().await?),
            "created_by" => metadata.created_by = non_empty(field.text().await?),
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown multipart field");
            }
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest {
        field: Some("file".to_string()),
        message: "Multipart field 'file' is required".to_string(),
    })?;
    if file.bytes.is_empty() {
        return Err(AppError::BadRequest {
            field: Some("file".to_string()),
            message: "Uploaded file is empty".to_string(),
        });
    }
    Ok((file, metadata))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Upload a spreadsheet as the company's new active dataset version
pub async fn upload_dataset(
    State(state): State<AppState>,
    Path(company): Path<String>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DatasetVersion>)> {
    let (file, metadata) = read_upload(multipart).await?;
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());
    let version = service.upload_dataset(&company, file, metadata).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

/// List a company's dataset versions, newest first
pub async fn list_versions(
    State(state): State<AppState>,
    Path(company): Path<String>,
    Query(query): Query<VersionListQuery>,
) -> AppResult<Json<Vec<DatasetVersion>>> {
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());
    let versions = service.list_versions(&company, query.limit).await?;
    Ok(Json(versions))
}

/// Make a stored version the active one
pub async fn activate_version(
    State(state): State<AppState>,
    Path((company, version)): Path<(String, i64)>,
) -> AppResult<Json<DatasetVersion>> {
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());
    let version = service.activate_version(&company, version).await?;
    Ok(Json(version))
}

/// Delete an inactive version
pub async fn delete_version(
    State(state): State<AppState>,
    Path((company, version)): Path<(String, i64)>,
) -> AppResult<StatusCode> {
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());
    service.delete_version(&company, version).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every version stored for a company
pub async fn delete_company_datasets(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> AppResult<Json<DeletedVersions>> {
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());
    let deleted_versions = service.delete_company(&company).await?;
    Ok(Json(DeletedVersions {
        company: company_key(&company)?,
        deleted_versions,
    }))
}
