//! Error handling for the Replenishment Dashboard
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{ConfigurationError, PlanningError, ValidationError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Dataset errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid request: {message}")]
    BadRequest {
        field: Option<String>,
        message: String,
    },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Spreadsheet parse error: {0}")]
    SpreadsheetParse(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_pt: String,
    },

    // Warehouse errors
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<PlanningError> for AppError {
    fn from(err: PlanningError) -> Self {
        match err {
            PlanningError::Validation(e) => AppError::Validation(e),
            PlanningError::Configuration(e) => AppError::Configuration(e),
            overflow @ (PlanningError::ItemOverflow { .. } | PlanningError::TotalOverflow { .. }) => {
                AppError::OutOfRange(overflow.to_string())
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::StorageError(err.to_string())
            }
            other => AppError::DatabaseError(other),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest {
                field: None,
                message: err.body_text(),
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err.field_errors().keys().next().map(|f| f.to_string());
        AppError::BadRequest {
            field,
            message: err.to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: err.to_string(),
                    message_pt: format!("Dados inválidos: {}", err),
                    field: Some(err.column().label().to_string()),
                    row: err.row(),
                },
            ),
            AppError::Configuration(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: err.to_string(),
                    message_pt: format!("Parâmetro inválido: {}", err),
                    field: Some(err.field().to_string()),
                    row: None,
                },
            ),
            AppError::BadRequest { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message_en: message.clone(),
                    message_pt: format!("Requisição inválida: {}", message),
                    field: field.clone(),
                    row: None,
                },
            ),
            AppError::UnsupportedFormat(ext) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "UNSUPPORTED_FORMAT".to_string(),
                    message_en: format!(
                        "File format '{}' is not supported (use .xlsx, .xls or .csv)",
                        ext
                    ),
                    message_pt: format!(
                        "Formato de arquivo '{}' não suportado (use .xlsx, .xls ou .csv)",
                        ext
                    ),
                    field: Some("file".to_string()),
                    row: None,
                },
            ),
            AppError::SpreadsheetParse(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "SPREADSHEET_PARSE_ERROR".to_string(),
                    message_en: format!("Could not read spreadsheet: {}", msg),
                    message_pt: format!("Erro ao ler a planilha: {}", msg),
                    field: Some("file".to_string()),
                    row: None,
                },
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorDetail {
                    code: "PAYLOAD_TOO_LARGE".to_string(),
                    message_en: "The uploaded file is too large".to_string(),
                    message_pt: "O arquivo enviado é grande demais".to_string(),
                    field: Some("file".to_string()),
                    row: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_pt: format!("{} não encontrado", resource),
                    field: None,
                    row: None,
                },
            ),
            AppError::Conflict {
                resource,
                message,
                message_pt,
            } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(resource.clone()),
                    row: None,
                },
            ),
            AppError::StorageError(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STORAGE_ERROR".to_string(),
                    message_en: format!("Storage error: {}", msg),
                    message_pt: format!("Erro no armazenamento: {}", msg),
                    field: None,
                    row: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_pt: "Ocorreu um erro no banco de dados".to_string(),
                    field: None,
                    row: None,
                },
            ),
            AppError::OutOfRange(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "VALUE_OUT_OF_RANGE".to_string(),
                    message_en: msg.clone(),
                    message_pt: format!("Valor fora do intervalo suportado: {}", msg),
                    field: None,
                    row: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_pt: "Erro interno do servidor".to_string(),
                    field: None,
                    row: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
