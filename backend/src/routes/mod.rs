//! Route definitions for the Replenishment Dashboard

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Versioned dataset uploads
        .nest("/datasets", dataset_routes())
        // Purchasing analysis over stored or uploaded datasets
        .nest("/analysis", analysis_routes())
}

/// Dataset management routes
fn dataset_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:company",
            post(handlers::upload_dataset).delete(handlers::delete_company_datasets),
        )
        .route("/:company/versions", get(handlers::list_versions))
        .route("/:company/versions/:version", delete(handlers::delete_version))
        .route(
            "/:company/versions/:version/activate",
            put(handlers::activate_version),
        )
}

/// Analysis routes
fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/preview", post(handlers::preview_analysis))
        .route("/:company", get(handlers::get_analysis))
        .route("/:company/suppliers", get(handlers::get_supplier_summary))
        .route("/:company/export", get(handlers::export_purchase_list))
}
