//! Reporting/export endpoints, guarded by basic auth

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::AppResult;

use super::ExportAuth;

fn csv_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Export last month's borrowings as CSV
#[utoipa::path(
    get,
    path = "/reports/borrowings/export",
    tag = "reports",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "CSV of borrowings checked out during the previous calendar month", content_type = "text/csv"),
        (status = 401, description = "Missing or invalid credentials")
    )
)]
pub async fn export_last_month(
    State(state): State<crate::AppState>,
    _auth: ExportAuth,
) -> AppResult<Response> {
    let bytes = state.services.reports.export_last_month().await?;
    Ok(csv_response("borrowings-last-month.csv", bytes))
}

/// Export last month's overdue borrowings as CSV
#[utoipa::path(
    get,
    path = "/reports/borrowings/export/overdue",
    tag = "reports",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "CSV of last month's checkouts that are overdue, with daysOverdue", content_type = "text/csv"),
        (status = 401, description = "Missing or invalid credentials")
    )
)]
pub async fn export_overdue_last_month(
    State(state): State<crate::AppState>,
    _auth: ExportAuth,
) -> AppResult<Response> {
    let bytes = state.services.reports.export_overdue_last_month().await?;
    Ok(csv_response("borrowings-overdue-last-month.csv", bytes))
}
