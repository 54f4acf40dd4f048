//! Borrowing (checkout/return) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{
        borrowing::{BorrowingDetails, CreateBorrowing},
        pagination::{Page, PageQuery},
    },
};

/// Overdue list query parameters
#[derive(Debug, Deserialize)]
pub struct OverdueQuery {
    /// Reference instant for overdue computation; defaults to now
    pub as_of: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Check out a book to a borrower
#[utoipa::path(
    post,
    path = "/borrowings",
    tag = "borrowings",
    request_body = CreateBorrowing,
    responses(
        (status = 201, description = "Book checked out", body = BorrowingDetails),
        (status = 400, description = "Missing or invalid identifiers"),
        (status = 404, description = "Borrower or book not found"),
        (status = 409, description = "No available copies")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBorrowing>,
) -> AppResult<(StatusCode, Json<BorrowingDetails>)> {
    let details = state
        .services
        .circulation
        .checkout(request.borrower_id, request.book_id)
        .await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrowings/{id}/return",
    tag = "borrowings",
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = BorrowingDetails),
        (status = 404, description = "Borrowing not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrowing(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowingDetails>> {
    let details = state.services.circulation.return_borrowing(id).await?;
    Ok(Json(details))
}

/// Get a borrowing by ID
#[utoipa::path(
    get,
    path = "/borrowings/{id}",
    tag = "borrowings",
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Borrowing details", body = BorrowingDetails),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn get_borrowing(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowingDetails>> {
    let details = state.services.circulation.get_borrowing(id).await?;
    Ok(Json(details))
}

/// List a borrower's active borrowings
#[utoipa::path(
    get,
    path = "/borrowers/{id}/borrowings",
    tag = "borrowings",
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    responses(
        (status = 200, description = "Active borrowings with embedded book summaries", body = Vec<BorrowingDetails>),
        (status = 404, description = "Borrower not found")
    )
)]
pub async fn borrower_loans(
    State(state): State<crate::AppState>,
    Path(borrower_id): Path<i32>,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    let loans = state.services.circulation.borrower_loans(borrower_id).await?;
    Ok(Json(loans))
}

/// List overdue borrowings
#[utoipa::path(
    get,
    path = "/borrowings/overdue",
    tag = "borrowings",
    params(
        ("as_of" = Option<String>, Query, description = "Reference instant (RFC 3339, default: now)"),
        ("limit" = Option<i64>, Query, description = "Page size (default: 20, max: 100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip (default: 0)")
    ),
    responses(
        (status = 200, description = "Paginated overdue borrowings with daysOverdue", body = Page<BorrowingDetails>)
    )
)]
pub async fn list_overdue(
    State(state): State<crate::AppState>,
    Query(query): Query<OverdueQuery>,
) -> AppResult<Json<Page<BorrowingDetails>>> {
    let page = PageQuery {
        limit: query.limit,
        offset: query.offset,
    };
    let overdue = state.services.circulation.list_overdue(query.as_of, page).await?;
    Ok(Json(overdue))
}
