//! Borrower management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        borrower::{Borrower, BorrowerQuery, CreateBorrower, UpdateBorrower},
        pagination::{Page, PageQuery},
    },
};

/// List borrowers with search and pagination
#[utoipa::path(
    get,
    path = "/borrowers",
    tag = "borrowers",
    params(
        ("name" = Option<String>, Query, description = "Search in name"),
        ("email" = Option<String>, Query, description = "Exact email match (case-insensitive)"),
        ("limit" = Option<i64>, Query, description = "Page size (default: 20, max: 100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip (default: 0)")
    ),
    responses(
        (status = 200, description = "Paginated list of borrowers", body = Page<Borrower>)
    )
)]
pub async fn list_borrowers(
    State(state): State<crate::AppState>,
    Query(query): Query<BorrowerQuery>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Page<Borrower>>> {
    let borrowers = state.services.borrowers.list_borrowers(&query, page).await?;
    Ok(Json(borrowers))
}

/// Get borrower details by ID
#[utoipa::path(
    get,
    path = "/borrowers/{id}",
    tag = "borrowers",
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    responses(
        (status = 200, description = "Borrower details", body = Borrower),
        (status = 404, description = "Borrower not found")
    )
)]
pub async fn get_borrower(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Borrower>> {
    let borrower = state.services.borrowers.get_borrower(id).await?;
    Ok(Json(borrower))
}

/// Register a new borrower
#[utoipa::path(
    post,
    path = "/borrowers",
    tag = "borrowers",
    request_body = CreateBorrower,
    responses(
        (status = 201, description = "Borrower created", body = Borrower),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_borrower(
    State(state): State<crate::AppState>,
    Json(borrower): Json<CreateBorrower>,
) -> AppResult<(StatusCode, Json<Borrower>)> {
    let created = state.services.borrowers.create_borrower(borrower).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing borrower
#[utoipa::path(
    put,
    path = "/borrowers/{id}",
    tag = "borrowers",
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    request_body = UpdateBorrower,
    responses(
        (status = 200, description = "Borrower updated", body = Borrower),
        (status = 404, description = "Borrower not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_borrower(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(update): Json<UpdateBorrower>,
) -> AppResult<Json<Borrower>> {
    let updated = state.services.borrowers.update_borrower(id, update).await?;
    Ok(Json(updated))
}

/// Delete a borrower
#[utoipa::path(
    delete,
    path = "/borrowers/{id}",
    tag = "borrowers",
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    responses(
        (status = 204, description = "Borrower deleted"),
        (status = 404, description = "Borrower not found"),
        (status = 409, description = "Borrower has active borrowings")
    )
)]
pub async fn delete_borrower(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.borrowers.delete_borrower(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
