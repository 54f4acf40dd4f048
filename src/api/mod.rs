//! API handlers for Librarium REST endpoints

pub mod books;
pub mod borrowers;
pub mod borrowings;
pub mod health;
pub mod openapi;
pub mod reports;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};

use crate::{error::AppError, AppState};

/// Extractor guarding the reporting/export resource with basic auth
pub struct ExportAuth;

#[async_trait]
impl FromRequestParts<AppState> for ExportAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(credentials)) =
            TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Authentication("Missing or malformed basic auth header".to_string())
                })?;

        let expected = &state.config.export;
        if credentials.username() == expected.username && credentials.password() == expected.password {
            Ok(ExportAuth)
        } else {
            Err(AppError::Authentication("Invalid export credentials".to_string()))
        }
    }
}
