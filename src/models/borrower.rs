//! Borrower (patron) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Borrower model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrower {
    pub id: i32,
    pub name: String,
    /// Stored lowercase; uniqueness is enforced by the store
    pub email: String,
    pub registered_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact borrower representation embedded in borrowing records
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowerSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Create borrower request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBorrower {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Defaults to today when absent
    pub registered_date: Option<NaiveDate>,
}

/// Update borrower request; absent fields keep their current value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBorrower {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub registered_date: Option<NaiveDate>,
}

/// Borrower list filter parameters; pagination comes in separately
#[derive(Debug, Deserialize)]
pub struct BorrowerQuery {
    pub name: Option<String>,
    pub email: Option<String>,
}
