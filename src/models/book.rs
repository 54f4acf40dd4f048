//! Book model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// ISBN-13: exactly 13 digits, no separators
static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{13}$").unwrap());

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_quantity: i32,
    /// Derived cache: total_quantity minus active borrowings, recomputed
    /// from the ledger on every checkout, return, and quantity edit
    pub available_quantity: i32,
    pub shelf_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact book representation embedded in borrowing records
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    /// ISBN-13, exactly 13 digits, globally unique
    #[validate(regex(path = *ISBN_RE, message = "ISBN must be exactly 13 digits"))]
    pub isbn: String,
    #[validate(range(min = 1, message = "Total quantity must be at least 1"))]
    pub total_quantity: i32,
    pub shelf_location: Option<String>,
}

/// Update book request; absent fields keep their current value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    #[validate(regex(path = *ISBN_RE, message = "ISBN must be exactly 13 digits"))]
    pub isbn: Option<String>,
    #[validate(range(min = 1, message = "Total quantity must be at least 1"))]
    pub total_quantity: Option<i32>,
    pub shelf_location: Option<String>,
}

/// Book list filter parameters; pagination comes in separately
#[derive(Debug, Deserialize)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isbn_regex_accepts_thirteen_digits() {
        assert!(ISBN_RE.is_match("9780134685991"));
    }

    #[test]
    fn isbn_regex_rejects_bad_shapes() {
        assert!(!ISBN_RE.is_match("978013468599"));
        assert!(!ISBN_RE.is_match("97801346859911"));
        assert!(!ISBN_RE.is_match("978-013468599"));
        assert!(!ISBN_RE.is_match("978013468599a"));
    }

    #[test]
    fn create_book_validation() {
        let ok = CreateBook {
            title: "The Rust Programming Language".to_string(),
            author: "Steve Klabnik".to_string(),
            isbn: "9781718500440".to_string(),
            total_quantity: 3,
            shelf_location: Some("A-12".to_string()),
        };
        assert!(ok.validate().is_ok());

        let zero_quantity = CreateBook {
            title: "x".to_string(),
            author: "y".to_string(),
            isbn: "9781718500440".to_string(),
            total_quantity: 0,
            shelf_location: None,
        };
        assert!(zero_quantity.validate().is_err());
    }
}
