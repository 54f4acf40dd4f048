//! Repository layer for database operations

pub mod books;
pub mod borrowers;
pub mod borrowings;

use sqlx::{Pool, Postgres};

use crate::error::AppError;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub borrowers: borrowers::BorrowersRepository,
    pub borrowings: borrowings::BorrowingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            borrowers: borrowers::BorrowersRepository::new(pool.clone()),
            borrowings: borrowings::BorrowingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map store-level unique violations (ISBN, email) to a conflict error;
/// uniqueness is enforced by the store, not pre-checked
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Duplicate(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

/// Map a foreign-key violation on a ledger insert to the not-found error of
/// the referenced entity. The book row is locked by the time we insert, so
/// in practice only the borrower reference can still fail.
pub(crate) fn map_ledger_fk_violation(err: sqlx::Error, borrower_id: i32, book_id: i32) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            match db.constraint() {
                Some(constraint) if constraint.contains("book") => AppError::BookNotFound(book_id),
                _ => AppError::BorrowerNotFound(borrower_id),
            }
        }
        _ => AppError::Database(err),
    }
}
