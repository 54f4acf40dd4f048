//! Checkout/return orchestration
//!
//! Per-entry state machine: nonexistent -> active -> returned (terminal).
//! The availability check, ledger write, and availability recompute happen
//! inside one repository transaction; this layer owns the precondition
//! ordering: identifiers, then borrower existence, then book existence.

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::BorrowingDetails,
        pagination::{Page, PageQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check out a book to a borrower
    pub async fn checkout(&self, borrower_id: i32, book_id: i32) -> AppResult<BorrowingDetails> {
        if borrower_id <= 0 {
            return Err(AppError::Validation(
                "borrower_id must be a positive integer".to_string(),
            ));
        }
        if book_id <= 0 {
            return Err(AppError::Validation(
                "book_id must be a positive integer".to_string(),
            ));
        }

        // Borrower existence is checked first so the caller gets the right
        // not-found error; book existence is re-checked under the row lock
        self.repository.borrowers.get_by_id(borrower_id).await?;
        self.repository.books.get_by_id(book_id).await?;

        let details = self.repository.borrowings.checkout(borrower_id, book_id).await?;
        tracing::info!(
            "Checked out book id={} to borrower id={} (borrowing id={}, due {})",
            book_id,
            borrower_id,
            details.id,
            details.due_date
        );
        Ok(details)
    }

    /// Return a borrowed book. A second return of the same entry is a
    /// conflict, never a silent no-op.
    pub async fn return_borrowing(&self, borrowing_id: i32) -> AppResult<BorrowingDetails> {
        if borrowing_id <= 0 {
            return Err(AppError::Validation(
                "borrowing_id must be a positive integer".to_string(),
            ));
        }

        let details = self.repository.borrowings.mark_returned(borrowing_id).await?;
        tracing::info!(
            "Returned borrowing id={} (book id={})",
            borrowing_id,
            details.book.id
        );
        Ok(details)
    }

    /// Get one borrowing with embedded summaries
    pub async fn get_borrowing(&self, id: i32) -> AppResult<BorrowingDetails> {
        self.repository.borrowings.get_details(id).await
    }

    /// Active borrowings of one borrower, soonest due first
    pub async fn borrower_loans(&self, borrower_id: i32) -> AppResult<Vec<BorrowingDetails>> {
        self.repository.borrowers.get_by_id(borrower_id).await?;
        self.repository.borrowings.find_active_by_borrower(borrower_id).await
    }

    /// Overdue borrowings as of `as_of` (defaults to now), paginated
    pub async fn list_overdue(
        &self,
        as_of: Option<DateTime<Utc>>,
        page: PageQuery,
    ) -> AppResult<Page<BorrowingDetails>> {
        let as_of = as_of.unwrap_or_else(Utc::now);
        let (limit, offset) = (page.limit(), page.offset());
        let (items, total) = self
            .repository
            .borrowings
            .list_overdue(as_of, limit, offset)
            .await?;
        Ok(Page::new(items, total, limit, offset))
    }
}
