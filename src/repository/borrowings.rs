//! Borrowings (ledger) repository: checkout/return transactions and
//! read-only queries over the ledger

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgConnection, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookSummary,
        borrower::BorrowerSummary,
        borrowing::{Borrowing, BorrowingDetails},
    },
};

use super::{books::recalculate_availability, map_ledger_fk_violation};

/// Shared SELECT for borrowings joined with their borrower and book summaries
const DETAILS_SELECT: &str = r#"
    SELECT bw.id, bw.checkout_date, bw.due_date, bw.return_date,
           br.id AS borrower_id, br.name AS borrower_name, br.email AS borrower_email,
           bk.id AS book_id, bk.title AS book_title, bk.author AS book_author, bk.isbn AS book_isbn
    FROM borrowings bw
    JOIN borrowers br ON bw.borrower_id = br.id
    JOIN books bk ON bw.book_id = bk.id
"#;

fn details_from_row(row: &PgRow, as_of: DateTime<Utc>) -> BorrowingDetails {
    let due_date: DateTime<Utc> = row.get("due_date");
    let return_date: Option<DateTime<Utc>> = row.get("return_date");

    // Status derivation shares the model logic via a throwaway ledger view
    let entry = Borrowing {
        id: row.get("id"),
        borrower_id: row.get("borrower_id"),
        book_id: row.get("book_id"),
        checkout_date: row.get("checkout_date"),
        due_date,
        return_date,
        created_at: as_of,
        updated_at: as_of,
    };

    BorrowingDetails {
        id: entry.id,
        checkout_date: entry.checkout_date,
        due_date,
        return_date,
        status: entry.status(as_of),
        days_overdue: entry.days_overdue(as_of),
        borrower: BorrowerSummary {
            id: row.get("borrower_id"),
            name: row.get("borrower_name"),
            email: row.get("borrower_email"),
        },
        book: BookSummary {
            id: row.get("book_id"),
            title: row.get("book_title"),
            author: row.get("book_author"),
            isbn: row.get("book_isbn"),
        },
    }
}

async fn fetch_details(
    conn: &mut PgConnection,
    id: i32,
    as_of: DateTime<Utc>,
) -> AppResult<BorrowingDetails> {
    let row = sqlx::query(&format!("{DETAILS_SELECT} WHERE bw.id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::BorrowingNotFound(id))?;

    Ok(details_from_row(&row, as_of))
}

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a ledger entry by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::BorrowingNotFound(id))
    }

    /// Get a ledger entry with embedded borrower and book summaries
    pub async fn get_details(&self, id: i32) -> AppResult<BorrowingDetails> {
        let mut conn = self.pool.acquire().await?;
        fetch_details(&mut conn, id, Utc::now()).await
    }

    /// Check out a book: availability check, ledger insert, and availability
    /// recompute run under one transaction with the book row locked, so two
    /// concurrent checkouts of the last copy serialize and the loser is
    /// rejected instead of driving availability negative.
    pub async fn checkout(&self, borrower_id: i32, book_id: i32) -> AppResult<BorrowingDetails> {
        let now = Utc::now();
        let due = Borrowing::due_date_for(now);

        let mut tx = self.pool.begin().await?;

        // Re-checked under a shared lock so a concurrent borrower delete
        // cannot slip between the service-level check and the insert
        sqlx::query_scalar::<_, i32>("SELECT id FROM borrowers WHERE id = $1 FOR KEY SHARE")
            .bind(borrower_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::BorrowerNotFound(borrower_id))?;

        let total_quantity = sqlx::query_scalar::<_, i32>(
            "SELECT total_quantity FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::BookNotFound(book_id))?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowings WHERE book_id = $1 AND return_date IS NULL",
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if i64::from(total_quantity) - active <= 0 {
            return Err(AppError::BookNotAvailable(book_id));
        }

        let borrowing_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO borrowings (borrower_id, book_id, checkout_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(borrower_id)
        .bind(book_id)
        .bind(now)
        .bind(due)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_ledger_fk_violation(e, borrower_id, book_id))?;

        recalculate_availability(&mut tx, book_id).await?;

        let details = fetch_details(&mut tx, borrowing_id, now).await?;

        tx.commit().await?;
        Ok(details)
    }

    /// Return a borrowed book. Setting the return date is the only mutation
    /// a ledger entry ever sees; a second return is rejected, never a no-op.
    pub async fn mark_returned(&self, id: i32) -> AppResult<BorrowingDetails> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let entry = sqlx::query_as::<_, Borrowing>(
            "SELECT * FROM borrowings WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::BorrowingNotFound(id))?;

        if entry.return_date.is_some() {
            return Err(AppError::AlreadyReturned(id));
        }

        sqlx::query("UPDATE borrowings SET return_date = $1, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        recalculate_availability(&mut tx, entry.book_id).await?;

        let details = fetch_details(&mut tx, id, now).await?;

        tx.commit().await?;
        Ok(details)
    }

    /// Active (unreturned) borrowings of one borrower
    pub async fn find_active_by_borrower(
        &self,
        borrower_id: i32,
    ) -> AppResult<Vec<BorrowingDetails>> {
        let now = Utc::now();

        let rows = sqlx::query(&format!(
            "{DETAILS_SELECT} WHERE bw.borrower_id = $1 AND bw.return_date IS NULL ORDER BY bw.due_date"
        ))
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| details_from_row(r, now)).collect())
    }

    /// Overdue borrowings as of a given instant, soonest-overdue first
    pub async fn list_overdue(
        &self,
        as_of: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<BorrowingDetails>, i64)> {
        let rows = sqlx::query(&format!(
            "{DETAILS_SELECT} WHERE bw.return_date IS NULL AND bw.due_date < $1 \
             ORDER BY bw.due_date ASC LIMIT $2 OFFSET $3"
        ))
        .bind(as_of)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowings WHERE return_date IS NULL AND due_date < $1",
        )
        .bind(as_of)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.iter().map(|r| details_from_row(r, as_of)).collect(), total))
    }

    /// Borrowings checked out inside a date window, for export
    pub async fn find_checked_out_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<BorrowingDetails>> {
        let now = Utc::now();

        let rows = sqlx::query(&format!(
            "{DETAILS_SELECT} WHERE bw.checkout_date BETWEEN $1 AND $2 ORDER BY bw.checkout_date"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| details_from_row(r, now)).collect())
    }

    /// Borrowings checked out inside a date window that are overdue as of now
    pub async fn find_overdue_checked_out_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<BorrowingDetails>> {
        let now = Utc::now();

        let rows = sqlx::query(&format!(
            "{DETAILS_SELECT} WHERE bw.checkout_date BETWEEN $1 AND $2 \
             AND bw.return_date IS NULL AND bw.due_date < $3 ORDER BY bw.checkout_date"
        ))
        .bind(start)
        .bind(end)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| details_from_row(r, now)).collect())
    }
}
