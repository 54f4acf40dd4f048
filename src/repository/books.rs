//! Books repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

use super::map_unique_violation;

/// Recompute a book's available quantity from the ledger and persist it.
///
/// Single writer of `available_quantity`: always derived as
/// `total_quantity - count(active borrowings)`, clamped to
/// `[0, total_quantity]`. Recomputing from the source of truth instead of
/// incrementing a counter keeps the value idempotent and self-healing.
/// Must run on the same connection as the transaction that changed the
/// ledger or the total quantity.
pub(crate) async fn recalculate_availability(
    conn: &mut PgConnection,
    book_id: i32,
) -> AppResult<i32> {
    let available = sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE books
        SET available_quantity = GREATEST(0, LEAST(total_quantity,
                total_quantity - (
                    SELECT COUNT(*) FROM borrowings
                    WHERE book_id = books.id AND return_date IS NULL
                )::int)),
            updated_at = NOW()
        WHERE id = $1
        RETURNING available_quantity
        "#,
    )
    .bind(book_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::BookNotFound(book_id))?;

    Ok(available)
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::BookNotFound(id))
    }

    /// List books with optional filters and pagination
    pub async fn list(&self, query: &BookQuery, limit: i64, offset: i64) -> AppResult<(Vec<Book>, i64)> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR author ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR isbn = $3)
            ORDER BY id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&query.title)
        .bind(&query.author)
        .bind(&query.isbn)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM books
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR author ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR isbn = $3)
            "#,
        )
        .bind(&query.title)
        .bind(&query.author)
        .bind(&query.isbn)
        .fetch_one(&self.pool)
        .await?;

        Ok((books, total))
    }

    /// Create a new book; a fresh book has all copies available
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, total_quantity, available_quantity, shelf_location)
            VALUES ($1, $2, $3, $4, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_quantity)
        .bind(&book.shelf_location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "A book with this ISBN already exists"))
    }

    /// Update book metadata. A total_quantity edit triggers an availability
    /// recompute from the ledger inside the same transaction.
    pub async fn update(&self, id: i32, update: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::BookNotFound(id))?;

        let total_quantity = update.total_quantity.unwrap_or(current.total_quantity);

        sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, total_quantity = $4,
                shelf_location = $5, updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(update.title.as_ref().unwrap_or(&current.title))
        .bind(update.author.as_ref().unwrap_or(&current.author))
        .bind(update.isbn.as_ref().unwrap_or(&current.isbn))
        .bind(total_quantity)
        .bind(update.shelf_location.as_ref().or(current.shelf_location.as_ref()))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "A book with this ISBN already exists"))?;

        recalculate_availability(&mut tx, id).await?;

        let updated = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a book. The active-borrowings check and the delete run in one
    /// transaction so a concurrent checkout cannot slip between them.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::BookNotFound(id))?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowings WHERE book_id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Err(AppError::HasActiveBorrowings(format!(
                "Book {} has {} active borrowing(s) and cannot be deleted",
                id, active
            )));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
