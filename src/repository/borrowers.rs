//! Borrowers repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrower::{Borrower, BorrowerQuery, CreateBorrower, UpdateBorrower},
};

use super::map_unique_violation;

#[derive(Clone)]
pub struct BorrowersRepository {
    pool: Pool<Postgres>,
}

impl BorrowersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrower by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>("SELECT * FROM borrowers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::BorrowerNotFound(id))
    }

    /// List borrowers with optional filters and pagination
    pub async fn list(
        &self,
        query: &BorrowerQuery,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Borrower>, i64)> {
        let borrowers = sqlx::query_as::<_, Borrower>(
            r#"
            SELECT * FROM borrowers
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR email = LOWER($2))
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&query.name)
        .bind(&query.email)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM borrowers
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR email = LOWER($2))
            "#,
        )
        .bind(&query.name)
        .bind(&query.email)
        .fetch_one(&self.pool)
        .await?;

        Ok((borrowers, total))
    }

    /// Create a new borrower. Email is expected lowercase by the time it
    /// reaches the store; registered_date defaults to today.
    pub async fn create(&self, borrower: &CreateBorrower) -> AppResult<Borrower> {
        let registered = borrower
            .registered_date
            .unwrap_or_else(|| Utc::now().date_naive());

        sqlx::query_as::<_, Borrower>(
            r#"
            INSERT INTO borrowers (name, email, registered_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&borrower.name)
        .bind(&borrower.email)
        .bind(registered)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "A borrower with this email already exists"))
    }

    /// Update borrower details
    pub async fn update(&self, id: i32, update: &UpdateBorrower) -> AppResult<Borrower> {
        let current = self.get_by_id(id).await?;

        sqlx::query_as::<_, Borrower>(
            r#"
            UPDATE borrowers
            SET name = $1, email = $2, registered_date = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(update.name.as_ref().unwrap_or(&current.name))
        .bind(update.email.as_ref().unwrap_or(&current.email))
        .bind(update.registered_date.unwrap_or(current.registered_date))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "A borrower with this email already exists"))
    }

    /// Delete a borrower. The active-borrowings check and the delete run in
    /// one transaction so a concurrent checkout cannot slip between them.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM borrowers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::BorrowerNotFound(id))?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowings WHERE borrower_id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Err(AppError::HasActiveBorrowings(format!(
                "Borrower {} has {} active borrowing(s) and cannot be deleted",
                id, active
            )));
        }

        sqlx::query("DELETE FROM borrowers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
