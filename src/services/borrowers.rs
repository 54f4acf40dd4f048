//! Borrower management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        borrower::{Borrower, BorrowerQuery, CreateBorrower, UpdateBorrower},
        pagination::{Page, PageQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowersService {
    repository: Repository,
}

impl BorrowersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List borrowers with filters and pagination
    pub async fn list_borrowers(
        &self,
        query: &BorrowerQuery,
        page: PageQuery,
    ) -> AppResult<Page<Borrower>> {
        let (limit, offset) = (page.limit(), page.offset());
        let (borrowers, total) = self.repository.borrowers.list(query, limit, offset).await?;
        Ok(Page::new(borrowers, total, limit, offset))
    }

    /// Get borrower by ID
    pub async fn get_borrower(&self, id: i32) -> AppResult<Borrower> {
        self.repository.borrowers.get_by_id(id).await
    }

    /// Register a new borrower. Emails are case-insensitively unique, so the
    /// address is normalized to lowercase here at the edge.
    pub async fn create_borrower(&self, mut borrower: CreateBorrower) -> AppResult<Borrower> {
        borrower.validate()?;
        borrower.email = borrower.email.to_lowercase();
        let created = self.repository.borrowers.create(&borrower).await?;
        tracing::info!("Registered borrower id={}", created.id);
        Ok(created)
    }

    /// Update borrower details
    pub async fn update_borrower(&self, id: i32, mut update: UpdateBorrower) -> AppResult<Borrower> {
        update.validate()?;
        update.email = update.email.map(|e| e.to_lowercase());
        self.repository.borrowers.update(id, &update).await
    }

    /// Delete a borrower unless active borrowings reference them
    pub async fn delete_borrower(&self, id: i32) -> AppResult<()> {
        self.repository.borrowers.delete(id).await?;
        tracing::info!("Deleted borrower id={}", id);
        Ok(())
    }
}
