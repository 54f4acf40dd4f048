//! Book catalog service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        pagination::{Page, PageQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books with filters and pagination
    pub async fn list_books(&self, query: &BookQuery, page: PageQuery) -> AppResult<Page<Book>> {
        let (limit, offset) = (page.limit(), page.offset());
        let (books, total) = self.repository.books.list(query, limit, offset).await?;
        Ok(Page::new(books, total, limit, offset))
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Register a new book title
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!("Registered book id={} isbn={}", created.id, created.isbn);
        Ok(created)
    }

    /// Update book metadata; quantity edits recompute availability
    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        update.validate()?;
        self.repository.books.update(id, &update).await
    }

    /// Delete a book unless active borrowings reference it
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
