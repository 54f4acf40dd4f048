//! Data models for Librarium

pub mod book;
pub mod borrower;
pub mod borrowing;
pub mod pagination;

// Re-export commonly used types
pub use book::{Book, BookSummary};
pub use borrower::{Borrower, BorrowerSummary};
pub use borrowing::{Borrowing, BorrowingDetails, BorrowingStatus};
pub use pagination::{Page, PageQuery};
