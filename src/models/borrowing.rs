//! Borrowing (ledger entry) model and status derivation

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookSummary;
use super::borrower::BorrowerSummary;

/// Fixed loan period: due date is always checkout date plus 14 days
pub const LOAN_PERIOD_DAYS: i64 = 14;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Borrowing ledger entry from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Borrowing {
    pub id: i32,
    pub borrower_id: i32,
    pub book_id: i32,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// Null while the borrowing is active; immutable once set
    pub return_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived borrowing status; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowingStatus {
    Active,
    Overdue,
    Returned,
}

impl Borrowing {
    /// Due date for a checkout performed at `checkout_date`
    pub fn due_date_for(checkout_date: DateTime<Utc>) -> DateTime<Utc> {
        checkout_date + Duration::days(LOAN_PERIOD_DAYS)
    }

    pub fn status(&self, as_of: DateTime<Utc>) -> BorrowingStatus {
        if self.return_date.is_some() {
            BorrowingStatus::Returned
        } else if self.due_date < as_of {
            BorrowingStatus::Overdue
        } else {
            BorrowingStatus::Active
        }
    }

    /// Whole days past the due date, rounded up; 0 unless overdue
    pub fn days_overdue(&self, as_of: DateTime<Utc>) -> i64 {
        if self.status(as_of) != BorrowingStatus::Overdue {
            return 0;
        }
        days_between_ceil(self.due_date, as_of)
    }
}

/// ceil((to - from) / 1 day) in milliseconds, 0 when `to <= from`
pub fn days_between_ceil(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = to.signed_duration_since(from).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }
}

/// Borrowing with embedded borrower and book summaries for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowingDetails {
    pub id: i32,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: BorrowingStatus,
    pub days_overdue: i64,
    pub borrower: BorrowerSummary,
    pub book: BookSummary,
}

/// Checkout request: both identifiers are mandatory positive integers
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrowing {
    pub borrower_id: i32,
    pub book_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn entry(due: DateTime<Utc>, returned: Option<DateTime<Utc>>) -> Borrowing {
        let checkout = due - Duration::days(LOAN_PERIOD_DAYS);
        Borrowing {
            id: 1,
            borrower_id: 1,
            book_id: 1,
            checkout_date: checkout,
            due_date: due,
            return_date: returned,
            created_at: checkout,
            updated_at: checkout,
        }
    }

    #[test]
    fn due_date_is_checkout_plus_fourteen_days() {
        // checked out 2024-01-01 -> due 2024-01-15
        assert_eq!(Borrowing::due_date_for(utc(2024, 1, 1)), utc(2024, 1, 15));
    }

    #[test]
    fn status_active_until_due_date_passes() {
        let b = entry(utc(2024, 1, 15), None);
        assert_eq!(b.status(utc(2024, 1, 10)), BorrowingStatus::Active);
        assert_eq!(b.status(utc(2024, 1, 15)), BorrowingStatus::Active);
        assert_eq!(b.status(utc(2024, 1, 16)), BorrowingStatus::Overdue);
    }

    #[test]
    fn returned_entry_is_never_overdue() {
        let b = entry(utc(2024, 1, 10), Some(utc(2024, 1, 12)));
        assert_eq!(b.status(utc(2024, 3, 1)), BorrowingStatus::Returned);
        assert_eq!(b.days_overdue(utc(2024, 3, 1)), 0);
    }

    #[test]
    fn days_overdue_exact_days() {
        // due 2024-01-10, as of 2024-01-20 -> 10 days
        let b = entry(utc(2024, 1, 10), None);
        assert_eq!(b.days_overdue(utc(2024, 1, 20)), 10);
    }

    #[test]
    fn days_overdue_rounds_up_partial_days() {
        let b = entry(utc(2024, 1, 10), None);
        let as_of = utc(2024, 1, 10) + Duration::hours(1);
        assert_eq!(b.days_overdue(as_of), 1);
        let as_of = utc(2024, 1, 11) + Duration::milliseconds(1);
        assert_eq!(b.days_overdue(as_of), 2);
    }

    #[test]
    fn days_overdue_zero_when_not_yet_due() {
        let b = entry(utc(2024, 1, 10), None);
        assert_eq!(b.days_overdue(utc(2024, 1, 5)), 0);
        assert_eq!(b.days_overdue(utc(2024, 1, 10)), 0);
    }
}
