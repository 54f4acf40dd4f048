//! Reporting: CSV exports over the borrowing ledger

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::{
    error::{AppError, AppResult},
    models::borrowing::BorrowingDetails,
    repository::Repository,
};

/// Fixed export column order; downstream consumers depend on it
const EXPORT_HEADER: [&str; 11] = [
    "id",
    "borrowerId",
    "borrowerName",
    "borrowerEmail",
    "bookId",
    "bookTitle",
    "bookAuthor",
    "isbn",
    "checkoutDate",
    "dueDate",
    "returnDate",
];

/// Boundaries of the calendar month preceding `now`: first day 00:00:00.000
/// through last day 23:59:59.999, both UTC.
fn previous_month_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let first_of_current = now
        .date_naive()
        .with_day(1)
        .expect("day 1 exists in every month");
    let last_of_previous = first_of_current - Duration::days(1);
    let first_of_previous = last_of_previous
        .with_day(1)
        .expect("day 1 exists in every month");

    let start = first_of_previous
        .and_hms_opt(0, 0, 0)
        .expect("midnight is valid")
        .and_utc();
    let end = last_of_previous
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is valid")
        .and_utc();

    (start, end)
}

/// Serialize borrowing records to CSV with RFC-4180 quoting. Absent values
/// render as empty strings; `with_days_overdue` appends the extra column
/// used by the overdue export.
fn render_csv(rows: &[BorrowingDetails], with_days_overdue: bool) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = EXPORT_HEADER.to_vec();
    if with_days_overdue {
        header.push("daysOverdue");
    }
    writer
        .write_record(&header)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;

    for row in rows {
        let mut record = vec![
            row.id.to_string(),
            row.borrower.id.to_string(),
            row.borrower.name.clone(),
            row.borrower.email.clone(),
            row.book.id.to_string(),
            row.book.title.clone(),
            row.book.author.clone(),
            row.book.isbn.clone(),
            row.checkout_date.to_rfc3339(),
            row.due_date.to_rfc3339(),
            row.return_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
        ];
        if with_days_overdue {
            record.push(row.days_overdue.to_string());
        }
        writer
            .write_record(&record)
            .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// CSV of all borrowings checked out during the previous calendar month
    pub async fn export_last_month(&self) -> AppResult<Vec<u8>> {
        let (start, end) = previous_month_bounds(Utc::now());
        let rows = self
            .repository
            .borrowings
            .find_checked_out_between(start, end)
            .await?;
        tracing::info!("Exporting {} borrowing(s) for {} .. {}", rows.len(), start, end);
        render_csv(&rows, false)
    }

    /// CSV of last month's checkouts that are overdue as of now, with a
    /// trailing daysOverdue column
    pub async fn export_overdue_last_month(&self) -> AppResult<Vec<u8>> {
        let (start, end) = previous_month_bounds(Utc::now());
        let rows = self
            .repository
            .borrowings
            .find_overdue_checked_out_between(start, end)
            .await?;
        tracing::info!(
            "Exporting {} overdue borrowing(s) for {} .. {}",
            rows.len(),
            start,
            end
        );
        render_csv(&rows, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        borrowing::BorrowingStatus, BookSummary, BorrowerSummary, BorrowingDetails,
    };
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn details(id: i32, name: &str, title: &str) -> BorrowingDetails {
        BorrowingDetails {
            id,
            checkout_date: utc(2024, 1, 1),
            due_date: utc(2024, 1, 15),
            return_date: None,
            status: BorrowingStatus::Overdue,
            days_overdue: 5,
            borrower: BorrowerSummary {
                id: 7,
                name: name.to_string(),
                email: "reader@example.com".to_string(),
            },
            book: BookSummary {
                id: 3,
                title: title.to_string(),
                author: "Ursula K. Le Guin".to_string(),
                isbn: "9780441007318".to_string(),
            },
        }
    }

    #[test]
    fn previous_month_bounds_mid_month() {
        let (start, end) = previous_month_bounds(utc(2024, 1, 20));
        assert_eq!(start, utc(2023, 12, 1));
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()
                + Duration::milliseconds(999)
        );
    }

    #[test]
    fn previous_month_bounds_handles_leap_february() {
        let (start, end) = previous_month_bounds(utc(2024, 3, 10));
        assert_eq!(start, utc(2024, 2, 1));
        assert_eq!(end.day(), 29);
        assert_eq!(end.month(), 2);
    }

    #[test]
    fn previous_month_bounds_on_the_first() {
        let (start, end) = previous_month_bounds(utc(2024, 5, 1));
        assert_eq!(start, utc(2024, 4, 1));
        assert_eq!(end.day(), 30);
    }

    #[test]
    fn csv_header_order_is_fixed() {
        let bytes = render_csv(&[], false).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap().trim_end(),
            "id,borrowerId,borrowerName,borrowerEmail,bookId,bookTitle,bookAuthor,isbn,checkoutDate,dueDate,returnDate"
        );

        let bytes = render_csv(&[], true).unwrap();
        assert!(String::from_utf8(bytes).unwrap().trim_end().ends_with(",daysOverdue"));
    }

    #[test]
    fn csv_quotes_fields_containing_commas_and_quotes() {
        let rows = vec![details(1, "Doe, Jane", "A \"quoted\" title")];
        let text = String::from_utf8(render_csv(&rows, false).unwrap()).unwrap();
        assert!(text.contains("\"Doe, Jane\""));
        assert!(text.contains("\"A \"\"quoted\"\" title\""));
    }

    #[test]
    fn csv_renders_absent_return_date_as_empty() {
        let rows = vec![details(1, "Jane Doe", "The Left Hand of Darkness")];
        let text = String::from_utf8(render_csv(&rows, true).unwrap()).unwrap();
        let data_line = text.lines().nth(1).unwrap();
        // returnDate is the second-to-last column, daysOverdue the last
        assert!(data_line.ends_with(",,5"));
    }
}
