//! API integration tests
//!
//! Require a running server and database; run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const EXPORT_USER: &str = "reports";
const EXPORT_PASSWORD: &str = "change-this-in-production";

/// Unique suffix so tests can be re-run against the same database
fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_book(client: &Client, total_quantity: i32) -> Value {
    let isbn: String = format!("{:013}", unique_suffix() % 10_000_000_000_000);
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Integration Test Book",
            "author": "Test Author",
            "isbn": isbn,
            "total_quantity": total_quantity,
            "shelf_location": "T-1"
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse book")
}

async fn create_borrower(client: &Client) -> Value {
    let response = client
        .post(format!("{}/borrowers", BASE_URL))
        .json(&json!({
            "name": "Test Borrower",
            "email": format!("borrower{}@example.com", unique_suffix())
        }))
        .send()
        .await
        .expect("Failed to create borrower");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse borrower")
}

async fn checkout(client: &Client, borrower_id: i64, book_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "borrower_id": borrower_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send checkout request")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_pings_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    // With the database up this must report ready; a dead store answers 503
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_create_book_starts_fully_available() {
    let client = Client::new();
    let book = create_book(&client, 3).await;

    assert_eq!(book["total_quantity"], 3);
    assert_eq!(book["available_quantity"], 3);
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_bad_isbn() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Bad ISBN",
            "author": "Nobody",
            "isbn": "123",
            "total_quantity": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrower_email_is_lowercased() {
    let client = Client::new();
    let suffix = unique_suffix();

    let response = client
        .post(format!("{}/borrowers", BASE_URL))
        .json(&json!({
            "name": "Mixed Case",
            "email": format!("Mixed.Case{}@Example.COM", suffix)
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["email"],
        format!("mixed.case{}@example.com", suffix)
    );
}

#[tokio::test]
#[ignore]
async fn test_checkout_last_copy_then_reject() {
    let client = Client::new();
    let book = create_book(&client, 1).await;
    let first = create_borrower(&client).await;
    let second = create_borrower(&client).await;
    let book_id = book["id"].as_i64().unwrap();

    // Last copy goes out
    let response = checkout(&client, first["id"].as_i64().unwrap(), book_id).await;
    assert_eq!(response.status(), 201);
    let borrowing: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(borrowing["status"], "active");
    assert_eq!(borrowing["book"]["id"], book["id"]);

    let refreshed: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to fetch book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(refreshed["available_quantity"], 0);

    // Second checkout is rejected
    let response = checkout(&client, second["id"].as_i64().unwrap(), book_id).await;
    assert_eq!(response.status(), 409);

    // Return frees the copy again
    let response = client
        .post(format!(
            "{}/borrowings/{}/return",
            BASE_URL,
            borrowing["id"].as_i64().unwrap()
        ))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 200);

    let refreshed: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to fetch book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(refreshed["available_quantity"], 1);
}

#[tokio::test]
#[ignore]
async fn test_double_return_is_a_conflict() {
    let client = Client::new();
    let book = create_book(&client, 1).await;
    let borrower = create_borrower(&client).await;

    let response = checkout(
        &client,
        borrower["id"].as_i64().unwrap(),
        book["id"].as_i64().unwrap(),
    )
    .await;
    let borrowing: Value = response.json().await.expect("Failed to parse response");
    let return_url = format!(
        "{}/borrowings/{}/return",
        BASE_URL,
        borrowing["id"].as_i64().unwrap()
    );

    let response = client.post(&return_url).send().await.expect("Failed to return");
    assert_eq!(response.status(), 200);

    let response = client.post(&return_url).send().await.expect("Failed to return");
    assert_eq!(response.status(), 409);

    // Availability untouched by the rejected second return
    let refreshed: Value = client
        .get(format!("{}/books/{}", BASE_URL, book["id"].as_i64().unwrap()))
        .send()
        .await
        .expect("Failed to fetch book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(refreshed["available_quantity"], refreshed["total_quantity"]);
}

#[tokio::test]
#[ignore]
async fn test_checkout_unknown_borrower_is_not_found() {
    let client = Client::new();
    let book = create_book(&client, 1).await;

    let response = checkout(&client, 999_999_999, book["id"].as_i64().unwrap()).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_checkout_deleted_borrower_is_not_found() {
    let client = Client::new();
    let book = create_book(&client, 1).await;
    let borrower = create_borrower(&client).await;
    let borrower_id = borrower["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/borrowers/{}", BASE_URL, borrower_id))
        .send()
        .await
        .expect("Failed to delete borrower");
    assert_eq!(response.status(), 204);

    // A borrower gone by insert time is a not-found, never a 500
    let response = checkout(&client, borrower_id, book["id"].as_i64().unwrap()).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_delete_book_with_active_borrowing_is_a_conflict() {
    let client = Client::new();
    let book = create_book(&client, 1).await;
    let borrower = create_borrower(&client).await;
    let book_id = book["id"].as_i64().unwrap();

    let response = checkout(&client, borrower["id"].as_i64().unwrap(), book_id).await;
    let borrowing: Value = response.json().await.expect("Failed to parse response");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 409);

    // After the return, deletion goes through
    client
        .post(format!(
            "{}/borrowings/{}/return",
            BASE_URL,
            borrowing["id"].as_i64().unwrap()
        ))
        .send()
        .await
        .expect("Failed to return");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_overdue_list_shape() {
    let client = Client::new();

    let response = client
        .get(format!("{}/borrowings/overdue?limit=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    assert_eq!(body["limit"], 5);
    for entry in body["items"].as_array().unwrap() {
        assert_eq!(entry["status"], "overdue");
        assert!(entry["days_overdue"].as_i64().unwrap() >= 1);
    }
}

#[tokio::test]
#[ignore]
async fn test_export_requires_basic_auth() {
    let client = Client::new();

    let response = client
        .get(format!("{}/reports/borrowings/export", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/reports/borrowings/export", BASE_URL))
        .basic_auth(EXPORT_USER, Some(EXPORT_PASSWORD))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let text = response.text().await.expect("Failed to read body");
    let header = text.lines().next().expect("Empty export");
    assert_eq!(
        header,
        "id,borrowerId,borrowerName,borrowerEmail,bookId,bookTitle,bookAuthor,isbn,checkoutDate,dueDate,returnDate"
    );
}
