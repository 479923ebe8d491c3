//! API integration tests
//!
//! Require a running server on a migrated database.
//! Run with: cargo test --test api_tests -- --ignored

use libris_server::{
    config::DatabaseConfig,
    error::AppError,
    models::loan::NewLoan,
    services::loans::LoanStore,
};
use reqwest::Client;
use serde_json::{json, Value};
use sqlx::PgPool;

const BASE_URL: &str = "http://localhost:5000/api/v1";

/// Same database the server under test runs on
async fn database() -> PgPool {
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DatabaseConfig::default().url);
    PgPool::connect(&url).await.expect("Failed to connect to database")
}

/// Unique-enough suffix so reruns don't collide on unique columns
fn suffix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}

async fn create_client(client: &Client) -> i64 {
    let national_id = format!("{:011}", suffix() % 100_000_000_000);
    let response = client
        .post(format!("{}/persons/clients", BASE_URL))
        .json(&json!({
            "name": "Test Patron",
            "national_id": national_id,
            "birth_date": "1990-05-17",
            "email": "patron@example.com"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No client ID")
}

async fn create_copy(client: &Client) -> i64 {
    let isbn = format!("{:013}", suffix() % 10_000_000_000_000);
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "isbn": isbn
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse response");

    let response = client
        .post(format!("{}/books/copies", BASE_URL))
        .json(&json!({
            "book_id": book["id"],
            "copy_number": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let copy: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(copy["is_available"], true);
    copy["id"].as_i64().expect("No copy ID")
}

fn due_in_days(days: i64) -> String {
    (chrono::Utc::now() + chrono::Duration::days(days)).to_rfc3339()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
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
async fn test_loan_checkout_and_return() {
    let client = Client::new();
    let first_patron = create_client(&client).await;
    let second_patron = create_client(&client).await;
    let copy_id = create_copy(&client).await;

    // Checkout
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "patron_id": first_patron,
            "copy_id": copy_id,
            "due_time": due_in_days(7)
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(loan["status"], "active");
    assert!(loan["return_time"].is_null());
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    // Same copy, other patron
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "patron_id": second_patron,
            "copy_id": copy_id,
            "due_time": due_in_days(7)
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Fetch matches checkout
    let fetched: Value = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(fetched, loan);

    // Return on time
    let response = client
        .put(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let returned: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(returned["status"], "returned");
    assert_eq!(returned["fine_amount"], "0.00");

    // Second return is refused
    let response = client
        .put(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Copy can go out again
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "patron_id": second_patron,
            "copy_id": copy_id,
            "due_time": due_in_days(7)
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let by_copy: Value = client
        .get(format!("{}/loans/copy/{}", BASE_URL, copy_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(by_copy.as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
#[ignore]
async fn test_loans_of_unknown_patron() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans/patron/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_job_role_name() {
    let client = Client::new();
    let name = format!("Archivist {}", suffix());
    let payload = json!({
        "name": name,
        "base_salary": "2100.00",
        "hierarchy_level": 3
    });

    let response = client
        .post(format!("{}/job-roles", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/job-roles", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_checkouts_of_one_copy() {
    let client = Client::new();
    let copy_id = create_copy(&client).await;
    let mut patrons = Vec::new();
    for _ in 0..8 {
        patrons.push(create_client(&client).await);
    }

    let mut handles = Vec::new();
    for patron_id in patrons {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("{}/loans", BASE_URL))
                .json(&json!({
                    "patron_id": patron_id,
                    "copy_id": copy_id,
                    "due_time": due_in_days(7)
                }))
                .send()
                .await
                .expect("Failed to send request")
                .status()
        }));
    }

    let mut created = 0;
    for handle in handles {
        let status = handle.await.expect("Checkout task panicked");
        match status.as_u16() {
            201 => created += 1,
            other => assert_eq!(other, 400, "unexpected checkout status"),
        }
    }
    assert_eq!(created, 1);

    let by_copy: Value = client
        .get(format!("{}/loans/copy/{}", BASE_URL, copy_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let loans = by_copy.as_array().expect("Expected a loan list");
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0]["status"], "active");
    assert_eq!(loans[0]["fine_amount"], "0.00");
}

#[tokio::test]
#[ignore]
async fn test_second_active_loan_for_copy_is_a_conflict() {
    let client = Client::new();
    let first_patron = create_client(&client).await;
    let second_patron = create_client(&client).await;
    let copy_id = create_copy(&client).await;

    // Straight to the store, skipping the availability check
    let pool = database().await;
    let mut tx = pool.begin().await.expect("Failed to begin transaction");
    let now = chrono::Utc::now();
    let loan = |patron_id: i64| NewLoan {
        patron_id: patron_id.try_into().unwrap(),
        copy_id: copy_id.try_into().unwrap(),
        checkout_time: now,
        due_time: now + chrono::Duration::days(7),
    };

    LoanStore::insert_loan(&mut *tx, &loan(first_patron))
        .await
        .expect("First active loan should insert");
    let second = LoanStore::insert_loan(&mut *tx, &loan(second_patron)).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    tx.rollback().await.expect("Failed to roll back");
}

#[tokio::test]
#[ignore]
async fn test_missing_copy_and_company_are_not_found() {
    let client = Client::new();

    let response = client
        .put(format!("{}/books/copies/{}", BASE_URL, i32::MAX))
        .json(&json!({ "location": "Shelf B" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("{}/companies/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}
