//! API integration tests
//!
//! These tests run against a live server with the seed admin account.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to create a classroom and return its id
async fn create_classroom(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/classrooms", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No classroom ID")
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
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_list_bookings() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_booking_conflict_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let classroom_id = create_classroom(&client, &token, "Conflict Test Room").await;

    let booking = json!({
        "booking_type": "booking",
        "classroom_id": classroom_id,
        "period": 3,
        "date": "2099-06-01"
    });

    // First booking takes the slot
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&booking)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // Same slot again must conflict
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&booking)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // A different period in the same room is fine
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "booking_type": "booking",
            "classroom_id": classroom_id,
            "period": 4,
            "date": "2099-06-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let second_id = body["id"].as_i64().expect("No booking ID");

    // Cleanup
    for id in [booking_id, second_id] {
        let _ = client
            .delete(format!("{}/bookings/{}", BASE_URL, id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await;
    }
    let _ = client
        .delete(format!("{}/classrooms/{}", BASE_URL, classroom_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_return_frees_the_slot() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let classroom_id = create_classroom(&client, &token, "Return Test Room").await;

    let booking = json!({
        "booking_type": "booking",
        "classroom_id": classroom_id,
        "period": 1,
        "date": "2099-06-02"
    });

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&booking)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // Confirm the return
    let response = client
        .post(format!("{}/bookings/{}/return", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["booking"]["status"], "returned");

    // Returning twice must be rejected
    let response = client
        .post(format!("{}/bookings/{}/return", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);

    // The slot is free again
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&booking)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let second_id = body["id"].as_i64().expect("No booking ID");

    // Cleanup
    let _ = client
        .delete(format!("{}/bookings/{}", BASE_URL, second_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/classrooms/{}", BASE_URL, classroom_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_booking_with_unknown_equipment_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let classroom_id = create_classroom(&client, &token, "Equipment Check Room").await;

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "booking_type": "borrow",
            "classroom_id": classroom_id,
            "period": 2,
            "date": "2099-06-03",
            "equipment_ids": [999999]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let _ = client
        .delete(format!("{}/classrooms/{}", BASE_URL, classroom_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_racing_resolutions_keep_first_terminal_status() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let classroom_id = create_classroom(&client, &token, "Race Test Room").await;

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "booking_type": "booking",
            "classroom_id": classroom_id,
            "period": 5,
            "date": "2099-06-04"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // Fire both resolutions at once; exactly one may win
    let return_req = client
        .post(format!("{}/bookings/{}/return", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send();
    let not_used_req = client
        .post(format!("{}/bookings/{}/not-used", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send();

    let (r1, r2) = tokio::join!(return_req, not_used_req);
    let s1 = r1.expect("Failed to send request").status();
    let s2 = r2.expect("Failed to send request").status();

    let wins = [s1, s2].iter().filter(|s| s.is_success()).count();
    assert_eq!(wins, 1, "exactly one resolution must win ({} vs {})", s1, s2);
    assert!(s1 == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        || s2 == reqwest::StatusCode::UNPROCESSABLE_ENTITY);

    // The stored status matches the winner and stays terminal
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let expected = if s1.is_success() { "returned" } else { "not_used" };
    assert_eq!(body["status"], expected);

    let _ = client
        .delete(format!("{}/classrooms/{}", BASE_URL, classroom_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_create_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Test Teacher",
            "username": "testteacher",
            "password": "testpass",
            "role": "teacher"
        }))
        .send()
        .await
        .expect("Failed to send request");

    if response.status().is_success() {
        let body: Value = response.json().await.expect("Failed to parse response");
        let user_id = body["id"].as_i64().expect("No user ID");

        // Reusing the username must be rejected
        let duplicate = client
            .post(format!("{}/users", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({
                "name": "Another Teacher",
                "username": "testteacher",
                "password": "testpass",
                "role": "teacher"
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(duplicate.status(), 409);

        // Cleanup: delete the user
        let _ = client
            .delete(format!("{}/users/{}?force=true", BASE_URL, user_id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await;
    }
}

#[tokio::test]
#[ignore]
async fn test_usage_report() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/reports/usage", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total"].is_number());
    assert!(body["by_status"].is_array());
    assert!(body["by_classroom"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_csv_export() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/reports/export", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("text/csv"))
        .unwrap_or(false));

    let body = response.text().await.expect("Failed to read body");
    assert!(body.starts_with("id,date,period,type,status"));
}

#[tokio::test]
#[ignore]
async fn test_get_periods() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/settings/periods", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let periods = body["periods"].as_array().expect("No periods array");
    assert_eq!(periods.len(), 6);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
