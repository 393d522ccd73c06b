//! API integration tests
//!
//! These run against a live server backed by PostgreSQL.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Duration, NaiveDate};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:1234";

/// Identifier that no previous run has used
fn unique_id(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

async fn register(client: &Client, id: &str) -> StatusCode {
    client
        .post(format!("{}/api/users", BASE_URL))
        .json(&json!({ "id": id, "age": "18", "sex": "M" }))
        .send()
        .await
        .expect("Failed to send request")
        .status()
}

async fn record(client: &Client, user: &str, action: &str, ts: &str) -> StatusCode {
    client
        .post(format!("{}/api/users/stats", BASE_URL))
        .json(&json!({ "user": user, "action": action, "ts": ts }))
        .send()
        .await
        .expect("Failed to send request")
        .status()
}

async fn top(client: &Client, query: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}/api/users/stats/top?{}", BASE_URL, query))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
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
async fn test_register_is_idempotent() {
    let client = Client::new();
    let id = unique_id("idem");

    assert_eq!(register(&client, &id).await, StatusCode::OK);
    assert_eq!(register(&client, &id).await, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_extra_key() {
    let client = Client::new();

    let response = client
        .post(format!("{}/api/users", BASE_URL))
        .json(&json!({ "id": "x", "age": 1, "sex": "F", "extra": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_end_to_end_scenario() {
    let client = Client::new();

    let response = client
        .post(format!("{}/api/users", BASE_URL))
        .json(&json!({ "id": "2", "age": "18", "sex": "M" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/api/users/stats", BASE_URL))
        .json(&json!({ "user": "2", "action": "like", "ts": "2012-02-02" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = top(
        &client,
        "date1=2012-02-02&date2=2012-03-10&action=like&limit=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().expect("items should be an array");
    let day = items
        .iter()
        .find(|item| item["date"] == "2012-02-02")
        .expect("report should contain 2012-02-02");
    let rows = day["rows"].as_array().expect("rows should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], "2");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_increments_are_not_lost() {
    const WRITERS: usize = 25;

    let client = Client::new();
    let id = unique_id("burst");
    assert_eq!(register(&client, &id).await, StatusCode::OK);

    let mut tasks = Vec::with_capacity(WRITERS);
    for _ in 0..WRITERS {
        let client = client.clone();
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            client
                .post(format!("{}/api/users/stats", BASE_URL))
                .json(&json!({ "user": id, "action": "commentary", "ts": "1999-06-15" }))
                .send()
                .await
                .expect("Failed to send request")
                .status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.expect("writer panicked"), StatusCode::OK);
    }

    let (status, body) = top(
        &client,
        "date1=1999-06-15&date2=1999-06-16&action=commentary&limit=100000",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let row = body["items"][0]["rows"]
        .as_array()
        .expect("rows should be an array")
        .iter()
        .find(|row| row["user_id"] == id.as_str())
        .cloned()
        .expect("counter row should exist");
    assert_eq!(row["count"], WRITERS as i64);
}

#[tokio::test]
#[ignore]
async fn test_top_stats_ranking_window_and_limit() {
    let client = Client::new();
    let run = unique_id("rank");
    let (a, b, c) = (format!("{}-a", run), format!("{}-b", run), format!("{}-c", run));

    // A day no earlier run is likely to have touched
    let offset = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_micros()
        % 60_000;
    let day = NaiveDate::from_ymd_opt(1800, 1, 1).expect("valid date")
        + Duration::days(offset as i64);
    let after = day + Duration::days(2);
    let (day, after) = (day.to_string(), after.to_string());

    for id in [&a, &b, &c] {
        assert_eq!(register(&client, id).await, StatusCode::OK);
    }
    for user in [&c, &c, &b, &a] {
        assert_eq!(record(&client, user, "logout", &day).await, StatusCode::OK);
    }
    // Falls on the exclusive upper bound
    assert_eq!(record(&client, &a, "logout", &after).await, StatusCode::OK);

    let (status, body) = top(
        &client,
        &format!("date1={}&date2={}&action=logout&limit=2", day, after),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().expect("items should be an array");
    assert!(items.iter().all(|item| item["date"] != after.as_str()));

    let group = items
        .iter()
        .find(|item| item["date"] == day.as_str())
        .expect("report should contain the event day");
    let rows: Vec<(&str, i64)> = group["rows"]
        .as_array()
        .expect("rows should be an array")
        .iter()
        .map(|row| {
            (
                row["user_id"].as_str().expect("user_id should be a string"),
                row["count"].as_i64().expect("count should be a number"),
            )
        })
        .collect();
    assert_eq!(rows, vec![(c.as_str(), 2), (a.as_str(), 1)]);
}

#[tokio::test]
#[ignore]
async fn test_top_stats_validation() {
    let client = Client::new();

    let (status, _) = top(&client, "date1=2012-02-02&action=like&limit=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = top(
        &client,
        "date1=2012-02-02&date2=2012-03-10&action=share&limit=1",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_wrong_methods() {
    let client = Client::new();

    for (method, path) in [
        (reqwest::Method::GET, "/api/users"),
        (reqwest::Method::GET, "/api/users/stats"),
        (reqwest::Method::POST, "/api/users/stats/top"),
    ] {
        let response = client
            .request(method.clone(), format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, path);
    }
}
