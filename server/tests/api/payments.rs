use reqwest::{Method, StatusCode};

use sqlx::PgPool;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use bloodlink::domain::Role;

use crate::helpers::{TestApp, TestUser};

fn intent_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": "pi_test_12345",
        "client_secret": "pi_test_12345_secret",
    }))
}

#[sqlx::test(migrations = "../migrations")]
async fn intent_creation_calls_the_processor(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let donor = TestUser::register(&app, &pool, "funder@test.com", Role::Donor).await;

    Mock::given(path("/v1/payment_intents"))
        .and(method("POST"))
        .respond_with(intent_response())
        .expect(1)
        .mount(&app.payment_server)
        .await;

    let res = app
        .authorized_request(Method::POST, "payments/intent", &donor)
        .json(&serde_json::json!({ "amount_cents": 2500 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse response");
    assert_eq!("pi_test_12345", body["payment_intent_id"]);
    assert_eq!("pi_test_12345_secret", body["client_secret"]);

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn processor_failure_records_nothing(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let donor = TestUser::register(&app, &pool, "funder@test.com", Role::Donor).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    let res = app
        .authorized_request(Method::POST, "payments/intent", &donor)
        .json(&serde_json::json!({ "amount_cents": 2500 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_server_error());

    let count: i64 = sqlx::query_scalar("select count(*) from fundraiser_payments")
        .fetch_one(&pool)
        .await?;
    assert_eq!(0, count);

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn invalid_amounts_are_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let donor = TestUser::register(&app, &pool, "funder@test.com", Role::Donor).await;

    Mock::given(any())
        .respond_with(intent_response())
        .expect(0)
        .mount(&app.payment_server)
        .await;

    for amount in [0, -100] {
        let res = app
            .authorized_request(Method::POST, "payments/intent", &donor)
            .json(&serde_json::json!({ "amount_cents": amount }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
    }

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn recording_a_payment_feeds_the_admin_report(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let donor = TestUser::register(&app, &pool, "funder@test.com", Role::Donor).await;
    let admin = TestUser::register(&app, &pool, "admin@test.com", Role::Admin).await;

    let res = app
        .authorized_request(Method::POST, "payments", &donor)
        .json(&serde_json::json!({ "payment_intent_id": "pi_1", "amount_cents": 2500 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let res = app
        .authorized_request(Method::POST, "payments", &donor)
        .json(&serde_json::json!({ "payment_intent_id": "pi_2", "amount_cents": 1000 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let res = app
        .authorized_request(Method::GET, "payments", &admin)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse response");
    assert_eq!(2, body["items"].as_array().unwrap().len());
    assert_eq!(3500, body["total_raised_cents"]);

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn duplicate_intent_ids_conflict(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let donor = TestUser::register(&app, &pool, "funder@test.com", Role::Donor).await;

    let payment = serde_json::json!({ "payment_intent_id": "pi_1", "amount_cents": 2500 });

    let res = app
        .authorized_request(Method::POST, "payments", &donor)
        .json(&payment)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let res = app
        .authorized_request(Method::POST, "payments", &donor)
        .json(&payment)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CONFLICT, res.status());

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn the_report_is_admin_only(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let volunteer = TestUser::register(&app, &pool, "volunteer@test.com", Role::Volunteer).await;

    let res = app
        .authorized_request(Method::GET, "payments", &volunteer)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::FORBIDDEN, res.status());

    Ok(())
}
