use reqwest::{Method, StatusCode};

use sqlx::PgPool;

use bloodlink::domain::Role;

use crate::helpers::{request_body, TestApp, TestUser};

#[sqlx::test(migrations = "../migrations")]
async fn anonymous_caller_gets_401_with_the_original_path(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    for path in ["donation-requests/mine", "users/me", "payments"] {
        let res = app
            .request(Method::GET, path)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::UNAUTHORIZED, res.status(), "{}", path);

        let body: serde_json::Value = res.json().await.expect("Failed to parse error body");
        assert_eq!(format!("/{}", path), body["from"], "{}", path);
    }

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn garbage_token_gets_401(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .request(Method::GET, "users/me")
        .bearer_auth("not.a-real-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn wrong_role_gets_403_not_401(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let volunteer = TestUser::register(&app, &pool, "volunteer@test.com", Role::Volunteer).await;
    let donor = TestUser::register(&app, &pool, "donor@test.com", Role::Donor).await;

    // A volunteer on a donor-only route
    let res = app
        .create_request(&volunteer, &request_body())
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::FORBIDDEN, res.status());

    // A donor on a staff route
    let res = app
        .authorized_request(Method::GET, "donation-requests", &donor)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::FORBIDDEN, res.status());

    // A donor on an admin route
    let res = app
        .authorized_request(Method::GET, "users", &donor)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::FORBIDDEN, res.status());

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn allowed_roles_pass(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let volunteer = TestUser::register(&app, &pool, "volunteer@test.com", Role::Volunteer).await;
    let admin = TestUser::register(&app, &pool, "admin@test.com", Role::Admin).await;

    // Staff routes accept both volunteers and admins
    for user in [&volunteer, &admin] {
        let res = app
            .authorized_request(Method::GET, "donation-requests", user)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::OK, res.status());
    }

    // Admin routes accept only admins
    let res = app
        .authorized_request(Method::GET, "users", &admin)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let res = app
        .authorized_request(Method::GET, "users", &volunteer)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::FORBIDDEN, res.status());

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn valid_token_without_a_user_row_is_forbidden(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    // The token verifies, but no role exists for the email
    let res = app
        .request(Method::GET, "users/me")
        .bearer_auth(app.token_for("ghost@test.com", "Ghost User"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::FORBIDDEN, res.status());

    Ok(())
}
