use std::net::TcpListener;
use std::time::Duration;

use reqwest::{Client, Method, Response};

use secrecy::Secret;

use sqlx::PgPool;

use url::Url;

use uuid::Uuid;

use wiremock::MockServer;

use bloodlink::client::PaymentClient;
use bloodlink::crypto::{SigningKey, Token};
use bloodlink::domain::{AccountStatus, Role};
use bloodlink::model::NewUser;
use bloodlink::repo::UsersRepo;

use server::app;
use server::auth::SessionClaims;

pub struct TestApp {
    addr: String,
    signing_key: SigningKey,

    pub client: Client,
    pub payment_server: MockServer,
}

impl TestApp {
    pub async fn spawn(pool: &PgPool) -> Self {
        use rand::{distributions::Alphanumeric, Rng};

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let signing_key = {
            let rand_key: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(7)
                .map(char::from)
                .collect();
            let rand_key = Secret::new(rand_key);

            SigningKey::new(&rand_key).expect("Failed to create signing key")
        };

        let payment_server = MockServer::start().await;

        let payment_client = {
            let api_base_url =
                Url::parse(&payment_server.uri()).expect("Failed to parse mock server uri");
            let api_secret_key = Secret::new("sk_test_authorization".into());
            let api_timeout = Duration::from_secs(2);

            PaymentClient::new(api_timeout, api_base_url, api_secret_key, "usd".into())
                .expect("Failed to create payment client")
        };

        let server = app::run(listener, pool.clone(), signing_key.clone(), payment_client)
            .expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self {
            addr,
            signing_key,
            client,
            payment_server,
        }
    }

    /// Mint a session token the way the identity provider would
    pub fn token_for(&self, email: &str, name: &str) -> String {
        let claims = SessionClaims {
            email: email.parse().expect("Failed to parse email address"),
            name: name.parse().expect("Failed to parse person name"),
        };

        let token = Token::builder(claims)
            .expires_in(chrono::Duration::minutes(30))
            .sign(self.signing_key.as_ref())
            .expect("Failed to sign session token");

        token.as_ref().to_string()
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub fn authorized_request(
        &self,
        method: Method,
        url: &str,
        user: &TestUser,
    ) -> reqwest::RequestBuilder {
        self.request(method, url).bearer_auth(&user.token)
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn create_request(
        &self,
        user: &TestUser,
        body: &serde_json::Value,
    ) -> reqwest::Result<Response> {
        self.authorized_request(Method::POST, "donation-requests", user)
            .json(body)
            .send()
            .await
    }

    pub async fn donate(&self, user: &TestUser, id: Uuid) -> reqwest::Result<Response> {
        self.authorized_request(Method::PATCH, &format!("donation-requests/{}/donate", id), user)
            .send()
            .await
    }

    pub async fn set_request_status(
        &self,
        user: &TestUser,
        id: Uuid,
        status: &str,
    ) -> reqwest::Result<Response> {
        self.authorized_request(Method::PATCH, &format!("donation-requests/{}/status", id), user)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
    }

    pub async fn get_request(&self, user: &TestUser, id: Uuid) -> reqwest::Result<Response> {
        self.authorized_request(Method::GET, &format!("donation-requests/{}", id), user)
            .send()
            .await
    }
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

impl TestUser {
    /// Seed a user row and mint a matching session token
    pub async fn register(app: &TestApp, pool: &PgPool, email: &str, role: Role) -> Self {
        let name = format!("User {}", email.split('@').next().unwrap());

        let new_user = NewUser {
            name: name.parse().expect("Failed to parse person name"),
            email: email.parse().expect("Failed to parse email address"),
            photo_url: None,
        };

        let user = UsersRepo::upsert(pool, &new_user)
            .await
            .expect("Failed to insert test user");

        if role != Role::Donor {
            UsersRepo::set_role(pool, user.id, role)
                .await
                .expect("Failed to set test user role");
        }

        let token = app.token_for(email, &name);

        Self {
            id: user.id,
            name,
            email: email.to_string(),
            token,
        }
    }

    pub async fn block(&self, pool: &PgPool) {
        UsersRepo::set_status(pool, self.id, AccountStatus::Blocked)
            .await
            .expect("Failed to block test user");
    }
}

/// A well-formed create-request body
pub fn request_body() -> serde_json::Value {
    serde_json::json!({
        "recipient_name": "Test Recipient",
        "district": "Dhaka",
        "upazila": "Savar",
        "hospital": "Enam Medical College",
        "address": "Savar, Dhaka",
        "blood_group": "O+",
        "donation_date": "2025-03-10",
        "donation_time": "10:30:00",
        "message": "Surgery scheduled",
    })
}

/// Create a request through the API and return its id
pub async fn seed_request(app: &TestApp, requester: &TestUser) -> Uuid {
    let res = app
        .create_request(requester, &request_body())
        .await
        .expect("Failed to execute create request");
    assert!(
        res.status().is_success(),
        "Failed to seed request: {}",
        res.status()
    );

    let body: serde_json::Value = res.json().await.expect("Failed to parse create response");
    body["id"]
        .as_str()
        .expect("Create response missing id")
        .parse()
        .expect("Create response id is not a uuid")
}
