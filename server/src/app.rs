use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use sqlx::PgPool;

use tracing_actix_web::TracingLogger;

use bloodlink::client::PaymentClient;
use bloodlink::crypto::SigningKey;

use crate::controller::{blogs, donation_requests, geo, payments, users};

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("I am alive")
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    pool: PgPool,
    signing_key: SigningKey,
    payment_client: PaymentClient,
) -> anyhow::Result<Server> {
    // Wrap application data
    let pool = web::Data::new(pool);
    let signing_key = web::Data::new(signing_key);
    let payment_client = web::Data::new(payment_client);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(signing_key.clone())
            .app_data(payment_client.clone())
            .service(health_check)
            .service(donation_requests::scope())
            .service(users::scope())
            .service(blogs::scope())
            .service(payments::scope())
            .service(geo::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
