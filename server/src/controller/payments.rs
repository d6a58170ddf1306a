use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use serde::{Deserialize, Serialize};

use sqlx::PgPool;

use bloodlink::client::PaymentClient;
use bloodlink::model::{FundraiserPayment, NewPayment};
use bloodlink::repo::PaymentsRepo;

use crate::auth::{Admin, Session};
use crate::error::{RestError, RestResult};

use super::paging;

#[derive(Debug, Deserialize)]
pub struct CreateIntentBody {
    amount_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct IntentResponse {
    payment_intent_id: String,
    client_secret: String,
}

/// Ask the processor for a payment intent. Nothing is recorded here; the
/// confirmed charge comes back through [`record`].
#[tracing::instrument(name = "Create payment intent", skip(_session, payment_client))]
#[post("/intent")]
async fn create_intent(
    _session: Session,
    body: web::Json<CreateIntentBody>,
    payment_client: web::Data<PaymentClient>,
) -> RestResult<impl Responder> {
    let amount_cents = positive_amount(body.amount_cents)?;

    let intent = payment_client
        .create_intent(amount_cents)
        .await
        .map_err(|e| {
            tracing::error!("Payment processor call failed: {}", e);
            RestError::InternalError("Payment processor call failed".into())
        })?;

    Ok(HttpResponse::Ok().json(IntentResponse {
        payment_intent_id: intent.id,
        client_secret: intent.client_secret,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentBody {
    payment_intent_id: String,
    amount_cents: i64,
}

/// Record a confirmed charge against the caller's email
#[tracing::instrument(name = "Record fundraiser payment", skip(session, pool))]
#[post("")]
async fn record(
    session: Session,
    body: web::Json<RecordPaymentBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let body = body.into_inner();
    let amount_cents = positive_amount(body.amount_cents)?;
    if body.payment_intent_id.trim().is_empty() {
        return Err(RestError::ParseError("payment_intent_id cannot be empty".into()));
    }

    let new_payment = NewPayment {
        payment_intent_id: body.payment_intent_id,
        amount_cents,
        donor_email: session.claims.email,
    };

    let payment = PaymentsRepo::insert(pool.get_ref(), &new_payment)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            if duplicate {
                RestError::Conflict("Payment already recorded".into())
            } else {
                e.into()
            }
        })?;

    Ok(HttpResponse::Created().json(payment))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PaymentReport {
    items: Vec<FundraiserPayment>,
    total_pages: u32,
    total_raised_cents: i64,
}

#[tracing::instrument(name = "List fundraiser payments", skip(admin, pool))]
#[get("")]
async fn list(
    admin: Admin, // Admin guard
    params: web::Query<ListParams>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let (page, per_page) = paging(params.page, params.limit);

    let listing = PaymentsRepo::fetch_page(pool.get_ref(), page, per_page).await?;
    let total_raised_cents = PaymentsRepo::total_raised_cents(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(PaymentReport {
        items: listing.items,
        total_pages: listing.total_pages,
        total_raised_cents,
    }))
}

fn positive_amount(amount_cents: i64) -> RestResult<i64> {
    if amount_cents <= 0 {
        Err(RestError::ParseError("amount_cents must be positive".into()))
    } else {
        Ok(amount_cents)
    }
}

/// Fundraiser payment API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/payments")
        .service(create_intent)
        .service(list)
        .service(record)
}
