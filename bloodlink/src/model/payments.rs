use uuid::Uuid;

use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::domain::EmailAddress;

/// A completed fundraiser payment, recorded after the external processor
/// confirmed the charge. This app only reports on these rows.
#[derive(Debug)]
pub struct NewPayment {
    pub payment_intent_id: String,
    pub amount_cents: i64,
    pub donor_email: EmailAddress,
}

/// Stored payment record
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FundraiserPayment {
    pub id: Uuid,
    /// Processor-issued intent id
    pub payment_intent_id: String,
    pub amount_cents: i64,
    pub donor_email: String,
    pub created_at: DateTime<Utc>,
}
