use sqlx::PgExecutor;

use crate::model::{FundraiserPayment, NewPayment};

use super::{page_offset, Page};

pub struct PaymentsRepo;

impl PaymentsRepo {
    /// Record a processor-confirmed payment.
    /// `payment_intent_id` is unique; recording the same intent twice is a
    /// unique violation the caller turns into a conflict.
    #[tracing::instrument("Insert fundraiser payment", skip(executor))]
    pub async fn insert<'conn>(
        executor: impl PgExecutor<'conn>,
        new_payment: &NewPayment,
    ) -> sqlx::Result<FundraiserPayment> {
        sqlx::query_as::<_, FundraiserPayment>(
            "insert into fundraiser_payments(payment_intent_id, amount_cents, donor_email) \
             values ($1, $2, $3) \
             returning *",
        )
        .bind(&new_payment.payment_intent_id)
        .bind(new_payment.amount_cents)
        .bind(new_payment.donor_email.as_ref())
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument("Fetch a page of payments", skip(executor))]
    pub async fn fetch_page<'conn, E>(
        executor: E,
        page: u32,
        per_page: u32,
    ) -> sqlx::Result<Page<FundraiserPayment>>
    where
        E: PgExecutor<'conn> + Copy,
    {
        let total: i64 = sqlx::query_scalar("select count(*) from fundraiser_payments")
            .fetch_one(executor)
            .await?;

        let items = sqlx::query_as::<_, FundraiserPayment>(
            "select * from fundraiser_payments \
             order by created_at desc \
             limit $1 offset $2",
        )
        .bind(i64::from(per_page))
        .bind(page_offset(page, per_page))
        .fetch_all(executor)
        .await?;

        Ok(Page::new(items, total, per_page))
    }

    /// Sum of all recorded payments, for the fundraiser report header
    #[tracing::instrument("Sum recorded payments", skip(executor))]
    pub async fn total_raised_cents<'conn>(
        executor: impl PgExecutor<'conn>,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar("select coalesce(sum(amount_cents), 0)::bigint from fundraiser_payments")
            .fetch_one(executor)
            .await
    }
}
