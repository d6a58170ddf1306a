use uuid::Uuid;

use sqlx::PgExecutor;

use crate::domain::{BloodGroup, EmailAddress, RequestStatus};
use crate::model::{DonationRequest, NewDonationRequest, RequestEdit};

use super::{page_offset, Page};

/// Listing restriction for donation requests.
///
/// `status: None` is the "all" case from the original filter contract; the
/// sentinel never reaches SQL as a value. `requester_email` scopes "my
/// requests" views; `blood_group`/`district` serve the public search.
#[derive(Debug, Default)]
pub struct RequestFilter<'a> {
    pub status: Option<RequestStatus>,
    pub requester_email: Option<&'a EmailAddress>,
    pub blood_group: Option<BloodGroup>,
    pub district: Option<&'a str>,
}

impl<'a> RequestFilter<'a> {
    pub fn with_status(status: Option<RequestStatus>) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn owned_by(email: &'a EmailAddress, status: Option<RequestStatus>) -> Self {
        Self {
            status,
            requester_email: Some(email),
            ..Self::default()
        }
    }
}

const FILTER_PREDICATE: &str = "($1::request_status is null or status = $1) \
     and ($2::text is null or requester_email = $2) \
     and ($3::blood_group is null or blood_group = $3) \
     and ($4::text is null or district = $4)";

pub struct DonationRequestsRepo;

impl DonationRequestsRepo {
    /// Insert a new request; status starts at pending with no donor attached
    #[tracing::instrument("Insert donation request", skip(executor, new_request))]
    pub async fn insert<'conn>(
        executor: impl PgExecutor<'conn>,
        new_request: &NewDonationRequest,
    ) -> sqlx::Result<DonationRequest> {
        sqlx::query_as::<_, DonationRequest>(
            "insert into donation_requests( \
                requester_name, requester_email, \
                recipient_name, district, upazila, hospital, address, \
                blood_group, donation_date, donation_time, message) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             returning *",
        )
        .bind(&new_request.requester_name)
        .bind(new_request.requester_email.as_ref())
        .bind(new_request.recipient.recipient_name.as_ref())
        .bind(&new_request.recipient.district)
        .bind(&new_request.recipient.upazila)
        .bind(&new_request.recipient.hospital)
        .bind(&new_request.recipient.address)
        .bind(new_request.blood_group)
        .bind(new_request.donation_date)
        .bind(new_request.donation_time)
        .bind(&new_request.message)
        .fetch_one(executor)
        .await
    }

    pub async fn fetch_by_id<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
    ) -> sqlx::Result<Option<DonationRequest>> {
        sqlx::query_as::<_, DonationRequest>("select * from donation_requests where id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Newest-first page of requests matching the filter
    #[tracing::instrument("Fetch a page of donation requests", skip(executor))]
    pub async fn fetch_page<'conn, E>(
        executor: E,
        filter: &RequestFilter<'_>,
        page: u32,
        per_page: u32,
    ) -> sqlx::Result<Page<DonationRequest>>
    where
        E: PgExecutor<'conn> + Copy,
    {
        let requester_email: Option<&str> = filter.requester_email.map(|email| email.as_ref());

        let count_sql = format!(
            "select count(*) from donation_requests where {}",
            FILTER_PREDICATE
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.status)
            .bind(requester_email)
            .bind(filter.blood_group)
            .bind(filter.district)
            .fetch_one(executor)
            .await?;

        let items_sql = format!(
            "select * from donation_requests where {} \
             order by created_at desc limit $5 offset $6",
            FILTER_PREDICATE
        );
        let items = sqlx::query_as::<_, DonationRequest>(&items_sql)
            .bind(filter.status)
            .bind(requester_email)
            .bind(filter.blood_group)
            .bind(filter.district)
            .bind(i64::from(per_page))
            .bind(page_offset(page, per_page))
            .fetch_all(executor)
            .await?;

        Ok(Page::new(items, total, per_page))
    }

    /// Edit the recipient/date/time/message fields of a pending request.
    /// Returns false when the request is missing or no longer pending.
    #[tracing::instrument("Update donation request details", skip(executor, edit))]
    pub async fn update_details<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
        edit: &RequestEdit,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "update donation_requests \
             set recipient_name = $2, district = $3, upazila = $4, hospital = $5, \
                 address = $6, donation_date = $7, donation_time = $8, message = $9, \
                 updated_at = now() \
             where id = $1 and status = 'pending'",
        )
        .bind(id)
        .bind(edit.recipient.recipient_name.as_ref())
        .bind(&edit.recipient.district)
        .bind(&edit.recipient.upazila)
        .bind(&edit.recipient.hospital)
        .bind(&edit.recipient.address)
        .bind(edit.donation_date)
        .bind(edit.donation_time)
        .bind(&edit.message)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// pending -> inprogress, attaching the committing donor.
    /// The status predicate makes a concurrent commit lose cleanly: the
    /// second writer sees zero rows affected.
    #[tracing::instrument("Commit a donor to a request", skip(executor))]
    pub async fn commit_donor<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
        donor_name: &str,
        donor_email: &EmailAddress,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "update donation_requests \
             set status = 'inprogress', donor_name = $2, donor_email = $3, updated_at = now() \
             where id = $1 and status = 'pending'",
        )
        .bind(id)
        .bind(donor_name)
        .bind(donor_email.as_ref())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// inprogress -> done | canceled. Donor columns are untouched so the
    /// committed donor survives for history.
    #[tracing::instrument("Set terminal request status", skip(executor))]
    pub async fn set_terminal_status<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
        status: RequestStatus,
    ) -> sqlx::Result<bool> {
        debug_assert!(status.is_terminal());
        let result = sqlx::query(
            "update donation_requests set status = $2, updated_at = now() \
             where id = $1 and status = 'inprogress'",
        )
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a non-terminal request from listings
    #[tracing::instrument("Delete donation request", skip(executor))]
    pub async fn delete<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "delete from donation_requests where id = $1 and status in ('pending', 'inprogress')",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
