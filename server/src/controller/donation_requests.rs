use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

use chrono::{NaiveDate, NaiveTime};

use serde::Deserialize;

use sqlx::PgPool;

use uuid::Uuid;

use bloodlink::domain::{BloodGroup, RequestStatus};
use bloodlink::lifecycle::{self, Action};
use bloodlink::model::{DonationRequest, NewDonationRequest, RecipientDetails, RequestEdit};
use bloodlink::repo::{DonationRequestsRepo, RequestFilter};

use crate::auth::{CurrentUser, Donor, Moderator, Session};
use crate::error::{RestError, RestResult};

use super::paging;

#[derive(Debug, Deserialize)]
pub struct RequestBody {
    recipient_name: String,
    district: String,
    upazila: String,
    hospital: String,
    address: String,
    blood_group: String,
    donation_date: NaiveDate,
    donation_time: NaiveTime,
    message: String,
}

impl RequestBody {
    fn recipient(&self) -> RestResult<RecipientDetails> {
        Ok(RecipientDetails {
            recipient_name: self
                .recipient_name
                .parse()
                .map_err(RestError::from)?,
            district: required_text("district", &self.district)?,
            upazila: required_text("upazila", &self.upazila)?,
            hospital: required_text("hospital", &self.hospital)?,
            address: required_text("address", &self.address)?,
        })
    }

    fn into_new_request(self, requester: &CurrentUser) -> RestResult<NewDonationRequest> {
        let recipient = self.recipient()?;
        let blood_group: BloodGroup = self
            .blood_group
            .parse()
            .map_err(RestError::from)?;

        Ok(NewDonationRequest {
            requester_name: requester.name.clone(),
            requester_email: requester.email.clone(),
            recipient,
            blood_group,
            donation_date: self.donation_date,
            donation_time: self.donation_time,
            message: self.message,
        })
    }

    fn into_edit(self) -> RestResult<RequestEdit> {
        let recipient = self.recipient()?;
        Ok(RequestEdit {
            recipient,
            donation_date: self.donation_date,
            donation_time: self.donation_time,
            message: self.message,
        })
    }
}

fn required_text(field: &str, value: &str) -> RestResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(RestError::ParseError(format!("{} cannot be empty", field)))
    } else {
        Ok(value.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

impl ListParams {
    fn status_filter(&self) -> RestResult<Option<RequestStatus>> {
        match self.status.as_deref() {
            None => Ok(None),
            Some(raw) => RequestStatus::parse_filter(raw).map_err(Into::into),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenListParams {
    blood_group: Option<String>,
    district: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[tracing::instrument(name = "Create a donation request", skip(pool, body))]
#[post("")]
async fn create(
    donor: Donor, // Donor guard
    body: web::Json<RequestBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let user = donor.user;
    lifecycle::authorize_create(&user.actor())?;

    let new_request = body.into_inner().into_new_request(&user)?;
    let request = DonationRequestsRepo::insert(pool.get_ref(), &new_request).await?;

    Ok(HttpResponse::Created().json(request))
}

/// Public search over open (pending) requests
#[tracing::instrument(name = "List open donation requests", skip(pool))]
#[get("/open")]
async fn list_open(
    params: web::Query<OpenListParams>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let blood_group: Option<BloodGroup> = params
        .blood_group
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(RestError::from)?;

    let filter = RequestFilter {
        status: Some(RequestStatus::Pending),
        requester_email: None,
        blood_group,
        district: params.district.as_deref(),
    };
    let (page, per_page) = paging(params.page, params.limit);

    let listing = DonationRequestsRepo::fetch_page(pool.get_ref(), &filter, page, per_page).await?;
    Ok(HttpResponse::Ok().json(listing))
}

/// The caller's own requests
#[tracing::instrument(name = "List my donation requests", skip(session, pool))]
#[get("/mine")]
async fn list_mine(
    session: Session,
    params: web::Query<ListParams>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let status = params.status_filter()?;
    let filter = RequestFilter::owned_by(&session.claims.email, status);
    let (page, per_page) = paging(params.page, params.limit);

    let listing = DonationRequestsRepo::fetch_page(pool.get_ref(), &filter, page, per_page).await?;
    Ok(HttpResponse::Ok().json(listing))
}

/// Moderation view over every request
#[tracing::instrument(name = "List all donation requests", skip(moderator, pool))]
#[get("")]
async fn list_all(
    moderator: Moderator, // Volunteer/admin guard
    params: web::Query<ListParams>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let filter = RequestFilter::with_status(params.status_filter()?);
    let (page, per_page) = paging(params.page, params.limit);

    let listing = DonationRequestsRepo::fetch_page(pool.get_ref(), &filter, page, per_page).await?;
    Ok(HttpResponse::Ok().json(listing))
}

#[tracing::instrument(name = "Fetch a donation request", skip(_session, pool))]
#[get("/{id}")]
async fn get_by_id(
    _session: Session,
    id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let request = fetch_or_404(pool.get_ref(), *id).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[tracing::instrument(name = "Edit a donation request", skip(user, body, pool))]
#[patch("/{id}")]
async fn edit(
    user: CurrentUser,
    id: web::Path<Uuid>,
    body: web::Json<RequestBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let request = fetch_or_404(pool.get_ref(), *id).await?;
    lifecycle::authorize(&user.actor(), Action::Edit, &request)?;

    let edit = body.into_inner().into_edit()?;
    let updated = DonationRequestsRepo::update_details(pool.get_ref(), request.id, &edit).await?;
    if !updated {
        return Err(RestError::Conflict("Request is no longer pending".into()));
    }

    let request = fetch_or_404(pool.get_ref(), request.id).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// Commit the caller as the fulfilling donor.
/// The donor identity comes from the session, never from the body.
#[tracing::instrument(name = "Commit as donor", skip(user, pool))]
#[patch("/{id}/donate")]
async fn donate(
    user: CurrentUser,
    id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let request = fetch_or_404(pool.get_ref(), *id).await?;
    lifecycle::authorize(&user.actor(), Action::Donate, &request)?;

    let committed =
        DonationRequestsRepo::commit_donor(pool.get_ref(), request.id, &user.name, &user.email)
            .await?;
    if !committed {
        // A concurrent donor won the commit
        return Err(RestError::Conflict("Request is no longer pending".into()));
    }

    let request = fetch_or_404(pool.get_ref(), request.id).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    status: String,
}

#[tracing::instrument(name = "Transition a donation request", skip(user, pool))]
#[patch("/{id}/status")]
async fn set_status(
    user: CurrentUser,
    id: web::Path<Uuid>,
    body: web::Json<StatusBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let status: RequestStatus = body
        .status
        .parse()
        .map_err(RestError::from)?;
    let action = match status {
        RequestStatus::Done => Action::Complete,
        RequestStatus::Canceled => Action::Cancel,
        RequestStatus::Pending | RequestStatus::InProgress => {
            return Err(RestError::ParseError(
                "Only done or canceled can be set directly".into(),
            ));
        }
    };

    let request = fetch_or_404(pool.get_ref(), *id).await?;
    lifecycle::authorize(&user.actor(), action, &request)?;

    let updated =
        DonationRequestsRepo::set_terminal_status(pool.get_ref(), request.id, status).await?;
    if !updated {
        return Err(RestError::Conflict("Request is not in progress".into()));
    }

    let request = fetch_or_404(pool.get_ref(), request.id).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[tracing::instrument(name = "Delete a donation request", skip(user, pool))]
#[delete("/{id}")]
async fn remove(
    user: CurrentUser,
    id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let request = fetch_or_404(pool.get_ref(), *id).await?;
    lifecycle::authorize(&user.actor(), Action::Delete, &request)?;

    let deleted = DonationRequestsRepo::delete(pool.get_ref(), request.id).await?;
    if !deleted {
        return Err(RestError::Conflict("Request is already closed".into()));
    }

    Ok(HttpResponse::NoContent())
}

async fn fetch_or_404(pool: &PgPool, id: Uuid) -> RestResult<DonationRequest> {
    DonationRequestsRepo::fetch_by_id(pool, id)
        .await?
        .ok_or(RestError::NotFound)
}

/// Donation request API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/donation-requests")
        .service(list_open)
        .service(list_mine)
        .service(list_all)
        .service(create)
        .service(get_by_id)
        .service(edit)
        .service(donate)
        .service(set_status)
        .service(remove)
}
