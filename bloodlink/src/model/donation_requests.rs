use uuid::Uuid;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use serde::Serialize;

use crate::domain::{BloodGroup, EmailAddress, PersonName, RequestStatus};

/// Validated payload for creating a donation request.
/// The requester snapshot comes from the resolved session, never from the
/// body; the name was validated when the profile was stored.
#[derive(Debug)]
pub struct NewDonationRequest {
    pub requester_name: String,
    pub requester_email: EmailAddress,
    pub recipient: RecipientDetails,
    pub blood_group: BloodGroup,
    pub donation_date: NaiveDate,
    pub donation_time: NaiveTime,
    pub message: String,
}

/// Where the donation is needed.
#[derive(Debug)]
pub struct RecipientDetails {
    pub recipient_name: PersonName,
    pub district: String,
    pub upazila: String,
    pub hospital: String,
    pub address: String,
}

/// In-place edit of a pending request: the recipient/date/time/message
/// fields. The requester snapshot, blood group, and status never travel
/// through an edit.
#[derive(Debug)]
pub struct RequestEdit {
    pub recipient: RecipientDetails,
    pub donation_date: NaiveDate,
    pub donation_time: NaiveTime,
    pub message: String,
}

/// Stored donation-request record.
///
/// `donor_name`/`donor_email` stay `NULL` while the request is pending and
/// are never cleared once set; `done` and `canceled` keep them for history.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DonationRequest {
    pub id: Uuid,
    /// Requester snapshot, immutable after creation
    pub requester_name: String,
    pub requester_email: String,
    /// Recipient details, editable while pending
    pub recipient_name: String,
    pub district: String,
    pub upazila: String,
    pub hospital: String,
    pub address: String,
    pub blood_group: BloodGroup,
    pub donation_date: NaiveDate,
    pub donation_time: NaiveTime,
    pub message: String,
    pub status: RequestStatus,
    /// Committing donor, set by the pending -> inprogress transition
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
