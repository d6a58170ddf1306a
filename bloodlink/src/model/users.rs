use uuid::Uuid;

use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::domain::{AccountStatus, EmailAddress, PersonName, Role};

/// Profile upsert payload, captured on first login.
/// Role and status are never client-supplied; new accounts start as an
/// active donor.
#[derive(Debug)]
pub struct NewUser {
    pub name: PersonName,
    pub email: EmailAddress,
    pub photo_url: Option<String>,
}

/// Stored user record
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct User {
    /// ID of the user
    pub id: Uuid,
    /// User supplied data
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    /// Mutated only by an admin actor
    pub role: Role,
    pub status: AccountStatus,
    /// Creation and update timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The projection the access guard needs: who the caller is and what they
/// may do. Fetched per request by claim email.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAuth {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
}
