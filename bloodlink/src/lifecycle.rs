//! Authorization rules for the donation-request state machine.
//!
//! Pure decisions over (actor, action, request); no HTTP, no SQL. The REST
//! layer runs every mutation through [`authorize_create`] or [`authorize`]
//! before touching the database, and maps each [`Denial`] variant to its own
//! user-facing rejection.

use crate::domain::{AccountStatus, EmailAddress, RequestStatus, Role};
use crate::model::DonationRequest;

/// The acting user, as resolved by the session/role lookup.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub email: &'a EmailAddress,
    pub role: Role,
    pub status: AccountStatus,
}

impl<'a> Actor<'a> {
    pub fn new(email: &'a EmailAddress, role: Role, status: AccountStatus) -> Self {
        Self {
            email,
            role,
            status,
        }
    }

    fn is_requester(&self, request: &DonationRequest) -> bool {
        self.email.as_ref() == request.requester_email
    }
}

/// Mutations on an existing donation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Mutate recipient/date/time/message fields in place
    Edit,
    /// Commit as the fulfilling donor (pending -> inprogress)
    Donate,
    /// inprogress -> done
    Complete,
    /// inprogress -> canceled
    Cancel,
    /// Remove the request from listings
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Edit => "edit",
            Action::Donate => "donate",
            Action::Complete => "complete",
            Action::Cancel => "cancel",
            Action::Delete => "delete",
        }
    }
}

/// Why a lifecycle mutation was refused.
///
/// Each variant is a distinct outcome: a blocked account is not a validation
/// failure, and a self-donation attempt is not a generic "forbidden".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    #[error("Account is blocked")]
    Blocked,
    #[error("Role {role} may not {action} this request")]
    RoleNotAllowed { role: Role, action: &'static str },
    #[error("Only the requester may edit a request")]
    NotRequester,
    #[error("Requesters may not donate to their own request")]
    SelfDonation,
    #[error("Admins may not commit as donors")]
    AdminDonor,
    #[error("Cannot {action} a request that is {status}")]
    WrongStatus {
        action: &'static str,
        status: RequestStatus,
    },
}

/// Gate for creating a new request: donor role, active account.
pub fn authorize_create(actor: &Actor<'_>) -> Result<(), Denial> {
    if actor.status.is_blocked() {
        return Err(Denial::Blocked);
    }
    if actor.role != Role::Donor {
        return Err(Denial::RoleNotAllowed {
            role: actor.role,
            action: "create",
        });
    }
    Ok(())
}

/// Gate for mutating an existing request.
///
/// Blocked accounts are refused outright. For [`Action::Donate`] the admin
/// exclusion is checked before ownership, so an admin acting on their own
/// request is told "admins may not donate", not "no self-donation".
pub fn authorize(
    actor: &Actor<'_>,
    action: Action,
    request: &DonationRequest,
) -> Result<(), Denial> {
    if actor.status.is_blocked() {
        return Err(Denial::Blocked);
    }

    match action {
        Action::Edit => {
            if !actor.is_requester(request) {
                return Err(Denial::NotRequester);
            }
            expect_status(action, request, RequestStatus::Pending)
        }
        Action::Donate => {
            if actor.role == Role::Admin {
                return Err(Denial::AdminDonor);
            }
            if actor.is_requester(request) {
                return Err(Denial::SelfDonation);
            }
            expect_status(action, request, RequestStatus::Pending)
        }
        Action::Complete | Action::Cancel => {
            require_requester_or_staff(actor, action, request)?;
            expect_status(action, request, RequestStatus::InProgress)
        }
        Action::Delete => {
            require_requester_or_staff(actor, action, request)?;
            if request.status.is_terminal() {
                return Err(Denial::WrongStatus {
                    action: action.as_str(),
                    status: request.status,
                });
            }
            Ok(())
        }
    }
}

fn require_requester_or_staff(
    actor: &Actor<'_>,
    action: Action,
    request: &DonationRequest,
) -> Result<(), Denial> {
    let is_staff = matches!(actor.role, Role::Volunteer | Role::Admin);
    if actor.is_requester(request) || is_staff {
        Ok(())
    } else {
        Err(Denial::RoleNotAllowed {
            role: actor.role,
            action: action.as_str(),
        })
    }
}

fn expect_status(
    action: Action,
    request: &DonationRequest,
    expected: RequestStatus,
) -> Result<(), Denial> {
    if request.status == expected {
        Ok(())
    } else {
        Err(Denial::WrongStatus {
            action: action.as_str(),
            status: request.status,
        })
    }
}
