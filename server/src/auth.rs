mod guard;
mod session;

pub use guard::{
    Admin, AdminOnly, CurrentUser, Donor, DonorOnly, Moderator, RoleGuard, RolePolicy, Staff,
};
pub use session::{Session, SessionClaims};
