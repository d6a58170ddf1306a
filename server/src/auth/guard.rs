use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use actix_web::{dev, web, FromRequest, HttpRequest};

use sqlx::PgPool;

use uuid::Uuid;

use bloodlink::domain::{AccountStatus, EmailAddress, Role};
use bloodlink::lifecycle::Actor;
use bloodlink::repo::UsersRepo;

use crate::auth::Session;
use crate::error::{RestError, RestResult};

/// A caller with a resolved role: verified session claims joined with the
/// role/status columns of the users table.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: EmailAddress,
    pub role: Role,
    pub status: AccountStatus,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor<'_> {
        Actor::new(&self.email, self.role, self.status)
    }

    async fn resolve(req: &HttpRequest) -> RestResult<Self> {
        let session = Session::extract(req).await?;

        // NOTE: Must be registered with the application at startup
        let pool: &PgPool = req
            .app_data::<web::Data<PgPool>>()
            .expect("PgPool not registered for application");

        // A lookup failure blocks the request; it is never read as
        // "this user has no role".
        let auth = UsersRepo::fetch_auth_by_email(pool, &session.claims.email)
            .await
            .map_err(|e| {
                tracing::error!("Role lookup failed: {}", e);
                RestError::InternalError("Role lookup".into())
            })?
            .ok_or_else(|| RestError::Forbidden("No role assigned".into()))?;

        Ok(Self {
            id: auth.id,
            name: auth.name,
            email: session.claims.email,
            role: auth.role,
            status: auth.status,
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Self::resolve(&req).await })
    }
}

/// The role set a guarded route accepts
pub trait RolePolicy {
    const ALLOWED: &'static [Role];
}

#[derive(Debug)]
pub struct DonorOnly;

impl RolePolicy for DonorOnly {
    const ALLOWED: &'static [Role] = &[Role::Donor];
}

#[derive(Debug)]
pub struct AdminOnly;

impl RolePolicy for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Admin];
}

#[derive(Debug)]
pub struct Staff;

impl RolePolicy for Staff {
    const ALLOWED: &'static [Role] = &[Role::Admin, Role::Volunteer];
}

/// Role-gated extractor. One implementation for every protected surface,
/// parameterized by [`RolePolicy`]; the outcomes are exactly three:
/// anonymous -> 401, wrong role -> 403, allowed -> the wrapped user.
#[derive(Debug)]
pub struct RoleGuard<P: RolePolicy> {
    pub user: CurrentUser,
    _policy: PhantomData<P>,
}

impl<P: RolePolicy + 'static> FromRequest for RoleGuard<P> {
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = CurrentUser::resolve(&req).await?;

            if !P::ALLOWED.contains(&user.role) {
                return Err(RestError::Forbidden(format!(
                    "Role {} may not access this resource",
                    user.role
                )));
            }

            Ok(Self {
                user,
                _policy: PhantomData,
            })
        })
    }
}

/// Donor-only routes
pub type Donor = RoleGuard<DonorOnly>;
/// Admin-only routes
pub type Admin = RoleGuard<AdminOnly>;
/// Routes open to volunteers and admins
pub type Moderator = RoleGuard<Staff>;
