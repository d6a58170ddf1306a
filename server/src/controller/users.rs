use actix_web::dev::HttpServiceFactory;
use actix_web::{get, patch, post, web, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use uuid::Uuid;

use bloodlink::domain::{AccountStatus, EmailAddress, Role};
use bloodlink::model::NewUser;
use bloodlink::repo::UsersRepo;

use crate::auth::{Admin, CurrentUser, Session};
use crate::error::{RestError, RestResult};

use super::paging;

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    photo_url: Option<String>,
}

/// Upsert the caller's profile. Called once after login; role and status
/// stay whatever the backend holds for this email.
#[tracing::instrument(name = "Upsert user profile", skip(session, pool))]
#[post("")]
async fn upsert_profile(
    session: Session,
    body: web::Json<ProfileBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let new_user = NewUser {
        name: session.claims.name,
        email: session.claims.email,
        photo_url: body.into_inner().photo_url,
    };

    let user = UsersRepo::upsert(pool.get_ref(), &new_user).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(name = "Fetch current user", skip(user, pool))]
#[get("/me")]
async fn me(user: CurrentUser, pool: web::Data<PgPool>) -> RestResult<impl Responder> {
    let user = UsersRepo::fetch_by_email(pool.get_ref(), &user.email)
        .await?
        .ok_or(RestError::NotFound)?;
    Ok(HttpResponse::Ok().json(user))
}

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    email: String,
}

/// Role lookup for the caller's own email
#[tracing::instrument(name = "Fetch user role", skip(session, pool))]
#[get("/role")]
async fn role(
    session: Session,
    query: web::Query<RoleQuery>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let email: EmailAddress = query.email.parse().map_err(RestError::from)?;
    if email != session.claims.email {
        return Err(RestError::Forbidden(
            "Role lookups are limited to your own account".into(),
        ));
    }

    let auth = UsersRepo::fetch_auth_by_email(pool.get_ref(), &email)
        .await?
        .ok_or(RestError::NotFound)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "role": auth.role })))
}

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[tracing::instrument(name = "List users", skip(admin, pool))]
#[get("")]
async fn list(
    admin: Admin, // Admin guard
    params: web::Query<UserListParams>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let status: Option<AccountStatus> = match params.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse().map_err(RestError::from)?),
    };
    let (page, per_page) = paging(params.page, params.limit);

    let listing = UsersRepo::fetch_page(pool.get_ref(), status, page, per_page).await?;
    Ok(HttpResponse::Ok().json(listing))
}

#[derive(Debug, Deserialize)]
pub struct SetRoleBody {
    role: String,
}

#[tracing::instrument(name = "Set user role", skip(admin, pool))]
#[patch("/{id}/role")]
async fn set_role(
    admin: Admin,
    id: web::Path<Uuid>,
    body: web::Json<SetRoleBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let new_role: Role = body.role.parse().map_err(RestError::from)?;

    let updated = UsersRepo::set_role(pool.get_ref(), *id, new_role).await?;
    if !updated {
        return Err(RestError::NotFound);
    }

    Ok(HttpResponse::Ok().finish())
}

#[derive(Debug, Deserialize)]
pub struct SetStatusBody {
    status: String,
}

#[tracing::instrument(name = "Set user status", skip(admin, pool))]
#[patch("/{id}/status")]
async fn set_status(
    admin: Admin,
    id: web::Path<Uuid>,
    body: web::Json<SetStatusBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let status: AccountStatus = body.status.parse().map_err(RestError::from)?;

    let updated = UsersRepo::set_status(pool.get_ref(), *id, status).await?;
    if !updated {
        return Err(RestError::NotFound);
    }

    Ok(HttpResponse::Ok().finish())
}

/// User API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/users")
        .service(me)
        .service(role)
        .service(list)
        .service(upsert_profile)
        .service(set_role)
        .service(set_status)
}
