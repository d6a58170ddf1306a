use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use uuid::Uuid;

use bloodlink::model::{BlogStatus, NewBlog};
use bloodlink::repo::BlogsRepo;

use crate::auth::{Admin, Moderator};
use crate::error::{RestError, RestResult};

use super::paging;

#[derive(Debug, Deserialize)]
pub struct BlogBody {
    title: String,
    category: String,
    content: String,
    cover_image_url: Option<String>,
}

impl BlogBody {
    fn validated(self) -> RestResult<Self> {
        for (field, value) in [
            ("title", &self.title),
            ("category", &self.category),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                return Err(RestError::ParseError(format!("{} cannot be empty", field)));
            }
        }
        Ok(self)
    }
}

#[tracing::instrument(name = "Create a blog post", skip(moderator, body, pool))]
#[post("")]
async fn create(
    moderator: Moderator, // Volunteer/admin guard
    body: web::Json<BlogBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let body = body.into_inner().validated()?;
    let author = moderator.user;

    let new_blog = NewBlog {
        title: body.title,
        category: body.category,
        content: body.content,
        cover_image_url: body.cover_image_url,
        author_name: author.name,
        author_email: author.email,
        author_role: author.role,
    };

    let blog = BlogsRepo::insert(pool.get_ref(), &new_blog).await?;
    Ok(HttpResponse::Created().json(blog))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
}

/// Public listing: published posts only
#[tracing::instrument(name = "List published blog posts", skip(pool))]
#[get("")]
async fn list_published(
    params: web::Query<ListParams>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let (page, per_page) = paging(params.page, params.limit);

    let listing =
        BlogsRepo::fetch_page(pool.get_ref(), Some(BlogStatus::Published), page, per_page).await?;
    Ok(HttpResponse::Ok().json(listing))
}

#[derive(Debug, Deserialize)]
pub struct StaffListParams {
    status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

/// Moderation listing: drafts included
#[tracing::instrument(name = "List all blog posts", skip(moderator, pool))]
#[get("/all")]
async fn list_all(
    moderator: Moderator,
    params: web::Query<StaffListParams>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let status: Option<BlogStatus> = match params.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse().map_err(RestError::from)?),
    };
    let (page, per_page) = paging(params.page, params.limit);

    let listing = BlogsRepo::fetch_page(pool.get_ref(), status, page, per_page).await?;
    Ok(HttpResponse::Ok().json(listing))
}

/// Public read; drafts stay hidden
#[tracing::instrument(name = "Fetch a blog post", skip(pool))]
#[get("/{id}")]
async fn get_by_id(id: web::Path<Uuid>, pool: web::Data<PgPool>) -> RestResult<impl Responder> {
    let blog = BlogsRepo::fetch_by_id(pool.get_ref(), *id)
        .await?
        .filter(|blog| blog.status == BlogStatus::Published)
        .ok_or(RestError::NotFound)?;
    Ok(HttpResponse::Ok().json(blog))
}

#[tracing::instrument(name = "Edit a blog post", skip(moderator, body, pool))]
#[patch("/{id}")]
async fn edit(
    moderator: Moderator,
    id: web::Path<Uuid>,
    body: web::Json<BlogBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let body = body.into_inner().validated()?;

    let updated = BlogsRepo::update_content(
        pool.get_ref(),
        *id,
        &body.title,
        &body.category,
        &body.content,
        body.cover_image_url.as_deref(),
    )
    .await?;
    if !updated {
        return Err(RestError::NotFound);
    }

    let blog = BlogsRepo::fetch_by_id(pool.get_ref(), *id)
        .await?
        .ok_or(RestError::NotFound)?;
    Ok(HttpResponse::Ok().json(blog))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    status: String,
}

/// Publish or unpublish; admin only
#[tracing::instrument(name = "Set blog status", skip(admin, pool))]
#[patch("/{id}/status")]
async fn set_status(
    admin: Admin, // Admin guard
    id: web::Path<Uuid>,
    body: web::Json<StatusBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let status: BlogStatus = body.status.parse().map_err(RestError::from)?;

    let updated = BlogsRepo::set_status(pool.get_ref(), *id, status).await?;
    if !updated {
        return Err(RestError::NotFound);
    }

    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(name = "Delete a blog post", skip(admin, pool))]
#[delete("/{id}")]
async fn remove(
    admin: Admin,
    id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let deleted = BlogsRepo::delete(pool.get_ref(), *id).await?;
    if !deleted {
        return Err(RestError::NotFound);
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Blog API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/blogs")
        .service(list_all)
        .service(list_published)
        .service(create)
        .service(get_by_id)
        .service(edit)
        .service(set_status)
        .service(remove)
}
