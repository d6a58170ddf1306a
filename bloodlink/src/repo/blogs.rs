use uuid::Uuid;

use sqlx::PgExecutor;

use crate::model::{Blog, BlogStatus, NewBlog};

use super::{page_offset, Page};

pub struct BlogsRepo;

impl BlogsRepo {
    /// Insert a new post; every post starts as a draft
    #[tracing::instrument("Insert blog post", skip(executor, new_blog))]
    pub async fn insert<'conn>(
        executor: impl PgExecutor<'conn>,
        new_blog: &NewBlog,
    ) -> sqlx::Result<Blog> {
        sqlx::query_as::<_, Blog>(
            "insert into blogs(title, category, content, cover_image_url, \
                               author_name, author_email, author_role) \
             values ($1, $2, $3, $4, $5, $6, $7) \
             returning *",
        )
        .bind(&new_blog.title)
        .bind(&new_blog.category)
        .bind(&new_blog.content)
        .bind(new_blog.cover_image_url.as_deref())
        .bind(&new_blog.author_name)
        .bind(new_blog.author_email.as_ref())
        .bind(new_blog.author_role)
        .fetch_one(executor)
        .await
    }

    pub async fn fetch_by_id<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
    ) -> sqlx::Result<Option<Blog>> {
        sqlx::query_as::<_, Blog>("select * from blogs where id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument("Fetch a page of blog posts", skip(executor))]
    pub async fn fetch_page<'conn, E>(
        executor: E,
        status: Option<BlogStatus>,
        page: u32,
        per_page: u32,
    ) -> sqlx::Result<Page<Blog>>
    where
        E: PgExecutor<'conn> + Copy,
    {
        let total: i64 = sqlx::query_scalar(
            "select count(*) from blogs where ($1::blog_status is null or status = $1)",
        )
        .bind(status)
        .fetch_one(executor)
        .await?;

        let items = sqlx::query_as::<_, Blog>(
            "select * from blogs \
             where ($1::blog_status is null or status = $1) \
             order by created_at desc \
             limit $2 offset $3",
        )
        .bind(status)
        .bind(i64::from(per_page))
        .bind(page_offset(page, per_page))
        .fetch_all(executor)
        .await?;

        Ok(Page::new(items, total, per_page))
    }

    /// Edit title/category/content/cover in place; status is not touched
    #[tracing::instrument("Update blog content", skip(executor, title, category, content))]
    pub async fn update_content<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
        title: &str,
        category: &str,
        content: &str,
        cover_image_url: Option<&str>,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "update blogs \
             set title = $2, category = $3, content = $4, cover_image_url = $5, \
                 updated_at = now() \
             where id = $1",
        )
        .bind(id)
        .bind(title)
        .bind(category)
        .bind(content)
        .bind(cover_image_url)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Publish or unpublish a post
    #[tracing::instrument("Set blog status", skip(executor))]
    pub async fn set_status<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
        status: BlogStatus,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query("update blogs set status = $2, updated_at = now() where id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument("Delete blog post", skip(executor))]
    pub async fn delete<'conn>(executor: impl PgExecutor<'conn>, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("delete from blogs where id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
