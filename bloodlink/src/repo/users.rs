use uuid::Uuid;

use sqlx::PgExecutor;

use crate::domain::{AccountStatus, EmailAddress, Role};
use crate::model::{NewUser, User, UserAuth};

use super::{page_offset, Page};

pub struct UsersRepo;

impl UsersRepo {
    /// Insert a user record, or refresh the profile fields of an existing
    /// one. Role and status are left alone on conflict; only an admin
    /// mutates those.
    #[tracing::instrument("Upsert a user record", skip(executor))]
    pub async fn upsert<'conn>(
        executor: impl PgExecutor<'conn>,
        new_user: &NewUser,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            "insert into users(name, email, photo_url) values ($1, $2, $3) \
             on conflict (email) do update \
             set name = excluded.name, photo_url = excluded.photo_url, updated_at = now() \
             returning *",
        )
        .bind(new_user.name.as_ref())
        .bind(new_user.email.as_ref())
        .bind(new_user.photo_url.as_deref())
        .fetch_one(executor)
        .await
    }

    pub async fn fetch_by_email<'conn>(
        executor: impl PgExecutor<'conn>,
        email: &EmailAddress,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("select * from users where email = $1")
            .bind(email.as_ref())
            .fetch_optional(executor)
            .await
    }

    /// The role/status projection the access guard resolves per request
    #[tracing::instrument("Fetch auth record by email", skip(executor))]
    pub async fn fetch_auth_by_email<'conn>(
        executor: impl PgExecutor<'conn>,
        email: &EmailAddress,
    ) -> sqlx::Result<Option<UserAuth>> {
        sqlx::query_as::<_, UserAuth>(
            "select id, name, email, role, status from users where email = $1",
        )
        .bind(email.as_ref())
        .fetch_optional(executor)
        .await
    }

    #[tracing::instrument("Fetch a page of users", skip(executor))]
    pub async fn fetch_page<'conn, E>(
        executor: E,
        status: Option<AccountStatus>,
        page: u32,
        per_page: u32,
    ) -> sqlx::Result<Page<User>>
    where
        E: PgExecutor<'conn> + Copy,
    {
        let total: i64 = sqlx::query_scalar(
            "select count(*) from users where ($1::account_status is null or status = $1)",
        )
        .bind(status)
        .fetch_one(executor)
        .await?;

        let items = sqlx::query_as::<_, User>(
            "select * from users \
             where ($1::account_status is null or status = $1) \
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

    #[tracing::instrument("Set user role", skip(executor))]
    pub async fn set_role<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
        role: Role,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query("update users set role = $2, updated_at = now() where id = $1")
            .bind(id)
            .bind(role)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument("Set user status", skip(executor))]
    pub async fn set_status<'conn>(
        executor: impl PgExecutor<'conn>,
        id: Uuid,
        status: AccountStatus,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query("update users set status = $2, updated_at = now() where id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
