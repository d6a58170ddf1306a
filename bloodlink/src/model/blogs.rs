use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

use crate::domain::{EmailAddress, Role};
use crate::error::Error;

/// Blog visibility. Posts are created as drafts; only an admin moves them
/// in or out of `Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "blog_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
        }
    }
}

impl FromStr for BlogStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Error> {
        match value {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            other => Err(Error::ParsingError(format!(
                "{} is not a blog status",
                other
            ))),
        }
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated payload for a new blog post.
/// The author snapshot comes from the resolved session.
#[derive(Debug)]
pub struct NewBlog {
    pub title: String,
    pub category: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub author_name: String,
    pub author_email: EmailAddress,
    pub author_role: Role,
}

/// Stored blog record
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    /// Author snapshot, captured at creation
    pub author_name: String,
    pub author_email: String,
    pub author_role: Role,
    pub status: BlogStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
