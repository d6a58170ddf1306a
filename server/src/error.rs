use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};

use thiserror::Error;

use bloodlink::lifecycle::Denial;

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Parse Error: {0}")]
    ParseError(String),

    /// Missing or unverifiable session. Carries the originally requested
    /// path so the login flow can send the user back there.
    #[error("Authentication required")]
    Unauthorized { from: String },

    /// Authenticated, but the resolved role does not grant access
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A lifecycle rule refused the mutation
    #[error(transparent)]
    Denied(#[from] Denial),

    #[error("Not Found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestError {
    pub fn unauthorized(req: &HttpRequest) -> Self {
        Self::Unauthorized {
            from: req.path().to_string(),
        }
    }
}

impl From<sqlx::Error> for RestError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", e);
        Self::InternalError("Database error".into())
    }
}

impl From<bloodlink::error::Error> for RestError {
    fn from(e: bloodlink::error::Error) -> Self {
        use bloodlink::error::Error as E;
        match e {
            E::ParsingError(msg) => Self::ParseError(msg),
            E::TokenError(_) => Self::Forbidden("Failed to verify token".into()),
            E::PaymentError(_) => Self::InternalError("Payment processor call failed".into()),
            E::DatabaseError(_) => Self::InternalError("Database error".into()),
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Denied(denial) => match denial {
                Denial::WrongStatus { .. } => StatusCode::CONFLICT,
                _ => StatusCode::FORBIDDEN,
            },
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({ "error": self.to_string() });
        if let Self::Unauthorized { from } = self {
            body["from"] = serde_json::json!(from);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
