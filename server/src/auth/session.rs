use std::future::Future;
use std::pin::Pin;

use actix_web::http::header::{self, HeaderMap};
use actix_web::{dev, web, FromRequest, HttpRequest};

use anyhow::Context;

use serde::{Deserialize, Serialize};

use bloodlink::crypto::{SigningKey, Token};
use bloodlink::domain::{EmailAddress, PersonName};

use crate::error::RestError;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity claims carried by a session token.
/// Minted by the identity provider; the shared signing key is the only
/// thing that makes them trustworthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: EmailAddress,
    pub name: PersonName,
}

/// A verified session. Proves who the caller is, not what they may do;
/// role-gated routes layer [`super::RoleGuard`] on top.
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: SessionClaims,
}

impl FromRequest for Session {
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            // NOTE: Must be registered with the application at startup
            let key: &web::Data<SigningKey> = req
                .app_data::<web::Data<SigningKey>>()
                .expect("SigningKey not registered for application");

            let token =
                bearer_token(req.headers()).map_err(|_| RestError::unauthorized(&req))?;

            let claims: SessionClaims = token
                .verify(key.get_ref().as_ref())
                .map_err(|_| RestError::unauthorized(&req))?;

            Ok(Session { claims })
        })
    }
}

/// Extract the session token from a 'Bearer <token>' authorization header
fn bearer_token(headers: &HeaderMap) -> anyhow::Result<Token> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .context("Missing authorization in header")?
        .to_str()?;

    let token = header_value
        .strip_prefix(BEARER_PREFIX)
        .context("Authorization scheme not bearer")?;

    token.parse().context("Failed to parse bearer token")
}
