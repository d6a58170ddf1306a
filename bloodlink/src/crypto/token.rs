use std::str::FromStr;

use hmac::Mac;

use serde::{Deserialize, Serialize};

use chrono::{DateTime, Duration, TimeZone, Utc};

use base64::{
    alphabet,
    engine::{self, general_purpose},
    Engine as _,
};

lazy_static::lazy_static! {
    // Base64 deserialization engine
    static ref BASE64_ENGINE: engine::GeneralPurpose =
        engine::GeneralPurpose::new(&alphabet::URL_SAFE, general_purpose::NO_PAD);
}

/// Various errors that can occur when handling tokens
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signature does not match")]
    SignatureMismatch,
    #[error("Token is expired")]
    Expired,
    #[error("Failed to decode or encode token")]
    DecodeEncodeError,
}

impl From<std::str::Utf8Error> for TokenError {
    fn from(_e: std::str::Utf8Error) -> Self {
        Self::DecodeEncodeError
    }
}

impl From<serde_json::Error> for TokenError {
    fn from(_e: serde_json::Error) -> Self {
        Self::DecodeEncodeError
    }
}

impl From<base64::DecodeError> for TokenError {
    fn from(_e: base64::DecodeError) -> Self {
        Self::DecodeEncodeError
    }
}

/// Wrapper for token results
pub type TokenResult<T> = Result<T, TokenError>;

/// A serialized, cryptographically-signed token: `<msg>.<sig>`, both parts
/// base64url. Session tokens carry the identity claims as the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Token(String);

impl Token {
    /// Initialize a token builder to construct a token
    pub fn builder<T: Serialize>(payload: T) -> TokenBuilder<T> {
        TokenBuilder::new(payload)
    }

    /// Verify the token and deconstruct into the encoded payload value
    pub fn verify<T, K>(self, key: &K) -> TokenResult<T>
    where
        T: for<'de> Deserialize<'de>,
        K: Mac + Clone,
    {
        let (msg, sig) = self.split().ok_or(TokenError::DecodeEncodeError)?;
        let msg = BASE64_ENGINE.decode(msg)?;
        let sig = BASE64_ENGINE.decode(sig)?;
        TokenMessage::verify_from_bytes(key, &msg, &sig)
    }

    fn split(&self) -> Option<(&str, &str)> {
        let mut matches = self.0.splitn(2, '.');
        let msg = matches.next()?;
        let sig = matches.next()?;
        Some((msg, sig))
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Ok(Self(token.to_string()))
    }
}

/// Handy builder for creating and signing Tokens
#[derive(Debug)]
pub struct TokenBuilder<T> {
    expiration: Option<DateTime<Utc>>,
    payload: T,
}

impl<T: Serialize> TokenBuilder<T> {
    pub fn new(payload: T) -> Self {
        Self {
            expiration: None,
            payload,
        }
    }

    /// Set the token to expire after a specified duration
    pub fn expires_in(mut self, duration: Duration) -> Self {
        self.expiration = Some(Utc::now() + duration);
        self
    }

    /// Set the token to expire at a specified date-time
    pub fn expires_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.expiration = Some(timestamp);
        self
    }

    /// Sign the token with the specified key
    pub fn sign<K>(self, key: &K) -> TokenResult<Token>
    where
        K: Mac + Clone,
    {
        let msg = self.serialize_message()?;
        let sig = sign_message(key, msg.as_bytes());

        let msg = BASE64_ENGINE.encode(msg);
        let sig = BASE64_ENGINE.encode(sig);

        Ok(Token(format!("{}.{}", msg, sig)))
    }

    fn serialize_message(self) -> serde_json::Result<String> {
        let msg: TokenMessage<T> = self.into();
        serde_json::to_string(&msg)
    }
}

/// Serializable structure for token messages.
/// Contains the expiration timestamp and serializable payload
#[derive(Debug, Serialize, Deserialize)]
struct TokenMessage<T> {
    exp: Option<i64>,
    data: T,
}

impl<T: for<'de> Deserialize<'de>> TokenMessage<T> {
    /// Verify a raw message against its signature, then deserialize
    pub fn verify_from_bytes<K>(key: &K, msg: &[u8], signature: &[u8]) -> TokenResult<T>
    where
        K: Mac + Clone,
    {
        verify_message(key, msg, signature)?;

        let msg = std::str::from_utf8(msg)?;
        let msg: TokenMessage<T> = serde_json::from_str(msg)?;

        if msg.is_expired() {
            Err(TokenError::Expired)
        } else {
            Ok(msg.data)
        }
    }

    fn is_expired(&self) -> bool {
        self.exp
            // NOTE: Default to the earliest date in ambiguous instances for security reasons
            .and_then(|exp| Utc.timestamp_opt(exp, 0u32).earliest())
            .map(|exp| Utc::now() > exp)
            .unwrap_or(false)
    }
}

impl<T> From<TokenBuilder<T>> for TokenMessage<T> {
    fn from(value: TokenBuilder<T>) -> Self {
        let exp = value.expiration.map(|date| date.timestamp());
        let data = value.payload;
        Self { exp, data }
    }
}

fn sign_message<K>(key: &K, msg: &[u8]) -> Vec<u8>
where
    K: Mac + Clone,
{
    let key = key.clone();
    key.chain_update(msg).finalize().into_bytes().to_vec()
}

fn verify_message<K>(key: &K, msg: &[u8], signature: &[u8]) -> TokenResult<()>
where
    K: Mac + Clone,
{
    let message_signature = sign_message(key, msg);
    if message_signature[..] != signature[..] {
        Err(TokenError::SignatureMismatch)
    } else {
        Ok(())
    }
}
