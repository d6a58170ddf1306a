pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Parsing errors
    #[error("{0}")]
    ParsingError(String),
    // Token errors
    #[error(transparent)]
    TokenError(#[from] crate::crypto::TokenError),
    // Payment processor errors
    #[error("Payment processor call failed: {0}")]
    PaymentError(reqwest::Error),
    // Database errors
    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),
}
