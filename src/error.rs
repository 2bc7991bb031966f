use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Booking API error: {reason}")]
    Api { reason: String },

    #[error("Offer not found: {id}")]
    OfferNotFound { id: String },

    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    #[error("Invalid booking parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl BookingError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
