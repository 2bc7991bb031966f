use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::card::{CardValidationResult, PaymentCard};

/// Authorizes a card for a booking. A decline is a normal outcome, not an
/// error.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn authorize(&self, card: &PaymentCard, today: NaiveDate) -> CardValidationResult;
}
