use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::types::PaymentConfig;
use crate::domain::card::{CardValidationResult, CardValidator, PaymentCard};
use crate::ports::payment_gateway::PaymentGateway;

/// Local stand-in for a card processor: validates the card against the
/// sandbox rules after an artificial delay. No network involved.
pub struct SimulatedGateway {
    validator: CardValidator,
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(validator: CardValidator, config: &PaymentConfig) -> Self {
        Self {
            validator,
            delay: Duration::from_millis(config.simulated_delay_ms),
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn authorize(&self, card: &PaymentCard, today: NaiveDate) -> CardValidationResult {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = self.validator.validate(card, today);
        match result.reason {
            None => info!(
                last_four = %card.last_four(),
                card_type = %card.declared_type,
                "Payment accepted"
            ),
            Some(reason) => warn!(
                last_four = %card.last_four(),
                card_type = %card.declared_type,
                ?reason,
                "Payment declined"
            ),
        }
        result
    }
}
