use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceSelection;
use crate::domain::session::Currency;
use crate::domain::stay::StayPeriod;

/// Everything the booking form knows that affects the price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceInputs {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub room_nightly_rate: f64,
    pub services: Vec<ServiceSelection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub nights: u32,
    pub room_subtotal: f64,
    pub services_subtotal: f64,
    pub total: f64,
}

/// Recompute the full price from scratch. Nothing is cached between calls.
pub fn compute_total(inputs: &PriceInputs) -> PriceBreakdown {
    let stay = StayPeriod::new(inputs.check_in, inputs.check_out);
    let room_subtotal = inputs.room_nightly_rate * f64::from(stay.nights());
    let services_subtotal =
        crate::domain::service::services_subtotal(&inputs.services, stay.nights(), inputs.adults);
    PriceBreakdown {
        nights: stay.nights(),
        room_subtotal,
        services_subtotal,
        total: room_subtotal + services_subtotal,
    }
}

/// Truncate (not round) to two decimals for display.
pub fn truncate_cents(value: f64) -> f64 {
    // 1e-9 absorbs binary representation error, e.g. 0.29 * 100 = 28.999...
    (value * 100.0 + 1e-9).trunc() / 100.0
}

pub fn format_amount(value: f64, currency: Currency) -> String {
    let amount = format!("{:.2}", truncate_cents(value));
    if currency.symbol_after() {
        format!("{amount} {}", currency.symbol())
    } else {
        format!("{}{amount}", currency.symbol())
    }
}

impl PriceBreakdown {
    pub fn render(&self, currency: Currency) -> String {
        format!(
            "Nights: {}\nRoom: {}\nServices: {}\nTotal: {}",
            self.nights,
            format_amount(self.room_subtotal, currency),
            format_amount(self.services_subtotal, currency),
            format_amount(self.total, currency),
        )
    }
}
