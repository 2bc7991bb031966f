#![no_main]
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use mcp_hotel_booking::domain::card::{CardType, CardValidator, PaymentCard, luhn_valid};
use mcp_hotel_booking::domain::payment_form::PaymentForm;

const TYPES: [CardType; 4] = [
    CardType::Visa,
    CardType::MasterCard,
    CardType::Amex,
    CardType::Discover,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let mut fields = text.splitn(3, '|');
    let number = fields.next().unwrap_or_default();
    let expiry = fields.next().unwrap_or_default();
    let cvv = fields.next().unwrap_or_default();
    let declared_type = TYPES[usize::from(selector) % TYPES.len()];

    let _ = luhn_valid(number);
    let card = PaymentCard {
        number: number.to_string(),
        holder_name: "Fuzz".to_string(),
        expiry: expiry.to_string(),
        cvv: cvv.to_string(),
        declared_type,
    };
    // masking runs on every gateway log line
    assert!(card.last_four().chars().count() <= 4);
    assert!(format!("{card:?}").contains("cvv: \"***\""));

    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let result = CardValidator::default().validate(&card, today);
    assert_eq!(result.valid, result.reason.is_none());

    let form = PaymentForm {
        card_type: Some(declared_type),
        number: number.to_string(),
        holder_name: "Fuzz".to_string(),
        expiry: expiry.to_string(),
        cvv: cvv.to_string(),
        terms_accepted: true,
    };
    if let Ok(card) = form.into_card() {
        assert!(card.normalized_number().bytes().all(|b| b.is_ascii_digit()));
        let _ = card.last_four();
    }
});
