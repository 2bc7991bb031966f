use std::time::Duration;

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use mcp_hotel_booking::adapters::cache::memory_cache::MemoryCache;
use mcp_hotel_booking::domain::card::{Expiry, luhn_valid, normalize_number};
use mcp_hotel_booking::domain::pricing::{PriceInputs, compute_total, truncate_cents};
use mcp_hotel_booking::domain::service::{PricingType, ServiceSelection, services_subtotal};
use mcp_hotel_booking::domain::stay::nights_between;
use mcp_hotel_booking::ports::cache::ResponseCache;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2020-01-01 plus up to ~15 years
    (0..5500_u64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

fn arb_pricing_type() -> impl Strategy<Value = PricingType> {
    prop_oneof![
        Just(PricingType::PerNight),
        Just(PricingType::PerPersonPerNight),
        Just(PricingType::PerStay),
        Just(PricingType::Flat),
    ]
}

fn arb_selection() -> impl Strategy<Value = ServiceSelection> {
    ("[a-z]{1,8}", 0.0..500.0_f64, arb_pricing_type(), 1..5_u32).prop_map(
        |(service_id, unit_price, pricing_type, quantity)| ServiceSelection {
            service_id,
            unit_price,
            pricing_type,
            quantity,
        },
    )
}

fn arb_inputs() -> impl Strategy<Value = PriceInputs> {
    (
        arb_date(),
        arb_date(),
        1..10_u32,
        0..6_u32,
        0.0..2000.0_f64,
        prop::collection::vec(arb_selection(), 0..6),
    )
        .prop_map(
            |(check_in, check_out, adults, children, room_nightly_rate, services)| PriceInputs {
                check_in,
                check_out,
                adults,
                children,
                room_nightly_rate,
                services,
            },
        )
}

/// Append the digit that makes `body` pass the mod-10 check.
fn with_check_digit(body: &str) -> String {
    (0..10)
        .map(|d| format!("{body}{d}"))
        .find(|candidate| luhn_valid(candidate))
        .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

// ---------------------------------------------------------------------------
// Stay length
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_nights_at_least_one(a in arb_date(), b in arb_date()) {
        prop_assert!(nights_between(a, b) >= 1);
    }

    #[test]
    fn prop_nights_match_day_difference(a in arb_date(), len in 1..400_u64) {
        let b = a.checked_add_days(Days::new(len)).unwrap();
        prop_assert_eq!(u64::from(nights_between(a, b)), len);
    }

    #[test]
    fn prop_reversed_dates_clamp_to_one(a in arb_date(), back in 0..400_u64) {
        let b = a.checked_sub_days(Days::new(back)).unwrap();
        prop_assert_eq!(nights_between(a, b), 1);
    }
}

// ---------------------------------------------------------------------------
// Service pricing
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_per_night_is_linear_in_nights(price in 0.0..500.0_f64, nights in 1..60_u32, adults in 1..8_u32) {
        let s = ServiceSelection {
            service_id: "s".into(),
            unit_price: price,
            pricing_type: PricingType::PerNight,
            quantity: 1,
        };
        prop_assert!(close(s.price(nights, adults), price * f64::from(nights)));
        prop_assert!(close(s.price(nights + 1, adults) - s.price(nights, adults), price));
    }

    #[test]
    fn prop_per_stay_ignores_nights_and_guests(
        price in 0.0..500.0_f64,
        nights in 1..60_u32,
        adults in 1..8_u32,
        pricing_type in prop_oneof![Just(PricingType::PerStay), Just(PricingType::Flat)],
    ) {
        let s = ServiceSelection {
            service_id: "s".into(),
            unit_price: price,
            pricing_type,
            quantity: 3,
        };
        prop_assert!(close(s.price(nights, adults), price));
    }

    #[test]
    fn prop_subtotal_is_sum_of_parts(
        services in prop::collection::vec(arb_selection(), 0..8),
        nights in 1..30_u32,
        adults in 1..6_u32,
    ) {
        let expected: f64 = services.iter().map(|s| s.price(nights, adults)).sum();
        prop_assert!(close(services_subtotal(&services, nights, adults), expected));
    }
}

// ---------------------------------------------------------------------------
// Total price
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_total_is_room_plus_services(inputs in arb_inputs()) {
        let b = compute_total(&inputs);
        prop_assert_eq!(b.nights, nights_between(inputs.check_in, inputs.check_out));
        prop_assert!(close(b.room_subtotal, inputs.room_nightly_rate * f64::from(b.nights)));
        prop_assert!(close(b.total, b.room_subtotal + b.services_subtotal));
    }

    #[test]
    fn prop_compute_total_is_idempotent(inputs in arb_inputs()) {
        prop_assert_eq!(compute_total(&inputs), compute_total(&inputs));
    }

    #[test]
    fn prop_children_do_not_change_price(inputs in arb_inputs(), children in 0..10_u32) {
        let mut other = inputs.clone();
        other.children = children;
        prop_assert_eq!(compute_total(&inputs), compute_total(&other));
    }

    #[test]
    fn prop_truncation_never_rounds_up(value in 0.0..100_000.0_f64) {
        let t = truncate_cents(value);
        prop_assert!(t <= value + 1e-6);
        prop_assert!(value - t < 0.01 + 1e-6);
    }
}

// ---------------------------------------------------------------------------
// Card checks
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_generated_numbers_pass_luhn(body in "[0-9]{12,18}") {
        prop_assert!(luhn_valid(&with_check_digit(&body)));
    }

    #[test]
    fn prop_single_digit_change_breaks_luhn(body in "[0-9]{14}", pos in 0..15_usize, bump in 1..10_u32) {
        let number = with_check_digit(&body);
        let mut digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
        digits[pos] = (digits[pos] + bump) % 10;
        let altered: String = digits.iter().filter_map(|d| char::from_digit(*d, 10)).collect();
        prop_assert!(!luhn_valid(&altered));
    }

    #[test]
    fn prop_non_digits_fail_luhn(s in "[0-9]{4,10}[a-zA-Z][0-9]{0,6}") {
        prop_assert!(!luhn_valid(&s));
    }

    #[test]
    fn prop_normalize_strips_separators(groups in prop::collection::vec("[0-9]{4}", 1..5)) {
        let spaced = groups.join(" ");
        let dashed = groups.join("-");
        let joined = groups.concat();
        prop_assert_eq!(normalize_number(&spaced), joined.clone());
        prop_assert_eq!(normalize_number(&dashed), joined);
    }

    #[test]
    fn prop_valid_expiry_parses(month in 1..=12_u32, year in 0..100_i32) {
        let text = format!("{month:02}/{year:02}");
        let expiry = Expiry::parse(&text).unwrap();
        prop_assert_eq!(expiry.month, month);
        prop_assert_eq!(expiry.year, 2000 + year);
    }

    #[test]
    fn prop_out_of_range_month_rejected(month in 13..100_u32, year in 0..100_i32) {
        let text = format!("{month:02}/{year:02}");
        prop_assert!(Expiry::parse(&text).is_none());
    }
}

// ---------------------------------------------------------------------------
// MemoryCache properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_set_then_get_returns_value(
        key in "[a-z]{1,20}",
        value in "[a-zA-Z0-9]{1,100}",
    ) {
        let cache = MemoryCache::new(100);
        cache.set(&key, &value, Duration::from_secs(3600));
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    #[test]
    fn prop_capacity_respected(n in 1..200_usize) {
        let capacity = 50;
        let cache = MemoryCache::new(capacity);
        for i in 0..n {
            cache.set(&format!("k{i}"), &format!("v{i}"), Duration::from_secs(3600));
        }
        let found = (0..n).filter(|i| cache.get(&format!("k{i}")).is_some()).count();
        prop_assert!(found <= capacity, "found {found} > capacity {capacity}");
    }
}
