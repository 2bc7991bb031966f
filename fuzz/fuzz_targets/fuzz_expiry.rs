#![no_main]
use libfuzzer_sys::fuzz_target;
use mcp_hotel_booking::domain::card::Expiry;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Some(expiry) = Expiry::parse(text)
    {
        assert!((1..=12).contains(&expiry.month));
    }
});
