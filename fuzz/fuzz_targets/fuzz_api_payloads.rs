#![no_main]
use libfuzzer_sys::fuzz_target;
use mcp_hotel_booking::domain::offer::{HotelService, Offer};
use mcp_hotel_booking::domain::reservation::Reservation;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<Offer>(data);
    let _ = serde_json::from_slice::<Vec<HotelService>>(data);
    let _ = serde_json::from_slice::<Reservation>(data);
});
