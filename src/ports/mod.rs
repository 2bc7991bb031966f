pub mod booking_api;
pub mod cache;
pub mod payment_gateway;
