pub mod card;
pub mod offer;
pub mod payment_form;
pub mod pricing;
pub mod reservation;
pub mod service;
pub mod session;
pub mod stay;
pub mod test_cards;
