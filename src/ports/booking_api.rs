use async_trait::async_trait;

use crate::domain::offer::{HotelService, Offer};
use crate::domain::reservation::{Reservation, ReservationRecord};
use crate::error::Result;

/// The hotel booking REST backend.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn get_offer(&self, id: &str) -> Result<Offer>;
    async fn list_hotel_services(&self, hotel_id: &str) -> Result<Vec<HotelService>>;
    async fn create_reservation(
        &self,
        record: &ReservationRecord,
        token: Option<&str>,
    ) -> Result<Reservation>;
}
