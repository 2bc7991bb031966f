use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::card::{CardType, CardValidationResult, CardValidator, PaymentCard};
use crate::domain::offer::{HotelService, Offer, Pension};
use crate::domain::reservation::{Reservation, ReservationRecord};
use crate::domain::service::PricingType;
use crate::error::Result;
use crate::ports::booking_api::BookingApi;
use crate::ports::payment_gateway::PaymentGateway;

type OfferFn = Box<dyn Fn(&str) -> Result<Offer> + Send + Sync>;
type ServicesFn = Box<dyn Fn(&str) -> Result<Vec<HotelService>> + Send + Sync>;
type ReservationFn =
    Box<dyn Fn(&ReservationRecord, Option<&str>) -> Result<Reservation> + Send + Sync>;

#[allow(clippy::struct_field_names)]
pub struct MockBookingApi {
    offer_fn: Mutex<OfferFn>,
    services_fn: Mutex<ServicesFn>,
    reservation_fn: Mutex<ReservationFn>,
    reservations: Mutex<Vec<(ReservationRecord, Option<String>)>>,
}

impl Default for MockBookingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBookingApi {
    pub fn new() -> Self {
        Self {
            offer_fn: Mutex::new(Box::new(|id| Ok(make_offer(id, 100.0)))),
            services_fn: Mutex::new(Box::new(|hotel_id| Ok(make_services(hotel_id)))),
            reservation_fn: Mutex::new(Box::new(|record, _| {
                Ok(Reservation {
                    id: "r-1".into(),
                    record: record.clone(),
                })
            })),
            reservations: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_offer(self, f: impl Fn(&str) -> Result<Offer> + Send + Sync + 'static) -> Self {
        *self.offer_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_services(
        self,
        f: impl Fn(&str) -> Result<Vec<HotelService>> + Send + Sync + 'static,
    ) -> Self {
        *self.services_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_reservation(
        self,
        f: impl Fn(&ReservationRecord, Option<&str>) -> Result<Reservation> + Send + Sync + 'static,
    ) -> Self {
        *self.reservation_fn.lock().unwrap() = Box::new(f);
        self
    }

    /// Every record passed to `create_reservation`, with the token it carried.
    pub fn submitted(&self) -> Vec<(ReservationRecord, Option<String>)> {
        self.reservations.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn get_offer(&self, id: &str) -> Result<Offer> {
        let f = self.offer_fn.lock().unwrap();
        f(id)
    }

    async fn list_hotel_services(&self, hotel_id: &str) -> Result<Vec<HotelService>> {
        let f = self.services_fn.lock().unwrap();
        f(hotel_id)
    }

    async fn create_reservation(
        &self,
        record: &ReservationRecord,
        token: Option<&str>,
    ) -> Result<Reservation> {
        self.reservations
            .lock()
            .unwrap()
            .push((record.clone(), token.map(str::to_string)));
        let f = self.reservation_fn.lock().unwrap();
        f(record, token)
    }
}

/// Gateway that validates locally with no delay and counts how often it was
/// asked to authorize.
#[derive(Default)]
pub struct CountingGateway {
    validator: CardValidator,
    calls: AtomicUsize,
}

impl CountingGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for CountingGateway {
    async fn authorize(&self, card: &PaymentCard, today: NaiveDate) -> CardValidationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.validator.validate(card, today)
    }
}

pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

pub fn make_offer(id: &str, nightly_rate: f64) -> Offer {
    Offer {
        id: id.to_string(),
        hotel_id: "3".into(),
        hotel_name: Some("Hôtel du Port".into()),
        room_type: "Double".into(),
        nightly_rate,
        pension: Pension::Breakfast,
        capacity: Some(2),
    }
}

pub fn make_service(id: &str, price: f64, pricing_type: PricingType) -> HotelService {
    HotelService {
        id: id.to_string(),
        hotel_id: "3".into(),
        name: format!("Service {id}"),
        price,
        pricing_type,
    }
}

pub fn make_services(hotel_id: &str) -> Vec<HotelService> {
    vec![
        HotelService {
            hotel_id: hotel_id.to_string(),
            ..make_service("breakfast", 12.0, PricingType::PerPersonPerNight)
        },
        HotelService {
            hotel_id: hotel_id.to_string(),
            ..make_service("parking", 10.0, PricingType::PerNight)
        },
        HotelService {
            hotel_id: hotel_id.to_string(),
            ..make_service("cleaning", 30.0, PricingType::PerStay)
        },
    ]
}

pub fn make_card(number: &str, card_type: CardType, cvv: &str, expiry: &str) -> PaymentCard {
    PaymentCard {
        number: number.to_string(),
        holder_name: "Ana Pereira".into(),
        expiry: expiry.to_string(),
        cvv: cvv.to_string(),
        declared_type: card_type,
    }
}
