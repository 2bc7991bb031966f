use serde::{Deserialize, Serialize};

use crate::domain::pricing::PriceBreakdown;
use crate::domain::service::ServiceSelection;
use crate::domain::stay::{DATE_FORMAT, StayPeriod};
use crate::error::{BookingError, Result};

/// What the guest asked for, minus the card. Safe to keep in the session
/// while payment is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub offer_id: String,
    pub check_in: String,
    pub check_out: String,
    pub adults: u32,
    pub children: u32,
    pub service_ids: Vec<String>,
    pub client_email: String,
    pub client_name: String,
}

impl BookingRequest {
    pub fn validate(&self) -> Result<StayPeriod> {
        if self.offer_id.trim().is_empty() {
            return Err(BookingError::invalid("offer id is required"));
        }
        if self.adults == 0 {
            return Err(BookingError::invalid("at least one adult is required"));
        }
        if self.client_name.trim().is_empty() {
            return Err(BookingError::invalid("client name is required"));
        }
        let email = self.client_email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => {
                return Err(BookingError::invalid(format!(
                    "invalid client email '{email}'"
                )));
            }
        }
        StayPeriod::parse(&self.check_in, &self.check_out)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedService {
    #[serde(rename = "id_service")]
    pub service_id: String,
    #[serde(rename = "quantite")]
    pub quantity: u32,
    #[serde(rename = "prix")]
    pub price: f64,
}

/// Body persisted through the booking API once payment is accepted. Card
/// details are never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub id_offre: String,
    pub date_arrivee: String,
    pub date_depart: String,
    pub nb_adultes: u32,
    pub nb_enfants: u32,
    pub nb_nuits: u32,
    pub services: Vec<ReservedService>,
    pub total_price: f64,
    pub client_email: String,
    pub client_nom: String,
    #[serde(rename = "statut", default)]
    pub status: ReservationStatus,
}

impl ReservationRecord {
    pub fn new(
        request: &BookingRequest,
        stay: &StayPeriod,
        services: &[ServiceSelection],
        breakdown: &PriceBreakdown,
    ) -> Self {
        Self {
            id_offre: request.offer_id.clone(),
            date_arrivee: stay.check_in().format(DATE_FORMAT).to_string(),
            date_depart: stay.check_out().format(DATE_FORMAT).to_string(),
            nb_adultes: request.adults,
            nb_enfants: request.children,
            nb_nuits: breakdown.nights,
            services: services
                .iter()
                .map(|s| ReservedService {
                    service_id: s.service_id.clone(),
                    quantity: s.quantity,
                    price: s.price(breakdown.nights, request.adults),
                })
                .collect(),
            total_price: breakdown.total,
            client_email: request.client_email.trim().to_string(),
            client_nom: request.client_name.trim().to_string(),
            status: ReservationStatus::Confirmed,
        }
    }
}

/// A reservation as returned by the API after it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(rename = "id_reservation")]
    pub id: String,
    #[serde(flatten)]
    pub record: ReservationRecord,
}

impl std::fmt::Display for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = &self.record;
        writeln!(f, "Reservation {} ({:?})", self.id, r.status)?;
        writeln!(f, "Offer: {}", r.id_offre)?;
        writeln!(
            f,
            "Stay: {} → {} ({} nights)",
            r.date_arrivee, r.date_depart, r.nb_nuits
        )?;
        writeln!(f, "Guests: {} adults, {} children", r.nb_adultes, r.nb_enfants)?;
        writeln!(f, "Client: {} <{}>", r.client_nom, r.client_email)?;
        write!(f, "Total: {:.2}", crate::domain::pricing::truncate_cents(r.total_price))
    }
}
