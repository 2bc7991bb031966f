use serde::{Deserialize, Serialize};

use crate::domain::service::{PricingType, ServiceSelection};

/// Meal plan included with an offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pension {
    #[default]
    RoomOnly,
    Breakfast,
    HalfBoard,
    FullBoard,
    AllInclusive,
}

impl std::fmt::Display for Pension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoomOnly => write!(f, "Room only"),
            Self::Breakfast => write!(f, "Breakfast included"),
            Self::HalfBoard => write!(f, "Half board"),
            Self::FullBoard => write!(f, "Full board"),
            Self::AllInclusive => write!(f, "All inclusive"),
        }
    }
}

/// A bookable room type at a nightly rate, as served by the booking API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(rename = "id_offre")]
    pub id: String,
    #[serde(rename = "id_hotel")]
    pub hotel_id: String,
    #[serde(rename = "nom_hotel", default)]
    pub hotel_name: Option<String>,
    #[serde(rename = "type_chambre")]
    pub room_type: String,
    #[serde(rename = "prix_par_nuit")]
    pub nightly_rate: f64,
    #[serde(default)]
    pub pension: Pension,
    #[serde(rename = "capacite", default)]
    pub capacity: Option<u32>,
}

impl std::fmt::Display for Offer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# Offer {}", self.id)?;
        if let Some(name) = &self.hotel_name {
            writeln!(f, "Hotel: {name} (ID: {})", self.hotel_id)?;
        } else {
            writeln!(f, "Hotel ID: {}", self.hotel_id)?;
        }
        writeln!(f, "Room: {}", self.room_type)?;
        writeln!(f, "Meal plan: {}", self.pension)?;
        if let Some(cap) = self.capacity {
            writeln!(f, "Capacity: {cap} guests")?;
        }
        Ok(())
    }
}

/// An add-on a hotel sells alongside its rooms (breakfast, parking, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelService {
    #[serde(rename = "id_service")]
    pub id: String,
    #[serde(rename = "id_hotel")]
    pub hotel_id: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "prix")]
    pub price: f64,
    #[serde(rename = "type_tarification")]
    pub pricing_type: PricingType,
}

impl HotelService {
    pub fn select(&self, quantity: u32) -> ServiceSelection {
        ServiceSelection {
            service_id: self.id.clone(),
            unit_price: self.price,
            pricing_type: self.pricing_type,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_from_api_json() {
        let json = r#"{
            "id_offre": "12",
            "id_hotel": "3",
            "nom_hotel": "Hôtel du Port",
            "type_chambre": "Double",
            "prix_par_nuit": 89.5,
            "pension": "half_board"
        }"#;
        let offer: Offer = serde_json::from_str(json).unwrap();
        assert_eq!(offer.id, "12");
        assert_eq!(offer.pension, Pension::HalfBoard);
        assert!((offer.nightly_rate - 89.5).abs() < f64::EPSILON);
        assert_eq!(offer.capacity, None);
    }

    #[test]
    fn offer_pension_defaults_to_room_only() {
        let json = r#"{"id_offre":"1","id_hotel":"1","type_chambre":"Single","prix_par_nuit":50}"#;
        let offer: Offer = serde_json::from_str(json).unwrap();
        assert_eq!(offer.pension, Pension::RoomOnly);
    }

    #[test]
    fn offer_display() {
        let offer = Offer {
            id: "12".into(),
            hotel_id: "3".into(),
            hotel_name: Some("Hôtel du Port".into()),
            room_type: "Double".into(),
            nightly_rate: 89.5,
            pension: Pension::Breakfast,
            capacity: Some(2),
        };
        let text = offer.to_string();
        assert!(text.contains("Hôtel du Port"));
        assert!(text.contains("Breakfast included"));
        // the rate is printed by callers, in the session currency
        assert!(!text.contains("89.5"));
    }

    #[test]
    fn service_select_carries_pricing() {
        let json = r#"{"id_service":"s1","id_hotel":"3","nom":"Parking","prix":12,"type_tarification":"per_night"}"#;
        let service: HotelService = serde_json::from_str(json).unwrap();
        let sel = service.select(2);
        assert_eq!(sel.service_id, "s1");
        assert_eq!(sel.pricing_type, PricingType::PerNight);
        assert_eq!(sel.quantity, 2);
    }
}
