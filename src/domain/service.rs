use serde::{Deserialize, Serialize};

/// How a hotel add-on service is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    PerNight,
    PerPersonPerNight,
    PerStay,
    Flat,
}

impl std::fmt::Display for PricingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerNight => write!(f, "per night"),
            Self::PerPersonPerNight => write!(f, "per person per night"),
            Self::PerStay => write!(f, "per stay"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub service_id: String,
    pub unit_price: f64,
    pub pricing_type: PricingType,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ServiceSelection {
    /// Price of this service for the stay. `quantity` is recorded with the
    /// reservation but does not multiply the price.
    pub fn price(&self, nights: u32, adults: u32) -> f64 {
        match self.pricing_type {
            PricingType::PerStay | PricingType::Flat => self.unit_price,
            PricingType::PerNight => self.unit_price * f64::from(nights),
            PricingType::PerPersonPerNight => {
                self.unit_price * f64::from(nights) * f64::from(adults)
            }
        }
    }
}

pub fn services_subtotal(selections: &[ServiceSelection], nights: u32, adults: u32) -> f64 {
    selections.iter().map(|s| s.price(nights, adults)).sum()
}

/// The checked services of a booking form, in the order they were ticked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSet {
    selections: Vec<ServiceSelection>,
}

impl ServiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checkbox semantics: `checked` inserts (or replaces) the selection,
    /// unchecked removes it.
    pub fn toggle(&mut self, selection: ServiceSelection, checked: bool) {
        let pos = self
            .selections
            .iter()
            .position(|s| s.service_id == selection.service_id);
        match (pos, checked) {
            (Some(i), true) => self.selections[i] = selection,
            (None, true) => self.selections.push(selection),
            (Some(i), false) => {
                self.selections.remove(i);
            }
            (None, false) => {}
        }
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.selections.iter().any(|s| s.service_id == service_id)
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn as_slice(&self) -> &[ServiceSelection] {
        &self.selections
    }

    pub fn subtotal(&self, nights: u32, adults: u32) -> f64 {
        services_subtotal(&self.selections, nights, adults)
    }
}

impl From<Vec<ServiceSelection>> for ServiceSet {
    fn from(selections: Vec<ServiceSelection>) -> Self {
        let mut set = Self::new();
        for s in selections {
            set.toggle(s, true);
        }
        set
    }
}
