use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::reservation::BookingRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eur => "€",
            Self::Usd => "$",
            Self::Gbp => "£",
        }
    }

    /// Euro amounts read `12.50 €`, the others `$12.50`.
    pub fn symbol_after(self) -> bool {
        matches!(self, Self::Eur)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eur" | "€" => Ok(Self::Eur),
            "usd" | "$" => Ok(Self::Usd),
            "gbp" | "£" => Ok(Self::Gbp),
            other => Err(format!("unsupported currency '{other}'")),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "en" => Ok(Self::En),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fr => f.write_str("fr"),
            Self::En => f.write_str("en"),
        }
    }
}

/// Per-user session: who is logged in, display preferences, and a booking
/// waiting for payment. Reset to the configured defaults on logout.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub client_email: Option<String>,
    pub currency: Currency,
    pub locale: Locale,
    pending_booking: Option<BookingRequest>,
    default_currency: Currency,
    default_locale: Locale,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Currency::default(), Locale::default())
    }
}

impl SessionState {
    pub fn new(default_currency: Currency, default_locale: Locale) -> Self {
        Self {
            token: None,
            client_email: None,
            currency: default_currency,
            locale: default_locale,
            pending_booking: None,
            default_currency,
            default_locale,
        }
    }

    pub fn start(&mut self, token: impl Into<String>, client_email: impl Into<String>) {
        self.token = Some(token.into());
        self.client_email = Some(client_email.into());
    }

    pub fn logout(&mut self) {
        *self = Self::new(self.default_currency, self.default_locale);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn stash_pending(&mut self, request: BookingRequest) {
        self.pending_booking = Some(request);
    }

    pub fn pending(&self) -> Option<&BookingRequest> {
        self.pending_booking.as_ref()
    }

    pub fn take_pending(&mut self) -> Option<BookingRequest> {
        self.pending_booking.take()
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.client_email {
            Some(email) => writeln!(f, "Signed in as {email}")?,
            None => writeln!(f, "Not signed in")?,
        }
        writeln!(f, "Currency: {} ({})", self.currency, self.currency.symbol())?;
        writeln!(f, "Locale: {}", self.locale)?;
        if let Some(pending) = &self.pending_booking {
            writeln!(
                f,
                "Pending booking: offer {} from {} to {}",
                pending.offer_id, pending.check_in, pending.check_out
            )?;
        }
        Ok(())
    }
}

/// Shared handle to the session, injected into whatever needs it.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new(state: SessionState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.read().await.clone()
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut guard = self.inner.write().await;
        f(&mut guard)
    }
}
