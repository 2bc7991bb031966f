use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, trace};
use url::Url;

use crate::adapters::rest::pacer::RequestPacer;
use crate::config::types::{ApiConfig, CacheConfig};
use crate::domain::offer::{HotelService, Offer};
use crate::domain::reservation::{Reservation, ReservationRecord};
use crate::error::{BookingError, Result};
use crate::ports::booking_api::BookingApi;
use crate::ports::cache::ResponseCache;

/// JSON client for the hotel booking backend. Offers and service lists are
/// cached; reservation writes never are.
pub struct RestBookingClient {
    http: Client,
    pacer: RequestPacer,
    cache: Arc<dyn ResponseCache>,
    base_url: String,
    cache_config: CacheConfig,
}

impl RestBookingClient {
    pub fn new(
        config: &ApiConfig,
        cache_config: CacheConfig,
        cache: Arc<dyn ResponseCache>,
    ) -> std::result::Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            pacer: RequestPacer::new(config.rate_limit_per_second),
            cache,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache_config,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{path}", self.base_url))?)
    }

    /// Send a request and hand back the status with the raw body so callers
    /// can map API-specific statuses before the generic ones.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        token: Option<&str>,
    ) -> Result<(StatusCode, String)> {
        let url = self.endpoint(path)?;
        self.pacer.wait().await;
        debug!(%method, url = %url, "Booking API request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(BookingError::Http)?;
        let status = response.status();
        let text = response.text().await.map_err(BookingError::Http)?;
        debug!(%method, path, %status, body_len = text.len(), "Booking API response");
        trace!(path, body = %text, "Booking API raw response");
        Ok((status, text))
    }

    fn check_status(method: &Method, path: &str, status: StatusCode) -> Result<()> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BookingError::RateLimited);
        }
        if !status.is_success() {
            return Err(BookingError::Api {
                reason: format!("{method} {path} returned HTTP {status}"),
            });
        }
        Ok(())
    }

    fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|e| BookingError::Api {
            reason: format!("unexpected response from {path}: {e}"),
        })
    }

    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let body = self.cache.get(key)?;
        let value = serde_json::from_str(&body).ok();
        if value.is_some() {
            debug!(key, "Cache hit");
        }
        value
    }
}

#[async_trait]
impl BookingApi for RestBookingClient {
    async fn get_offer(&self, id: &str) -> Result<Offer> {
        let id = id.trim();
        if id.is_empty() {
            return Err(BookingError::invalid("offer id is required"));
        }
        let cache_key = format!("offer:{id}");
        if let Some(offer) = self.cached::<Offer>(&cache_key) {
            return Ok(offer);
        }

        let path = format!("offres/{id}");
        let (status, body) = self.send(Method::GET, &path, None, None).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(BookingError::OfferNotFound { id: id.to_string() });
        }
        Self::check_status(&Method::GET, &path, status)?;
        let offer: Offer = Self::decode(&path, &body)?;

        self.cache.set(
            &cache_key,
            &body,
            Duration::from_secs(self.cache_config.offer_ttl_secs),
        );
        Ok(offer)
    }

    async fn list_hotel_services(&self, hotel_id: &str) -> Result<Vec<HotelService>> {
        let hotel_id = hotel_id.trim();
        let cache_key = format!("services:{hotel_id}");
        if let Some(services) = self.cached::<Vec<HotelService>>(&cache_key) {
            return Ok(services);
        }

        let path = format!("hotels/{hotel_id}/services");
        let (status, body) = self.send(Method::GET, &path, None, None).await?;
        Self::check_status(&Method::GET, &path, status)?;
        let services: Vec<HotelService> = Self::decode(&path, &body)?;

        self.cache.set(
            &cache_key,
            &body,
            Duration::from_secs(self.cache_config.services_ttl_secs),
        );
        Ok(services)
    }

    async fn create_reservation(
        &self,
        record: &ReservationRecord,
        token: Option<&str>,
    ) -> Result<Reservation> {
        let path = "reservations";
        let payload = serde_json::to_value(record)?;
        let (status, body) = self.send(Method::POST, path, Some(&payload), token).await?;
        Self::check_status(&Method::POST, path, status)?;
        let reservation: Reservation = Self::decode(path, &body)?;
        info!(
            reservation_id = %reservation.id,
            offer_id = %record.id_offre,
            total = record.total_price,
            "Reservation stored"
        );
        Ok(reservation)
    }
}
