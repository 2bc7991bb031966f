use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ListResourceTemplatesResult, ListResourcesResult,
        PaginatedRequestParams, ProtocolVersion, RawResource, RawResourceTemplate,
        ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
        ResourceTemplate, ServerCapabilities, ServerInfo,
    },
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};

use crate::domain::card::{CardType, CardValidationResult};
use crate::domain::offer::Offer;
use crate::domain::payment_form::PaymentForm;
use crate::domain::pricing::{PriceBreakdown, PriceInputs, compute_total, format_amount};
use crate::domain::reservation::{BookingRequest, ReservationRecord};
use crate::domain::service::{ServiceSelection, ServiceSet};
use crate::domain::session::{Currency, Locale, SessionStore};
use crate::domain::stay::StayPeriod;
use crate::error::BookingError;
use crate::ports::booking_api::BookingApi;
use crate::ports::payment_gateway::PaymentGateway;

// ---------- Resource Store ----------

/// Offers, quotes and reservations produced by tools, exposed as MCP
/// resources under `hotel://` URIs.
#[derive(Clone, Default)]
pub struct ResourceStore {
    entries: Arc<RwLock<HashMap<String, ResourceEntry>>>,
}

#[derive(Clone)]
struct ResourceEntry {
    name: String,
    text: String,
}

impl ResourceStore {
    async fn insert(&self, uri: impl Into<String>, name: impl Into<String>, text: String) {
        self.entries.write().await.insert(
            uri.into(),
            ResourceEntry {
                name: name.into(),
                text,
            },
        );
    }

    async fn get(&self, uri: &str) -> Option<ResourceEntry> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(uri, entry)| (uri.clone(), entry.name.clone()))
            .collect();
        entries.sort();
        entries
    }
}

impl std::fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore").finish()
    }
}

// ---------- Tool parameter types ----------

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct OfferToolParams {
    /// Offer ID (`id_offre`) from the hotel's offer list
    pub id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ServicesToolParams {
    /// Hotel ID whose add-on services to list
    pub hotel_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct QuoteToolParams {
    /// Offer to price. Provides the nightly rate and the hotel's services.
    pub offer_id: Option<String>,
    /// Explicit nightly rate, used when no offer is given
    pub nightly_rate: Option<f64>,
    /// Check-in date (YYYY-MM-DD)
    pub check_in: String,
    /// Check-out date (YYYY-MM-DD)
    pub check_out: String,
    /// Number of adults (default: 1)
    pub adults: Option<u32>,
    /// Number of children (default: 0)
    pub children: Option<u32>,
    /// IDs of the hotel services to add (requires `offer_id`)
    pub service_ids: Option<Vec<String>>,
}

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct PaymentToolParams {
    /// Card type: Visa, MasterCard, Amex or Discover
    pub card_type: Option<String>,
    /// Card number, spaces allowed
    #[serde(default)]
    pub number: String,
    /// Name printed on the card
    #[serde(default)]
    pub holder_name: String,
    /// Expiration date, MM/YY
    #[serde(default)]
    pub expiry: String,
    /// Security code
    #[serde(default)]
    pub cvv: String,
    /// Whether the guest accepted the terms and conditions
    #[serde(default)]
    pub terms_accepted: bool,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct BookToolParams {
    /// Offer to book
    pub offer_id: String,
    /// Check-in date (YYYY-MM-DD)
    pub check_in: String,
    /// Check-out date (YYYY-MM-DD)
    pub check_out: String,
    /// Number of adults (default: 1)
    pub adults: Option<u32>,
    /// Number of children (default: 0)
    pub children: Option<u32>,
    /// IDs of the hotel services to add
    pub service_ids: Option<Vec<String>>,
    /// Guest email. Defaults to the signed-in session's email.
    pub client_email: Option<String>,
    /// Guest full name
    pub client_name: String,
    /// Payment card details
    pub payment: PaymentToolParams,
}

#[derive(Debug, Clone, Copy, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    Start,
    Logout,
    SetCurrency,
    SetLocale,
    Show,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SessionToolParams {
    /// What to do with the session
    pub action: SessionAction,
    /// Session token (for `start`)
    pub token: Option<String>,
    /// Client email (for `start`)
    pub email: Option<String>,
    /// Currency code: EUR, USD or GBP (for `set_currency`)
    pub currency: Option<String>,
    /// Locale: fr or en (for `set_locale`)
    pub locale: Option<String>,
}

// ---------- Quote assembly ----------

struct Quote {
    offer: Option<Offer>,
    stay: StayPeriod,
    adults: u32,
    services: Vec<ServiceSelection>,
    breakdown: PriceBreakdown,
}

impl Quote {
    fn render(&self, currency: Currency) -> String {
        let mut text = String::new();
        if let Some(offer) = &self.offer {
            let _ = writeln!(
                text,
                "Offer {}: {} ({})",
                offer.id, offer.room_type, offer.pension
            );
        }
        let _ = writeln!(text, "Stay: {}", self.stay);
        if self.stay.was_clamped() {
            let _ = writeln!(
                text,
                "Note: check-out is not after check-in, the stay is counted as 1 night."
            );
        }
        for s in &self.services {
            let _ = writeln!(
                text,
                "  + {} ({}): {}",
                s.service_id,
                s.pricing_type,
                format_amount(s.price(self.breakdown.nights, self.adults), currency)
            );
        }
        text.push_str(&self.breakdown.render(currency));
        text
    }
}

fn tool_error(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

fn tool_text(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

fn payment_form(params: PaymentToolParams) -> Result<PaymentForm, String> {
    let card_type = match params.card_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<CardType>()?),
    };
    Ok(PaymentForm {
        card_type,
        number: params.number,
        holder_name: params.holder_name,
        expiry: params.expiry,
        cvv: params.cvv,
        terms_accepted: params.terms_accepted,
    })
}

fn decline_text(result: &CardValidationResult) -> String {
    format!(
        "Payment declined: {}. Correct the card details and try again.",
        result.message()
    )
}

// ---------- MCP Server ----------

#[derive(Clone)]
pub struct BookingMcpServer {
    api: Arc<dyn BookingApi>,
    gateway: Arc<dyn PaymentGateway>,
    session: SessionStore,
    tool_router: ToolRouter<Self>,
    resources: ResourceStore,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[tool_router]
impl BookingMcpServer {
    pub fn new(
        api: Arc<dyn BookingApi>,
        gateway: Arc<dyn PaymentGateway>,
        session: SessionStore,
    ) -> Self {
        Self {
            api,
            gateway,
            session,
            tool_router: Self::tool_router(),
            resources: ResourceStore::default(),
            today: local_today,
        }
    }

    /// Override the date card expiry is checked against.
    #[must_use]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Resolve the nightly rate and service selections, then price the stay.
    async fn build_quote(
        &self,
        offer_id: Option<&str>,
        nightly_rate: Option<f64>,
        stay: StayPeriod,
        adults: u32,
        children: u32,
        service_ids: &[String],
    ) -> crate::error::Result<Quote> {
        let (offer, rate, services) = match (offer_id, nightly_rate) {
            (Some(id), _) => {
                let offer = self.api.get_offer(id).await?;
                let services = if service_ids.is_empty() {
                    Vec::new()
                } else {
                    let available = self.api.list_hotel_services(&offer.hotel_id).await?;
                    let mut picked = ServiceSet::new();
                    for sid in service_ids {
                        let service = available.iter().find(|s| &s.id == sid).ok_or_else(|| {
                            BookingError::invalid(format!(
                                "service '{sid}' is not offered by hotel {}",
                                offer.hotel_id
                            ))
                        })?;
                        picked.toggle(service.select(1), true);
                    }
                    picked.as_slice().to_vec()
                };
                let rate = offer.nightly_rate;
                (Some(offer), rate, services)
            }
            (None, Some(rate)) => {
                if !service_ids.is_empty() {
                    return Err(BookingError::invalid(
                        "services can only be priced against an offer",
                    ));
                }
                (None, rate, Vec::new())
            }
            (None, None) => {
                return Err(BookingError::invalid(
                    "either offer_id or nightly_rate is required",
                ));
            }
        };
        if !rate.is_finite() || rate < 0.0 {
            return Err(BookingError::invalid(format!("invalid nightly rate {rate}")));
        }

        let breakdown = compute_total(&PriceInputs {
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            adults,
            children,
            room_nightly_rate: rate,
            services: services.clone(),
        });
        Ok(Quote {
            offer,
            stay,
            adults,
            services,
            breakdown,
        })
    }

    /// Fetch a hotel offer: room type, meal plan and nightly rate.
    #[tool(
        name = "hotel_get_offer",
        description = "Get a hotel offer by ID: room type, meal plan (pension), capacity and nightly rate. Use the returned hotel ID with hotel_list_services.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn hotel_get_offer(
        &self,
        Parameters(params): Parameters<OfferToolParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.api.get_offer(&params.id).await {
            Ok(offer) => {
                let currency = self.session.snapshot().await.currency;
                let mut text = offer.to_string();
                let _ = writeln!(
                    text,
                    "Nightly rate: {}",
                    format_amount(offer.nightly_rate, currency)
                );
                self.resources
                    .insert(
                        format!("hotel://offer/{}", offer.id),
                        format!("Offer {}", offer.id),
                        text.clone(),
                    )
                    .await;
                Ok(tool_text(text))
            }
            Err(e) => Ok(tool_error(format!("Failed to get offer: {e}"))),
        }
    }

    /// List the add-on services a hotel sells.
    #[tool(
        name = "hotel_list_services",
        description = "List the add-on services of a hotel (breakfast, parking, cleaning...) with their price and how they are charged: per night, per person per night, per stay or flat.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn hotel_list_services(
        &self,
        Parameters(params): Parameters<ServicesToolParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.api.list_hotel_services(&params.hotel_id).await {
            Ok(services) => {
                let currency = self.session.snapshot().await.currency;
                let mut text = String::new();
                if services.is_empty() {
                    let _ = writeln!(text, "Hotel {} offers no extra services.", params.hotel_id);
                } else {
                    let _ = writeln!(
                        text,
                        "{} services for hotel {}:",
                        services.len(),
                        params.hotel_id
                    );
                    for s in &services {
                        let _ = writeln!(
                            text,
                            "- {} (ID: {}): {} {}",
                            s.name,
                            s.id,
                            format_amount(s.price, currency),
                            s.pricing_type
                        );
                    }
                }
                self.resources
                    .insert(
                        format!("hotel://services/{}", params.hotel_id),
                        format!("Services: hotel {}", params.hotel_id),
                        text.clone(),
                    )
                    .await;
                Ok(tool_text(text))
            }
            Err(e) => Ok(tool_error(format!("Failed to list services: {e}"))),
        }
    }

    /// Price a stay: nights, room subtotal, services and total.
    #[tool(
        name = "hotel_quote",
        description = "Compute the price of a stay. Nights are counted from check-in to check-out (minimum 1). Room cost is nightly rate x nights; services are added by their pricing type. Amounts are shown in the session currency.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn hotel_quote(
        &self,
        Parameters(params): Parameters<QuoteToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let stay = match StayPeriod::parse(&params.check_in, &params.check_out) {
            Ok(stay) => stay,
            Err(e) => return Ok(tool_error(e.to_string())),
        };
        let adults = params.adults.unwrap_or(1);
        if adults == 0 {
            return Ok(tool_error("at least one adult is required"));
        }
        let service_ids = params.service_ids.unwrap_or_default();
        let quote = match self
            .build_quote(
                params.offer_id.as_deref(),
                params.nightly_rate,
                stay,
                adults,
                params.children.unwrap_or(0),
                &service_ids,
            )
            .await
        {
            Ok(q) => q,
            Err(e) => return Ok(tool_error(format!("Failed to compute quote: {e}"))),
        };

        let currency = self.session.snapshot().await.currency;
        let text = quote.render(currency);
        let key = params.offer_id.as_deref().unwrap_or("custom");
        self.resources
            .insert(
                format!("hotel://quote/{key}"),
                format!("Quote: {key}"),
                text.clone(),
            )
            .await;
        Ok(tool_text(text))
    }

    /// Check a payment card without booking anything.
    #[tool(
        name = "hotel_validate_card",
        description = "Validate payment card details against the sandbox payment rules: required fields, expiration date, test cards, Luhn checksum and card type prefix. No money is moved.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn hotel_validate_card(
        &self,
        Parameters(params): Parameters<PaymentToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let form = match payment_form(params) {
            Ok(form) => form,
            Err(e) => return Ok(tool_error(e)),
        };
        let card = match form.into_card() {
            Ok(card) => card,
            Err(incomplete) => return Ok(tool_error(incomplete.to_string())),
        };
        let result = self.gateway.authorize(&card, (self.today)()).await;
        if result.valid {
            Ok(tool_text(format!(
                "Card accepted: {} ending in {}",
                card.declared_type,
                card.last_four()
            )))
        } else {
            Ok(tool_error(decline_text(&result)))
        }
    }

    /// Quote, pay and persist a reservation in one go.
    #[tool(
        name = "hotel_book",
        description = "Book an offer: validates the guest details, prices the stay, checks the payment card and, if the payment is accepted, saves the reservation. A declined card or a failed save can be retried with corrected details.",
        annotations(read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    #[allow(clippy::too_many_lines)]
    async fn hotel_book(
        &self,
        Parameters(params): Parameters<BookToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session.snapshot().await;
        let client_email = params
            .client_email
            .or_else(|| session.client_email.clone())
            .unwrap_or_default();
        let request = BookingRequest {
            offer_id: params.offer_id,
            check_in: params.check_in,
            check_out: params.check_out,
            adults: params.adults.unwrap_or(1),
            children: params.children.unwrap_or(0),
            service_ids: params.service_ids.unwrap_or_default(),
            client_email,
            client_name: params.client_name,
        };
        let stay = match request.validate() {
            Ok(stay) => stay,
            Err(e) => return Ok(tool_error(e.to_string())),
        };

        let quote = match self
            .build_quote(
                Some(&request.offer_id),
                None,
                stay,
                request.adults,
                request.children,
                &request.service_ids,
            )
            .await
        {
            Ok(q) => q,
            Err(e) => return Ok(tool_error(format!("Failed to compute quote: {e}"))),
        };

        let pending = request.clone();
        self.session.update(|s| s.stash_pending(pending)).await;

        let form = match payment_form(params.payment) {
            Ok(form) => form,
            Err(e) => return Ok(tool_error(e)),
        };
        let card = match form.into_card() {
            Ok(card) => card,
            Err(incomplete) => return Ok(tool_error(incomplete.to_string())),
        };
        let result = self.gateway.authorize(&card, (self.today)()).await;
        if !result.valid {
            return Ok(tool_error(decline_text(&result)));
        }

        let record = ReservationRecord::new(&request, &stay, &quote.services, &quote.breakdown);
        let reservation = match self
            .api
            .create_reservation(&record, session.token.as_deref())
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, offer_id = %request.offer_id, "Reservation save failed");
                return Ok(tool_error(
                    "Payment was accepted but the reservation could not be saved. Please try again in a moment.",
                ));
            }
        };
        self.session.update(|s| s.take_pending()).await;

        let mut text = format!("Booking confirmed!\n{reservation}\n\n");
        text.push_str(&quote.render(session.currency));
        self.resources
            .insert(
                format!("hotel://reservation/{}", reservation.id),
                format!("Reservation {}", reservation.id),
                text.clone(),
            )
            .await;
        Ok(tool_text(text))
    }

    /// Manage the session: sign in, sign out, display preferences.
    #[tool(
        name = "hotel_session",
        description = "Manage the booking session. Actions: start (token + email), logout (resets preferences and drops any pending booking), set_currency (EUR, USD, GBP), set_locale (fr, en), show.",
        annotations(read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn hotel_session(
        &self,
        Parameters(params): Parameters<SessionToolParams>,
    ) -> Result<CallToolResult, McpError> {
        match params.action {
            SessionAction::Start => {
                let (Some(token), Some(email)) = (params.token, params.email) else {
                    return Ok(tool_error("start requires both token and email"));
                };
                self.session.update(|s| s.start(token, email)).await;
            }
            SessionAction::Logout => self.session.update(|s| s.logout()).await,
            SessionAction::SetCurrency => {
                let parsed = params
                    .currency
                    .as_deref()
                    .ok_or_else(|| "set_currency requires currency".to_string())
                    .and_then(str::parse::<Currency>);
                match parsed {
                    Ok(c) => self.session.update(|s| s.set_currency(c)).await,
                    Err(e) => return Ok(tool_error(e)),
                }
            }
            SessionAction::SetLocale => {
                let parsed = params
                    .locale
                    .as_deref()
                    .ok_or_else(|| "set_locale requires locale".to_string())
                    .and_then(str::parse::<Locale>);
                match parsed {
                    Ok(l) => self.session.update(|s| s.set_locale(l)).await,
                    Err(e) => return Ok(tool_error(e)),
                }
            }
            SessionAction::Show => {}
        }
        Ok(tool_text(self.session.snapshot().await.to_string()))
    }
}

#[tool_handler]
impl ServerHandler for BookingMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Hotel booking MCP server: price stays, check payment cards and book offers.\n\
                 \n\
                 ## Tools\n\
                 - hotel_get_offer: room type, meal plan and nightly rate of an offer\n\
                 - hotel_list_services: add-on services of a hotel and how they are charged\n\
                 - hotel_quote: nights, room subtotal, services subtotal and total for a stay\n\
                 - hotel_validate_card: check card details against the sandbox payment rules\n\
                 - hotel_book: validate, pay and save a reservation\n\
                 - hotel_session: sign in/out, choose currency and locale\n\
                 \n\
                 ## Notes\n\
                 - Payments are simulated; use the documented sandbox test cards.\n\
                 - A declined payment never saves anything and can be retried.\n\
                 - Offers, quotes and reservations are kept as hotel:// resources."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources: Vec<Resource> = self
            .resources
            .list()
            .await
            .into_iter()
            .map(|(uri, name)| Resource {
                annotations: None,
                raw: RawResource {
                    uri,
                    name,
                    title: None,
                    description: None,
                    mime_type: Some("text/plain".into()),
                    size: None,
                    icons: None,
                    meta: None,
                },
            })
            .collect();
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        let template = |uri: &str, name: &str, description: &str| ResourceTemplate {
            annotations: None,
            raw: RawResourceTemplate {
                uri_template: uri.into(),
                name: name.into(),
                title: Some(name.into()),
                description: Some(description.into()),
                mime_type: Some("text/plain".into()),
                icons: None,
            },
        };
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![
                template(
                    "hotel://offer/{id}",
                    "Offer",
                    "Offer details (fetched via hotel_get_offer)",
                ),
                template(
                    "hotel://services/{hotel_id}",
                    "Hotel Services",
                    "Add-on services of a hotel (fetched via hotel_list_services)",
                ),
                template(
                    "hotel://quote/{offer_id}",
                    "Quote",
                    "Latest price breakdown for an offer (computed via hotel_quote)",
                ),
                template(
                    "hotel://reservation/{id}",
                    "Reservation",
                    "Confirmed reservation (created via hotel_book)",
                ),
            ],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match self.resources.get(&request.uri).await {
            Some(entry) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(entry.text, request.uri)],
            }),
            None => Err(McpError::resource_not_found(
                format!("resource not found: {}", request.uri),
                None,
            )),
        }
    }
}
