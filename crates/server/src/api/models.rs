//! Request and response data transfer objects for the HTTP API.
//!
//! Query strings and forms deserialize into the request types. Every page of
//! the login and checkout flow is a small JSON object with a `title`.

use serde::{Deserialize, Serialize};

/// Query of `GET /app`, the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
}

/// Query carrying a session id (`GET /data`).
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub sid: Option<String>,
}

/// Form body of `POST /set_ec`.
#[derive(Debug, Deserialize)]
pub struct SetCheckoutForm {
    #[serde(default)]
    pub sid: String,
}

/// Query of `GET /get_ec_details`, as appended by the checkout page.
#[derive(Debug, Deserialize)]
pub struct CheckoutDetailsQuery {
    #[serde(default)]
    pub token: String,
}

/// Query of `GET /do_ec_payment`.
#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub sid: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(rename = "PayerID", default)]
    pub payer_id: String,
}

/// Response of `GET /`.
#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub title: String,
    pub login_url: String,
}

/// Response of `GET /app` when the account has no requests left (402).
#[derive(Debug, Serialize)]
pub struct RechargeResponse {
    pub title: String,
    pub sid: String,
    pub quantity: u32,
    pub units: String,
    pub price: String,
}

/// Response of `GET /get_ec_details`.
#[derive(Debug, Serialize)]
pub struct ConfirmPurchaseResponse {
    pub title: String,
    pub quantity: u32,
    pub units: String,
    pub email: Option<String>,
    pub amount: Option<String>,
    /// Echoed so the client can forward `sid`, `token` and `PayerID` to `/do_ec_payment`.
    pub query_string_params: String,
}

/// Response of `GET /do_ec_payment` on success.
#[derive(Debug, Serialize)]
pub struct PaymentCompleteResponse {
    pub title: String,
    pub quantity: u32,
    pub units: String,
}

/// Response carrying only a page title (cancel, session expired).
#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: String,
}

impl TitleResponse {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
    pub accounts: usize,
}
