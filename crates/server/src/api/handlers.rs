//! HTTP request handlers and shared application state.

use crate::api::audit::{audit_event, AuditContext};
use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::*;
use crate::auth::{AuthProvider, UserInfo};
use crate::ledger::CreditLedger;
use crate::paypal::{PaymentError, PaymentGateway};
use crate::session::{new_session_id, Session, SessionStore};
use crate::source::{collect_pages, TimelineSource};
use axum::extract::{Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tweetview_core::{build_relevant_items, config, Collection, Item, RankedTimeline};

/// Runtime settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Externally visible base URL, used for gateway return/cancel URLs.
    pub public_url: String,
    pub vocabulary_size: usize,
    pub num_pages: u32,
    pub session_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            public_url: config::DEFAULT_PUBLIC_URL.to_string(),
            vocabulary_size: config::DEFAULT_VOCABULARY_SIZE,
            num_pages: config::DEFAULT_NUM_PAGES,
            session_ttl: Duration::from_secs(config::SESSION_TTL_SECS),
        }
    }
}

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub source: Arc<dyn TimelineSource>,
    pub sessions: Arc<dyn SessionStore>,
    pub ledger: Arc<dyn CreditLedger>,
    pub payments: Arc<dyn PaymentGateway>,
    pub prometheus_handle: PrometheusHandle,
    pub settings: Settings,
    pub start_time: Instant,
}

const SET_EC: &str = "SetExpressCheckout";
const GET_EC_DETAILS: &str = "GetExpressCheckoutDetails";
const DO_EC_PAYMENT: &str = "DoExpressCheckoutPayment";

fn gateway_failure(operation: &'static str) -> impl FnOnce(PaymentError) -> ApiError {
    move |source| {
        metrics::record_payment(operation, "failure");
        ApiError::gateway(operation)(source)
    }
}

/// Fetch both collections and rank the home timeline for `user`.
async fn rank_timeline(state: &AppState, user: &UserInfo) -> RankedTimeline {
    let start = Instant::now();
    let pages = state.settings.num_pages;
    let source = state.source.as_ref();
    let (favorites, home) = tokio::join!(
        collect_pages(source, user, Collection::Favorites, pages),
        collect_pages(source, user, Collection::HomeTimeline, pages),
    );
    for page in favorites.iter().chain(&home).filter(|p| !p.is_success()) {
        metrics::record_page_failure(page.collection.name(), page.status);
    }

    let ranked = build_relevant_items(favorites, home, state.settings.vocabulary_size);
    metrics::record_pipeline(&ranked.stats, start.elapsed());
    tracing::info!(
        username = %user.username,
        favorites = ranked.stats.favorites,
        home_items = ranked.stats.home_items,
        returned = ranked.stats.returned,
        fallback = ranked.stats.fallback,
        pages_skipped = ranked.stats.pages_skipped,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Ranked home timeline"
    );
    ranked
}

/// `GET /`
pub async fn root() -> Json<LandingResponse> {
    Json(LandingResponse {
        title: "Tweet Relevance".to_string(),
        login_url: "/login".to_string(),
    })
}

/// `GET /login`
pub async fn login(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let url = state.auth.authorization_url()?;
    Ok(Redirect::to(&url))
}

/// `GET /app?code=` - OAuth callback.
///
/// Users with requests left get their timeline ranked and stashed, then are
/// redirected to the viewer; exhausted accounts get a 402 carrying the session
/// id the checkout form posts back.
pub async fn app(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AuthCallbackQuery>,
) -> Result<Response, ApiError> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing authorization code".into()))?;

    let user = match state.auth.exchange(&code).await {
        Ok(user) => user,
        Err(e) => {
            metrics::record_login("rejected");
            return Err(e.into());
        }
    };
    let username = user.username.clone();
    let account = state.ledger.get_or_create(&username);
    let sid = new_session_id();
    let ctx = AuditContext::new(&headers, Some(&username), &sid);
    let ttl = state.settings.session_ttl;

    if account.requests_remaining == 0 {
        state.sessions.set(&sid, Session::new(user), ttl);
        metrics::record_login("recharge");
        audit_event(&ctx, "login", "requests_remaining=0", "recharge");
        let body = RechargeResponse {
            title: "Recharge Account".to_string(),
            sid,
            quantity: config::PRODUCT_QUANTITY,
            units: config::PRODUCT_UNITS.to_string(),
            price: config::PRODUCT_PRICE.to_string(),
        };
        return Ok((StatusCode::PAYMENT_REQUIRED, Json(body)).into_response());
    }

    let ranked = rank_timeline(&state, &user).await;
    let session = Session {
        user,
        relevant_items: Some(ranked.items),
    };
    state.sessions.set(&sid, session, ttl);

    let remaining = state
        .ledger
        .decrement(&username)
        .map(|a| a.requests_remaining)
        .unwrap_or(0);
    metrics::record_login("ranked");
    audit_event(
        &ctx,
        "login",
        &format!("requests_remaining={remaining}"),
        "ranked",
    );

    Ok(Redirect::to(&format!("/tweetview/index.html?sid={sid}")).into_response())
}

/// `GET /data?sid=`
pub async fn data(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let sid = query.sid.unwrap_or_default();
    let session = state
        .sessions
        .get(&sid)
        .ok_or_else(|| ApiError::NotFound("Unknown or expired session".into()))?;
    let items = session
        .relevant_items
        .ok_or_else(|| ApiError::NotFound("No ranked timeline for this session".into()))?;
    Ok(Json(items))
}

/// `POST /set_ec`
pub async fn set_ec(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SetCheckoutForm>,
) -> Result<Redirect, ApiError> {
    let sid_query = serde_urlencoded::to_string([("sid", form.sid.as_str())])
        .map_err(|e| ApiError::Internal(format!("Failed to encode session id: {e}")))?;
    let base = state.settings.public_url.trim_end_matches('/');
    let return_url = format!("{base}/get_ec_details?{sid_query}");
    let cancel_url = format!("{base}/cancel_ec?{sid_query}");

    let response = state
        .payments
        .set_express_checkout(config::PRODUCT_PRICE, &return_url, &cancel_url, "Order")
        .await
        .map_err(gateway_failure(SET_EC))?;
    let token = response
        .token()
        .ok_or_else(|| ApiError::BadGateway(format!("{SET_EC} reply carried no token")))?;
    metrics::record_payment(SET_EC, "success");

    let username = state.sessions.get(&form.sid).map(|s| s.user.username);
    let ctx = AuditContext::new(&headers, username.as_deref(), &form.sid);
    audit_event(&ctx, "checkout_started", config::PRODUCT_PRICE, "success");

    Ok(Redirect::to(&state.payments.checkout_redirect_url(token)))
}

/// `GET /get_ec_details?token=&sid=&PayerID=`
pub async fn get_ec_details(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    Query(query): Query<CheckoutDetailsQuery>,
) -> Result<Json<ConfirmPurchaseResponse>, ApiError> {
    let response = state
        .payments
        .get_express_checkout_details(&query.token)
        .await
        .map_err(gateway_failure(GET_EC_DETAILS))?;
    metrics::record_payment(GET_EC_DETAILS, "success");

    Ok(Json(ConfirmPurchaseResponse {
        title: "Confirm Purchase".to_string(),
        quantity: config::PRODUCT_QUANTITY,
        units: config::PRODUCT_UNITS.to_string(),
        email: response.get("EMAIL").map(str::to_string),
        amount: response.get("AMT").map(str::to_string),
        query_string_params: raw.unwrap_or_default(),
    }))
}

/// `GET /do_ec_payment?sid=&token=&PayerID=`
///
/// The session is the only link between the payment and an account, so an
/// expired one aborts before the gateway is called.
pub async fn do_ec_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PaymentQuery>,
) -> Result<Response, ApiError> {
    let sid = query.sid.unwrap_or_default();
    let Some(session) = state.sessions.get(&sid) else {
        tracing::error!("Invalid/expired session in /do_ec_payment");
        let body = Json(TitleResponse::new("Session Expired"));
        return Ok((StatusCode::NOT_FOUND, body).into_response());
    };

    state
        .payments
        .do_express_checkout_payment(&query.token, &query.payer_id, config::PRODUCT_PRICE, "Sale")
        .await
        .map_err(gateway_failure(DO_EC_PAYMENT))?;
    metrics::record_payment(DO_EC_PAYMENT, "success");

    let username = session.user.username;
    let account = state.ledger.set(&username, config::PRODUCT_QUANTITY);
    let ctx = AuditContext::new(&headers, Some(&username), &sid);
    audit_event(
        &ctx,
        "recharge",
        &format!("requests_remaining={}", account.requests_remaining),
        "success",
    );

    Ok(Json(PaymentCompleteResponse {
        title: "Successful Payment".to_string(),
        quantity: config::PRODUCT_QUANTITY,
        units: config::PRODUCT_UNITS.to_string(),
    })
    .into_response())
}

/// `GET /cancel_ec`
pub async fn cancel_ec() -> Json<TitleResponse> {
    Json(TitleResponse::new("Cancel Purchase"))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        active_sessions: state.sessions.len(),
        accounts: state.ledger.len(),
    })
}

/// `GET /metrics`
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    metrics::update_store_metrics(state.sessions.as_ref(), state.ledger.as_ref());
    state.prometheus_handle.render()
}
