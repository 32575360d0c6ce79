//! tweetview-server: HTTP service for tweetview.
//!
//! Provides the web API, the collaborators it talks to (OAuth provider,
//! timeline source, payment gateway) and the in-memory session and credit
//! stores. Ranking logic lives in `tweetview-core`.

/// HTTP layer: Axum router, handlers, models, audit, metrics.
pub mod api;
/// OAuth login and user identity.
pub mod auth;
/// Per-user login credits.
pub mod ledger;
/// PayPal Express Checkout over the NVP API.
pub mod paypal;
/// Session stash with TTL.
pub mod session;
/// Paginated timeline fetching.
pub mod source;
