//! Global configuration constants for tweetview.
//!
//! Ranking defaults, metering parameters, payment gateway endpoints and server
//! limits are defined here. These are compile-time constants; runtime
//! configuration is handled via CLI arguments and environment variables in
//! the server's `main.rs`.

/// Number of most frequent favorites terms kept in the vocabulary.
pub const DEFAULT_VOCABULARY_SIZE: usize = 200;

/// Number of pages fetched per collection (favorites, home timeline).
///
/// The upstream API serves 20 statuses per page by default, so five pages
/// bound each collection at roughly 100 items.
pub const DEFAULT_NUM_PAGES: u32 = 5;

/// Upper bound accepted for `--pages`.
pub const MAX_NUM_PAGES: u32 = 20;

/// Upper bound accepted for `--vocabulary-size`.
pub const MAX_VOCABULARY_SIZE: usize = 10_000;

/// Lifetime of a stashed session, in seconds.
pub const SESSION_TTL_SECS: u64 = 600;

/// Interval between background sweeps of expired sessions, in seconds.
pub const SESSION_PURGE_INTERVAL_SECS: u64 = 60;

/// Free requests granted to an account the first time it logs in.
pub const FREE_REQUESTS: u32 = 25;

/// Price of the single purchasable product, as sent in the `AMT` field.
pub const PRODUCT_PRICE: &str = "10.00";

/// Number of requests credited by one purchase.
pub const PRODUCT_QUANTITY: u32 = 100;

/// Display name of the purchased units.
pub const PRODUCT_UNITS: &str = "login requests";

/// PayPal NVP API version sent with every call.
pub const PAYPAL_API_VERSION: &str = "72.0";

/// PayPal sandbox NVP endpoint.
pub const PAYPAL_SANDBOX_ENDPOINT: &str = "https://api-3t.sandbox.paypal.com/nvp";

/// PayPal sandbox checkout page that buyers are redirected to.
pub const PAYPAL_SANDBOX_CHECKOUT_URL: &str = "https://www.sandbox.paypal.com/webscr";

/// Default base URL of the timeline API.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1";

/// Default OAuth authorization page.
pub const DEFAULT_OAUTH_AUTHORIZE_URL: &str = "https://twitter.com/i/oauth2/authorize";

/// Default OAuth token endpoint.
pub const DEFAULT_OAUTH_TOKEN_URL: &str = "https://api.twitter.com/2/oauth2/token";

/// Default endpoint that resolves the authenticated user.
pub const DEFAULT_OAUTH_USER_URL: &str = "https://api.twitter.com/2/users/me";

/// Timeout for calls to upstream services (timeline API, OAuth, PayPal), in seconds.
pub const UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default public URL used to build OAuth and checkout callback URLs.
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080";

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Global rate limit in requests per second.
pub const RATE_LIMIT_RPS: u64 = 100;

/// Maximum HTTP request body size in bytes (64 KB).
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 512;
