//! Structured audit logging for credit and payment operations.
//!
//! Provides [`AuditContext`] (built by handlers from the request headers and
//! the session) and [`audit_event`] for emitting structured audit log entries
//! with `target: "audit"`. Operators can filter/route audit events via
//! `RUST_LOG=audit=info`.

use axum::http::HeaderMap;

/// Identity and request context for audit logging.
#[derive(Clone, Debug)]
pub struct AuditContext {
    /// Social-network username, or "-" when unknown.
    pub username: String,
    /// Masked session id (first 8 chars + "...").
    pub session: String,
    /// Client IP from `X-Forwarded-For` / `X-Real-IP` headers, or "-".
    pub client_ip: String,
}

impl AuditContext {
    pub fn new(headers: &HeaderMap, username: Option<&str>, sid: &str) -> Self {
        Self {
            username: username.unwrap_or("-").to_string(),
            session: mask_session_id(sid),
            client_ip: extract_client_ip(headers),
        }
    }
}

/// Mask a session id for safe logging: first 8 chars + "...".
pub fn mask_session_id(sid: &str) -> String {
    match sid.get(..8) {
        Some(prefix) if sid.len() > 8 => format!("{prefix}..."),
        _ => "***".to_string(),
    }
}

/// Extract client IP from request headers (X-Forwarded-For → X-Real-IP → "-").
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or("-").trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Emit a structured audit log entry.
///
/// All audit events use `target: "audit"` so they can be filtered independently
/// from operational logs (e.g. `RUST_LOG=audit=info`).
pub fn audit_event(ctx: &AuditContext, action: &str, detail: &str, outcome: &str) {
    tracing::info!(
        target: "audit",
        actor = %ctx.username,
        session = %ctx.session,
        client_ip = %ctx.client_ip,
        action = %action,
        detail = %detail,
        outcome = %outcome,
        "audit"
    );
}
