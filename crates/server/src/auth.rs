//! OAuth login against the social network.
//!
//! [`AuthProvider`] is the narrow seam the handlers depend on: produce the
//! authorization URL the user is sent to, and exchange the code the provider
//! sends back for the user's identity and tokens. [`HttpAuthProvider`] speaks
//! the OAuth 2.0 authorization-code flow over `reqwest`; no request signing
//! is involved.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity and credentials of a logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    /// Access token used for timeline requests.
    pub token: String,
    /// Refresh token, empty when the provider did not issue one.
    #[serde(default)]
    pub secret: String,
}

/// Errors from the OAuth collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid OAuth configuration: {0}")]
    Config(String),
    #[error("authorization code rejected: {0}")]
    Rejected(String),
    #[error("user lookup failed: {0}")]
    UserLookup(String),
    #[error("OAuth request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// OAuth collaborator.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// URL the user is redirected to in order to grant access.
    fn authorization_url(&self) -> Result<String, AuthError>;

    /// Exchange the authorization code from the callback for the user's identity.
    async fn exchange(&self, code: &str) -> Result<UserInfo, AuthError>;
}

/// Endpoints and client credentials of the OAuth provider.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub user_url: String,
    /// Our callback (`{public_url}/app`).
    pub callback_url: String,
    pub scope: String,
}

/// OAuth 2.0 authorization-code provider.
pub struct HttpAuthProvider {
    config: OAuthConfig,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct UserEnvelope {
    data: UserData,
}

#[derive(Deserialize)]
struct UserData {
    username: String,
}

impl HttpAuthProvider {
    pub fn new(config: OAuthConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    fn authorization_url(&self) -> Result<String, AuthError> {
        let url = reqwest::Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("scope", self.config.scope.as_str()),
            ],
        )
        .map_err(|e| AuthError::Config(format!("authorize URL: {e}")))?;
        Ok(url.into())
    }

    async fn exchange(&self, code: &str) -> Result<UserInfo, AuthError> {
        let resp = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::Rejected(format!(
                "token endpoint returned {}",
                resp.status()
            )));
        }
        let token: TokenResponse = resp.json().await?;

        let resp = self
            .client
            .get(&self.config.user_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::UserLookup(format!(
                "user endpoint returned {}",
                resp.status()
            )));
        }
        let user: UserEnvelope = resp.json().await?;

        Ok(UserInfo {
            username: user.data.username,
            token: token.access_token,
            secret: token.refresh_token.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(authorize_url: &str) -> HttpAuthProvider {
        HttpAuthProvider::new(
            OAuthConfig {
                client_id: "client-123".into(),
                client_secret: "s3cret".into(),
                authorize_url: authorize_url.into(),
                token_url: "http://127.0.0.1:1/token".into(),
                user_url: "http://127.0.0.1:1/me".into(),
                callback_url: "http://localhost:8080/app".into(),
                scope: "tweet.read users.read".into(),
            },
            reqwest::Client::new(),
        )
    }

    #[test]
    fn test_authorization_url_carries_client_and_callback() {
        let url = provider("https://example.com/oauth/authorize")
            .authorization_url()
            .unwrap();
        assert!(url.starts_with("https://example.com/oauth/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fapp"));
        assert!(!url.contains("s3cret"));
    }

    #[test]
    fn test_authorization_url_rejects_bad_base() {
        let err = provider("not a url").authorization_url().unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[tokio::test]
    async fn test_exchange_unreachable_provider_is_http_error() {
        let err = provider("https://example.com/authorize")
            .exchange("code")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Http(_)));
    }
}
