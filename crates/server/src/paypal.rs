//! PayPal Express Checkout over the NVP API.
//!
//! Covers the three calls of the checkout flow plus the buyer redirect URL:
//!
//! 1. `SetExpressCheckout` reserves a checkout token for an amount,
//! 2. the buyer is sent to the checkout page with that token,
//! 3. `GetExpressCheckoutDetails` reads back payer email and amount,
//! 4. `DoExpressCheckoutPayment` captures the payment.
//!
//! Requests are URL-encoded name/value pairs carrying `METHOD`, `VERSION`
//! and the 3-token credentials (`USER`, `PWD`, `SIGNATURE`); replies are
//! URL-encoded too. A reply is successful when `ACK` is `Success` or
//! `SuccessWithWarning`.

use async_trait::async_trait;
use std::collections::HashMap;

/// Errors from the payment gateway.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("missing required : {0}")]
    MissingRequired(&'static str),
    #[error("{method} returned ACK={ack}: {message}")]
    Declined {
        method: String,
        ack: String,
        message: String,
    },
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed gateway reply: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),
}

/// Decoded NVP reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NvpResponse {
    fields: HashMap<String, String>,
}

impl NvpResponse {
    /// Decode a URL-encoded reply body.
    pub fn parse(body: &str) -> Result<Self, PaymentError> {
        let fields: HashMap<String, String> = serde_urlencoded::from_str(body)?;
        Ok(Self { fields })
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Field lookup by exact (upper-case) name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn ack(&self) -> Option<&str> {
        self.get("ACK")
    }

    pub fn success(&self) -> bool {
        matches!(self.ack(), Some("Success") | Some("SuccessWithWarning"))
    }

    pub fn token(&self) -> Option<&str> {
        self.get("TOKEN")
    }

    /// Long error message of the first reported error, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.get("L_LONGMESSAGE0").or_else(|| self.get("L_SHORTMESSAGE0"))
    }
}

/// Payment collaborator.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn set_express_checkout(
        &self,
        amt: &str,
        return_url: &str,
        cancel_url: &str,
        payment_action: &str,
    ) -> Result<NvpResponse, PaymentError>;

    async fn get_express_checkout_details(&self, token: &str)
        -> Result<NvpResponse, PaymentError>;

    async fn do_express_checkout_payment(
        &self,
        token: &str,
        payer_id: &str,
        amt: &str,
        payment_action: &str,
    ) -> Result<NvpResponse, PaymentError>;

    /// Checkout page the buyer is redirected to for `token`.
    fn checkout_redirect_url(&self, token: &str) -> String;
}

/// API credentials and endpoints.
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    pub api_username: String,
    pub api_password: String,
    pub api_signature: String,
    pub api_endpoint: String,
    pub checkout_url: String,
    pub api_version: String,
}

/// NVP client.
pub struct PayPalNvp {
    config: PayPalConfig,
    client: reqwest::Client,
}

// Never echoed to logs.
const CREDENTIAL_FIELDS: [&str; 3] = ["USER", "PWD", "SIGNATURE"];

/// Fail when a required argument is absent or empty.
fn check_required(required: &[&'static str], args: &[(&str, &str)]) -> Result<(), PaymentError> {
    for &name in required {
        let present = args
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case(name) && !v.is_empty());
        if !present {
            return Err(PaymentError::MissingRequired(name));
        }
    }
    Ok(())
}

impl PayPalNvp {
    pub fn new(config: PayPalConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Execute one NVP method. Argument names are upper-cased.
    async fn call(&self, method: &str, args: &[(&str, &str)]) -> Result<NvpResponse, PaymentError> {
        let mut params: Vec<(String, String)> = vec![
            ("METHOD".into(), method.into()),
            ("VERSION".into(), self.config.api_version.clone()),
            ("USER".into(), self.config.api_username.clone()),
            ("PWD".into(), self.config.api_password.clone()),
            ("SIGNATURE".into(), self.config.api_signature.clone()),
        ];
        params.extend(
            args.iter()
                .map(|(k, v)| (k.to_ascii_uppercase(), v.to_string())),
        );

        if tracing::enabled!(tracing::Level::DEBUG) {
            let mut shown: Vec<String> = params
                .iter()
                .filter(|(k, _)| !CREDENTIAL_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            shown.sort();
            tracing::debug!(method, endpoint = %self.config.api_endpoint, params = ?shown, "NVP call");
        }

        let body = self
            .client
            .post(&self.config.api_endpoint)
            .form(&params)
            .send()
            .await?
            .text()
            .await?;
        let response = NvpResponse::parse(&body)?;

        if !response.success() {
            return Err(PaymentError::Declined {
                method: method.to_string(),
                ack: response.ack().unwrap_or("<missing>").to_string(),
                message: response.error_message().unwrap_or("").to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PaymentGateway for PayPalNvp {
    async fn set_express_checkout(
        &self,
        amt: &str,
        return_url: &str,
        cancel_url: &str,
        payment_action: &str,
    ) -> Result<NvpResponse, PaymentError> {
        let args = [
            ("amt", amt),
            ("returnurl", return_url),
            ("cancelurl", cancel_url),
            ("paymentaction", payment_action),
        ];
        check_required(&["AMT"], &args)?;
        self.call("SetExpressCheckout", &args).await
    }

    async fn get_express_checkout_details(
        &self,
        token: &str,
    ) -> Result<NvpResponse, PaymentError> {
        let args = [("token", token)];
        check_required(&["TOKEN"], &args)?;
        self.call("GetExpressCheckoutDetails", &args).await
    }

    async fn do_express_checkout_payment(
        &self,
        token: &str,
        payer_id: &str,
        amt: &str,
        payment_action: &str,
    ) -> Result<NvpResponse, PaymentError> {
        let args = [
            ("token", token),
            ("payerid", payer_id),
            ("amt", amt),
            ("paymentaction", payment_action),
        ];
        check_required(&["PAYMENTACTION", "PAYERID"], &args)?;
        self.call("DoExpressCheckoutPayment", &args).await
    }

    fn checkout_redirect_url(&self, token: &str) -> String {
        format!(
            "{}?cmd=_express-checkout&token={}",
            self.config.checkout_url, token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> PayPalNvp {
        PayPalNvp::new(
            PayPalConfig {
                api_username: "merchant_api1.example.com".into(),
                api_password: "pw".into(),
                api_signature: "sig".into(),
                api_endpoint: "http://127.0.0.1:1/nvp".into(),
                checkout_url: "https://www.sandbox.paypal.com/webscr".into(),
                api_version: "72.0".into(),
            },
            reqwest::Client::new(),
        )
    }

    #[test]
    fn test_parse_success_reply() {
        let resp = NvpResponse::parse(
            "TOKEN=EC%2d1AB23456CD789012E&TIMESTAMP=2011%2d01%2d01T00%3a00%3a00Z&ACK=Success&VERSION=72%2e0",
        )
        .unwrap();
        assert!(resp.success());
        assert_eq!(resp.token(), Some("EC-1AB23456CD789012E"));
        assert_eq!(resp.get("VERSION"), Some("72.0"));
    }

    #[test]
    fn test_parse_failure_reply() {
        let resp = NvpResponse::parse(
            "ACK=Failure&L_ERRORCODE0=10410&L_SHORTMESSAGE0=Invalid%20token&L_LONGMESSAGE0=Invalid%20token%2e",
        )
        .unwrap();
        assert!(!resp.success());
        assert_eq!(resp.error_message(), Some("Invalid token."));
    }

    #[test]
    fn test_success_with_warning_counts_as_success() {
        let resp = NvpResponse::from_pairs([("ACK", "SuccessWithWarning")]);
        assert!(resp.success());
        assert!(!NvpResponse::default().success());
    }

    #[test]
    fn test_check_required() {
        assert!(check_required(&["AMT"], &[("amt", "10.00")]).is_ok());
        assert!(matches!(
            check_required(&["AMT"], &[("amt", "")]),
            Err(PaymentError::MissingRequired("AMT"))
        ));
        assert!(matches!(
            check_required(&["PAYMENTACTION", "PAYERID"], &[("paymentaction", "Sale")]),
            Err(PaymentError::MissingRequired("PAYERID"))
        ));
    }

    #[test]
    fn test_checkout_redirect_url() {
        assert_eq!(
            gateway().checkout_redirect_url("EC-123"),
            "https://www.sandbox.paypal.com/webscr?cmd=_express-checkout&token=EC-123"
        );
    }

    #[tokio::test]
    async fn test_missing_payer_rejected_before_any_request() {
        let err = gateway()
            .do_express_checkout_payment("EC-123", "", "10.00", "Sale")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::MissingRequired("PAYERID")));
    }
}
