//! Monobank webhook verification, parsing and status classification.
//!
//! The envelope contract generalizes to any provider: an outer object with a
//! provider tag, an optional signature and a nested payload. The signature is
//! base64(HMAC-SHA256(secret, raw request body)) over the exact raw bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Webhook signature did not verify against the configured secret.
#[derive(Debug, Error)]
#[error("Invalid webhook signature")]
pub struct SignatureError;

/// Outer webhook envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub provider: String,
    /// May instead arrive in the `X-Signature` request header.
    #[serde(default)]
    pub signature: Option<String>,
    pub payload: serde_json::Value,
}

/// Fields extracted from the provider payload.
///
/// `amount` is the provider's integer minor-unit representation and is kept
/// for the stored payload only; it is not reconciled against the donation's
/// stored amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonobankWebhookData {
    pub invoice_id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
}

impl MonobankWebhookData {
    /// Extracts webhook fields from the provider payload.
    ///
    /// Monobank nests the interesting fields under `data`; some callers send
    /// them at the top level, and the invoice id appears as either
    /// `invoiceId` or `invoice_id`.
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        let data = payload.get("data").unwrap_or(payload);
        let str_field = |key: &str| {
            data.get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        Self {
            invoice_id: str_field("invoiceId")
                .or_else(|| str_field("invoice_id"))
                .unwrap_or_default(),
            status: str_field("status").unwrap_or_default(),
            amount: data.get("amount").and_then(|v| v.as_i64()).unwrap_or(0),
            currency: str_field("ccy").unwrap_or_else(|| "UAH".to_string()),
            customer_email: str_field("customerEmail"),
            customer_name: str_field("customerName"),
        }
    }

    /// The provider-tagged payload stored on the donation.
    pub fn tagged_payload(&self) -> serde_json::Value {
        serde_json::json!({ "monobank": self })
    }
}

/// What the provider status string means for the donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResolution {
    Succeeded,
    Failed,
    /// Unknown or intermediate status; store the payload without finalizing.
    Processing,
}

/// Classifies a provider status string (case-insensitive).
pub fn classify_status(provider_status: &str) -> WebhookResolution {
    match provider_status.to_lowercase().as_str() {
        "success" | "succeeded" | "processed" => WebhookResolution::Succeeded,
        "failure" | "failed" | "expired" => WebhookResolution::Failed,
        _ => WebhookResolution::Processing,
    }
}

/// Validates webhook signatures for one provider secret.
pub struct WebhookValidator {
    secret: Option<String>,
}

impl WebhookValidator {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    /// Whether signature checking is active.
    ///
    /// Without a configured secret verification is skipped entirely; that
    /// mode must never be deployed and the ingress handler logs it loudly.
    pub fn is_enforcing(&self) -> bool {
        self.secret.is_some()
    }

    /// Verifies the received signature against the raw request body.
    ///
    /// With a configured secret, a missing signature fails the same way a
    /// wrong one does.
    pub fn ensure_signature(
        &self,
        received: Option<&str>,
        raw_body: &[u8],
    ) -> Result<(), SignatureError> {
        let Some(secret) = &self.secret else {
            return Ok(());
        };
        let received = received.ok_or(SignatureError)?;
        if shared::crypto::verify_webhook_signature(secret, raw_body, received) {
            Ok(())
        } else {
            Err(SignatureError)
        }
    }
}
