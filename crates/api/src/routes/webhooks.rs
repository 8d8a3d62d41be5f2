//! Payment provider webhook ingress.
//!
//! The handler consumes the raw body because the HMAC signature is computed
//! over the exact bytes on the wire; parsing first and re-serializing would
//! break verification.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use domain::services::monobank::{
    classify_status, MonobankWebhookData, WebhookEnvelope, WebhookResolution, WebhookValidator,
};
use persistence::repositories::{DonationRepository, ProviderDetails};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics;

/// Response returned to the provider.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub reference: String,
}

/// POST /api/v1/webhooks/monobank
pub async fn monobank_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let envelope: WebhookEnvelope = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Malformed webhook body: {}", e)))?;

    if envelope.provider != "monobank" {
        return Err(ApiError::Validation(format!(
            "Unsupported provider: {}",
            envelope.provider
        )));
    }

    // The signature may arrive in the body or the X-Signature header.
    let header_signature = headers
        .get("X-Signature")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let signature = envelope.signature.clone().or(header_signature);

    let validator =
        WebhookValidator::new(state.config.payments.monobank_webhook_secret.clone());
    if !validator.is_enforcing() {
        tracing::warn!(
            "Monobank webhook secret not configured; accepting unsigned webhooks. \
             Never run this in production."
        );
    }
    // Verified before any lookup so a forged body cannot probe the ledger.
    validator.ensure_signature(signature.as_deref(), &body)?;

    let data = MonobankWebhookData::from_payload(&envelope.payload);
    if data.invoice_id.is_empty() {
        return Err(ApiError::Validation("Missing invoice id".into()));
    }

    let donations = DonationRepository::new(state.pool.clone());
    let donation = donations
        .resolve_invoice(&data.invoice_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Unknown invoice".into()))?;

    let payload = data.tagged_payload();
    let (status, updated) = match classify_status(&data.status) {
        WebhookResolution::Succeeded => {
            let details = ProviderDetails {
                external_id: &data.invoice_id,
                payer_email: data.customer_email.as_deref(),
                payer_name: data.customer_name.as_deref(),
            };
            let updated = donations
                .mark_succeeded(donation.id, Some(&payload), Some(&details))
                .await?;
            metrics::record_donation_confirmed();
            ("succeeded", updated)
        }
        WebhookResolution::Failed => {
            let updated = donations.mark_failed(donation.id, Some(&payload)).await?;
            ("failed", updated)
        }
        WebhookResolution::Processing => {
            let updated = donations.mark_processing(donation.id, &payload).await?;
            ("processing", updated)
        }
    };

    tracing::info!(
        reference = %updated.reference,
        provider_status = %data.status,
        resolution = status,
        "Webhook processed"
    );
    Ok(Json(WebhookResponse {
        status,
        reference: updated.reference,
    }))
}
