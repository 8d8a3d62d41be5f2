//! Donation domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Supported payment providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "donation_provider", rename_all = "snake_case")]
pub enum DonationProvider {
    Monobank,
    Privatbank,
    Manual,
}

impl DonationProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationProvider::Monobank => "monobank",
            DonationProvider::Privatbank => "privatbank",
            DonationProvider::Manual => "manual",
        }
    }
}

/// Lifecycle status of a donation.
///
/// `succeeded` and `failed` are deliberately not terminal: a later manual
/// override or provider callback may still move them (see DESIGN.md).
/// `refunded` is reachable only through the admin override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "donation_status", rename_all = "snake_case")]
pub enum DonationStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
    Refunded,
}

/// A donation toward a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Donation {
    pub id: i64,
    /// Caller-facing unique id: 16 lowercase hex characters.
    pub reference: String,
    pub campaign_id: i64,
    pub donor_id: Option<i64>,
    pub provider: DonationProvider,
    /// The provider's own transaction id, distinct from `reference`.
    pub external_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub status: DonationStatus,
    pub payer_email: Option<String>,
    pub payer_name: Option<String>,
    pub note: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set only when the donation first succeeds.
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a donation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateDonationRequest {
    pub campaign_id: i64,

    pub amount: Decimal,

    /// Defaults to UAH when unspecified.
    #[validate(length(min = 3, max = 8, message = "Currency must be 3-8 characters"))]
    pub currency: Option<String>,

    pub provider: DonationProvider,

    #[validate(email(message = "Invalid payer email"))]
    pub payer_email: Option<String>,

    #[validate(length(max = 255, message = "Payer name must be at most 255 characters"))]
    pub payer_name: Option<String>,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Request payload for the admin status override.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DonationStatusUpdateRequest {
    pub status: DonationStatus,
}

/// Response payload for donation reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DonationResponse {
    pub reference: String,
    pub campaign_id: i64,
    pub donor_id: Option<i64>,
    pub provider: DonationProvider,
    pub external_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub status: DonationStatus,
    pub payer_name: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl From<Donation> for DonationResponse {
    fn from(d: Donation) -> Self {
        Self {
            reference: d.reference,
            campaign_id: d.campaign_id,
            donor_id: d.donor_id,
            provider: d.provider,
            external_id: d.external_id,
            amount: d.amount,
            currency: d.currency,
            status: d.status,
            payer_name: d.payer_name,
            note: d.note,
            created_at: d.created_at,
            confirmed_at: d.confirmed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_provider_tags() {
        assert_eq!(DonationProvider::Monobank.as_str(), "monobank");
        assert_eq!(
            serde_json::to_string(&DonationProvider::Privatbank).unwrap(),
            "\"privatbank\""
        );
    }

    #[test]
    fn test_create_request_deserialization() {
        let request: CreateDonationRequest = serde_json::from_str(
            r#"{"campaign_id":1,"amount":"1000.00","provider":"monobank"}"#,
        )
        .unwrap();
        assert_eq!(request.amount, dec!(1000.00));
        assert!(request.currency.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_email() {
        let request: CreateDonationRequest = serde_json::from_str(
            r#"{"campaign_id":1,"amount":"50","provider":"manual","payer_email":"nope"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
