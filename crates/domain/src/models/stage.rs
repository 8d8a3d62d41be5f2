//! Campaign stage domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An ordered milestone within a campaign.
///
/// `ord` is a positive integer but is not required to be contiguous; the
/// stable sort key is `(ord, id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CampaignStage {
    pub id: i64,
    pub campaign_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ord: i32,
    pub is_completed: bool,
    pub due_date: Option<NaiveDate>,
}

/// Request payload for creating a stage.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateStageRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "Order must be a positive integer"))]
    #[serde(default = "default_ord")]
    pub ord: i32,

    pub due_date: Option<NaiveDate>,
}

fn default_ord() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ord_must_be_positive() {
        let request = CreateStageRequest {
            title: "Collect supplies".to_string(),
            description: None,
            ord: 0,
            due_date: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_default_ord() {
        let request: CreateStageRequest =
            serde_json::from_str(r#"{"title":"Sort donations"}"#).unwrap();
        assert_eq!(request.ord, 1);
        assert!(request.validate().is_ok());
    }
}
