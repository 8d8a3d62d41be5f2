//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to a user account.
///
/// Role changes are an admin-only operation; a user can never change their
/// own role through self-service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Volunteer,
    Coordinator,
    Beneficiary,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Volunteer => "volunteer",
            UserRole::Coordinator => "coordinator",
            UserRole::Beneficiary => "beneficiary",
            UserRole::Admin => "admin",
        }
    }
}

/// Represents a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Request payload for the admin role-change action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

/// Public projection of a user account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_verified: user.is_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(role: UserRole) -> User {
        User {
            id: 1,
            email: "volunteer@example.com".to_string(),
            full_name: "Test Volunteer".to_string(),
            phone_number: None,
            role,
            is_verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_admin() {
        assert!(test_user(UserRole::Admin).is_admin());
        assert!(!test_user(UserRole::Coordinator).is_admin());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&UserRole::Beneficiary).unwrap(),
            "\"beneficiary\""
        );
    }

    #[test]
    fn test_response_omits_phone() {
        let response: UserResponse = test_user(UserRole::Volunteer).into();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("phone_number").is_none());
        assert_eq!(json["role"], "volunteer");
    }
}
