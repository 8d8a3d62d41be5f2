//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::user::{User, UserRole};

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            full_name: entity.full_name,
            phone_number: entity.phone_number,
            role: entity.role,
            is_verified: entity.is_verified,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
