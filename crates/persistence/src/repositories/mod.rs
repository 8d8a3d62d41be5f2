//! Repository implementations.

pub mod application;
pub mod assignment;
pub mod campaign;
pub mod donation;
pub mod shift;
pub mod user;

pub use application::{ApplicationRepository, ApplyError};
pub use assignment::{AssignmentRepository, JoinError};
pub use campaign::CampaignRepository;
pub use donation::{DonationRepository, DonationScope, ProviderDetails};
pub use shift::ShiftRepository;
pub use user::UserRepository;

/// True when the error is a Postgres unique-constraint violation (23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
