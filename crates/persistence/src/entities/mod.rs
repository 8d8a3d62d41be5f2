//! Entity definitions (database row mappings).

pub mod application;
pub mod assignment;
pub mod campaign;
pub mod donation;
pub mod shift;
pub mod stage;
pub mod user;

pub use application::ApplicationEntity;
pub use assignment::{AssignmentEntity, UpcomingAssignmentRow};
pub use campaign::CampaignEntity;
pub use donation::DonationEntity;
pub use shift::{ShiftEntity, ShiftWithOccupancyRow};
pub use stage::StageEntity;
pub use user::UserEntity;
