//! Domain model definitions.

pub mod application;
pub mod assignment;
pub mod campaign;
pub mod donation;
pub mod shift;
pub mod stage;
pub mod user;

pub use application::{ApplicationStatus, VolunteerApplication};
pub use assignment::ShiftAssignment;
pub use campaign::{Campaign, CampaignStatus};
pub use donation::{Donation, DonationProvider, DonationStatus};
pub use shift::{CampaignShift, ShiftStatus};
pub use stage::CampaignStage;
pub use user::{User, UserRole};
