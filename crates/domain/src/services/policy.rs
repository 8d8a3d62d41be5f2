//! Capability-based access policy.
//!
//! All authorization decisions funnel through [`can`]: handlers never compare
//! role strings ad hoc. The predicate is pure; every call site passes the
//! acting user explicitly.

use crate::models::application::ApplicationStatus;
use crate::models::campaign::Campaign;
use crate::models::donation::Donation;
use crate::models::user::{User, UserRole};
use crate::models::VolunteerApplication;

/// An action an actor may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a new campaign.
    CreateCampaign,
    /// Edit a campaign and create its stages/shifts.
    ManageCampaign,
    /// View a campaign's aggregate stats.
    ViewCampaignStats,
    /// List a campaign's applications.
    ViewApplications,
    /// Submit (or reactivate) an application.
    ApplyToCampaign,
    /// Set an application's status to the given target.
    SetApplicationStatus(ApplicationStatus),
    /// Join a shift without holding an approved application.
    JoinWithoutApproval,
    /// Read a donation record.
    ViewDonation,
    /// Manually override a donation's status.
    OverrideDonationStatus,
    /// Change another user's role.
    ChangeUserRole,
}

/// The resource an action targets.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Campaign(&'a Campaign),
    Application {
        application: &'a VolunteerApplication,
        campaign_coordinator_id: i64,
    },
    Donation {
        donation: &'a Donation,
        campaign_coordinator_id: i64,
    },
    /// Actions with no per-record ownership component.
    System,
}

/// Decides whether `actor` may perform `action` on `resource`.
///
/// Mismatched action/resource pairs are denied.
pub fn can(actor: &User, action: Action, resource: Resource<'_>) -> bool {
    match (action, resource) {
        (Action::CreateCampaign, Resource::System) => {
            matches!(actor.role, UserRole::Coordinator | UserRole::Admin)
        }

        (
            Action::ManageCampaign | Action::ViewCampaignStats | Action::ViewApplications,
            Resource::Campaign(campaign),
        ) => actor.is_admin() || campaign.coordinator_id == actor.id,

        // Any authenticated user except the owning coordinator may apply.
        (Action::ApplyToCampaign, Resource::Campaign(campaign)) => {
            campaign.coordinator_id != actor.id
        }

        (
            Action::SetApplicationStatus(target),
            Resource::Application {
                application,
                campaign_coordinator_id,
            },
        ) => {
            if actor.id == application.volunteer_id {
                // Volunteers may only withdraw their own application.
                target == ApplicationStatus::Withdrawn
            } else {
                actor.is_admin() || actor.id == campaign_coordinator_id
            }
        }

        (Action::JoinWithoutApproval, Resource::Campaign(campaign)) => {
            actor.is_admin() || campaign.coordinator_id == actor.id
        }

        (
            Action::ViewDonation,
            Resource::Donation {
                donation,
                campaign_coordinator_id,
            },
        ) => {
            actor.is_admin()
                || donation.donor_id == Some(actor.id)
                || campaign_coordinator_id == actor.id
        }

        (Action::OverrideDonationStatus | Action::ChangeUserRole, Resource::System) => {
            actor.is_admin()
        }

        _ => false,
    }
}
