pub mod analytics;
pub mod dashboard;
pub mod qr_listing;

pub use analytics::{build_analytics, AnalyticsSnapshot, Breakdown};
pub use dashboard::{build_dashboard, DashboardSnapshot};
pub use qr_listing::{build_qr_entries, matches_query, QrEntry};

use crate::storage::entity::profile::Model as ProfileModel;

pub(crate) fn profile_name(p: &ProfileModel) -> String {
    p.full_name.clone().unwrap_or_else(|| p.user_id.clone())
}
