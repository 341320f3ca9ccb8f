//! Aggregations behind the dashboard views.
//!
//! Every function here is pure: rows in, view structs out. Empty inputs
//! produce zero-valued views, and every ratio guards its denominator.

pub mod campaigns;
pub mod cohorts;
pub mod funnel;
pub mod geo;
pub mod revenue;
pub mod stats;
pub mod usage;

pub use campaigns::{campaign_performance, CampaignPerformance};
pub use cohorts::{cohort_retention, CohortRetention};
pub use funnel::{funnel, FunnelCounts, FunnelStage};
pub use geo::{geo_breakdown, GeoBreakdown};
pub use revenue::{revenue_series, RevenuePoint};
pub use stats::{dashboard_stats, DashboardStats};
pub use usage::{feature_usage, FeatureUsage};

/// Rounds halves towards positive infinity, matching how the dashboard
/// client rounds (`-2.5` becomes `-2`, `2.5` becomes `3`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn round_one_decimal(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// `part / whole * 100`, or 0 when `whole` is zero.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
