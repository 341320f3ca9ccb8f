use serde::Serialize;

use super::{percentage, round_half_up, round_one_decimal};
use crate::models::{AnalyticsUser, RevenuePeriod};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub mrr: i64,
    pub mrr_growth: f64,
    pub churn_rate: f64,
    pub avg_revenue_per_user: i64,
}

/// Headline numbers for the dashboard header.
///
/// `revenue` must be ordered by date ascending. The latest period supplies
/// the MRR; with no revenue rows at all, MRR falls back to the summed
/// monthly revenue of the active users. A missing or zero previous period
/// yields 0% growth.
pub fn dashboard_stats(users: &[AnalyticsUser], revenue: &[RevenuePeriod]) -> DashboardStats {
    let total_users = users.len();
    let active_users = users.iter().filter(|u| u.is_active()).count();
    let churned_users = total_users - active_users;

    let latest_mrr = match revenue.last() {
        Some(period) => period.mrr,
        None => users
            .iter()
            .filter(|u| u.is_active())
            .map(|u| u.monthly_revenue)
            .sum(),
    };
    let previous_mrr = revenue
        .iter()
        .rev()
        .nth(1)
        .map(|period| period.mrr)
        .filter(|mrr| *mrr != 0)
        .unwrap_or(latest_mrr);

    let mrr_growth = percentage((latest_mrr - previous_mrr) as f64, previous_mrr as f64);
    let churn_rate = percentage(churned_users as f64, total_users as f64);
    let avg_revenue_per_user = if active_users == 0 {
        0
    } else {
        round_half_up(latest_mrr as f64 / active_users as f64) as i64
    };

    DashboardStats {
        total_users,
        active_users,
        mrr: latest_mrr,
        mrr_growth: round_one_decimal(mrr_growth),
        churn_rate: round_one_decimal(churn_rate),
        avg_revenue_per_user,
    }
}
