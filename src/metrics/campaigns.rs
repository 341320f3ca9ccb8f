use serde::Serialize;
use uuid::Uuid;

use super::{percentage, round_half_up};
use crate::models::{AcquisitionChannel, Campaign};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignPerformance {
    pub id: Uuid,
    pub name: String,
    pub channel: AcquisitionChannel,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub cost: i64,
    pub revenue: i64,
    pub roi: i64,
}

/// Whole-percent return on spend; 0 when nothing was spent.
pub fn campaign_roi(cost: i64, revenue: i64) -> i64 {
    if cost <= 0 {
        return 0;
    }
    round_half_up(percentage((revenue - cost) as f64, cost as f64)) as i64
}

/// Newest campaigns first.
pub fn campaign_performance(campaigns: &[Campaign]) -> Vec<CampaignPerformance> {
    let mut ordered: Vec<&Campaign> = campaigns.iter().collect();
    ordered.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    ordered
        .into_iter()
        .map(|c| CampaignPerformance {
            id: c.id,
            name: c.name.clone(),
            channel: c.channel,
            impressions: c.impressions,
            clicks: c.clicks,
            conversions: c.conversions,
            cost: c.cost,
            revenue: c.revenue,
            roi: campaign_roi(c.cost, c.revenue),
        })
        .collect()
}
