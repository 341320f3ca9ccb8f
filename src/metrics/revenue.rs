use serde::Serialize;

use crate::models::RevenuePeriod;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    /// `YYYY-MM`
    pub date: String,
    pub mrr: i64,
    pub new_revenue: i64,
    pub churned_revenue: i64,
    pub expansion_revenue: i64,
    pub one_time_payments: i64,
    pub refunds: i64,
}

impl From<&RevenuePeriod> for RevenuePoint {
    fn from(period: &RevenuePeriod) -> Self {
        Self {
            date: period.date.format("%Y-%m").to_string(),
            mrr: period.mrr,
            new_revenue: period.new_revenue,
            churned_revenue: period.churned_revenue,
            expansion_revenue: period.expansion_revenue,
            one_time_payments: period.one_time_payments,
            refunds: period.refunds,
        }
    }
}

pub fn revenue_series(periods: &[RevenuePeriod]) -> Vec<RevenuePoint> {
    periods.iter().map(RevenuePoint::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn reshapes_rows_into_monthly_points() {
        let periods = vec![RevenuePeriod {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            mrr: 52_340,
            new_revenue: 4_800,
            churned_revenue: 1_200,
            expansion_revenue: 900,
            one_time_payments: 3_100,
            refunds: 450,
        }];

        let series = revenue_series(&periods);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, "2024-03");

        let json = serde_json::to_value(&series[0]).unwrap();
        assert_eq!(json["newRevenue"], 4_800);
        assert_eq!(json["oneTimePayments"], 3_100);
    }

    #[test]
    fn empty_series_stays_empty() {
        assert!(revenue_series(&[]).is_empty());
    }
}
