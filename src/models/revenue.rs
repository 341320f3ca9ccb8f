use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::NaiveDate;

/// One month of the revenue series. `date` is the first day of the month.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevenuePeriod {
    pub id: Uuid,
    pub date: NaiveDate,
    pub mrr: i64,
    pub new_revenue: i64,
    pub churned_revenue: i64,
    pub expansion_revenue: i64,
    pub one_time_payments: i64,
    pub refunds: i64,
}
