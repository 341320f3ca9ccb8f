use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::NaiveDate;

use super::AcquisitionChannel;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub channel: AcquisitionChannel,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub cost: i64,
    pub revenue: i64,
    pub start_date: NaiveDate,
}
