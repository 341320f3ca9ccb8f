use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_tier", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Starter,
    Pro,
    Enterprise,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 4] = [
        SubscriptionTier::Free,
        SubscriptionTier::Starter,
        SubscriptionTier::Pro,
        SubscriptionTier::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Starter => "starter",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Enterprise => "enterprise",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == value)
    }

    /// List price per month, in whole currency units.
    pub fn monthly_price(&self) -> i64 {
        match self {
            SubscriptionTier::Free => 0,
            SubscriptionTier::Starter => 29,
            SubscriptionTier::Pro => 99,
            SubscriptionTier::Enterprise => 299,
        }
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "acquisition_channel", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionChannel {
    Organic,
    PaidSearch,
    Social,
    Referral,
    Direct,
    Email,
}

impl AcquisitionChannel {
    pub const ALL: [AcquisitionChannel; 6] = [
        AcquisitionChannel::Organic,
        AcquisitionChannel::PaidSearch,
        AcquisitionChannel::Social,
        AcquisitionChannel::Referral,
        AcquisitionChannel::Direct,
        AcquisitionChannel::Email,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalyticsUser {
    pub id: Uuid,
    pub email: String,
    pub signup_date: DateTime<Utc>,
    pub subscription_tier: SubscriptionTier,
    pub churned: bool,
    pub churn_date: Option<DateTime<Utc>>,
    pub country: String,
    pub acquisition_channel: AcquisitionChannel,
    pub monthly_revenue: i64,
}

impl AnalyticsUser {
    pub fn is_active(&self) -> bool {
        !self.churned
    }
}
