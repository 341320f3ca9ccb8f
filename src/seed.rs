//! Synthetic dashboard data.
//!
//! Generation is pure given an RNG and a clock, so the same seed and `now`
//! always produce the same dataset.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use rand::{distributions::WeightedError, seq::SliceRandom, Rng};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    metrics::round_half_up,
    models::{AcquisitionChannel, AnalyticsUser, Campaign, RevenuePeriod, SubscriptionTier, UsageRecord},
};

const COUNTRY_WEIGHTS: [(&str, u32); 10] = [
    ("US", 35),
    ("GB", 12),
    ("DE", 10),
    ("FR", 8),
    ("CA", 7),
    ("AU", 6),
    ("JP", 5),
    ("BR", 5),
    ("IN", 7),
    ("NL", 5),
];

pub const FEATURES: [&str; 8] = [
    "dashboard",
    "reports",
    "api",
    "integrations",
    "exports",
    "automations",
    "team",
    "sso",
];

const CAMPAIGN_NAMES: [&str; 8] = [
    "Summer Sale 2024",
    "Product Launch",
    "Black Friday",
    "Q4 Push",
    "Retargeting",
    "Brand Awareness",
    "Feature Announcement",
    "Holiday Special",
];

const SIGNUP_WINDOW_MONTHS: u32 = 7;
const REVENUE_MONTHS: u32 = 7;
const USAGE_DAYS: i64 = 30;
const STARTING_MRR: f64 = 45_000.0;

#[derive(Debug, Clone)]
pub struct SeedDataset {
    pub users: Vec<AnalyticsUser>,
    pub revenue: Vec<RevenuePeriod>,
    pub usage: Vec<UsageRecord>,
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    pub users: usize,
    pub revenue: usize,
    pub usage: usize,
    pub campaigns: usize,
}

impl SeedDataset {
    pub fn counts(&self) -> SeedCounts {
        SeedCounts {
            users: self.users.len(),
            revenue: self.revenue.len(),
            usage: self.usage.len(),
            campaigns: self.campaigns.len(),
        }
    }
}

pub fn generate<R: Rng>(rng: &mut R, now: DateTime<Utc>, user_count: usize) -> Result<SeedDataset, WeightedError> {
    Ok(SeedDataset {
        users: generate_users(rng, now, user_count)?,
        revenue: generate_revenue(rng, now),
        usage: generate_usage(rng, now),
        campaigns: generate_campaigns(rng, now),
    })
}

fn churn_probability(tier: SubscriptionTier) -> f64 {
    match tier {
        SubscriptionTier::Free => 0.40,
        SubscriptionTier::Starter => 0.15,
        SubscriptionTier::Pro => 0.08,
        SubscriptionTier::Enterprise => 0.03,
    }
}

fn month_start(now: DateTime<Utc>, months_back: u32) -> NaiveDate {
    let first = now.date_naive().with_day(1).unwrap_or_else(|| now.date_naive());
    first.checked_sub_months(Months::new(months_back)).unwrap_or(first)
}

fn random_tier<R: Rng>(rng: &mut R) -> SubscriptionTier {
    SubscriptionTier::ALL.choose(rng).copied().unwrap_or(SubscriptionTier::Free)
}

fn random_channel<R: Rng>(rng: &mut R) -> AcquisitionChannel {
    AcquisitionChannel::ALL.choose(rng).copied().unwrap_or(AcquisitionChannel::Organic)
}

/// Signups spread uniformly from the start of the month seven months ago
/// up to `now`. Churn dates still in the future are dropped, leaving the
/// user flagged as churned without a date.
pub fn generate_users<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    count: usize,
) -> Result<Vec<AnalyticsUser>, WeightedError> {
    let window_start = Utc.from_utc_datetime(&month_start(now, SIGNUP_WINDOW_MONTHS).and_time(NaiveTime::MIN));
    let window_millis = (now - window_start).num_milliseconds().max(0);

    let mut users = Vec::with_capacity(count);
    for n in 1..=count {
        let signup_date = window_start + Duration::milliseconds(rng.gen_range(0..=window_millis));
        let tier = random_tier(rng);
        let country = COUNTRY_WEIGHTS.choose_weighted(rng, |(_, weight)| *weight)?.0;
        let churned = rng.gen_bool(churn_probability(tier));
        let churn_date = if churned {
            Some(signup_date + Duration::days(rng.gen_range(30..=120)))
        } else {
            None
        };

        users.push(AnalyticsUser {
            id: Uuid::new_v4(),
            email: format!("user{}@example.com", n),
            signup_date,
            subscription_tier: tier,
            churned,
            churn_date: churn_date.filter(|date| *date < now),
            country: country.to_string(),
            acquisition_channel: random_channel(rng),
            monthly_revenue: tier.monthly_price(),
        });
    }

    Ok(users)
}

/// One period per month, oldest first, ending with the current month.
pub fn generate_revenue<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Vec<RevenuePeriod> {
    let mut base_mrr = STARTING_MRR;

    (0..REVENUE_MONTHS)
        .rev()
        .map(|months_back| {
            let new_revenue = round_half_up(base_mrr * (0.08 + rng.gen::<f64>() * 0.05)) as i64;
            let churned_revenue = round_half_up(base_mrr * (0.02 + rng.gen::<f64>() * 0.03)) as i64;
            let expansion_revenue = round_half_up(base_mrr * (0.02 + rng.gen::<f64>() * 0.02)) as i64;
            base_mrr += (new_revenue - churned_revenue + expansion_revenue) as f64;

            RevenuePeriod {
                id: Uuid::new_v4(),
                date: month_start(now, months_back),
                mrr: round_half_up(base_mrr) as i64,
                new_revenue,
                churned_revenue,
                expansion_revenue,
                one_time_payments: rng.gen_range(2_000..=8_000),
                refunds: rng.gen_range(200..=1_500),
            }
        })
        .collect()
}

/// Thirty days per feature ending today, with weekends at 60% of weekday
/// volume.
pub fn generate_usage<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Vec<UsageRecord> {
    let today = now.date_naive();
    let mut records = Vec::with_capacity(FEATURES.len() * USAGE_DAYS as usize);

    for feature in FEATURES {
        let base_usage = rng.gen_range(1_000..=10_000) as f64;
        for day in 0..USAGE_DAYS {
            let date = today - Duration::days(USAGE_DAYS - 1 - day);
            let weekend_factor = match date.weekday() {
                Weekday::Sat | Weekday::Sun => 0.6,
                _ => 1.0,
            };
            let noise = 0.8 + rng.gen::<f64>() * 0.4;

            records.push(UsageRecord {
                id: Uuid::new_v4(),
                feature: feature.to_string(),
                date,
                usage_count: round_half_up(base_usage * weekend_factor * noise) as i64,
            });
        }
    }

    records
}

pub fn generate_campaigns<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Vec<Campaign> {
    let today = now.date_naive();

    CAMPAIGN_NAMES
        .iter()
        .map(|name| {
            let channel = random_channel(rng);
            let impressions: i64 = rng.gen_range(50_000..=500_000);
            let ctr = 0.01 + rng.gen::<f64>() * 0.04;
            let clicks = round_half_up(impressions as f64 * ctr) as i64;
            let conversion_rate = 0.02 + rng.gen::<f64>() * 0.08;
            let conversions = round_half_up(clicks as f64 * conversion_rate) as i64;
            let cost_per_click = 0.5 + rng.gen::<f64>() * 2.0;
            let cost = round_half_up(clicks as f64 * cost_per_click) as i64;
            let avg_revenue: i64 = rng.gen_range(50..=200);
            let months_ago = rng.gen_range(1..=6);

            Campaign {
                id: Uuid::new_v4(),
                name: name.to_string(),
                channel,
                impressions,
                clicks,
                conversions,
                cost,
                revenue: conversions * avg_revenue,
                start_date: today.checked_sub_months(Months::new(months_ago)).unwrap_or(today),
            }
        })
        .collect()
}
