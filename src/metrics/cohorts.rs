use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::round_half_up;
use crate::models::AnalyticsUser;

/// Cohorts reported, most recent last.
pub const MAX_COHORTS: usize = 7;
/// Months tracked after the signup month.
pub const MAX_TRACKED_MONTHS: i64 = 6;

const MONTH_MILLIS: i64 = 30 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortRetention {
    /// e.g. `Jan 24`
    pub cohort: String,
    pub size: usize,
    /// Whole percentages; index 0 is the signup month.
    pub retention: Vec<i64>,
}

struct CohortAccumulator {
    first_signup: DateTime<Utc>,
    size: usize,
    churn_months: Vec<i64>,
}

fn elapsed_months(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MONTH_MILLIS)
}

/// Groups users by signup month and walks each cohort forward month by
/// month, bounded by the time elapsed since the cohort's earliest signup.
pub fn cohort_retention(users: &[AnalyticsUser], now: DateTime<Utc>) -> Vec<CohortRetention> {
    let mut ordered: Vec<&AnalyticsUser> = users.iter().collect();
    ordered.sort_by_key(|u| u.signup_date);

    let mut cohorts: BTreeMap<(i32, u32), CohortAccumulator> = BTreeMap::new();
    for user in ordered {
        let key = (user.signup_date.year(), user.signup_date.month());
        let cohort = cohorts.entry(key).or_insert_with(|| CohortAccumulator {
            first_signup: user.signup_date,
            size: 0,
            churn_months: Vec::new(),
        });
        cohort.size += 1;

        if let (true, Some(churn_date)) = (user.churned, user.churn_date) {
            cohort.churn_months.push(elapsed_months(user.signup_date, churn_date));
        }
    }

    let skip = cohorts.len().saturating_sub(MAX_COHORTS);
    cohorts
        .into_values()
        .skip(skip)
        .map(|cohort| {
            let months_active = elapsed_months(cohort.first_signup, now).clamp(0, MAX_TRACKED_MONTHS);

            let mut retention = vec![100];
            for month in 1..=months_active {
                let churned = cohort.churn_months.iter().filter(|m| **m < month).count();
                let remaining = cohort.size - churned;
                retention.push(round_half_up(remaining as f64 / cohort.size as f64 * 100.0) as i64);
            }

            CohortRetention {
                cohort: cohort.first_signup.format("%b %y").to_string(),
                size: cohort.size,
                retention,
            }
        })
        .collect()
}
