use serde::Serialize;

use super::{percentage, round_half_up, round_one_decimal};
use crate::models::AnalyticsUser;

pub const STAGE_NAMES: [&str; 5] = [
    "Website Visits",
    "Sign Ups",
    "Activated",
    "Trial Started",
    "Converted",
];

const ACTIVATION_RATE: f64 = 0.65;
const TRIAL_RATE: f64 = 0.35;
const VISIT_TO_SIGNUP_RATE: f64 = 0.08;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub stage: String,
    pub count: i64,
    pub percentage: f64,
}

/// Stage counts in funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunnelCounts {
    pub visits: i64,
    pub signups: i64,
    pub activated: i64,
    pub trial_started: i64,
    pub converted: i64,
}

impl FunnelCounts {
    /// Every user is a signup; conversions are users on a paid tier. The
    /// remaining stages are estimated from fixed rates since visits,
    /// activation and trials are not tracked per user.
    pub fn from_users(users: &[AnalyticsUser]) -> Self {
        let signups = users.len() as f64;

        Self {
            visits: round_half_up(signups / VISIT_TO_SIGNUP_RATE) as i64,
            signups: users.len() as i64,
            activated: round_half_up(signups * ACTIVATION_RATE) as i64,
            trial_started: round_half_up(signups * TRIAL_RATE) as i64,
            converted: users.iter().filter(|u| u.subscription_tier.is_paid()).count() as i64,
        }
    }

    fn in_order(&self) -> [i64; 5] {
        [self.visits, self.signups, self.activated, self.trial_started, self.converted]
    }
}

/// The first stage is always 100%; the rest are relative to it.
pub fn funnel(counts: &FunnelCounts) -> Vec<FunnelStage> {
    let stage_counts = counts.in_order();
    let first = stage_counts[0] as f64;

    STAGE_NAMES
        .iter()
        .zip(stage_counts)
        .enumerate()
        .map(|(index, (name, count))| FunnelStage {
            stage: name.to_string(),
            count,
            percentage: if index == 0 {
                100.0
            } else {
                round_one_decimal(percentage(count as f64, first))
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{at, user};
    use crate::models::SubscriptionTier;

    #[test]
    fn percentages_are_relative_to_first_stage() {
        let counts = FunnelCounts {
            visits: 50_000,
            signups: 5_000,
            activated: 2_500,
            trial_started: 1_200,
            converted: 450,
        };
        let stages = funnel(&counts);

        let percentages: Vec<f64> = stages.iter().map(|s| s.percentage).collect();
        assert_eq!(percentages, vec![100.0, 10.0, 5.0, 2.4, 0.9]);
        assert_eq!(stages[4].stage, "Converted");
    }

    #[test]
    fn stage_counts_derive_from_users() {
        let mut users: Vec<_> = (0..19)
            .map(|_| user(SubscriptionTier::Free, "US", at(2024, 1, 1)))
            .collect();
        users.extend((0..5).map(|_| user(SubscriptionTier::Pro, "US", at(2024, 1, 1))));

        let counts = FunnelCounts::from_users(&users);
        assert_eq!(counts.signups, 24);
        assert_eq!(counts.visits, 300);
        assert_eq!(counts.activated, 16);
        assert_eq!(counts.trial_started, 8);
        assert_eq!(counts.converted, 5);

        let stages = funnel(&counts);
        assert_eq!(stages[1].percentage, 8.0);
    }

    #[test]
    fn empty_funnel_guards_division() {
        let stages = funnel(&FunnelCounts::from_users(&[]));

        assert_eq!(stages.len(), 5);
        assert_eq!(stages[0].percentage, 100.0);
        assert!(stages.iter().all(|s| s.count == 0));
        assert!(stages[1..].iter().all(|s| s.percentage == 0.0));
    }
}
