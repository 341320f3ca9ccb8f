use std::collections::HashMap;

use serde::Serialize;

use crate::models::AnalyticsUser;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoBreakdown {
    pub country: String,
    pub code: String,
    pub users: usize,
    pub revenue: i64,
}

pub fn country_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "US" => "United States",
        "GB" => "United Kingdom",
        "DE" => "Germany",
        "FR" => "France",
        "CA" => "Canada",
        "AU" => "Australia",
        "JP" => "Japan",
        "BR" => "Brazil",
        "IN" => "India",
        "NL" => "Netherlands",
        _ => return None,
    };
    Some(name)
}

/// Users and live revenue per country, largest user base first. Churned
/// users count towards `users` but not `revenue`.
pub fn geo_breakdown(users: &[AnalyticsUser]) -> Vec<GeoBreakdown> {
    let mut rows: Vec<GeoBreakdown> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for user in users {
        let slot = *index.entry(user.country.as_str()).or_insert_with(|| {
            rows.push(GeoBreakdown {
                country: country_name(&user.country)
                    .map(str::to_string)
                    .unwrap_or_else(|| user.country.clone()),
                code: user.country.clone(),
                users: 0,
                revenue: 0,
            });
            rows.len() - 1
        });

        let row = &mut rows[slot];
        row.users += 1;
        if user.is_active() {
            row.revenue += user.monthly_revenue;
        }
    }

    rows.sort_by(|a, b| b.users.cmp(&a.users));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{at, churned_after, user};
    use crate::models::SubscriptionTier;

    #[test]
    fn groups_and_sorts_by_user_count() {
        let users = vec![
            user(SubscriptionTier::Pro, "DE", at(2024, 1, 1)),
            user(SubscriptionTier::Starter, "US", at(2024, 1, 2)),
            user(SubscriptionTier::Enterprise, "US", at(2024, 1, 3)),
            churned_after(user(SubscriptionTier::Pro, "US", at(2024, 1, 4)), 35),
            user(SubscriptionTier::Free, "ZA", at(2024, 1, 5)),
        ];

        let geo = geo_breakdown(&users);
        assert_eq!(geo[0].code, "US");
        assert_eq!(geo[0].country, "United States");
        assert_eq!(geo[0].users, 3);
        assert_eq!(geo[0].revenue, 29 + 299);

        assert_eq!(geo[1].code, "DE");
        assert_eq!(geo[1].revenue, 99);
        assert_eq!(geo[2].country, "ZA");
    }

    #[test]
    fn country_counts_add_up_to_input() {
        let codes = ["US", "GB", "US", "IN", "NL", "GB", "US", "BR"];
        let users: Vec<_> = codes
            .iter()
            .map(|code| user(SubscriptionTier::Starter, code, at(2024, 2, 1)))
            .collect();

        let geo = geo_breakdown(&users);
        assert_eq!(geo.iter().map(|g| g.users).sum::<usize>(), users.len());
        assert_eq!(geo.len(), 5);
    }

    #[test]
    fn empty_input_has_no_countries() {
        assert!(geo_breakdown(&[]).is_empty());
    }
}
