use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::{error::AppError, models::SubscriptionTier};

/// Raw query string of `GET /analytics`. Missing or empty values fall back
/// to `endpoint=stats`, `tier=all`, `segment=all`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub endpoint: Option<String>,
    pub tier: Option<String>,
    pub segment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Stats,
    Revenue,
    Funnel,
    Cohorts,
    Usage,
    Geo,
    Campaigns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Segment {
    #[default]
    All,
    Active,
    Churned,
}

/// Row filter applied to `analytics_users` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserFilter {
    pub tier: Option<SubscriptionTier>,
    pub segment: Segment,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl AnalyticsQuery {
    pub fn endpoint(&self) -> Result<Endpoint, AppError> {
        let endpoint = match non_empty(&self.endpoint).unwrap_or("stats") {
            "stats" => Endpoint::Stats,
            "revenue" => Endpoint::Revenue,
            "funnel" => Endpoint::Funnel,
            "cohorts" => Endpoint::Cohorts,
            "usage" => Endpoint::Usage,
            "geo" => Endpoint::Geo,
            "campaigns" => Endpoint::Campaigns,
            other => return Err(AppError::UnknownEndpoint(other.to_string())),
        };
        Ok(endpoint)
    }

    pub fn tier(&self) -> Result<Option<SubscriptionTier>, AppError> {
        match non_empty(&self.tier) {
            None | Some("all") => Ok(None),
            Some(value) => SubscriptionTier::parse(value)
                .map(Some)
                .ok_or_else(|| AppError::InvalidFilter {
                    field: "tier",
                    value: value.to_string(),
                }),
        }
    }

    pub fn segment(&self) -> Result<Segment, AppError> {
        match non_empty(&self.segment) {
            None | Some("all") => Ok(Segment::All),
            Some("active") => Ok(Segment::Active),
            Some("churned") => Ok(Segment::Churned),
            Some(value) => Err(AppError::InvalidFilter {
                field: "segment",
                value: value.to_string(),
            }),
        }
    }

    /// Tier and segment together, as used by the stats view.
    pub fn user_filter(&self) -> Result<UserFilter, AppError> {
        Ok(UserFilter {
            tier: self.tier()?,
            segment: self.segment()?,
        })
    }
}

impl UserFilter {
    pub fn tier_only(tier: Option<SubscriptionTier>) -> Self {
        Self {
            tier,
            segment: Segment::All,
        }
    }

    /// Appends a `WHERE` clause for this filter, if it restricts anything.
    pub fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        let mut clause = " WHERE ";

        if let Some(tier) = self.tier {
            builder.push(clause).push("subscription_tier = ").push_bind(tier);
            clause = " AND ";
        }

        match self.segment {
            Segment::All => {}
            Segment::Active => {
                builder.push(clause).push("churned = FALSE");
            }
            Segment::Churned => {
                builder.push(clause).push("churned = TRUE");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(endpoint: &str, tier: &str, segment: &str) -> AnalyticsQuery {
        AnalyticsQuery {
            endpoint: Some(endpoint.to_string()),
            tier: Some(tier.to_string()),
            segment: Some(segment.to_string()),
        }
    }

    fn sql_for(filter: UserFilter) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM analytics_users");
        filter.push_conditions(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let defaults = AnalyticsQuery::default();
        assert_eq!(defaults.endpoint().unwrap(), Endpoint::Stats);
        assert_eq!(defaults.user_filter().unwrap(), UserFilter::default());

        let blank = query("", " ", "");
        assert_eq!(blank.endpoint().unwrap(), Endpoint::Stats);
        assert_eq!(blank.tier().unwrap(), None);
    }

    #[test]
    fn parses_known_values() {
        let q = query("geo", "enterprise", "churned");
        assert_eq!(q.endpoint().unwrap(), Endpoint::Geo);
        assert_eq!(
            q.user_filter().unwrap(),
            UserFilter {
                tier: Some(SubscriptionTier::Enterprise),
                segment: Segment::Churned,
            }
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(matches!(
            query("heatmap", "all", "all").endpoint(),
            Err(AppError::UnknownEndpoint(name)) if name == "heatmap"
        ));
        assert!(matches!(
            query("stats", "gold", "all").tier(),
            Err(AppError::InvalidFilter { field: "tier", .. })
        ));
        assert!(matches!(
            query("stats", "all", "dormant").segment(),
            Err(AppError::InvalidFilter { field: "segment", .. })
        ));
    }

    #[test]
    fn unrestricted_filter_adds_no_clause() {
        assert_eq!(sql_for(UserFilter::default()), "SELECT * FROM analytics_users");
    }

    #[test]
    fn conditions_are_joined_with_and() {
        let sql = sql_for(UserFilter {
            tier: Some(SubscriptionTier::Pro),
            segment: Segment::Active,
        });
        assert_eq!(
            sql,
            "SELECT * FROM analytics_users WHERE subscription_tier = $1 AND churned = FALSE"
        );

        let sql = sql_for(UserFilter {
            tier: None,
            segment: Segment::Churned,
        });
        assert_eq!(sql, "SELECT * FROM analytics_users WHERE churned = TRUE");
    }
}
