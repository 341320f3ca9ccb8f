use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use log::info;

use super::AppState;
use crate::{
    database,
    error::AppError,
    filters::{AnalyticsQuery, Endpoint, UserFilter},
    metrics::{self, FunnelCounts},
};

/// User rows an endpoint reads, or `None` when it reads no users.
/// `tier` narrows stats and geo, `segment` narrows stats only; funnel and
/// cohorts always see every user. Both filters are validated for every
/// endpoint, so a bad value is rejected even where it would be ignored.
pub fn user_filter_for(endpoint: Endpoint, query: &AnalyticsQuery) -> Result<Option<UserFilter>, AppError> {
    let requested = query.user_filter()?;

    let filter = match endpoint {
        Endpoint::Stats => Some(requested),
        Endpoint::Geo => Some(UserFilter::tier_only(requested.tier)),
        Endpoint::Funnel | Endpoint::Cohorts => Some(UserFilter::default()),
        Endpoint::Revenue | Endpoint::Usage | Endpoint::Campaigns => None,
    };
    Ok(filter)
}

async fn users_for(state: &AppState, filter: Option<UserFilter>) -> Result<Vec<crate::models::AnalyticsUser>, AppError> {
    let filter = filter.unwrap_or_default();
    Ok(database::fetch_users(&state.db, &filter).await?)
}

/// `GET /analytics?endpoint=..&tier=..&segment=..`
pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Response, AppError> {
    let endpoint = query.endpoint()?;
    let filter = user_filter_for(endpoint, &query)?;
    info!(
        "Analytics request: {:?}, tier: {}, segment: {}",
        endpoint,
        query.tier.as_deref().unwrap_or("all"),
        query.segment.as_deref().unwrap_or("all"),
    );

    let db = &state.db;
    let response = match endpoint {
        Endpoint::Stats => {
            let users = users_for(&state, filter).await?;
            let revenue = database::fetch_revenue(db).await?;
            Json(metrics::dashboard_stats(&users, &revenue)).into_response()
        }
        Endpoint::Revenue => {
            let revenue = database::fetch_revenue(db).await?;
            Json(metrics::revenue_series(&revenue)).into_response()
        }
        Endpoint::Funnel => {
            let users = users_for(&state, filter).await?;
            Json(metrics::funnel(&FunnelCounts::from_users(&users))).into_response()
        }
        Endpoint::Cohorts => {
            let users = users_for(&state, filter).await?;
            Json(metrics::cohort_retention(&users, Utc::now())).into_response()
        }
        Endpoint::Usage => {
            let usage = database::fetch_usage(db).await?;
            Json(metrics::feature_usage(&usage)).into_response()
        }
        Endpoint::Geo => {
            let users = users_for(&state, filter).await?;
            Json(metrics::geo_breakdown(&users)).into_response()
        }
        Endpoint::Campaigns => {
            let campaigns = database::fetch_campaigns(db).await?;
            Json(metrics::campaign_performance(&campaigns)).into_response()
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{filters::Segment, models::SubscriptionTier};

    fn query(tier: &str, segment: &str) -> AnalyticsQuery {
        AnalyticsQuery {
            endpoint: None,
            tier: Some(tier.to_string()),
            segment: Some(segment.to_string()),
        }
    }

    #[test]
    fn stats_applies_tier_and_segment() {
        let filter = user_filter_for(Endpoint::Stats, &query("pro", "churned")).unwrap();

        assert_eq!(
            filter,
            Some(UserFilter {
                tier: Some(SubscriptionTier::Pro),
                segment: Segment::Churned,
            })
        );
    }

    #[test]
    fn geo_applies_tier_but_not_segment() {
        let filter = user_filter_for(Endpoint::Geo, &query("starter", "active")).unwrap();

        assert_eq!(filter, Some(UserFilter::tier_only(Some(SubscriptionTier::Starter))));
    }

    #[test]
    fn funnel_and_cohorts_read_every_user() {
        for endpoint in [Endpoint::Funnel, Endpoint::Cohorts] {
            let filter = user_filter_for(endpoint, &query("enterprise", "churned")).unwrap();
            assert_eq!(filter, Some(UserFilter::default()));
        }
    }

    #[test]
    fn non_user_endpoints_read_no_users() {
        for endpoint in [Endpoint::Revenue, Endpoint::Usage, Endpoint::Campaigns] {
            assert_eq!(user_filter_for(endpoint, &query("pro", "active")).unwrap(), None);
        }
    }

    #[test]
    fn bad_filters_are_rejected_on_every_endpoint() {
        let endpoints = [
            Endpoint::Stats,
            Endpoint::Revenue,
            Endpoint::Funnel,
            Endpoint::Cohorts,
            Endpoint::Usage,
            Endpoint::Geo,
            Endpoint::Campaigns,
        ];

        for endpoint in endpoints {
            assert!(matches!(
                user_filter_for(endpoint, &query("all", "dormant")),
                Err(AppError::InvalidFilter { field: "segment", .. })
            ));
            assert!(matches!(
                user_filter_for(endpoint, &query("gold", "all")),
                Err(AppError::InvalidFilter { field: "tier", .. })
            ));
        }
    }
}
