use log::info;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, QueryBuilder};

use crate::{
    filters::UserFilter,
    models::{AnalyticsUser, Campaign, RevenuePeriod, UsageRecord},
    seed::SeedDataset,
};

pub type Database = Pool<Postgres>;

/// Rows per multi-row `INSERT`.
const INSERT_BATCH_SIZE: usize = 100;

/// `pg_advisory_xact_lock` key serializing concurrent seed writes.
const SEED_LOCK_KEY: i64 = 0x5EED;

const USER_COLUMNS: &str = "id, email, signup_date, subscription_tier, churned, churn_date, \
                            country, acquisition_channel, monthly_revenue";

pub async fn create_database_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<Database, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    // Test the connection
    ping(&pool).await?;

    info!("Connected to database (max {} connections)", max_connections);
    Ok(pool)
}

pub async fn run_migrations(db: &Database) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(db).await?;
    info!("Database schema is up to date");
    Ok(())
}

pub async fn ping(db: &Database) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(db).await?;
    Ok(())
}

/// Users matching `filter`, oldest signup first.
pub async fn fetch_users(db: &Database, filter: &UserFilter) -> Result<Vec<AnalyticsUser>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM analytics_users", USER_COLUMNS));
    filter.push_conditions(&mut builder);
    builder.push(" ORDER BY signup_date ASC");

    let users = builder.build_query_as::<AnalyticsUser>().fetch_all(db).await?;
    Ok(users)
}

pub async fn count_users(db: &Database) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM analytics_users")
        .fetch_one(db)
        .await
}

pub async fn fetch_revenue(db: &Database) -> Result<Vec<RevenuePeriod>, sqlx::Error> {
    sqlx::query_as::<_, RevenuePeriod>(
        r#"
        SELECT id, date, mrr, new_revenue, churned_revenue, expansion_revenue,
               one_time_payments, refunds
        FROM revenue
        ORDER BY date ASC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_usage(db: &Database) -> Result<Vec<UsageRecord>, sqlx::Error> {
    sqlx::query_as::<_, UsageRecord>(
        "SELECT id, feature, date, usage_count FROM usage_metrics ORDER BY date ASC",
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_campaigns(db: &Database) -> Result<Vec<Campaign>, sqlx::Error> {
    sqlx::query_as::<_, Campaign>(
        r#"
        SELECT id, name, channel, impressions, clicks, conversions, cost, revenue, start_date
        FROM campaigns
        ORDER BY start_date DESC
        "#,
    )
    .fetch_all(db)
    .await
}

/// Outcome of [`insert_dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedWrite {
    Inserted,
    /// Another writer got there first; holds the user count it left.
    AlreadySeeded(i64),
}

/// Writes a generated dataset in one transaction; nothing is kept if any
/// batch fails. Concurrent callers queue on an advisory lock, and the
/// store is re-checked under it so only the first one writes.
pub async fn insert_dataset(db: &Database, dataset: &SeedDataset) -> Result<SeedWrite, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM analytics_users")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        tx.rollback().await?;
        info!("Store was seeded concurrently ({} users), nothing written", existing);
        return Ok(SeedWrite::AlreadySeeded(existing));
    }

    for batch in dataset.users.chunks(INSERT_BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(format!("INSERT INTO analytics_users ({}) ", USER_COLUMNS));
        builder.push_values(batch, |mut row, user| {
            row.push_bind(user.id)
                .push_bind(&user.email)
                .push_bind(user.signup_date)
                .push_bind(user.subscription_tier)
                .push_bind(user.churned)
                .push_bind(user.churn_date)
                .push_bind(&user.country)
                .push_bind(user.acquisition_channel)
                .push_bind(user.monthly_revenue);
        });
        builder.build().execute(&mut *tx).await?;
    }
    info!("Inserted {} users", dataset.users.len());

    for batch in dataset.revenue.chunks(INSERT_BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO revenue (id, date, mrr, new_revenue, churned_revenue, expansion_revenue, \
             one_time_payments, refunds) ",
        );
        builder.push_values(batch, |mut row, period| {
            row.push_bind(period.id)
                .push_bind(period.date)
                .push_bind(period.mrr)
                .push_bind(period.new_revenue)
                .push_bind(period.churned_revenue)
                .push_bind(period.expansion_revenue)
                .push_bind(period.one_time_payments)
                .push_bind(period.refunds);
        });
        builder.build().execute(&mut *tx).await?;
    }
    info!("Inserted {} revenue periods", dataset.revenue.len());

    for batch in dataset.usage.chunks(INSERT_BATCH_SIZE) {
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO usage_metrics (id, feature, date, usage_count) ");
        builder.push_values(batch, |mut row, record| {
            row.push_bind(record.id)
                .push_bind(&record.feature)
                .push_bind(record.date)
                .push_bind(record.usage_count);
        });
        builder.build().execute(&mut *tx).await?;
    }
    info!("Inserted {} usage records", dataset.usage.len());

    for batch in dataset.campaigns.chunks(INSERT_BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO campaigns (id, name, channel, impressions, clicks, conversions, cost, \
             revenue, start_date) ",
        );
        builder.push_values(batch, |mut row, campaign| {
            row.push_bind(campaign.id)
                .push_bind(&campaign.name)
                .push_bind(campaign.channel)
                .push_bind(campaign.impressions)
                .push_bind(campaign.clicks)
                .push_bind(campaign.conversions)
                .push_bind(campaign.cost)
                .push_bind(campaign.revenue)
                .push_bind(campaign.start_date);
        });
        builder.build().execute(&mut *tx).await?;
    }
    info!("Inserted {} campaigns", dataset.campaigns.len());

    tx.commit().await?;
    Ok(SeedWrite::Inserted)
}
